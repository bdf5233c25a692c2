use crate::{GeoPoint, MercatorPoint, TileCoord};
use std::fmt::{self, Debug};

/// One image of a mosaic: its grid position, where it lands on the canvas and what to request.
#[derive(Clone, Copy, PartialEq)]
pub struct GridCell {
	/// Column index, west to east.
	pub col: u32,
	/// Row index, north to south.
	pub row: u32,
	/// Left edge on the rendered canvas, in pixels.
	pub x: u32,
	/// Top edge on the rendered canvas, in pixels.
	pub y: u32,
	/// Rendered width of the image.
	pub width: u32,
	/// Rendered height of the image.
	pub height: u32,
	/// Ground-sample center in Web Mercator meters.
	pub center_mercator: MercatorPoint,
	/// Ground-sample center as longitude/latitude, the point handed to the fetcher.
	pub center: GeoPoint,
	/// XYZ address when the plan was built from a tile range.
	pub tile: Option<TileCoord>,
}

impl GridCell {
	/// Zero-based position in row-major visitation order.
	pub fn index(&self, grid_cols: u32) -> u64 {
		u64::from(self.row) * u64::from(grid_cols) + u64::from(self.col)
	}
}

impl Debug for GridCell {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GridCell(col {}, row {} @ {},{})", self.col, self.row, self.x, self.y)
	}
}
