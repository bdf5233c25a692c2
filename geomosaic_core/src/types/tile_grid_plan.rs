//! The immutable output of grid planning.
//!
//! A [`TileGridPlan`] is computed once per mosaic run by [`crate::planner`] and then drives both
//! the pixel placement on the canvas and the world file, so the two can never disagree.
//!
//! Planning happens in *logical* pixels at the ground resolution of the zoom level. A service may
//! render every logical pixel `scale_factor` times wider (supersampling); the canvas and all paste
//! offsets are expressed in these *rendered* pixels.

use crate::{GeoPoint, GridCell, GroundResolution, MercatorPoint, TileCoord};
use std::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPlan {
	pub(crate) grid_cols: u32,
	pub(crate) grid_rows: u32,
	pub(crate) step_px_x: u32,
	pub(crate) step_px_y: u32,
	pub(crate) tile_px_w: u32,
	pub(crate) tile_px_h: u32,
	pub(crate) mosaic_px_w: u32,
	pub(crate) mosaic_px_h: u32,
	pub(crate) top_left: MercatorPoint,
	pub(crate) resolution: GroundResolution,
	pub(crate) scale_factor: u32,
	pub(crate) tile_origin: Option<TileCoord>,
}

impl TileGridPlan {
	pub fn grid_cols(&self) -> u32 {
		self.grid_cols
	}

	pub fn grid_rows(&self) -> u32 {
		self.grid_rows
	}

	pub fn cell_count(&self) -> u64 {
		u64::from(self.grid_cols) * u64::from(self.grid_rows)
	}

	/// Horizontal stride between neighbouring image origins, logical pixels.
	pub fn step_px_x(&self) -> u32 {
		self.step_px_x
	}

	/// Vertical stride between neighbouring image origins, logical pixels.
	pub fn step_px_y(&self) -> u32 {
		self.step_px_y
	}

	pub fn tile_px_w(&self) -> u32 {
		self.tile_px_w
	}

	pub fn tile_px_h(&self) -> u32 {
		self.tile_px_h
	}

	/// Mosaic width in logical pixels.
	pub fn mosaic_px_w(&self) -> u32 {
		self.mosaic_px_w
	}

	/// Mosaic height in logical pixels.
	pub fn mosaic_px_h(&self) -> u32 {
		self.mosaic_px_h
	}

	/// North-west corner of the mosaic (corner of pixel (0,0), not its center).
	pub fn top_left(&self) -> MercatorPoint {
		self.top_left
	}

	pub fn resolution(&self) -> GroundResolution {
		self.resolution
	}

	pub fn zoom(&self) -> u8 {
		self.resolution.zoom()
	}

	pub fn scale_factor(&self) -> u32 {
		self.scale_factor
	}

	/// First tile of the range if the plan addresses XYZ tiles.
	pub fn tile_origin(&self) -> Option<TileCoord> {
		self.tile_origin
	}

	pub fn rendered_width(&self) -> u32 {
		self.mosaic_px_w * self.scale_factor
	}

	pub fn rendered_height(&self) -> u32 {
		self.mosaic_px_h * self.scale_factor
	}

	/// Number of pixels of the rendered canvas.
	pub fn rendered_pixels(&self) -> u64 {
		u64::from(self.rendered_width()) * u64::from(self.rendered_height())
	}

	/// Ground width covered by the mosaic, meters.
	pub fn ground_width(&self) -> f64 {
		self.resolution.meters(f64::from(self.mosaic_px_w))
	}

	/// Ground height covered by the mosaic, meters.
	pub fn ground_height(&self) -> f64 {
		self.resolution.meters(f64::from(self.mosaic_px_h))
	}

	/// Center of the mosaic as longitude/latitude.
	pub fn center(&self) -> GeoPoint {
		self
			.top_left
			.offset(self.ground_width() / 2.0, -self.ground_height() / 2.0)
			.to_geo()
	}

	/// Describes the cell at column `col` and row `row`, or `None` outside the grid.
	pub fn cell(&self, col: u32, row: u32) -> Option<GridCell> {
		if col >= self.grid_cols || row >= self.grid_rows {
			return None;
		}
		let res = &self.resolution;
		let center_mercator = self.top_left.offset(
			res.meters(f64::from(self.tile_px_w) / 2.0 + f64::from(col * self.step_px_x)),
			-res.meters(f64::from(self.tile_px_h) / 2.0 + f64::from(row * self.step_px_y)),
		);
		let tile = self.tile_origin.map(|origin| TileCoord {
			level: origin.level,
			x: origin.x + col,
			y: origin.y + row,
		});
		Some(GridCell {
			col,
			row,
			x: col * self.step_px_x * self.scale_factor,
			y: row * self.step_px_y * self.scale_factor,
			width: self.tile_px_w * self.scale_factor,
			height: self.tile_px_h * self.scale_factor,
			center_mercator,
			center: center_mercator.to_geo(),
			tile,
		})
	}

	/// All cells in the deterministic row-major order: rows north to south, columns west to east.
	pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
		(0..self.grid_rows).flat_map(move |row| (0..self.grid_cols).filter_map(move |col| self.cell(col, row)))
	}
}

impl Display for TileGridPlan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "grid:        {} x {} images", self.grid_cols, self.grid_rows)?;
		writeln!(
			f,
			"image:       {} x {} px, step {} x {} px (logical)",
			self.tile_px_w, self.tile_px_h, self.step_px_x, self.step_px_y
		)?;
		writeln!(
			f,
			"mosaic:      {} x {} px at scale {} ({:.1} MP)",
			self.rendered_width(),
			self.rendered_height(),
			self.scale_factor,
			self.rendered_pixels() as f64 / 1e6
		)?;
		writeln!(
			f,
			"ground:      {:.1} x {:.1} m at zoom {}, {}",
			self.ground_width(),
			self.ground_height(),
			self.zoom(),
			self.resolution
		)?;
		write!(f, "top left:    {:.3}, {:.3} (EPSG:3857)", self.top_left.x, self.top_left.y)
	}
}
