//! Integer tile addresses in the XYZ (slippy map) scheme.
//!
//! ```
//! use geomosaic_core::{GeoPoint, TileCoord};
//!
//! let coord = TileCoord::from_geo(&GeoPoint::new(-6.2597, 53.3478), 15).unwrap();
//! assert_eq!((coord.x, coord.y), (15814, 10621));
//! ```

use crate::{GeoPoint, MercatorPoint};
use anyhow::{Result, ensure};
use std::{
	f64::consts::PI,
	fmt::{self, Debug},
};

/// Maximum level for XYZ tile coordinates.
pub const MAX_TILE_LEVEL: u8 = 31;

/// A tile address: zoom `level`, column `x` (west to east) and row `y` (north to south).
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	pub level: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	/// Creates a coordinate, checking that `x` and `y` exist at `level`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_TILE_LEVEL, "level ({level}) must be <= {MAX_TILE_LEVEL}");
		let max = 1u64 << level;
		ensure!(u64::from(x) < max, "x ({x}) out of bounds for level {level}");
		ensure!(u64::from(y) < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Finds the tile containing `point`. The latitude is clamped to the Mercator range and
	/// indices outside the pyramid are clamped to its edge.
	pub fn from_geo(point: &GeoPoint, level: u8) -> Result<TileCoord> {
		ensure!(level <= MAX_TILE_LEVEL, "level ({level}) must be <= {MAX_TILE_LEVEL}");
		point.check()?;

		let point = point.clamped();
		let zoom = 2f64.powi(i32::from(level));
		let lat = point.lat.to_radians();
		let x = (point.lon + 180.0) / 360.0 * zoom;
		let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * zoom;

		let clamp = |v: f64| v.floor().clamp(0.0, zoom - 1.0) as u32;
		TileCoord::new(level, clamp(x), clamp(y))
	}

	/// Longitude/latitude of the north-west corner of the tile.
	pub fn north_west(&self) -> GeoPoint {
		let zoom = 2f64.powi(i32::from(self.level));
		GeoPoint::new(
			(f64::from(self.x) / zoom - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(self.y) / zoom)).exp().atan() / PI - 0.25) * 360.0,
		)
	}

	/// Web Mercator position of the north-west corner, computed without going through degrees.
	pub fn north_west_mercator(&self) -> MercatorPoint {
		let half = crate::EARTH_RADIUS * PI;
		let size = 2.0 * half / 2f64.powi(i32::from(self.level));
		MercatorPoint::new(-half + f64::from(self.x) * size, half - f64::from(self.y) * size)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}
