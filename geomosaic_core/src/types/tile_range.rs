use crate::{GeoPoint, TileCoord};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// An inclusive rectangle of XYZ tiles at a single level.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
	pub level: u8,
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileRange {
	pub fn new(level: u8, x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Result<TileRange> {
		TileCoord::new(level, x_max, y_max)?;
		ensure!(x_min <= x_max, "x_min ({x_min}) must be <= x_max ({x_max})");
		ensure!(y_min <= y_max, "y_min ({y_min}) must be <= y_max ({y_max})");
		Ok(TileRange {
			level,
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}

	/// Smallest range covering the rectangle spanned by two opposite corners, given in any order.
	pub fn from_geo_corners(a: &GeoPoint, b: &GeoPoint, level: u8) -> Result<TileRange> {
		let a = TileCoord::from_geo(a, level)?;
		let b = TileCoord::from_geo(b, level)?;
		TileRange::new(level, a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
	}

	/// The tile containing `center` plus `half_range` tiles in every direction,
	/// cut off at the edges of the pyramid.
	pub fn around(center: &GeoPoint, level: u8, half_range: u32) -> Result<TileRange> {
		let c = TileCoord::from_geo(center, level)?;
		let max = ((1u64 << level) - 1) as u32;
		TileRange::new(
			level,
			c.x.saturating_sub(half_range),
			c.y.saturating_sub(half_range),
			c.x.saturating_add(half_range).min(max),
			c.y.saturating_add(half_range).min(max),
		)
	}

	pub fn width(&self) -> u32 {
		self.x_max - self.x_min + 1
	}

	pub fn height(&self) -> u32 {
		self.y_max - self.y_min + 1
	}

	pub fn count(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	/// The north-west tile of the range.
	pub fn first(&self) -> TileCoord {
		TileCoord {
			level: self.level,
			x: self.x_min,
			y: self.y_min,
		}
	}
}

impl Debug for TileRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: [{},{},{},{}] ({}x{})",
			self.level,
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.width(),
			self.height()
		)
	}
}
