use crate::{GeoPoint, projection};
use std::{
	fmt::Debug,
	ops::{Add, Sub},
};

/// A point in spherical Web Mercator (EPSG:3857), in meters.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct MercatorPoint {
	pub x: f64,
	pub y: f64,
}

impl MercatorPoint {
	pub fn new(x: f64, y: f64) -> MercatorPoint {
		MercatorPoint { x, y }
	}

	/// Unprojects the point to longitude/latitude. See [`projection::to_geo`].
	pub fn to_geo(&self) -> GeoPoint {
		projection::to_geo(self)
	}

	/// Moves the point `dx` meters east and `dy` meters north.
	#[must_use]
	pub fn offset(&self, dx: f64, dy: f64) -> MercatorPoint {
		MercatorPoint::new(self.x + dx, self.y + dy)
	}
}

impl Add for MercatorPoint {
	type Output = MercatorPoint;
	fn add(self, rhs: Self) -> Self::Output {
		MercatorPoint::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for MercatorPoint {
	type Output = MercatorPoint;
	fn sub(self, rhs: Self) -> Self::Output {
		MercatorPoint::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Debug for MercatorPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "MercatorPoint({:.3}, {:.3})", self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arithmetic() {
		let a = MercatorPoint::new(10.0, 20.0);
		let b = MercatorPoint::new(1.5, -2.5);
		assert_eq!(a + b, MercatorPoint::new(11.5, 17.5));
		assert_eq!(a - b, MercatorPoint::new(8.5, 22.5));
		assert_eq!(a.offset(-10.0, 5.0), MercatorPoint::new(0.0, 25.0));
	}

	#[test]
	fn debug_format() {
		assert_eq!(
			format!("{:?}", MercatorPoint::new(-696_837.5, 7_048_150.25)),
			"MercatorPoint(-696837.500, 7048150.250)"
		);
	}
}
