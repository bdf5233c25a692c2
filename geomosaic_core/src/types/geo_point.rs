use crate::{MAX_LAT, MAX_LON, MercatorPoint, dms::parse_coordinate, projection};
use anyhow::{Context, Result, ensure};
use std::{fmt::Debug, str::FromStr};

/// A point in geographic space: longitude and latitude in degrees (WGS84).
///
/// Latitudes outside the Web Mercator range are accepted and clamped when projected.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
	pub lon: f64,
	pub lat: f64,
}

impl GeoPoint {
	pub fn new(lon: f64, lat: f64) -> GeoPoint {
		GeoPoint { lon, lat }
	}

	/// Returns a copy with the latitude clamped to the Web Mercator range.
	#[must_use]
	pub fn clamped(&self) -> GeoPoint {
		GeoPoint {
			lon: self.lon,
			lat: self.lat.clamp(-MAX_LAT, MAX_LAT),
		}
	}

	/// Projects the point to Web Mercator meters. See [`projection::to_mercator`].
	pub fn to_mercator(&self) -> MercatorPoint {
		projection::to_mercator(self)
	}

	/// Checks that longitude and latitude are finite and within `[-180, 180]` / `[-90, 90]`.
	pub fn check(&self) -> Result<()> {
		ensure!(self.lon.is_finite(), "longitude ({}) must be finite", self.lon);
		ensure!(self.lat.is_finite(), "latitude ({}) must be finite", self.lat);
		ensure!(self.lon.abs() <= MAX_LON, "longitude ({}) must be within ±180", self.lon);
		ensure!(self.lat.abs() <= 90.0, "latitude ({}) must be within ±90", self.lat);
		Ok(())
	}
}

impl Debug for GeoPoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "GeoPoint(lat {:.8}, lon {:.8})", self.lat, self.lon)
	}
}

impl FromStr for GeoPoint {
	type Err = anyhow::Error;

	/// Parses `"lat,lon"`. Each half may be decimal degrees or DMS, e.g.
	/// `53°20'52.1"N, 6°15'35"W`.
	fn from_str(s: &str) -> Result<Self> {
		let parts: Vec<&str> = s.split([',', ';']).map(str::trim).collect();
		ensure!(parts.len() == 2, "expected \"lat,lon\", got {s:?}");
		let lat = parse_coordinate(parts[0]).with_context(|| format!("parsing latitude in {s:?}"))?;
		let lon = parse_coordinate(parts[1]).with_context(|| format!("parsing longitude in {s:?}"))?;
		let point = GeoPoint::new(lon, lat);
		point.check()?;
		Ok(point)
	}
}
