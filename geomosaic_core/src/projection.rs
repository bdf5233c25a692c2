//! Conversion between WGS84 longitude/latitude and spherical Web Mercator meters.
//!
//! Both directions are exact inverses of each other, except where [`to_mercator`] had to clamp
//! the latitude to [`MAX_LAT`]. Clamping happens before the `ln(tan(..))` term is evaluated,
//! which diverges towards the poles.
//!
//! ```
//! use geomosaic_core::{GeoPoint, projection};
//!
//! let dublin = GeoPoint::new(-6.2597, 53.3478);
//! let m = projection::to_mercator(&dublin);
//! let back = projection::to_geo(&m);
//! assert!((back.lat - dublin.lat).abs() < 1e-9);
//! ```

use crate::{EARTH_RADIUS, GeoPoint, MAX_LAT, MercatorPoint};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Projects a geographic point to Web Mercator meters, clamping the latitude silently.
pub fn to_mercator(point: &GeoPoint) -> MercatorPoint {
	let lat = point.lat.clamp(-MAX_LAT, MAX_LAT);
	MercatorPoint {
		x: point.lon.to_radians() * EARTH_RADIUS,
		y: EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
	}
}

/// Unprojects Web Mercator meters to a geographic point.
pub fn to_geo(point: &MercatorPoint) -> GeoPoint {
	GeoPoint {
		lon: (point.x / EARTH_RADIUS).to_degrees(),
		lat: (2.0 * (point.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
	}
}
