//! Web Mercator constants shared by projection, planning and georeferencing.

/// Spherical Web Mercator radius (WGS84 semi-major axis) in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Ground resolution at zoom level 0 in meters per pixel, for 256 px wide tiles.
///
/// Equals `2 * PI * EARTH_RADIUS / 256`.
pub const INITIAL_RESOLUTION: f64 = 156_543.033_928_040_97;

/// Latitude limit in degrees applied before projecting to Web Mercator.
///
/// Latitudes beyond this value are clamped, never rejected.
pub const MAX_LAT: f64 = 85.051_128_78;

/// Longitude limit in degrees.
pub const MAX_LON: f64 = 180.0;

/// Highest zoom level the planner accepts.
pub const MAX_ZOOM: u8 = 30;

/// Overlap between neighbouring images used when nothing else is configured.
pub const DEFAULT_OVERLAP: f64 = 0.10;

/// Largest mosaic, in pixels, that is allocated when nothing else is configured.
pub const DEFAULT_MAX_PIXELS: u64 = 220_000_000;
