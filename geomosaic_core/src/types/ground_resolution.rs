use crate::{INITIAL_RESOLUTION, MAX_ZOOM, MosaicError};
use anyhow::Result;
use std::fmt::{self, Debug, Display};

/// Meters covered by one logical pixel at an integer zoom level.
///
/// Fixed once the zoom level is known; each zoom step halves it.
#[derive(Clone, Copy, PartialEq)]
pub struct GroundResolution {
	zoom: u8,
	meters_per_pixel: f64,
}

impl GroundResolution {
	/// Resolution at `zoom`, which must be within `1..=30`.
	pub fn at_zoom(zoom: u8) -> Result<GroundResolution> {
		if zoom == 0 || zoom > MAX_ZOOM {
			return Err(MosaicError::invalid(format!("zoom ({zoom}) must be within 1..={MAX_ZOOM}")).into());
		}
		Ok(GroundResolution::new_unchecked(zoom))
	}

	/// Resolution at `zoom` without range checks. Zoom 0 is valid here, the XYZ tile math uses it.
	pub(crate) fn new_unchecked(zoom: u8) -> GroundResolution {
		GroundResolution {
			zoom,
			meters_per_pixel: INITIAL_RESOLUTION / 2f64.powi(i32::from(zoom)),
		}
	}

	pub fn zoom(&self) -> u8 {
		self.zoom
	}

	pub fn meters_per_pixel(&self) -> f64 {
		self.meters_per_pixel
	}

	/// Ground distance in meters covered by `pixels` logical pixels.
	pub fn meters(&self, pixels: f64) -> f64 {
		pixels * self.meters_per_pixel
	}

	/// Resolution of a rendered pixel when each logical pixel is drawn `scale` times wider.
	pub fn rendered(&self, scale: u32) -> f64 {
		self.meters_per_pixel / f64::from(scale.max(1))
	}
}

impl Debug for GroundResolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GroundResolution(z{}: {:.6} m/px)", self.zoom, self.meters_per_pixel)
	}
}

impl Display for GroundResolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:.6} m/px", self.meters_per_pixel)
	}
}
