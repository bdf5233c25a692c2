use crate::{DEFAULT_MAX_PIXELS, DEFAULT_OVERLAP, default_fetch_concurrency};
use anyhow::{Result, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct MosaicSettings {
	/// Fraction of an image shared with its neighbour, within `[0, 1)`.
	pub overlap: f64,

	/// Upper limit for the rendered canvas, in pixels.
	pub max_pixels: u64,

	/// RGB color of canvas regions no image was pasted into.
	pub background: [u8; 3],

	/// Requests in flight at once; defaults to the I/O-bound concurrency limit.
	pub max_concurrent_requests: Option<usize>,

	/// Also write every fetched image next to the mosaic.
	pub save_tiles: bool,
}

impl Default for MosaicSettings {
	fn default() -> Self {
		MosaicSettings {
			overlap: DEFAULT_OVERLAP,
			max_pixels: DEFAULT_MAX_PIXELS,
			background: [255, 255, 255],
			max_concurrent_requests: None,
			save_tiles: false,
		}
	}
}

impl MosaicSettings {
	pub fn check(&self) -> Result<()> {
		ensure!(
			self.overlap.is_finite() && (0.0..1.0).contains(&self.overlap),
			"mosaic.overlap ({}) must be within [0, 1)",
			self.overlap
		);
		ensure!(self.max_pixels > 0, "mosaic.max_pixels must be positive");
		ensure!(
			self.max_concurrent_requests != Some(0),
			"mosaic.max_concurrent_requests must be positive"
		);
		Ok(())
	}

	/// Concurrency for fetching, either configured or derived from the CPU count.
	pub fn concurrency(&self) -> usize {
		self
			.max_concurrent_requests
			.unwrap_or_else(default_fetch_concurrency)
			.max(1)
	}

	pub fn override_optional_overlap(&mut self, overlap: &Option<f64>) {
		if let Some(overlap) = overlap {
			self.overlap = *overlap;
		}
	}

	pub fn override_optional_max_pixels(&mut self, max_pixels: &Option<u64>) {
		if let Some(max_pixels) = max_pixels {
			self.max_pixels = *max_pixels;
		}
	}

	pub fn override_optional_concurrency(&mut self, concurrency: &Option<usize>) {
		if concurrency.is_some() {
			self.max_concurrent_requests = *concurrency;
		}
	}
}
