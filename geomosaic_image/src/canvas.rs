//! The pixel buffer a mosaic is assembled in.
//!
//! The canvas has the rendered size of a [`TileGridPlan`] and starts out filled with the
//! background color. Images are pasted with a plain overwrite: where neighbours overlap, the
//! later paste wins. Callers paste in row-major order so the result is reproducible.

use crate::{
	format::{RasterFormat, encode},
	traits::DynamicImageTraitOperation,
};
use anyhow::{Context, Result, ensure};
use geomosaic_core::{GridCell, TileGridPlan};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops};
use std::path::Path;

pub struct MosaicCanvas {
	image: RgbImage,
	background: Rgb<u8>,
}

impl MosaicCanvas {
	/// Allocates a background-filled canvas of the rendered size of `plan`.
	pub fn new(plan: &TileGridPlan, background: [u8; 3]) -> Result<MosaicCanvas> {
		MosaicCanvas::with_size(plan.rendered_width(), plan.rendered_height(), background)
	}

	pub fn with_size(width: u32, height: u32, background: [u8; 3]) -> Result<MosaicCanvas> {
		ensure!(width > 0 && height > 0, "canvas size {width}x{height} must not be empty");
		let background = Rgb(background);
		log::debug!("allocating {width}x{height} px canvas");
		Ok(MosaicCanvas {
			image: RgbImage::from_pixel(width, height, background),
			background,
		})
	}

	pub fn width(&self) -> u32 {
		self.image.width()
	}

	pub fn height(&self) -> u32 {
		self.image.height()
	}

	pub fn background(&self) -> [u8; 3] {
		self.background.0
	}

	pub fn image(&self) -> &RgbImage {
		&self.image
	}

	/// Pastes `tile` with its top-left corner at the cell's canvas offset.
	///
	/// Images of an unexpected size are pasted anyway, clipped to the canvas; alpha is flattened
	/// onto the background color first.
	pub fn place(&mut self, tile: DynamicImage, cell: &GridCell) {
		if tile.dimensions() != (cell.width, cell.height) {
			log::warn!(
				"image for {cell:?} is {}x{} px, expected {}x{} px",
				tile.width(),
				tile.height(),
				cell.width,
				cell.height
			);
		}
		let tile = tile.into_flattened_rgb8(self.background);
		imageops::replace(&mut self.image, &tile, i64::from(cell.x), i64::from(cell.y));
	}

	/// Whether every pixel of the rectangle still has the background color.
	pub fn is_blank(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
		let x_end = x.saturating_add(width).min(self.width());
		let y_end = y.saturating_add(height).min(self.height());
		(y..y_end).all(|py| (x..x_end).all(|px| *self.image.get_pixel(px, py) == self.background))
	}

	pub fn encode(&self, format: RasterFormat) -> Result<Vec<u8>> {
		encode(&DynamicImage::ImageRgb8(self.image.clone()), format)
	}

	/// Writes the canvas in the format named by the file extension.
	pub fn save(&self, path: &Path) -> Result<()> {
		let format = RasterFormat::from_path(path)?;
		let bytes = self.encode(format)?;
		std::fs::write(path, bytes).with_context(|| format!("writing mosaic {path:?}"))?;
		log::info!("wrote {}x{} px mosaic to {path:?}", self.width(), self.height());
		Ok(())
	}
}
