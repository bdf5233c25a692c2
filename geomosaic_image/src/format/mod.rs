//! Image codecs.
//!
//! Fetched images are decoded by sniffing their magic bytes, since services do not always send
//! a trustworthy content type. The finished mosaic is encoded in the format its file extension
//! names.

pub mod jpeg;
pub mod png;
pub mod tiff;

use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageFormat};
use std::{fmt::Display, path::Path};

/// Raster formats the mosaic can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
	Png,
	Jpeg,
	Tiff,
}

impl RasterFormat {
	pub fn from_extension(ext: &str) -> Result<RasterFormat> {
		Ok(match ext.to_lowercase().as_str() {
			"png" => RasterFormat::Png,
			"jpg" | "jpeg" => RasterFormat::Jpeg,
			"tif" | "tiff" => RasterFormat::Tiff,
			_ => bail!("unsupported raster extension {ext:?}, use png, jpg or tif"),
		})
	}

	pub fn from_path(path: &Path) -> Result<RasterFormat> {
		let ext = path
			.extension()
			.and_then(|e| e.to_str())
			.with_context(|| format!("{path:?} has no file extension"))?;
		RasterFormat::from_extension(ext)
	}

	pub fn extension(&self) -> &str {
		match self {
			RasterFormat::Png => "png",
			RasterFormat::Jpeg => "jpg",
			RasterFormat::Tiff => "tif",
		}
	}
}

impl Display for RasterFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.extension())
	}
}

pub fn encode(image: &DynamicImage, format: RasterFormat) -> Result<Vec<u8>> {
	match format {
		RasterFormat::Png => png::encode(image),
		RasterFormat::Jpeg => jpeg::encode(image, None),
		RasterFormat::Tiff => tiff::encode(image),
	}
}

/// Decodes a fetched image of any supported format.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	if bytes.is_empty() {
		bail!("empty response body");
	}
	let format = image::guess_format(bytes).context("unrecognized image data")?;
	match format {
		ImageFormat::Png => png::decode(bytes),
		ImageFormat::Jpeg => jpeg::decode(bytes),
		ImageFormat::Tiff => tiff::decode(bytes),
		_ => bail!("unsupported image format {format:?}"),
	}
}
