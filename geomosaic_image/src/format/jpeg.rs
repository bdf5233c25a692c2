//! JPEG has no alpha channel; RGBA input is flattened to RGB before encoding.

use anyhow::{Result, anyhow, bail};
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::jpeg::JpegEncoder, load_from_memory_with_format};

/// Encodes with `quality` in `0..=99`, default 95.
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Vec<u8>> {
	let quality = quality.unwrap_or(95);
	if quality >= 100 {
		bail!("JPEG does not support lossless compression, use a quality < 100");
	}

	let rgb;
	let image = match image {
		DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
		_ => {
			rgb = DynamicImage::ImageRgb8(image.to_rgb8());
			&rgb
		}
	};

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;
	Ok(buffer)
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Jpeg).map_err(|e| anyhow!("failed to decode JPEG image: {e}"))
}
