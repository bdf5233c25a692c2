use anyhow::{Result, anyhow, bail};
use image::{
	DynamicImage, ImageEncoder, ImageFormat,
	codecs::png::{CompressionType, FilterType, PngEncoder},
	load_from_memory_with_format,
};

/// Encodes 8-bit Grey, GreyA, RGB or RGBA images.
pub fn encode(image: &DynamicImage) -> Result<Vec<u8>> {
	let color = image.color();
	if color.bytes_per_pixel() / color.channel_count() != 1 {
		bail!("png only supports 8-bit images");
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;
	Ok(buffer)
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| anyhow!("failed to decode PNG image: {e}"))
}
