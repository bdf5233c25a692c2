use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::tiff::TiffEncoder, load_from_memory_with_format};
use std::io::Cursor;

pub fn encode(image: &DynamicImage) -> Result<Vec<u8>> {
	let mut cursor = Cursor::new(Vec::new());
	TiffEncoder::new(&mut cursor).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;
	Ok(cursor.into_inner())
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Tiff).map_err(|e| anyhow!("failed to decode TIFF image: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::traits::DynamicImageTraitTest;

	#[test]
	fn lossless_rgb() -> Result<()> {
		let image = DynamicImage::new_test_rgb();
		let decoded = decode(&encode(&image)?)?;
		assert_eq!(decoded.as_bytes(), image.as_bytes());
		Ok(())
	}
}
