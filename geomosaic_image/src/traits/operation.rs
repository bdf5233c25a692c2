use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

pub trait DynamicImageTraitOperation {
	/// Converts to 8-bit RGB. Pixels with alpha are blended over `background`
	/// (`alpha · src + (1 − alpha) · bg`), so transparent areas show the canvas color.
	fn into_flattened_rgb8(self, background: Rgb<u8>) -> RgbImage;
}

impl DynamicImageTraitOperation for DynamicImage {
	#[allow(clippy::cast_possible_truncation)]
	fn into_flattened_rgb8(self, background: Rgb<u8>) -> RgbImage {
		if !self.color().has_alpha() {
			return self.into_rgb8();
		}
		let rgba = self.into_rgba8();
		let c = [
			u16::from(background[0]),
			u16::from(background[1]),
			u16::from(background[2]),
		];
		ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
			let p = rgba.get_pixel(x, y);
			if p[3] == 255 {
				Rgb([p[0], p[1], p[2]])
			} else {
				let a = u16::from(p[3]);
				let b = u16::from(255 - p[3]);
				Rgb([
					((u16::from(p[0]) * a + c[0] * b + 127) / 255) as u8,
					((u16::from(p[1]) * a + c[1] * b + 127) / 255) as u8,
					((u16::from(p[2]) * a + c[2] * b + 127) / 255) as u8,
				])
			}
		})
	}
}
