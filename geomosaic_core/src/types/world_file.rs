use crate::{GeoPoint, MercatorPoint};
use anyhow::{Context, Result, ensure};
use std::{
	fmt::{self, Display},
	fs,
	path::{Path, PathBuf},
	str::FromStr,
};

/// Six affine coefficients mapping rendered pixel centers to Web Mercator meters.
///
/// `x = a·col + b·row + c`, `y = d·col + e·row + f`, where `(c, f)` is the center of pixel (0,0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldFile {
	/// Pixel width in meters (east-west).
	pub a: f64,
	/// Row rotation.
	pub d: f64,
	/// Column rotation.
	pub b: f64,
	/// Negative pixel height in meters (north-south).
	pub e: f64,
	/// X of the center of pixel (0,0).
	pub c: f64,
	/// Y of the center of pixel (0,0).
	pub f: f64,
}

impl WorldFile {
	/// Position of the center of pixel `(col, row)`. Fractional values address any point,
	/// `(-0.5, -0.5)` is the outer corner of pixel (0,0).
	pub fn pixel_to_mercator(&self, col: f64, row: f64) -> MercatorPoint {
		MercatorPoint::new(
			self.a * col + self.b * row + self.c,
			self.d * col + self.e * row + self.f,
		)
	}

	pub fn pixel_to_geo(&self, col: f64, row: f64) -> GeoPoint {
		self.pixel_to_mercator(col, row).to_geo()
	}

	/// Coefficients in file order: A, D, B, E, C, F.
	pub fn as_array(&self) -> [f64; 6] {
		[self.a, self.d, self.b, self.e, self.c, self.f]
	}

	/// Conventional sidecar name for a raster: `.pgw` for PNG, `.jgw` for JPEG, `.tfw` for TIFF
	/// and `.wld` for anything else.
	pub fn sidecar_path(raster: &Path) -> PathBuf {
		let ext = raster
			.extension()
			.and_then(|e| e.to_str())
			.map(str::to_lowercase)
			.unwrap_or_default();
		let sidecar = match ext.as_str() {
			"png" => "pgw",
			"jpg" | "jpeg" => "jgw",
			"tif" | "tiff" => "tfw",
			_ => "wld",
		};
		raster.with_extension(sidecar)
	}

	pub fn write_to_path(&self, path: &Path) -> Result<()> {
		fs::write(path, self.to_string()).with_context(|| format!("writing world file {path:?}"))
	}

	pub fn read_from_path(path: &Path) -> Result<WorldFile> {
		let text = fs::read_to_string(path).with_context(|| format!("reading world file {path:?}"))?;
		text.parse().with_context(|| format!("parsing world file {path:?}"))
	}
}

impl Display for WorldFile {
	/// Six lines with twelve fractional digits each.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for value in self.as_array() {
			writeln!(f, "{value:.12}")?;
		}
		Ok(())
	}
}

impl FromStr for WorldFile {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		let values = s
			.lines()
			.map(str::trim)
			.filter(|l| !l.is_empty())
			.map(|l| l.parse::<f64>().with_context(|| format!("invalid coefficient {l:?}")))
			.collect::<Result<Vec<f64>>>()?;
		ensure!(values.len() == 6, "a world file has 6 coefficients, found {}", values.len());
		ensure!(values.iter().all(|v| v.is_finite()), "world file coefficients must be finite");
		Ok(WorldFile {
			a: values[0],
			d: values[1],
			b: values[2],
			e: values[3],
			c: values[4],
			f: values[5],
		})
	}
}
