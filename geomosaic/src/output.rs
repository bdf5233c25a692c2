//! Writing a finished mosaic: the raster, its world file and optionally every fetched image.

use crate::runner::MosaicOutput;
use anyhow::{Context, Result};
use geomosaic_core::{MapLayer, WorldFile};
use geomosaic_image::{RasterFormat, decode, encode};
use image::ImageFormat;
use std::{
	fs,
	path::{Path, PathBuf},
};

/// Files produced by [`write_output`].
#[derive(Debug, Default, PartialEq)]
pub struct OutputPaths {
	pub raster: PathBuf,
	pub world_file: PathBuf,
	pub tiles: Vec<PathBuf>,
}

/// Default name prefix of a static map mosaic, e.g. `static_satellite_z19`.
pub fn static_prefix(layer: MapLayer, zoom: u8) -> String {
	format!("static_{layer}_z{zoom}")
}

/// Default name prefix of an XYZ tile mosaic, e.g. `tiles_z15`.
pub fn tiles_prefix(zoom: u8) -> String {
	format!("tiles_z{zoom}")
}

/// Writes `{prefix}_mosaic.{ext}` and the matching world file into `dir`, plus
/// `{prefix}_{row:02}_{col:02}.png` for every kept image.
pub fn write_output(output: &MosaicOutput, dir: &Path, prefix: &str, format: RasterFormat) -> Result<OutputPaths> {
	fs::create_dir_all(dir).with_context(|| format!("creating output directory {dir:?}"))?;

	let raster = dir.join(format!("{prefix}_mosaic.{}", format.extension()));
	output.canvas.save(&raster)?;

	let world_file = WorldFile::sidecar_path(&raster);
	output.world_file.write_to_path(&world_file)?;
	log::info!("wrote world file {world_file:?}");

	let mut tiles = Vec::with_capacity(output.tiles.len());
	for (cell, bytes) in &output.tiles {
		let path = dir.join(format!("{prefix}_{:02}_{:02}.png", cell.row, cell.col));
		if image::guess_format(bytes).ok() == Some(ImageFormat::Png) {
			fs::write(&path, bytes)
		} else {
			fs::write(&path, encode(&decode(bytes)?, RasterFormat::Png)?)
		}
		.with_context(|| format!("writing image {path:?}"))?;
		tiles.push(path);
	}
	if !tiles.is_empty() {
		log::info!("wrote {} images to {dir:?}", tiles.len());
	}

	Ok(OutputPaths {
		raster,
		world_file,
		tiles,
	})
}
