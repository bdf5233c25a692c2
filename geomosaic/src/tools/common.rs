use anyhow::Result;
use clap::Args;
use geomosaic::{
	CancellationToken, RunOptions,
	fetch::TileFetcher,
	output::{OutputPaths, write_output},
	run_mosaic,
};
use geomosaic_core::{GeoPoint, PlanRequest, TileGridPlan, config::MosaicConfig};
use geomosaic_image::RasterFormat;
use std::{path::PathBuf, sync::Arc};

#[derive(Args, Debug)]
pub struct AreaArgs {
	/// center as "lat,lon" in decimal degrees or DMS, e.g. "53°20'52\"N,6°15'35\"W"
	#[arg(long, short, allow_hyphen_values = true)]
	pub center: GeoPoint,

	/// ground width to cover in meters
	#[arg(long)]
	pub width: f64,

	/// ground height to cover in meters
	#[arg(long)]
	pub height: f64,

	/// zoom level (1-30)
	#[arg(long, short)]
	pub zoom: u8,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
	/// YAML configuration file
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// fraction of an image shared with its neighbour, [0, 1)
	#[arg(long)]
	pub overlap: Option<f64>,

	/// maximum number of pixels of the mosaic
	#[arg(long)]
	pub max_pixels: Option<u64>,

	/// rendered pixels per logical pixel of a static map image
	#[arg(long)]
	pub scale: Option<u32>,
}

impl ConfigArgs {
	/// Loads the configuration file (or the defaults) and applies the command line overrides.
	pub fn load(&self) -> Result<MosaicConfig> {
		let mut config = match &self.config {
			Some(path) => MosaicConfig::from_path(path)?,
			None => MosaicConfig::default(),
		};
		config.mosaic.override_optional_overlap(&self.overlap);
		config.mosaic.override_optional_max_pixels(&self.max_pixels);
		config.service.override_optional_scale(&self.scale);
		Ok(config)
	}
}

#[derive(Args, Debug)]
pub struct OutputArgs {
	/// output directory
	#[arg(long, short, default_value = ".")]
	pub output: PathBuf,

	/// file name prefix, defaults to a name derived from layer and zoom
	#[arg(long)]
	pub prefix: Option<String>,

	/// raster format of the mosaic: png, jpg or tif
	#[arg(long, default_value = "png", value_parser = RasterFormat::from_extension)]
	pub format: RasterFormat,

	/// also write every downloaded image
	#[arg(long)]
	pub save_tiles: bool,

	/// maximum number of requests in flight
	#[arg(long)]
	pub concurrency: Option<usize>,
}

pub fn static_request(area: &AreaArgs, config: &MosaicConfig) -> PlanRequest {
	PlanRequest::new(area.center, area.width, area.height, area.zoom)
		.with_overlap(config.mosaic.overlap)
		.with_pixel_budget(config.mosaic.max_pixels)
		.with_tile_size(
			config.service.tile_width,
			config.service.tile_height,
			config.service.scale,
		)
}

/// Runs the mosaic, writes the files and summarizes failed cells on stderr.
pub async fn execute(
	plan: &TileGridPlan,
	fetcher: Arc<dyn TileFetcher>,
	config: &MosaicConfig,
	output: &OutputArgs,
	prefix: String,
) -> Result<OutputPaths> {
	let mut settings = config.mosaic.clone();
	settings.override_optional_concurrency(&output.concurrency);
	settings.check()?;

	let options = RunOptions {
		background: settings.background,
		concurrency: settings.concurrency(),
		keep_tiles: settings.save_tiles || output.save_tiles,
	};

	eprintln!("{plan}");

	let cancel = CancellationToken::new();
	let watcher = {
		let cancel = cancel.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				log::warn!("interrupted, keeping the images fetched so far");
				cancel.cancel();
			}
		})
	};
	let result = run_mosaic(plan, fetcher, &options, &cancel).await;
	watcher.abort();
	let result = result?;

	let prefix = output.prefix.clone().unwrap_or(prefix);
	let paths = write_output(&result, &output.output, &prefix, output.format)?;

	eprintln!("{}", result.report);
	for diagnostic in &result.report.diagnostics {
		eprintln!("  {diagnostic}");
	}
	eprintln!("mosaic:     {}", paths.raster.display());
	eprintln!("world file: {}", paths.world_file.display());
	Ok(paths)
}
