use super::common::{ConfigArgs, OutputArgs, execute};
use anyhow::{Result, bail};
use clap::Args;
use geomosaic::{fetch::XyzTileFetcher, output::tiles_prefix};
use geomosaic_core::{GeoPoint, TileRange, planner};
use std::sync::Arc;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// zoom level of the tiles
	#[arg(long, short)]
	zoom: u8,

	/// first corner of the area as "lat,lon"
	#[arg(long, allow_hyphen_values = true, requires = "to", conflicts_with = "center")]
	from: Option<GeoPoint>,

	/// opposite corner of the area as "lat,lon"
	#[arg(long, allow_hyphen_values = true, requires = "from")]
	to: Option<GeoPoint>,

	/// center of the area as "lat,lon", used with --half-range
	#[arg(long, short, allow_hyphen_values = true)]
	center: Option<GeoPoint>,

	/// number of tiles around the center tile in every direction
	#[arg(long, default_value_t = 5)]
	half_range: u32,

	/// pixel size of the delivered tiles, a multiple of 256
	#[arg(long, default_value_t = 256)]
	tile_size: u32,

	/// URL template with {z}, {x} and {y}
	#[arg(long)]
	url_template: Option<String>,

	#[command(flatten)]
	config: ConfigArgs,

	#[command(flatten)]
	output: OutputArgs,
}

impl Subcommand {
	fn range(&self) -> Result<TileRange> {
		match (&self.from, &self.to, &self.center) {
			(Some(from), Some(to), _) => TileRange::from_geo_corners(from, to, self.zoom),
			(_, _, Some(center)) => TileRange::around(center, self.zoom, self.half_range),
			_ => bail!("either --from and --to or --center is required"),
		}
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = arguments.config.load()?;
	config.service.override_optional_url_template(&arguments.url_template);
	config.check()?;

	let range = arguments.range()?;
	log::info!("tile range {range:?}");
	let plan = planner::plan_tile_range(&range, arguments.tile_size, config.mosaic.max_pixels)?;

	let fetcher = Arc::new(XyzTileFetcher::new(&config.service)?);
	execute(&plan, fetcher, &config, &arguments.output, tiles_prefix(range.level)).await?;
	Ok(())
}
