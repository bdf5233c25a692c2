use super::common::{AreaArgs, ConfigArgs, OutputArgs, execute, static_request};
use anyhow::Result;
use clap::Args;
use geomosaic::{fetch::StaticMapFetcher, output::static_prefix};
use geomosaic_core::{MapLayer, planner};
use std::sync::Arc;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(flatten)]
	area: AreaArgs,

	/// imagery layer
	#[arg(long, short, value_enum)]
	layer: Option<MapLayer>,

	/// API key of the static map service
	#[arg(long)]
	api_key: Option<String>,

	#[command(flatten)]
	config: ConfigArgs,

	#[command(flatten)]
	output: OutputArgs,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = arguments.config.load()?;
	config.service.override_optional_layer(&arguments.layer);
	config.service.override_optional_api_key(&arguments.api_key);
	config.check()?;

	// planning fails before any request is made
	let plan = planner::plan(&static_request(&arguments.area, &config))?;
	if config.service.api_key.is_none() {
		log::warn!("no API key configured, the static map service may refuse the requests");
	}

	let fetcher = Arc::new(StaticMapFetcher::new(&config.service)?);
	let prefix = static_prefix(config.service.layer, plan.zoom());
	execute(&plan, fetcher, &config, &arguments.output, prefix).await?;
	Ok(())
}
