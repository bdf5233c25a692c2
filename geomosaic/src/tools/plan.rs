use super::common::{AreaArgs, ConfigArgs, static_request};
use anyhow::Result;
use clap::Args;
use geomosaic_core::{georeference, planner};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(flatten)]
	area: AreaArgs,

	#[command(flatten)]
	config: ConfigArgs,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = arguments.config.load()?;
	config.check()?;

	let plan = planner::plan(&static_request(&arguments.area, &config))?;
	println!("{plan}");
	println!("center:      {:?}", plan.center());
	println!();
	print!("{}", georeference::world_file(&plan));
	Ok(())
}
