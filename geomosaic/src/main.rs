mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser, Debug)]
#[command(
	author, // Set the author
	version, // Set the version
	about, // Set a short description
	long_about = None, // Disable long description
	propagate_version = true, // Enable version flag for subcommands
	disable_help_subcommand = true, // Disable help subcommand
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Print the grid plan and world file of a mosaic without downloading anything
	Plan(tools::plan::Subcommand),

	/// Build a mosaic from static map images around a center point
	Static(tools::static_map::Subcommand),

	/// Build a mosaic from XYZ tiles
	Tiles(tools::tiles::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Plan(arguments) => tools::plan::run(arguments),
		Commands::Static(arguments) => tools::static_map::run(arguments),
		Commands::Tiles(arguments) => tools::tiles::run(arguments),
	}
}
