//! geomosaic: downloads map imagery for an area and stitches it into one georeferenced raster.
//!
//! A run has four steps:
//! 1. [`geomosaic_core::planner`] computes a [`TileGridPlan`](geomosaic_core::TileGridPlan)
//!    from a center, an extent and a zoom level (or from an XYZ tile range).
//! 2. [`runner::run_mosaic`] fetches every cell through a [`fetch::TileFetcher`] and pastes
//!    it onto a [`MosaicCanvas`](geomosaic_image::MosaicCanvas).
//! 3. The world file is derived from the same plan.
//! 4. [`output::write_output`] writes the raster and its sidecar world file.

pub mod fetch;
pub mod output;
pub mod runner;

pub use runner::{CancellationToken, CellDiagnostic, MosaicOutput, MosaicReport, RunOptions, run_mosaic};
