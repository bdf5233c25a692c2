//! Runs a planned mosaic: fetch every cell, decode it and paste it onto the canvas.
//!
//! Fetching and decoding run as one task per grid cell on a bounded pool. Results are consumed
//! in row-major order, so pasting is sequential and the overlap regions always end up with the
//! same pixels regardless of which fetch finished first.
//!
//! A failed cell never aborts the run. It leaves its region at the background color and is
//! reported as a [`CellDiagnostic`].

use crate::fetch::{TileFetcher, TileRequest};
use anyhow::Result;
use bytes::Bytes;
use futures::{StreamExt, stream};
use geomosaic_core::{CellFailureKind, GridCell, TileGridPlan, WorldFile, georeference};
use geomosaic_image::{MosaicCanvas, decode};
use image::DynamicImage;
use std::{
	fmt::{self, Debug},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

/// Stops a run from issuing further fetches. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

#[derive(Clone, Debug)]
pub struct RunOptions {
	pub background: [u8; 3],
	/// Fetch tasks in flight at once.
	pub concurrency: usize,
	/// Keep the fetched bytes of every cell in [`MosaicOutput::tiles`].
	pub keep_tiles: bool,
}

impl Default for RunOptions {
	fn default() -> Self {
		RunOptions {
			background: [255, 255, 255],
			concurrency: 4,
			keep_tiles: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellDiagnostic {
	pub cell: GridCell,
	pub kind: CellFailureKind,
	pub message: String,
}

impl fmt::Display for CellDiagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "cell ({}, {}): {}: {}", self.col(), self.row(), self.kind, self.message)
	}
}

impl CellDiagnostic {
	pub fn col(&self) -> u32 {
		self.cell.col
	}

	pub fn row(&self) -> u32 {
		self.cell.row
	}
}

/// What happened during a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MosaicReport {
	/// Cells in the plan.
	pub planned: u64,
	/// Cells pasted onto the canvas.
	pub placed: u64,
	pub diagnostics: Vec<CellDiagnostic>,
	pub cancelled: bool,
}

impl MosaicReport {
	/// Cells that were neither pasted nor reported, because the run was cancelled.
	pub fn skipped(&self) -> u64 {
		self.planned - self.placed - self.diagnostics.len() as u64
	}

	pub fn count(&self, kind: CellFailureKind) -> usize {
		self.diagnostics.iter().filter(|d| d.kind == kind).count()
	}

	pub fn is_complete(&self) -> bool {
		self.placed == self.planned
	}
}

impl fmt::Display for MosaicReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{} images placed", self.placed, self.planned)?;
		let unavailable = self.count(CellFailureKind::TileUnavailable);
		if unavailable > 0 {
			write!(f, ", {unavailable} unavailable")?;
		}
		let undecodable = self.count(CellFailureKind::DecodeFailure);
		if undecodable > 0 {
			write!(f, ", {undecodable} not decodable")?;
		}
		if self.cancelled {
			write!(f, ", cancelled ({} skipped)", self.skipped())?;
		}
		Ok(())
	}
}

/// Everything a run produces. The world file is derived from the same plan that placed the
/// pixels.
pub struct MosaicOutput {
	pub plan: TileGridPlan,
	pub canvas: MosaicCanvas,
	pub world_file: WorldFile,
	pub report: MosaicReport,
	/// Fetched bytes per pasted cell, in row-major order, if requested.
	pub tiles: Vec<(GridCell, Bytes)>,
}

impl Debug for MosaicOutput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MosaicOutput")
			.field("canvas", &(self.canvas.width(), self.canvas.height()))
			.field("world_file", &self.world_file)
			.field("report", &self.report)
			.finish_non_exhaustive()
	}
}

enum CellOutcome {
	Skipped,
	Unavailable(String),
	Undecodable(String),
	Decoded(DynamicImage, Bytes),
}

async fn process_cell(fetcher: Arc<dyn TileFetcher>, request: TileRequest, cancel: CancellationToken) -> CellOutcome {
	if cancel.is_cancelled() {
		return CellOutcome::Skipped;
	}
	let bytes = match fetcher.fetch(&request).await {
		Ok(bytes) => bytes,
		Err(e) => return CellOutcome::Unavailable(format!("{e:#}")),
	};
	match decode(&bytes) {
		Ok(image) => CellOutcome::Decoded(image, bytes),
		Err(e) => CellOutcome::Undecodable(format!("{e:#}")),
	}
}

/// Assembles the mosaic described by `plan`.
///
/// Only canvas allocation can fail; per-cell problems, including a crashed fetch task, end up in
/// the report. After `cancel` is
/// triggered no new fetches are started, results still in flight are discarded, and the
/// partially filled canvas is returned.
pub async fn run_mosaic(
	plan: &TileGridPlan,
	fetcher: Arc<dyn TileFetcher>,
	options: &RunOptions,
	cancel: &CancellationToken,
) -> Result<MosaicOutput> {
	let mut canvas = MosaicCanvas::new(plan, options.background)?;
	let mut report = MosaicReport {
		planned: plan.cell_count(),
		..MosaicReport::default()
	};
	let mut tiles = Vec::new();

	log::info!(
		"fetching {} images with up to {} requests in flight",
		report.planned,
		options.concurrency.max(1)
	);

	let mut results = stream::iter(plan.cells())
		.map(|cell| {
			let request = TileRequest::for_cell(plan, &cell);
			let task = tokio::spawn(process_cell(fetcher.clone(), request, cancel.clone()));
			async move { (cell, task.await) }
		})
		.buffered(options.concurrency.max(1));

	while let Some((cell, joined)) = results.next().await {
		if cancel.is_cancelled() {
			report.cancelled = true;
			break;
		}
		let outcome = joined.unwrap_or_else(|e| CellOutcome::Unavailable(format!("fetch task failed: {e}")));
		match outcome {
			CellOutcome::Skipped => {}
			CellOutcome::Unavailable(message) => {
				log::warn!("cell {} ({}, {}) unavailable: {message}", cell.index(plan.grid_cols()), cell.col, cell.row);
				report.diagnostics.push(CellDiagnostic {
					cell,
					kind: CellFailureKind::TileUnavailable,
					message,
				});
			}
			CellOutcome::Undecodable(message) => {
				log::warn!("cell {} ({}, {}) not decodable: {message}", cell.index(plan.grid_cols()), cell.col, cell.row);
				report.diagnostics.push(CellDiagnostic {
					cell,
					kind: CellFailureKind::DecodeFailure,
					message,
				});
			}
			CellOutcome::Decoded(image, bytes) => {
				log::trace!("placing {cell:?}");
				canvas.place(image, &cell);
				report.placed += 1;
				if options.keep_tiles {
					tiles.push((cell, bytes));
				}
			}
		}
	}

	if report.is_complete() {
		log::info!("{report}");
	} else {
		log::warn!("{report}");
	}

	Ok(MosaicOutput {
		plan: *plan,
		world_file: georeference::world_file(plan),
		canvas,
		report,
		tiles,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fetch::mock::MockFetcher;
	use geomosaic_core::{GeoPoint, PlanRequest, TileRange, planner};
	use pretty_assertions::assert_eq;

	fn plan_3x3() -> TileGridPlan {
		// 64 px images at scale 2, 128 rendered px each, step 116 rendered px
		let request = PlanRequest::new(GeoPoint::new(13.4, 52.5), 50.0, 50.0, 19)
			.with_tile_size(64, 64, 2)
			.with_overlap(0.1);
		let plan = planner::plan(&request).unwrap();
		assert_eq!((plan.grid_cols(), plan.grid_rows()), (3, 3));
		plan
	}

	fn options(concurrency: usize) -> RunOptions {
		RunOptions {
			concurrency,
			..RunOptions::default()
		}
	}

	#[tokio::test]
	async fn complete_run() {
		let plan = plan_3x3();
		let fetcher = Arc::new(MockFetcher::new([10, 20, 30]));
		let output = run_mosaic(&plan, fetcher.clone(), &options(4), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(fetcher.calls(), 9);
		assert!(output.report.is_complete());
		assert_eq!(output.report.to_string(), "9/9 images placed");
		assert_eq!((output.canvas.width(), output.canvas.height()), (360, 360));
		assert_eq!(output.canvas.image().get_pixel(359, 0).0, [10, 20, 30]);
		assert_eq!(output.world_file, georeference::world_file(&plan));
		assert!(output.tiles.is_empty());

		let mut centers: Vec<_> = fetcher.requests().iter().map(|r| r.center).collect();
		let expected: Vec<_> = plan.cells().map(|c| c.center).collect();
		centers.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
		let mut expected_sorted = expected.clone();
		expected_sorted.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
		assert_eq!(centers, expected_sorted);
	}

	#[tokio::test]
	async fn missing_cell_leaves_blank_region() {
		let plan = plan_3x3();
		let missing = plan.cell(2, 1).unwrap();
		let fetcher = Arc::new(MockFetcher {
			failing: vec![missing.center],
			..MockFetcher::new([0, 0, 0])
		});
		let output = run_mosaic(&plan, fetcher, &options(3), &CancellationToken::new())
			.await
			.unwrap();

		let report = &output.report;
		assert_eq!(report.placed, 8);
		assert_eq!(report.diagnostics.len(), 1);
		assert_eq!(report.diagnostics[0].kind, CellFailureKind::TileUnavailable);
		assert_eq!((report.diagnostics[0].col(), report.diagnostics[0].row()), (2, 1));
		assert_eq!(report.to_string(), "8/9 images placed, 1 unavailable");

		// the part of cell (2,1) no neighbour overlaps stays white
		let canvas = &output.canvas;
		assert!(canvas.is_blank(244, 128, 116, 104));
		assert!(!canvas.is_blank(244, 116, 116, 12));
		// no other cell is blank anywhere
		for cell in plan.cells().filter(|c| (c.col, c.row) != (2, 1)) {
			assert!(!canvas.is_blank(cell.x, cell.y, 1, 1), "{cell:?}");
		}
	}

	#[tokio::test]
	async fn crashed_fetch_task_is_reported() {
		let plan = plan_3x3();
		let fetcher = Arc::new(MockFetcher {
			panicking: vec![plan.cell(1, 1).unwrap().center],
			..MockFetcher::new([0, 0, 0])
		});
		let output = run_mosaic(&plan, fetcher, &options(3), &CancellationToken::new())
			.await
			.unwrap();

		let report = &output.report;
		assert_eq!(report.placed, 8);
		assert_eq!(report.count(CellFailureKind::TileUnavailable), 1);
		assert_eq!((report.diagnostics[0].col(), report.diagnostics[0].row()), (1, 1));
		assert!(report.diagnostics[0].message.contains("fetch task failed"));
		assert!(output.canvas.is_blank(128, 128, 104, 104));
	}

	#[tokio::test]
	async fn undecodable_cell_is_reported() {
		let plan = plan_3x3();
		let fetcher = Arc::new(MockFetcher {
			garbage: vec![plan.cell(0, 0).unwrap().center],
			..MockFetcher::new([0, 0, 0])
		});
		let output = run_mosaic(&plan, fetcher, &options(2), &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(output.report.count(CellFailureKind::DecodeFailure), 1);
		assert_eq!(output.report.count(CellFailureKind::TileUnavailable), 0);
		assert!(output.canvas.is_blank(0, 0, 116, 116));
	}

	#[tokio::test]
	async fn paste_order_is_row_major() {
		let plan = plan_3x3();
		let fetcher = Arc::new(MockFetcher::new([50, 50, 50]));
		let first = run_mosaic(&plan, fetcher.clone(), &options(9), &CancellationToken::new())
			.await
			.unwrap();
		let second = run_mosaic(&plan, fetcher, &options(1), &CancellationToken::new())
			.await
			.unwrap();
		assert_eq!(first.canvas.image().as_raw(), second.canvas.image().as_raw());
	}

	#[tokio::test]
	async fn cancellation_stops_fetching() {
		let plan = plan_3x3();
		let token = CancellationToken::new();
		let fetcher = Arc::new(MockFetcher {
			cancel_on: Some((3, token.clone())),
			..MockFetcher::new([0, 0, 0])
		});
		let output = run_mosaic(&plan, fetcher.clone(), &options(1), &token).await.unwrap();

		assert!(output.report.cancelled);
		assert_eq!(fetcher.calls(), 3);
		assert_eq!(output.report.placed, 2);
		assert_eq!(output.report.skipped(), 7);
		assert!(output.report.to_string().ends_with("cancelled (7 skipped)"));
		assert!(!output.canvas.is_blank(0, 0, 1, 1));
		assert!(output.canvas.is_blank(359, 359, 1, 1));
	}

	#[tokio::test]
	async fn cancelled_before_start() {
		let plan = plan_3x3();
		let token = CancellationToken::new();
		token.cancel();
		let fetcher = Arc::new(MockFetcher::new([0, 0, 0]));
		let output = run_mosaic(&plan, fetcher.clone(), &options(4), &token).await.unwrap();
		assert_eq!(fetcher.calls(), 0);
		assert_eq!(output.report.placed, 0);
		assert!(output.report.cancelled);
	}

	#[tokio::test]
	async fn keeps_tiles_of_xyz_plan() {
		let range = TileRange::new(4, 8, 5, 9, 5).unwrap();
		let plan = planner::plan_tile_range(&range, 256, u64::MAX).unwrap();
		let fetcher = Arc::new(MockFetcher::new([1, 2, 3]));
		let run_options = RunOptions {
			keep_tiles: true,
			..options(2)
		};
		let output = run_mosaic(&plan, fetcher.clone(), &run_options, &CancellationToken::new())
			.await
			.unwrap();

		assert_eq!(output.tiles.len(), 2);
		assert_eq!(output.tiles[1].0.tile, range_tile(9, 5));
		let tiles: Vec<_> = fetcher.requests().iter().map(|r| r.tile).collect();
		assert!(tiles.contains(&range_tile(8, 5)));
	}

	fn range_tile(x: u32, y: u32) -> Option<geomosaic_core::TileCoord> {
		Some(geomosaic_core::TileCoord::new(4, x, y).unwrap())
	}
}
