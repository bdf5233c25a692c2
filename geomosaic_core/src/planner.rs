//! Grid planning: how many images are needed to cover an area, where each one goes on the
//! canvas and where the canvas sits on the ground.
//!
//! Every axis is planned independently. With `tile` logical pixels per image and a stride of
//! `step = max(1, round(tile · (1 − overlap)))`, an extent no larger than one image needs a single
//! image; otherwise `ceil((extent − tile·res) / (step·res))` additional steps are added. Rounding
//! always errs towards more coverage, and the result is the smallest whole number of steps that
//! covers the extent.
//!
//! The pixel budget is checked against the rendered canvas before anything else happens, so a
//! [`MosaicError::CapacityExceeded`] never follows a network request.

use crate::{
	DEFAULT_MAX_PIXELS, DEFAULT_OVERLAP, GeoPoint, GroundResolution, MosaicError, TileGridPlan, TileRange,
};
use anyhow::Result;

/// Logical pixel size of a tile in the XYZ scheme; larger tiles are treated as supersampled.
pub const XYZ_TILE_SIZE: u32 = 256;

/// Everything the planner needs to know about a center-and-extent mosaic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanRequest {
	pub center: GeoPoint,
	/// Ground width to cover, meters.
	pub width_m: f64,
	/// Ground height to cover, meters.
	pub height_m: f64,
	pub zoom: u8,
	/// Fraction of an image shared with its neighbour, within `[0, 1)`.
	pub overlap: f64,
	/// Upper limit for the number of rendered canvas pixels.
	pub pixel_budget: u64,
	/// Logical width of one requested image.
	pub tile_px_w: u32,
	/// Logical height of one requested image.
	pub tile_px_h: u32,
	/// Rendered pixels per logical pixel.
	pub scale_factor: u32,
}

impl PlanRequest {
	/// A request with 640×640 images at scale 1, the default overlap and the default budget.
	pub fn new(center: GeoPoint, width_m: f64, height_m: f64, zoom: u8) -> PlanRequest {
		PlanRequest {
			center,
			width_m,
			height_m,
			zoom,
			overlap: DEFAULT_OVERLAP,
			pixel_budget: DEFAULT_MAX_PIXELS,
			tile_px_w: 640,
			tile_px_h: 640,
			scale_factor: 1,
		}
	}

	#[must_use]
	pub fn with_overlap(mut self, overlap: f64) -> Self {
		self.overlap = overlap;
		self
	}

	#[must_use]
	pub fn with_pixel_budget(mut self, pixel_budget: u64) -> Self {
		self.pixel_budget = pixel_budget;
		self
	}

	#[must_use]
	pub fn with_tile_size(mut self, tile_px_w: u32, tile_px_h: u32, scale_factor: u32) -> Self {
		self.tile_px_w = tile_px_w;
		self.tile_px_h = tile_px_h;
		self.scale_factor = scale_factor;
		self
	}

	fn check(&self) -> Result<(), MosaicError> {
		let invalid = |msg: String| Err(MosaicError::InvalidParameters(msg));

		if !(self.center.lon.is_finite() && self.center.lat.is_finite()) {
			return invalid(format!("center ({:?}) must be finite", self.center));
		}
		if !(self.overlap.is_finite() && (0.0..1.0).contains(&self.overlap)) {
			return invalid(format!("overlap ({}) must be within [0, 1)", self.overlap));
		}
		if !(self.width_m.is_finite() && self.width_m > 0.0) {
			return invalid(format!("width ({} m) must be positive", self.width_m));
		}
		if !(self.height_m.is_finite() && self.height_m > 0.0) {
			return invalid(format!("height ({} m) must be positive", self.height_m));
		}
		if self.tile_px_w == 0 || self.tile_px_h == 0 {
			return invalid(format!("image size ({}x{}) must be positive", self.tile_px_w, self.tile_px_h));
		}
		if self.scale_factor == 0 {
			return invalid("scale factor must be at least 1".to_string());
		}
		Ok(())
	}
}

#[derive(Debug, PartialEq)]
struct AxisPlan {
	cells: u64,
	step_px: u64,
	mosaic_px: u64,
}

fn plan_axis(extent_m: f64, tile_px: u32, overlap: f64, resolution: &GroundResolution) -> AxisPlan {
	let step_px = ((f64::from(tile_px) * (1.0 - overlap)).round() as u64).max(1);
	let tile_m = resolution.meters(f64::from(tile_px));

	if extent_m <= tile_m {
		return AxisPlan {
			cells: 1,
			step_px,
			mosaic_px: u64::from(tile_px),
		};
	}

	// saturates on absurd extents; the budget check then rejects the plan
	let step_m = resolution.meters(step_px as f64);
	let steps = ((extent_m - tile_m) / step_m).ceil() as u64;
	AxisPlan {
		cells: steps.saturating_add(1),
		step_px,
		mosaic_px: steps.saturating_mul(step_px).saturating_add(u64::from(tile_px)),
	}
}

fn check_budget(width: u64, height: u64, budget: u64) -> Result<(u32, u32), MosaicError> {
	let pixels = width.saturating_mul(height);
	let exceeded = MosaicError::CapacityExceeded {
		width,
		height,
		pixels,
		budget,
	};
	if pixels > budget {
		return Err(exceeded);
	}
	match (u32::try_from(width), u32::try_from(height)) {
		(Ok(w), Ok(h)) => Ok((w, h)),
		_ => Err(exceeded),
	}
}

/// Plans a mosaic around `request.center`.
///
/// The center latitude is clamped to the Web Mercator range, only non-finite coordinates are
/// rejected. Fails with [`MosaicError::InvalidParameters`] or [`MosaicError::CapacityExceeded`],
/// both before any side effect.
pub fn plan(request: &PlanRequest) -> Result<TileGridPlan> {
	request.check()?;
	let resolution = GroundResolution::at_zoom(request.zoom)?;

	let x = plan_axis(request.width_m, request.tile_px_w, request.overlap, &resolution);
	let y = plan_axis(request.height_m, request.tile_px_h, request.overlap, &resolution);

	let scale = u64::from(request.scale_factor);
	check_budget(
		x.mosaic_px.saturating_mul(scale),
		y.mosaic_px.saturating_mul(scale),
		request.pixel_budget,
	)?;

	// every value below fits into u32 because the rendered size does
	let mosaic_px_w = x.mosaic_px as u32;
	let mosaic_px_h = y.mosaic_px as u32;

	let top_left = request.center.to_mercator().offset(
		-resolution.meters(f64::from(mosaic_px_w)) / 2.0,
		resolution.meters(f64::from(mosaic_px_h)) / 2.0,
	);

	let plan = TileGridPlan {
		grid_cols: x.cells as u32,
		grid_rows: y.cells as u32,
		step_px_x: x.step_px as u32,
		step_px_y: y.step_px as u32,
		tile_px_w: request.tile_px_w,
		tile_px_h: request.tile_px_h,
		mosaic_px_w,
		mosaic_px_h,
		top_left,
		resolution,
		scale_factor: request.scale_factor,
		tile_origin: None,
	};
	log::info!(
		"planned {}x{} images, {}x{} px, for {:?}",
		plan.grid_cols,
		plan.grid_rows,
		plan.rendered_width(),
		plan.rendered_height(),
		request.center
	);
	Ok(plan)
}

/// Plans a mosaic of whole XYZ tiles without overlap.
///
/// `tile_px` is the pixel size the tile server delivers; it must be a multiple of 256, and sizes
/// above 256 are handled as supersampled 256 px tiles.
pub fn plan_tile_range(range: &TileRange, tile_px: u32, pixel_budget: u64) -> Result<TileGridPlan> {
	if tile_px == 0 || tile_px % XYZ_TILE_SIZE != 0 {
		return Err(MosaicError::invalid(format!("tile size ({tile_px}) must be a multiple of {XYZ_TILE_SIZE}")).into());
	}
	let scale = tile_px / XYZ_TILE_SIZE;

	let width = u64::from(range.width()) * u64::from(tile_px);
	let height = u64::from(range.height()) * u64::from(tile_px);
	check_budget(width, height, pixel_budget)?;

	let plan = TileGridPlan {
		grid_cols: range.width(),
		grid_rows: range.height(),
		step_px_x: XYZ_TILE_SIZE,
		step_px_y: XYZ_TILE_SIZE,
		tile_px_w: XYZ_TILE_SIZE,
		tile_px_h: XYZ_TILE_SIZE,
		mosaic_px_w: range.width() * XYZ_TILE_SIZE,
		mosaic_px_h: range.height() * XYZ_TILE_SIZE,
		top_left: range.first().north_west_mercator(),
		resolution: GroundResolution::new_unchecked(range.level),
		scale_factor: scale,
		tile_origin: Some(range.first()),
	};
	log::info!("planned tile range {range:?} with {tile_px} px tiles");
	Ok(plan)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TileCoord;
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	fn dublin() -> GeoPoint {
		GeoPoint::new(-6.2597, 53.3478)
	}

	fn mosaic_error(err: &anyhow::Error) -> MosaicError {
		err.downcast_ref::<MosaicError>().cloned().unwrap()
	}

	#[test]
	fn dublin_static_scenario() {
		// planning happens in logical pixels, so the 2x2 grid of 1280 px images only comes out at
		// scale 1; 640 px at scale 2 gives 4x4 (see logical_pixels_with_supersampling)
		let request = PlanRequest::new(dublin(), 600.0, 600.0, 19).with_tile_size(1280, 1280, 1);
		let plan = plan(&request).unwrap();

		assert_eq!((plan.grid_cols(), plan.grid_rows()), (2, 2));
		assert_eq!((plan.step_px_x(), plan.step_px_y()), (1152, 1152));
		assert_eq!((plan.mosaic_px_w(), plan.mosaic_px_h()), (2432, 2432));
		assert_abs_diff_eq!(plan.resolution().meters_per_pixel(), 0.2985821417, epsilon = 1e-9);
		assert!(plan.ground_width() >= 600.0);
	}

	#[test]
	fn logical_pixels_with_supersampling() {
		let request = PlanRequest::new(dublin(), 600.0, 600.0, 19).with_tile_size(640, 640, 2);
		let plan = plan(&request).unwrap();

		// 640 logical px cover 191 m, a step of 576 px covers 172 m
		assert_eq!((plan.grid_cols(), plan.grid_rows()), (4, 4));
		assert_eq!(plan.step_px_x(), 576);
		assert_eq!(plan.mosaic_px_w(), 640 + 3 * 576);
		assert_eq!(plan.rendered_width(), 2 * (640 + 3 * 576));
		assert_eq!(plan.scale_factor(), 2);

		let cell = plan.cell(1, 2).unwrap();
		assert_eq!((cell.x, cell.y, cell.width, cell.height), (1152, 2304, 1280, 1280));
	}

	#[rstest]
	#[case::small(100.0, 1, 640)]
	#[case::exactly_one_tile(GroundResolution::at_zoom(19).unwrap().meters(640.0), 1, 640)]
	#[case::just_above_one_tile(192.0, 2, 1216)]
	#[case::wide(2000.0, 12, 640 + 11 * 576)]
	fn axis_sizes(#[case] width_m: f64, #[case] cols: u32, #[case] mosaic_px: u32) {
		let plan = plan(&PlanRequest::new(dublin(), width_m, 50.0, 19)).unwrap();
		assert_eq!(plan.grid_cols(), cols);
		assert_eq!(plan.mosaic_px_w(), mosaic_px);
		assert_eq!(plan.grid_rows(), 1);
	}

	#[test]
	fn coverage_is_minimal() {
		for zoom in [12u8, 16, 19, 21] {
			for overlap in [0.0, 0.1, 0.25, 0.5, 0.9] {
				for width_m in [10.0, 333.3, 1000.0, 4321.0, 12_000.0] {
					let request = PlanRequest::new(dublin(), width_m, width_m / 3.0, zoom)
						.with_overlap(overlap)
						.with_pixel_budget(u64::MAX);
					let plan = plan(&request).unwrap();
					let res = plan.resolution();

					assert!(plan.ground_width() >= width_m, "{zoom} {overlap} {width_m}");
					assert!(plan.ground_height() >= width_m / 3.0);
					if plan.grid_cols() > 1 {
						let one_fewer = plan.mosaic_px_w() - plan.step_px_x();
						assert!(res.meters(f64::from(one_fewer)) < width_m, "{zoom} {overlap} {width_m}");
					}
				}
			}
		}
	}

	#[test]
	fn step_is_at_least_one_pixel() {
		let request = PlanRequest::new(dublin(), 50.0, 50.0, 19)
			.with_tile_size(1, 1, 1)
			.with_overlap(0.9);
		let plan = plan(&request).unwrap();
		assert_eq!(plan.step_px_x(), 1);
		assert_eq!(plan.grid_cols(), plan.mosaic_px_w());
	}

	#[test]
	fn budget_boundary() {
		let request = PlanRequest::new(dublin(), 600.0, 600.0, 19).with_tile_size(1280, 1280, 1);
		let exact = 2432 * 2432;
		assert!(plan(&request.with_pixel_budget(exact)).is_ok());

		let err = plan(&request.with_pixel_budget(exact - 1)).unwrap_err();
		assert_eq!(
			mosaic_error(&err),
			MosaicError::CapacityExceeded {
				width: 2432,
				height: 2432,
				pixels: exact,
				budget: exact - 1,
			}
		);

		// one more row of images than the budget allows
		let taller = PlanRequest {
			height_m: 800.0,
			..request.with_pixel_budget(exact)
		};
		assert!(matches!(
			mosaic_error(&plan(&taller).unwrap_err()),
			MosaicError::CapacityExceeded { height: 3584, .. }
		));
	}

	#[test]
	fn budget_counts_rendered_pixels() {
		let request = PlanRequest::new(dublin(), 100.0, 100.0, 19).with_tile_size(640, 640, 2);
		assert!(plan(&request.with_pixel_budget(1280 * 1280)).is_ok());
		assert!(plan(&request.with_pixel_budget(1280 * 1280 - 1)).is_err());
	}

	#[test]
	fn huge_extent_is_rejected_not_overflowed() {
		let request = PlanRequest::new(dublin(), 1e12, 1e12, 30).with_pixel_budget(u64::MAX);
		assert!(matches!(
			mosaic_error(&plan(&request).unwrap_err()),
			MosaicError::CapacityExceeded { .. }
		));
	}

	#[rstest]
	#[case::wide(1e30, 100.0)]
	#[case::tall(100.0, 1e30)]
	#[case::both(f64::MAX, f64::MAX)]
	fn absurd_extent_saturates_into_capacity_error(#[case] width_m: f64, #[case] height_m: f64) {
		let request = PlanRequest::new(GeoPoint::new(0.0, 0.0), width_m, height_m, 19).with_pixel_budget(u64::MAX);
		assert!(matches!(
			mosaic_error(&plan(&request).unwrap_err()),
			MosaicError::CapacityExceeded { .. }
		));
	}

	#[test]
	fn axis_saturates_instead_of_wrapping() {
		let axis = plan_axis(1e30, 640, 0.1, &GroundResolution::at_zoom(19).unwrap());
		assert_eq!(axis.cells, u64::MAX);
		assert_eq!(axis.mosaic_px, u64::MAX);
	}

	#[test]
	fn polar_center_is_clamped() {
		let polar = plan(&PlanRequest::new(GeoPoint::new(-6.2597, 95.0), 600.0, 600.0, 19)).unwrap();
		let limit = plan(&PlanRequest::new(GeoPoint::new(-6.2597, crate::MAX_LAT), 600.0, 600.0, 19)).unwrap();
		assert_eq!(polar, limit);
	}

	#[rstest]
	#[case::overlap_one(PlanRequest::new(dublin(), 600.0, 600.0, 19).with_overlap(1.0))]
	#[case::overlap_negative(PlanRequest::new(dublin(), 600.0, 600.0, 19).with_overlap(-0.1))]
	#[case::overlap_nan(PlanRequest::new(dublin(), 600.0, 600.0, 19).with_overlap(f64::NAN))]
	#[case::width_zero(PlanRequest::new(dublin(), 0.0, 600.0, 19))]
	#[case::height_negative(PlanRequest::new(dublin(), 600.0, -1.0, 19))]
	#[case::zoom_zero(PlanRequest::new(dublin(), 600.0, 600.0, 0))]
	#[case::zoom_too_high(PlanRequest::new(dublin(), 600.0, 600.0, 31))]
	#[case::tile_zero(PlanRequest::new(dublin(), 600.0, 600.0, 19).with_tile_size(0, 640, 1))]
	#[case::scale_zero(PlanRequest::new(dublin(), 600.0, 600.0, 19).with_tile_size(640, 640, 0))]
	#[case::center_nan(PlanRequest::new(GeoPoint::new(f64::NAN, 0.0), 600.0, 600.0, 19))]
	#[case::center_infinite(PlanRequest::new(GeoPoint::new(0.0, f64::INFINITY), 600.0, 600.0, 19))]
	fn invalid_parameters(#[case] request: PlanRequest) {
		let err = plan(&request).unwrap_err();
		assert!(matches!(mosaic_error(&err), MosaicError::InvalidParameters(_)), "{err}");
	}

	#[test]
	fn top_left_is_centered() {
		let plan = plan(&PlanRequest::new(dublin(), 600.0, 400.0, 18)).unwrap();
		let center = dublin().to_mercator();
		let tl = plan.top_left();
		assert_abs_diff_eq!(center.x - tl.x, plan.ground_width() / 2.0, epsilon = 1e-6);
		assert_abs_diff_eq!(tl.y - center.y, plan.ground_height() / 2.0, epsilon = 1e-6);

		let back = plan.center();
		assert_abs_diff_eq!(back.lon, dublin().lon, epsilon = 1e-9);
		assert_abs_diff_eq!(back.lat, dublin().lat, epsilon = 1e-9);
	}

	#[test]
	fn cell_centers_and_order() {
		let request = PlanRequest::new(dublin(), 1000.0, 500.0, 19).with_tile_size(640, 640, 1);
		let plan = plan(&request).unwrap();
		let res = plan.resolution().meters_per_pixel();
		let cells: Vec<_> = plan.cells().collect();

		assert_eq!(cells.len() as u64, plan.cell_count());
		let order: Vec<(u32, u32)> = cells.iter().map(|c| (c.col, c.row)).collect();
		let mut expected = vec![];
		for row in 0..plan.grid_rows() {
			for col in 0..plan.grid_cols() {
				expected.push((col, row));
			}
		}
		assert_eq!(order, expected);

		let last = cells.last().unwrap();
		let tl = plan.top_left();
		assert_abs_diff_eq!(
			last.center_mercator.x,
			tl.x + (320.0 + f64::from(last.col * plan.step_px_x())) * res,
			epsilon = 1e-6
		);
		assert_abs_diff_eq!(
			last.center_mercator.y,
			tl.y - (320.0 + f64::from(last.row * plan.step_px_y())) * res,
			epsilon = 1e-6
		);
		assert_eq!(last.center, last.center_mercator.to_geo());
		assert!(last.tile.is_none());
		assert!(plan.cell(plan.grid_cols(), 0).is_none());
		assert_eq!(cells[3].index(plan.grid_cols()), 3);
	}

	#[test]
	fn tile_range_plan() {
		let range = TileRange::new(15, 15809, 10616, 15811, 10617).unwrap();
		let plan = plan_tile_range(&range, 256, DEFAULT_MAX_PIXELS).unwrap();

		assert_eq!((plan.grid_cols(), plan.grid_rows()), (3, 2));
		assert_eq!((plan.rendered_width(), plan.rendered_height()), (768, 512));
		assert_eq!(plan.step_px_x(), plan.tile_px_w());
		assert_eq!(plan.top_left(), range.first().north_west_mercator());

		let cell = plan.cell(2, 1).unwrap();
		assert_eq!(cell.tile, Some(TileCoord::new(15, 15811, 10617).unwrap()));
		assert_eq!((cell.x, cell.y), (512, 256));

		// the center of a tile lies inside that tile
		assert_eq!(TileCoord::from_geo(&cell.center, 15).unwrap(), cell.tile.unwrap());
	}

	#[test]
	fn tile_range_retina_and_errors() {
		let range = TileRange::new(3, 0, 0, 1, 1).unwrap();
		let plan = plan_tile_range(&range, 512, DEFAULT_MAX_PIXELS).unwrap();
		assert_eq!(plan.scale_factor(), 2);
		assert_eq!(plan.rendered_width(), 1024);

		assert!(plan_tile_range(&range, 300, DEFAULT_MAX_PIXELS).is_err());
		assert!(plan_tile_range(&range, 0, DEFAULT_MAX_PIXELS).is_err());
		assert!(matches!(
			mosaic_error(&plan_tile_range(&range, 256, 512 * 512 - 1).unwrap_err()),
			MosaicError::CapacityExceeded { .. }
		));
	}
}
