//! World-file georeferencing of a planned mosaic.

use crate::{TileGridPlan, WorldFile};

/// Computes the affine transform of the rendered canvas of `plan`.
///
/// The pixel size is the ground resolution divided by the scale factor, rows grow southwards
/// and the translation terms point at the *center* of pixel (0,0), half a pixel inside the
/// mosaic's top-left corner.
pub fn world_file(plan: &TileGridPlan) -> WorldFile {
	let a = plan.resolution().rendered(plan.scale_factor());
	let e = -a;
	let top_left = plan.top_left();
	WorldFile {
		a,
		d: 0.0,
		b: 0.0,
		e,
		c: top_left.x + a / 2.0,
		f: top_left.y + e / 2.0,
	}
}
