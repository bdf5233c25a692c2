//! Image sources.
//!
//! The mosaic runner only knows the [`TileFetcher`] trait: given the ground center, zoom level
//! and size of one grid cell it returns the encoded image bytes, or an error when the image is
//! not available. Fetchers own their retry policy and timeouts.

mod http;
mod static_map;
mod xyz;

#[cfg(test)]
pub(crate) mod mock;

pub use http::RetryingClient;
pub use static_map::StaticMapFetcher;
pub use xyz::XyzTileFetcher;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use geomosaic_core::{GeoPoint, GridCell, TileCoord, TileGridPlan};
use std::fmt::Debug;

/// What to fetch for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRequest {
	/// Ground-sample center of the image.
	pub center: GeoPoint,
	pub zoom: u8,
	/// Logical width.
	pub width: u32,
	/// Logical height.
	pub height: u32,
	/// Rendered pixels per logical pixel.
	pub scale: u32,
	/// XYZ address, present when the plan was built from a tile range.
	pub tile: Option<TileCoord>,
}

impl TileRequest {
	pub fn for_cell(plan: &TileGridPlan, cell: &GridCell) -> TileRequest {
		TileRequest {
			center: cell.center,
			zoom: plan.zoom(),
			width: plan.tile_px_w(),
			height: plan.tile_px_h(),
			scale: plan.scale_factor(),
			tile: cell.tile,
		}
	}
}

#[async_trait]
pub trait TileFetcher: Debug + Send + Sync {
	/// Fetches the encoded image for `request`. Any error marks the cell as unavailable.
	async fn fetch(&self, request: &TileRequest) -> Result<Bytes>;
}
