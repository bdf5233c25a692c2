//! In-memory fetcher for tests.

use super::{TileFetcher, TileRequest};
use crate::CancellationToken;
use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use geomosaic_core::GeoPoint;
use geomosaic_image::{RasterFormat, encode, traits::DynamicImageTraitTest};
use image::DynamicImage;
use std::sync::{
	Mutex,
	atomic::{AtomicUsize, Ordering},
};

/// Serves solid PNG images of the rendered request size. Requests centered on a point in
/// `failing` return an error, those in `garbage` return bytes that are not an image, and those in
/// `panicking` panic inside the fetch task.
#[derive(Debug, Default)]
pub struct MockFetcher {
	pub failing: Vec<GeoPoint>,
	pub garbage: Vec<GeoPoint>,
	pub panicking: Vec<GeoPoint>,
	pub color: [u8; 3],
	/// Cancels the token while serving the n-th call (counted from 1).
	pub cancel_on: Option<(usize, CancellationToken)>,
	pub(crate) calls: AtomicUsize,
	pub(crate) requests: Mutex<Vec<TileRequest>>,
}

impl MockFetcher {
	pub fn new(color: [u8; 3]) -> MockFetcher {
		MockFetcher {
			color,
			..MockFetcher::default()
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn requests(&self) -> Vec<TileRequest> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl TileFetcher for MockFetcher {
	async fn fetch(&self, request: &TileRequest) -> Result<Bytes> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
		self.requests.lock().unwrap().push(*request);
		if let Some((n, token)) = &self.cancel_on {
			if *n == call {
				token.cancel();
			}
		}

		if self.failing.contains(&request.center) {
			bail!("HTTP 500 for {:?}", request.center);
		}
		assert!(!self.panicking.contains(&request.center), "fetcher crashed on {:?}", request.center);
		if self.garbage.contains(&request.center) {
			return Ok(Bytes::from_static(b"<html>over quota</html>"));
		}
		let image = DynamicImage::new_solid_rgb(request.width * request.scale, request.height * request.scale, self.color);
		Ok(Bytes::from(encode(&image, RasterFormat::Png)?))
	}
}
