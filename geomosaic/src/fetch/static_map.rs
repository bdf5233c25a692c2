use super::{RetryingClient, TileFetcher, TileRequest};
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use geomosaic_core::{MapLayer, config::ServiceConfig};
use std::fmt::{self, Debug};

/// Fetches one static map image per grid cell, centered on the cell's ground center.
pub struct StaticMapFetcher {
	client: RetryingClient,
	url: String,
	api_key: Option<String>,
	layer: MapLayer,
}

impl StaticMapFetcher {
	pub fn new(config: &ServiceConfig) -> Result<StaticMapFetcher> {
		Ok(StaticMapFetcher {
			client: RetryingClient::new(config)?,
			url: config.url.clone(),
			api_key: config.api_key.clone(),
			layer: config.layer,
		})
	}

	#[must_use]
	pub fn with_client(mut self, client: RetryingClient) -> Self {
		self.client = client;
		self
	}

	pub fn build_url(&self, request: &TileRequest) -> String {
		let mut url = format!(
			"{}?center={:.8},{:.8}&zoom={}&size={}x{}&scale={}&maptype={}",
			self.url,
			request.center.lat,
			request.center.lon,
			request.zoom,
			request.width,
			request.height,
			request.scale,
			self.layer
		);
		if let Some(key) = &self.api_key {
			url.push_str("&key=");
			url.push_str(key);
		}
		url
	}
}

impl Debug for StaticMapFetcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StaticMapFetcher")
			.field("url", &self.url)
			.field("layer", &self.layer)
			.field("api_key", &self.api_key.as_ref().map(|_| "***"))
			.finish()
	}
}

#[async_trait]
impl TileFetcher for StaticMapFetcher {
	async fn fetch(&self, request: &TileRequest) -> Result<Bytes> {
		let name = format!("static map at {:?} z{}", request.center, request.zoom);
		self.client.get(&self.build_url(request), &name).await
	}
}
