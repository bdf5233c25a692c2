use super::{RetryingClient, TileFetcher, TileRequest};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use geomosaic_core::{TileCoord, config::ServiceConfig};

/// Fetches XYZ tiles from a `{z}/{x}/{y}` URL template.
#[derive(Debug)]
pub struct XyzTileFetcher {
	client: RetryingClient,
	template: String,
}

impl XyzTileFetcher {
	pub fn new(config: &ServiceConfig) -> Result<XyzTileFetcher> {
		Ok(XyzTileFetcher {
			client: RetryingClient::new(config)?,
			template: config.url_template.clone(),
		})
	}

	#[must_use]
	pub fn with_client(mut self, client: RetryingClient) -> Self {
		self.client = client;
		self
	}

	pub fn build_url(&self, coord: &TileCoord) -> String {
		self
			.template
			.replace("{z}", &coord.level.to_string())
			.replace("{x}", &coord.x.to_string())
			.replace("{y}", &coord.y.to_string())
	}
}

#[async_trait]
impl TileFetcher for XyzTileFetcher {
	async fn fetch(&self, request: &TileRequest) -> Result<Bytes> {
		let coord = request
			.tile
			.context("XYZ tiles can only be fetched for plans built from a tile range")?;
		self.client.get(&self.build_url(&coord), &format!("tile {coord:?}")).await
	}
}
