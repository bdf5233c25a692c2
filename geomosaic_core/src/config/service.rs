use crate::MapLayer;
use anyhow::{Result, ensure};
use serde::Deserialize;

pub const DEFAULT_STATIC_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const DEFAULT_TILE_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServiceConfig {
	/// Static map endpoint, queried with `center`, `zoom`, `size`, `scale`, `maptype` and `key`.
	pub url: String,

	/// XYZ endpoint with `{z}`, `{x}` and `{y}` placeholders.
	pub url_template: String,

	/// Passed through to the static map service untouched.
	pub api_key: Option<String>,

	pub layer: MapLayer,

	/// Logical width of one static map image.
	pub tile_width: u32,

	/// Logical height of one static map image.
	pub tile_height: u32,

	/// Rendered pixels per logical pixel.
	pub scale: u32,

	pub timeout_seconds: u64,

	/// Retries after the first attempt, for transient failures only.
	pub max_retries: u32,

	pub user_agent: String,
}

impl Default for ServiceConfig {
	fn default() -> Self {
		ServiceConfig {
			url: DEFAULT_STATIC_URL.to_string(),
			url_template: DEFAULT_TILE_TEMPLATE.to_string(),
			api_key: None,
			layer: MapLayer::default(),
			tile_width: 640,
			tile_height: 640,
			scale: 2,
			timeout_seconds: 20,
			max_retries: 3,
			user_agent: format!("geomosaic/{}", env!("CARGO_PKG_VERSION")),
		}
	}
}

impl ServiceConfig {
	pub fn check(&self) -> Result<()> {
		ensure!(
			self.tile_width > 0 && self.tile_height > 0,
			"service.tile_width and service.tile_height must be positive"
		);
		ensure!(self.scale >= 1, "service.scale must be at least 1");
		ensure!(self.timeout_seconds > 0, "service.timeout_seconds must be positive");
		ensure!(!self.url.is_empty(), "service.url must not be empty");
		for placeholder in ["{z}", "{x}", "{y}"] {
			ensure!(
				self.url_template.contains(placeholder),
				"service.url_template must contain {placeholder}"
			);
		}
		Ok(())
	}

	pub fn override_optional_api_key(&mut self, api_key: &Option<String>) {
		if api_key.is_some() {
			self.api_key.clone_from(api_key);
		}
	}

	pub fn override_optional_layer(&mut self, layer: &Option<MapLayer>) {
		if let Some(layer) = layer {
			self.layer = *layer;
		}
	}

	pub fn override_optional_scale(&mut self, scale: &Option<u32>) {
		if let Some(scale) = scale {
			self.scale = *scale;
		}
	}

	pub fn override_optional_url_template(&mut self, url_template: &Option<String>) {
		if let Some(url_template) = url_template {
			self.url_template.clone_from(url_template);
		}
	}
}
