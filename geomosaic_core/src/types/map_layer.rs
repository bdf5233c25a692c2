use anyhow::{Result, bail};
#[cfg(feature = "cli")]
use clap::ValueEnum;
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};

/// Imagery layer requested from a static map service.
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
	#[default]
	Satellite,
	Hybrid,
	Roadmap,
	Terrain,
}

impl MapLayer {
	pub fn as_str(&self) -> &str {
		match self {
			MapLayer::Satellite => "satellite",
			MapLayer::Hybrid => "hybrid",
			MapLayer::Roadmap => "roadmap",
			MapLayer::Terrain => "terrain",
		}
	}
}

impl Display for MapLayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MapLayer {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.trim().to_lowercase().as_str() {
			"satellite" => MapLayer::Satellite,
			"hybrid" => MapLayer::Hybrid,
			"roadmap" => MapLayer::Roadmap,
			"terrain" => MapLayer::Terrain,
			_ => bail!("unknown map layer {s:?}, expected satellite, hybrid, roadmap or terrain"),
		})
	}
}
