use super::{MosaicSettings, ServiceConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MosaicConfig {
	/// Imagery service settings
	#[serde(default)]
	pub service: ServiceConfig,

	/// Planning and assembly settings
	#[serde(default)]
	pub mosaic: MosaicSettings,
}

impl MosaicConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config {path:?}"))?;
		MosaicConfig::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {path:?}"))
	}

	/// Validates the settings the planner does not see.
	pub fn check(&self) -> Result<()> {
		self.service.check()?;
		self.mosaic.check()
	}
}
