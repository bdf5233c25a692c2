//! Mosaic configuration.
//!
//! - [`MosaicConfig`](crate::config::MosaicConfig): top-level record and YAML loader
//! - [`ServiceConfig`](crate::config::ServiceConfig): where and how images are requested
//! - [`MosaicSettings`](crate::config::MosaicSettings): planning and assembly settings
//!
//! Every field has a default, so an empty file is a valid configuration. Command line flags
//! override single fields before the record is frozen for a run.

mod main;
mod mosaic;
mod service;

pub use main::MosaicConfig;
pub use mosaic::MosaicSettings;
pub use service::ServiceConfig;
