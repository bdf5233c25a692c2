//! Core of geomosaic: Web Mercator math, grid planning and world-file georeferencing.
//!
//! Nothing in this crate touches the network or decodes images. Given a center, an extent and
//! a zoom level, [`planner::plan`] decides how many images are needed and where each one goes;
//! [`georeference::world_file`] turns the same plan into the six world-file coefficients.
//!
//! ```
//! use geomosaic_core::{GeoPoint, PlanRequest, georeference, planner};
//!
//! let request = PlanRequest::new(GeoPoint::new(-6.2597, 53.3478), 600.0, 600.0, 19)
//! 	.with_tile_size(640, 640, 2);
//! let plan = planner::plan(&request).unwrap();
//! assert_eq!(plan.cell_count(), 16);
//!
//! let world_file = georeference::world_file(&plan);
//! assert!(world_file.e < 0.0);
//! ```

mod concurrency;
pub mod config;
mod constants;
pub mod dms;
mod error;
pub mod georeference;
pub mod planner;
pub mod projection;
mod types;

pub use concurrency::default_fetch_concurrency;
pub use constants::*;
pub use error::*;
pub use planner::PlanRequest;
pub use types::*;
