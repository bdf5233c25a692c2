//! Value types: points, resolutions, tile addresses, plans and world files.

mod geo_point;
pub use geo_point::*;

mod grid_cell;
pub use grid_cell::*;

mod ground_resolution;
pub use ground_resolution::*;

mod map_layer;
pub use map_layer::*;

mod mercator_point;
pub use mercator_point::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_grid_plan;
pub use tile_grid_plan::*;

mod tile_range;
pub use tile_range::*;

mod world_file;
pub use world_file::*;
