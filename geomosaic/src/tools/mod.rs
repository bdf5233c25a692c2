pub mod common;
pub mod plan;
pub mod static_map;
pub mod tiles;
