//! Extensions of [`image::DynamicImage`].
//!
//! - [`DynamicImageTraitOperation`]: flattening fetched images onto the canvas background.
//! - `DynamicImageTraitTest`: deterministic test images (tests and the `test` feature only).

mod operation;

pub use operation::*;
#[cfg(any(test, feature = "test"))]
pub use test::*;
