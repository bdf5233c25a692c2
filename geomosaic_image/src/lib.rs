//! Raster handling for geomosaic: the canvas images are pasted into and the codecs used to read
//! fetched images and write the finished mosaic.

mod canvas;
pub mod format;
pub mod traits;

pub use canvas::MosaicCanvas;
pub use format::{RasterFormat, decode, encode};
