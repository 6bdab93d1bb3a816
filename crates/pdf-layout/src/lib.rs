//! Coordinate based PDF drawing
//!
//! A small canvas in the spirit of a report-writer: absolute point
//! coordinates with the origin at the bottom-left corner, the two base-14
//! Helvetica faces, rectangles, lines, raster logos and multi-page output.
//! Everything is assembled with `lopdf` when the canvas is finished.

pub mod canvas;
pub mod error;
pub mod fonts;
pub mod raster;
pub mod units;
pub mod wrap;

pub use canvas::{Canvas, ImageId};
pub use error::LayoutError;
pub use fonts::{string_width, Font};
pub use raster::RasterImage;
pub use units::{mm, PageSize, A4};
pub use wrap::wrap_text;
