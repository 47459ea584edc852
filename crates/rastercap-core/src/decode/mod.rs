//! Input decoding and normalization.
//!
//! This module turns raw encoded image bytes (any supported input format)
//! into an upright RGB [`Raster`](crate::raster::Raster):
//!
//! - Format is guessed from the byte stream, never from a file name
//! - EXIF orientation is applied so downstream geometry math sees the image
//!   the way a viewer would
//!
//! Decoding is the only stage that touches the input bytes; everything after
//! it works on owned pixel buffers.

mod loader;
mod types;

pub use loader::{decode_image, decode_image_raw, orientation_of};
pub use types::{DecodeError, Orientation};
