//! Rastercap Core - Budget-bounded raster compression
//!
//! This crate compresses a raster image into an encoded byte stream while
//! honoring hard resource limits: a maximum output allocation size and
//! maximum output dimensions, alongside user-selected quality and filter
//! parameters.
//!
//! The pipeline makes a single deterministic pass:
//!
//! 1. [`decode::decode_image`] normalizes the input bytes into an RGB raster
//! 2. [`plan::plan_geometry`] decides output dimensions and chroma mode that
//!    keep the worst-case encoded size within the caller's budget
//! 3. [`resample::resample`] resizes to the planned geometry
//! 4. [`chroma::subsample`] produces the plane layout for the chosen mode
//! 5. A [`codec::PlaneCodec`] encodes the planes exactly once
//!
//! There is no retry loop: the planner's job is to make the single encoding
//! attempt satisfy the budget, and [`pipeline::compress`] verifies the result
//! before returning it.
//!
//! All state is call-local. Concurrent `compress` invocations are safe to run
//! in parallel; the crate holds no process-wide mutable state.

pub mod chroma;
pub mod codec;
pub mod decode;
pub mod pipeline;
pub mod plan;
pub mod raster;
pub mod resample;

pub use chroma::{subsample, ChromaSampling, Plane, PlaneSet};
pub use codec::{CodecError, JpegCodec, PlaneCodec};
pub use pipeline::{compress, compress_with, CompressError};
pub use plan::{estimate_encoded_size, plan_geometry, PlanError, PlannedGeometry};
pub use raster::Raster;
pub use resample::{resample, FilterKind, InvalidFilter};

/// A requested output dimension.
///
/// The wire protocol uses `0` as an "inherit from the source" sentinel; inside
/// the crate that sentinel is represented explicitly so a genuinely zero-sized
/// request can be rejected instead of silently meaning "auto".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Dimension {
    /// Preserve the corresponding source dimension (scaling proportionally
    /// when only the other axis is explicit).
    Auto,
    /// An explicit pixel count. Zero is invalid and rejected at planning time.
    Explicit(u32),
}

impl Dimension {
    /// Translate the wire-level zero sentinel into [`Dimension::Auto`].
    pub fn from_raw(value: u32) -> Self {
        if value == 0 {
            Dimension::Auto
        } else {
            Dimension::Explicit(value)
        }
    }
}

/// Immutable compression request configuration.
///
/// Constructed once per request and read-only thereafter; the pipeline passes
/// it by shared reference. `max_alloc` is the hard ceiling on the encoded
/// artifact's byte length, and `max_width`/`max_height` are absolute
/// geometric ceilings independent of the requested dimensions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Target {
    /// Requested output width.
    pub width: Dimension,
    /// Requested output height.
    pub height: Dimension,
    /// Interpolation kernel for resampling.
    pub filter: FilterKind,
    /// Encoder quality, 1-100, higher = larger/better.
    pub quality: u8,
    /// Maximum encoded artifact size in bytes.
    pub max_alloc: u64,
    /// Absolute output width ceiling in pixels.
    pub max_width: u32,
    /// Absolute output height ceiling in pixels.
    pub max_height: u32,
}

impl Target {
    /// Create a target from already-typed fields.
    ///
    /// Quality is clamped to 1-100, matching the encoder's accepted range.
    pub fn new(
        width: Dimension,
        height: Dimension,
        filter: FilterKind,
        quality: u8,
        max_alloc: u64,
        max_width: u32,
        max_height: u32,
    ) -> Self {
        Self {
            width,
            height,
            filter,
            quality: quality.clamp(1, 100),
            max_alloc,
            max_width,
            max_height,
        }
    }

    /// Create a target from the raw wire fields.
    ///
    /// `width`/`height` of zero mean "preserve the source dimension". The
    /// filter id is validated here, before any pixel work happens; an
    /// unrecognized id fails with [`InvalidFilter`].
    pub fn from_raw(
        width: u32,
        height: u32,
        filter_id: u8,
        quality: u8,
        max_alloc: u64,
        max_width: u32,
        max_height: u32,
    ) -> Result<Self, InvalidFilter> {
        Ok(Self::new(
            Dimension::from_raw(width),
            Dimension::from_raw(height),
            FilterKind::from_id(filter_id)?,
            quality,
            max_alloc,
            max_width,
            max_height,
        ))
    }
}
