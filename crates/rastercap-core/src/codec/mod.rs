//! The encoding capability boundary.
//!
//! The entropy/transform codec is a black-box primitive behind the
//! [`PlaneCodec`] trait: planes in, bytes out. Planning and resampling never
//! look behind this boundary, so any conforming codec can be substituted
//! without touching them. [`JpegCodec`] is the built-in implementation.

mod jpeg;

use thiserror::Error;

use crate::chroma::PlaneSet;

pub use jpeg::JpegCodec;

/// Errors produced at the codec boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The plane layout is internally inconsistent (dimensions do not match
    /// the declared sampling mode).
    #[error("Invalid plane layout: {0}")]
    InvalidPlaneLayout(String),

    /// Opaque failure from the encoding primitive.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Opaque failure from the decoding primitive.
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),
}

/// A substitutable plane codec: `encode(planes, quality) -> bytes` and
/// `decode(bytes) -> planes`.
pub trait PlaneCodec {
    /// Compress a plane set at the given quality (1-100, higher = larger).
    fn encode(&self, planes: &PlaneSet, quality: u8) -> Result<Vec<u8>, CodecError>;

    /// Decompress an encoded artifact back into a full-fidelity plane set.
    fn decode(&self, bytes: &[u8]) -> Result<PlaneSet, CodecError>;
}
