//! The compression orchestrator.
//!
//! Wires the stages together in a single synchronous pass:
//! decode -> plan -> resample -> subsample -> encode, then verifies the
//! budget post-condition before returning. Every stage failure is terminal
//! and surfaces unchanged; no partial or best-effort output exists.

use thiserror::Error;

use crate::chroma::{self, ChromaSampling};
use crate::codec::{CodecError, JpegCodec, PlaneCodec};
use crate::decode::{self, DecodeError};
use crate::plan::{self, PlanError};
use crate::resample::{self, ResampleError};
use crate::Target;

/// Errors surfaced by [`compress`].
///
/// `Decode`, `Plan`, and `Resample` mean the request itself cannot be
/// satisfied as stated; `Codec` and `BudgetExceeded` are faults of the
/// encoding primitive or the estimation model.
#[derive(Debug, Error)]
pub enum CompressError {
    /// Input bytes are not a decodable image.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// No geometry/chroma combination satisfies the request.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Resampling rejected the planned geometry.
    #[error(transparent)]
    Resample(#[from] ResampleError),

    /// The encoding primitive failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The encoder produced more bytes than the planner admitted — an
    /// estimation-model gap, never silently returned to the caller.
    #[error("Encoded artifact of {actual} bytes exceeds budget of {limit} bytes")]
    BudgetExceeded {
        /// Actual encoded size in bytes.
        actual: u64,
        /// The caller's `max_alloc`.
        limit: u64,
    },
}

/// Compress encoded image bytes with the built-in JPEG codec.
///
/// Decodes the input, plans admissible geometry starting from full-fidelity
/// chroma, resamples with the target's kernel, subsamples to the planned
/// mode, and encodes exactly once. The returned byte length never exceeds
/// `target.max_alloc`.
pub fn compress(original_image: &[u8], target: &Target) -> Result<Vec<u8>, CompressError> {
    compress_with(original_image, target, &JpegCodec::new())
}

/// Compress with a caller-supplied codec behind the [`PlaneCodec`] boundary.
///
/// # Errors
///
/// Any stage error propagates unchanged. After encoding, an artifact larger
/// than `target.max_alloc` fails with [`CompressError::BudgetExceeded`]
/// rather than being returned.
pub fn compress_with<C: PlaneCodec>(
    original_image: &[u8],
    target: &Target,
    codec: &C,
) -> Result<Vec<u8>, CompressError> {
    let source = decode::decode_image(original_image)?;

    let geometry = plan::plan_geometry(
        source.width,
        source.height,
        target,
        ChromaSampling::Full,
    )?;

    let resized = resample::resample(&source, geometry.width, geometry.height, target.filter)?;
    drop(source);

    let planes = chroma::subsample(&resized, geometry.chroma);
    drop(resized);

    let encoded = codec.encode(&planes, target.quality)?;

    let actual = encoded.len() as u64;
    if actual > target.max_alloc {
        return Err(CompressError::BudgetExceeded {
            actual,
            limit: target.max_alloc,
        });
    }

    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma::PlaneSet;
    use crate::resample::FilterKind;
    use crate::Dimension;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .expect("in-memory png encode");
        buf.into_inner()
    }

    fn generous_target() -> Target {
        Target::new(
            Dimension::Auto,
            Dimension::Auto,
            FilterKind::Triangle,
            80,
            10_000_000,
            4096,
            4096,
        )
    }

    /// Codec stub that returns a fixed-size artifact, for driving the
    /// post-encode budget check without a real encoder.
    struct FixedSizeCodec {
        len: usize,
    }

    impl PlaneCodec for FixedSizeCodec {
        fn encode(&self, _planes: &PlaneSet, _quality: u8) -> Result<Vec<u8>, CodecError> {
            Ok(vec![0u8; self.len])
        }

        fn decode(&self, _bytes: &[u8]) -> Result<PlaneSet, CodecError> {
            Err(CodecError::DecodingFailed("stub".to_string()))
        }
    }

    /// Codec stub that always fails, for error propagation.
    struct FailingCodec;

    impl PlaneCodec for FailingCodec {
        fn encode(&self, _planes: &PlaneSet, _quality: u8) -> Result<Vec<u8>, CodecError> {
            Err(CodecError::EncodingFailed("simulated".to_string()))
        }

        fn decode(&self, _bytes: &[u8]) -> Result<PlaneSet, CodecError> {
            Err(CodecError::DecodingFailed("stub".to_string()))
        }
    }

    #[test]
    fn test_compress_round_trip_within_budget() {
        let input = png_bytes(64, 48);
        let output = compress(&input, &generous_target()).unwrap();

        assert!(!output.is_empty());
        assert!(output.len() as u64 <= generous_target().max_alloc);
        assert_eq!(&output[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_compress_pass_through_geometry() {
        // 10x10 source with matching explicit target and ceilings: geometry
        // stays exactly 10x10.
        let input = png_bytes(10, 10);
        let target = Target::new(
            Dimension::Explicit(10),
            Dimension::Explicit(10),
            FilterKind::Lanczos3,
            90,
            1_000_000,
            10,
            10,
        );

        let output = compress(&input, &target).unwrap();
        let decoded = decode::decode_image(&output).unwrap();
        assert_eq!((decoded.width, decoded.height), (10, 10));
    }

    #[test]
    fn test_compress_invalid_input_fails_with_decode_error() {
        let result = compress(&[0xDE, 0xAD, 0xBE, 0xEF], &generous_target());
        assert!(matches!(result, Err(CompressError::Decode(_))));
    }

    #[test]
    fn test_compress_infeasible_budget() {
        let input = png_bytes(32, 32);
        let mut target = generous_target();
        target.max_alloc = 1;

        let result = compress(&input, &target);
        assert!(matches!(
            result,
            Err(CompressError::Plan(PlanError::InfeasibleBudget { .. }))
        ));
    }

    #[test]
    fn test_compress_clamps_to_dimension_ceiling() {
        let input = png_bytes(200, 100);
        let mut target = generous_target();
        target.max_width = 50;
        target.max_height = 50;

        let output = compress(&input, &target).unwrap();
        let decoded = decode::decode_image(&output).unwrap();
        assert_eq!(decoded.width, 50);
        assert_eq!(decoded.height, 25);
    }

    #[test]
    fn test_budget_post_condition_rejects_oversized_artifact() {
        let input = png_bytes(32, 32);
        let mut target = generous_target();
        target.max_alloc = 5_000;

        let codec = FixedSizeCodec { len: 6_000 };
        let result = compress_with(&input, &target, &codec);

        assert!(matches!(
            result,
            Err(CompressError::BudgetExceeded {
                actual: 6_000,
                limit: 5_000
            })
        ));
    }

    #[test]
    fn test_budget_post_condition_accepts_fitting_artifact() {
        let input = png_bytes(32, 32);
        let mut target = generous_target();
        target.max_alloc = 5_000;

        let codec = FixedSizeCodec { len: 4_000 };
        let output = compress_with(&input, &target, &codec).unwrap();
        assert_eq!(output.len(), 4_000);
    }

    #[test]
    fn test_codec_failure_propagates() {
        let input = png_bytes(16, 16);
        let result = compress_with(&input, &generous_target(), &FailingCodec);
        assert!(matches!(result, Err(CompressError::Codec(_))));
    }

    #[test]
    fn test_scenario_large_source_small_budget() {
        // Oversized source, tight 50 KB budget: geometry must clamp to the
        // ceilings, the planner must degrade until its estimate fits, and
        // the artifact must land within budget.
        let input = png_bytes(2000, 1500);
        let target = Target::new(
            Dimension::Auto,
            Dimension::Auto,
            FilterKind::Triangle,
            50,
            50_000,
            1920,
            1080,
        );

        let output = compress(&input, &target).unwrap();
        assert!(output.len() as u64 <= 50_000);

        let decoded = decode::decode_image(&output).unwrap();
        assert!(decoded.width <= 1920);
        assert!(decoded.height <= 1080);
        // Aspect preserved within the rounding of the shared shrink factor.
        let ratio = decoded.width as f64 / decoded.height as f64;
        assert!((ratio - 4.0 / 3.0).abs() < 0.05, "ratio was {ratio}");
    }

    #[test]
    fn test_compress_never_returns_oversized_bytes() {
        // For a spread of budgets, the result is either within budget or a
        // defined error; oversized bytes must never escape.
        let input = png_bytes(60, 40);
        for max_alloc in [1u64, 500, 1_500, 5_000, 50_000, 1_000_000] {
            let mut target = generous_target();
            target.max_alloc = max_alloc;

            match compress(&input, &target) {
                Ok(bytes) => assert!(bytes.len() as u64 <= max_alloc),
                Err(
                    CompressError::Plan(_)
                    | CompressError::BudgetExceeded { .. }
                    | CompressError::Codec(_),
                ) => {}
                Err(other) => panic!("unexpected error kind: {other:?}"),
            }
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
