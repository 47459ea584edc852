//! Budget planning: admissible output geometry and chroma mode.
//!
//! The planner makes the single irreversible size/quality trade-off before
//! any expensive pixel work: given the source dimensions, the caller's
//! target, and a byte budget, it resolves the output geometry and chroma
//! mode whose worst-case encoded size fits the budget. There is no trial
//! encode-and-check loop anywhere downstream; this decision has to hold.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chroma::ChromaSampling;
use crate::{Dimension, Target};

/// Fixed container overhead of an encoded artifact in bytes: markers,
/// quantization and entropy tables. Independent of geometry.
const CONTAINER_OVERHEAD: u64 = 1024;

/// Per-sample payload bound in millibits: `BASE + SLOPE * quality`.
///
/// Calibrated against the built-in JPEG codec: quality 100 is bounded at
/// 8.0 bits per sample, quality 50 at 4.25, with the floor keeping tiny
/// low-quality estimates nonzero. Monotonic in quality by construction.
const PAYLOAD_MILLIBITS_BASE: u64 = 500;
const PAYLOAD_MILLIBITS_PER_QUALITY: u64 = 75;

/// Geometry shrink factor applied per degradation step, cumulative.
const GEOMETRY_SHRINK_FACTOR: f64 = 0.9;

/// Errors produced by [`plan_geometry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Source dimensions, explicit target dimensions, or dimension ceilings
    /// are zero.
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    /// No chroma mode at any geometry down to 1x1 fits the budget.
    #[error("Budget of {max_alloc} bytes is unsatisfiable at any geometry")]
    InfeasibleBudget {
        /// The budget that could not be met.
        max_alloc: u64,
    },
}

/// The planner's decision: resolved output geometry and chroma mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedGeometry {
    /// Resolved output width in pixels.
    pub width: u32,
    /// Resolved output height in pixels.
    pub height: u32,
    /// Resolved chroma sampling mode.
    pub chroma: ChromaSampling,
    /// Worst-case encoded size estimate for this decision, in bytes.
    pub estimated_size: u64,
}

/// Upper bound on encoded output size for a geometry/mode/quality triple.
///
/// Monotonic in pixel count, in chroma sample count, and in quality. The
/// planner compares this bound against `max_alloc`; the orchestrator's
/// post-encode check catches the cases where the real codec beats the model
/// in the wrong direction.
pub fn estimate_encoded_size(
    width: u32,
    height: u32,
    mode: ChromaSampling,
    quality: u8,
) -> u64 {
    let samples = mode.total_samples(width, height);
    let millibits_per_sample =
        PAYLOAD_MILLIBITS_BASE + PAYLOAD_MILLIBITS_PER_QUALITY * quality as u64;
    // millibits -> bytes, rounding up.
    let payload = (samples * millibits_per_sample).div_ceil(8000);
    CONTAINER_OVERHEAD + payload
}

/// Decide output geometry and chroma mode for a compression request.
///
/// Resolution order:
///
/// 1. `Auto` axes inherit from the source, scaling the unset axis
///    proportionally when only one axis is explicit
/// 2. The result is clamped to `max_width`/`max_height` preserving aspect
/// 3. Starting from `requested`, chroma modes are tried coarsest-last; when
///    none fits the budget at the current geometry, the geometry shrinks by
///    a fixed ratio and the ladder restarts from `requested`
///
/// The first fitting (geometry, mode) pair wins. Shrinking is monotonic and
/// bottoms out at 1x1; if even 1x1 monochrome exceeds the budget the request
/// is unsatisfiable.
///
/// # Errors
///
/// [`PlanError::Geometry`] for zero source dimensions, an explicit zero
/// target dimension, or zero ceilings; [`PlanError::InfeasibleBudget`] when
/// no combination fits `max_alloc`.
pub fn plan_geometry(
    source_width: u32,
    source_height: u32,
    target: &Target,
    requested: ChromaSampling,
) -> Result<PlannedGeometry, PlanError> {
    if source_width == 0 || source_height == 0 {
        return Err(PlanError::Geometry(format!(
            "source is {source_width}x{source_height}"
        )));
    }
    if target.max_width == 0 || target.max_height == 0 {
        return Err(PlanError::Geometry(format!(
            "dimension ceiling is {}x{}",
            target.max_width, target.max_height
        )));
    }

    let (resolved_w, resolved_h) = resolve_requested(source_width, source_height, target)?;
    let (base_w, base_h) =
        clamp_to_ceiling(resolved_w, resolved_h, target.max_width, target.max_height);

    let mut step = 0u32;
    loop {
        let (w, h) = shrink(base_w, base_h, step);

        let mut mode = requested;
        loop {
            let estimated_size = estimate_encoded_size(w, h, mode, target.quality);
            if estimated_size <= target.max_alloc {
                return Ok(PlannedGeometry {
                    width: w,
                    height: h,
                    chroma: mode,
                    estimated_size,
                });
            }
            match mode.next_coarser() {
                Some(next) => mode = next,
                None => break,
            }
        }

        if w == 1 && h == 1 {
            return Err(PlanError::InfeasibleBudget {
                max_alloc: target.max_alloc,
            });
        }
        step += 1;
    }
}

/// Substitute source dimensions for `Auto` axes.
///
/// With one explicit axis the other scales proportionally, rounding to the
/// nearest integer with a floor of 1.
fn resolve_requested(
    source_width: u32,
    source_height: u32,
    target: &Target,
) -> Result<(u32, u32), PlanError> {
    let explicit = |dim: Dimension| -> Result<Option<u32>, PlanError> {
        match dim {
            Dimension::Auto => Ok(None),
            Dimension::Explicit(0) => {
                Err(PlanError::Geometry("explicit target dimension is zero".into()))
            }
            Dimension::Explicit(px) => Ok(Some(px)),
        }
    };

    Ok(match (explicit(target.width)?, explicit(target.height)?) {
        (None, None) => (source_width, source_height),
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scale_axis(source_height, w, source_width)),
        (None, Some(h)) => (scale_axis(source_width, h, source_height), h),
    })
}

/// `other * explicit / reference`, rounded to nearest, floored at 1.
fn scale_axis(other: u32, explicit: u32, reference: u32) -> u32 {
    let scaled = (other as u64 * explicit as u64 + reference as u64 / 2) / reference as u64;
    scaled.clamp(1, u32::MAX as u64) as u32
}

/// Clamp to the ceiling while preserving aspect ratio.
///
/// The binding axis lands on its ceiling exactly; the other axis rounds
/// down with a floor of 1. Integer arithmetic, so no float drift can push
/// the binding axis past its ceiling.
fn clamp_to_ceiling(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    // Which axis hits its ceiling first: compare width/max_width against
    // height/max_height via cross-multiplication.
    let width_binds =
        width as u64 * max_height as u64 >= height as u64 * max_width as u64;
    if width_binds {
        let scaled_h = (height as u64 * max_width as u64 / width as u64).max(1) as u32;
        (max_width, scaled_h)
    } else {
        let scaled_w = (width as u64 * max_height as u64 / height as u64).max(1) as u32;
        (scaled_w, max_height)
    }
}

/// Geometry after `step` cumulative shrink applications.
///
/// Both axes scale by the same factor, so aspect drift stays within the
/// rounding of a single floor per axis.
fn shrink(base_width: u32, base_height: u32, step: u32) -> (u32, u32) {
    if step == 0 {
        return (base_width, base_height);
    }
    let factor = GEOMETRY_SHRINK_FACTOR.powi(step as i32);
    let w = ((base_width as f64 * factor).floor() as u32).max(1);
    let h = ((base_height as f64 * factor).floor() as u32).max(1);
    (w, h)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
