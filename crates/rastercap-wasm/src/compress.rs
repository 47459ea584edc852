//! Compression WASM bindings.
//!
//! This module exposes the rastercap-core orchestrator to JavaScript. The
//! whole pipeline runs synchronously inside the WASM call; callers that
//! need a responsive UI should invoke it from a Web Worker.

use js_sys::Uint8Array;
use rastercap_core::{plan_geometry, ChromaSampling};
use wasm_bindgen::prelude::*;

use crate::types::JsTarget;

/// Compress encoded image bytes under the target's budget.
///
/// Decodes the input (format guessed from the bytes), plans output geometry
/// and chroma mode within `max_alloc` and the dimension ceilings, resamples,
/// and encodes once. The returned byte length never exceeds the target's
/// `max_alloc`.
///
/// # Errors
///
/// Throws when the input is not a decodable image, when no geometry fits the
/// budget, or when encoding fails. No partial output is ever returned.
///
/// # Example
///
/// ```typescript
/// const target = new JsTarget(0, 0, 1, 80, 50_000n, 1920, 1080);
/// const compressed = compress_image(bytes, target);
/// console.log(`Compressed to ${compressed.byteLength} bytes`);
/// ```
#[wasm_bindgen]
pub fn compress_image(original_image: Uint8Array, target: &JsTarget) -> Result<Uint8Array, JsValue> {
    let input = original_image.to_vec();
    let output = rastercap_core::compress(&input, target.as_target())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Uint8Array::from(output.as_slice()))
}

/// Dry-run the budget planner for a source of the given dimensions.
///
/// Returns the planned geometry as a plain JS object
/// (`{ width, height, chroma, estimated_size }`) without decoding or
/// encoding any pixels. Lets a UI show the admission decision - including
/// the chroma downgrade - before paying for the real compression.
#[wasm_bindgen]
pub fn plan_preview(
    source_width: u32,
    source_height: u32,
    target: &JsTarget,
) -> Result<JsValue, JsValue> {
    let planned = plan_geometry(
        source_width,
        source_height,
        target.as_target(),
        ChromaSampling::Full,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&planned).map_err(|e| JsValue::from_str(&e.to_string()))
}
