//! WASM-compatible wrapper for the compression target.
//!
//! JavaScript supplies the seven wire-level fields; the wrapper owns the
//! validated core [`Target`] and hands it to the pipeline by reference.

use rastercap_core::Target;
use wasm_bindgen::prelude::*;

/// A compression target for JavaScript callers.
///
/// All seven fields are supplied at construction and the value is immutable
/// afterwards. `width`/`height` of `0` mean "preserve the source dimension".
/// The filter id is validated in the constructor, so an invalid request
/// fails before any pixel buffer is allocated.
///
/// # Memory Management
///
/// The target lives in WASM memory. The `free()` method can be called to
/// explicitly release it, but this is optional as wasm-bindgen's finalizer
/// will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsTarget {
    inner: Target,
}

#[wasm_bindgen]
impl JsTarget {
    /// Create a new target.
    ///
    /// # Arguments
    /// * `width` - Requested output width in pixels, 0 = preserve source
    /// * `height` - Requested output height in pixels, 0 = preserve source
    /// * `filter` - Kernel id: 0 nearest, 1 triangle, 2 Catmull-Rom,
    ///   3 Gaussian, 4 Lanczos3
    /// * `quality` - Encoder quality 1-100 (clamped)
    /// * `max_alloc` - Maximum encoded artifact size in bytes
    /// * `max_width` - Absolute output width ceiling in pixels
    /// * `max_height` - Absolute output height ceiling in pixels
    ///
    /// # Errors
    ///
    /// Throws when `filter` is not one of the defined kernel ids.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: u32,
        height: u32,
        filter: u8,
        quality: u8,
        max_alloc: u64,
        max_width: u32,
        max_height: u32,
    ) -> Result<JsTarget, JsValue> {
        let inner = Target::from_raw(
            width, height, filter, quality, max_alloc, max_width, max_height,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsTarget { inner })
    }

    /// The maximum encoded artifact size in bytes.
    #[wasm_bindgen(getter)]
    pub fn max_alloc(&self) -> u64 {
        self.inner.max_alloc
    }

    /// The effective quality after clamping.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsTarget {
    /// Borrow the validated core target.
    pub(crate) fn as_target(&self) -> &Target {
        &self.inner
    }
}
