//! Rastercap WASM - WebAssembly bindings for Rastercap
//!
//! This crate exposes the rastercap-core compression pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for the compression target
//! - `compress` - The compression entry point and planner preview
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsTarget, compress_image } from '@rastercap/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const target = new JsTarget(0, 0, 1, 80, 50_000n, 1920, 1080);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const compressed = compress_image(bytes, target);
//! target.free();
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

// Re-export public bindings
pub use compress::{compress_image, plan_preview};
pub use types::JsTarget;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
