mod api;
mod storage;

pub use api::SavedViewsEngine;
pub use storage::{BrowserClock, BrowserStorage};

use wasm_bindgen::prelude::*;

/// Initialize panic hook and route core `tracing` events to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // a second init keeps the subscriber already installed
    let _ = tracing_wasm::try_set_as_global_default();
}
