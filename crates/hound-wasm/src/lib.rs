//! WASM bindings for the hound search page.

use wasm_bindgen::prelude::*;

mod bindings;
mod globals;
mod utils;

pub use bindings::*;

#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

/// Number of repositories known to the excluded files page.
#[wasm_bindgen]
pub fn repo_count() -> u32 {
    globals::with_repos(|repos| repos.len() as u32)
}
