#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

// Pure engine logic builds on every target so `cargo test` exercises it
// on the host; the browser drivers below are wasm-only.

pub mod engine;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod app;
    mod background;
    mod glitch_text;
    mod loading_screen;
    mod pointer;
    mod schedule;
    mod synth;

    pub use synth::SoundBus;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        app::boot()
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::SoundBus;

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
