#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn effect_canvases_exist() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();

    for id in ["bg-canvas", "fx-canvas"] {
        let elem = document
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("{id} not found"));
        assert!(elem.dyn_ref::<web_sys::HtmlCanvasElement>().is_some());
    }
}

#[wasm_bindgen_test]
fn loading_overlay_has_its_parts() {
    let document = web_sys::window().unwrap().document().unwrap();
    for id in ["loading", "loading-bar", "loading-status", "loading-percent"] {
        assert!(
            document.get_element_by_id(id).is_some(),
            "missing #{id} in the shell"
        );
    }
}

#[wasm_bindgen_test]
fn sound_triggers_on_an_unregistered_bus_are_silent_no_ops() {
    // Before a synthesizer registers (or when Web Audio is missing
    // entirely and nothing ever registers) every trigger must return
    // cleanly rather than throw.
    let bus = fx_wasm::SoundBus::new();
    bus.click();
    bus.hover();
    bus.ambient_glitch();
}

#[wasm_bindgen_test]
fn glitch_targets_are_declared() {
    let document = web_sys::window().unwrap().document().unwrap();
    let nodes = document.query_selector_all("[data-glitch]").unwrap();
    assert!(nodes.length() > 0);
}
