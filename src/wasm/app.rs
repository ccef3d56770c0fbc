//! Composition root: runs the loading sequence, derives the effect
//! profile from the viewport, and wires the subsystems together. The
//! running pieces are parked in a thread-local so teardown stays
//! possible (drop the `App` and every timer, listener and audio context
//! goes with it).

use std::cell::RefCell;

use wasm_bindgen::JsValue;
use web_sys::{window, Document};

use crate::engine::intensity::EffectProfile;

use super::background::Background;
use super::glitch_text::GlitchTexts;
use super::loading_screen::LoadingScreen;
use super::pointer::PointerFx;
use super::synth::{SoundBus, SoundSystem};

struct Engine {
    _background: Background,
    _pointer: Option<PointerFx>,
    _sound: Option<SoundSystem>,
}

#[derive(Default)]
struct App {
    texts: Option<GlitchTexts>,
    loader: Option<LoadingScreen>,
    engine: Option<Engine>,
}

thread_local! {
    static APP: RefCell<App> = RefCell::new(App::default());
}

pub fn boot() -> Result<(), JsValue> {
    let window = window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let bus = SoundBus::new();

    // Glitch texts run during the loading screen too; their sound
    // triggers no-op until the synthesizer registers on the bus.
    let texts = GlitchTexts::attach_all(&document, bus.clone())?;

    let complete_document = document.clone();
    let loader = LoadingScreen::run(&document, move || {
        match start_engine(&complete_document, bus) {
            Ok(engine) => APP.with(|app| app.borrow_mut().engine = Some(engine)),
            Err(e) => log::warn!("effects engine failed to start: {:?}", e),
        }
    })?;

    APP.with(|app| {
        let mut app = app.borrow_mut();
        app.texts = Some(texts);
        app.loader = Some(loader);
    });
    Ok(())
}

fn start_engine(document: &Document, bus: SoundBus) -> Result<Engine, JsValue> {
    let width = window()
        .ok_or("no window")?
        .inner_width()?
        .as_f64()
        .ok_or("bad innerWidth")?;
    let profile = EffectProfile::for_viewport(width);
    log::info!(
        "starting effects engine: {:?} at {width}px",
        profile.intensity
    );

    let background = Background::start(document, &profile)?;
    let pointer = if profile.pointer_effects {
        Some(PointerFx::start(document, &profile)?)
    } else {
        None
    };
    let sound = if profile.audio {
        Some(SoundSystem::start(document, bus, profile.audio_volume))
    } else {
        None
    };

    Ok(Engine {
        _background: background,
        _pointer: pointer,
        _sound: sound,
    })
}
