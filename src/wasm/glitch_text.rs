//! DOM driver for the text corruption engine. Scans the page for
//! `[data-glitch]` elements, wraps each in a three-layer stack, and
//! ticks an independent [`GlitchState`] per element.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::engine::glitch::{GlitchIntensity, GlitchSpeed, GlitchState};
use crate::engine::palette::GLITCH;
use crate::engine::rng::JsRandom;

use super::schedule::{Interval, Timeout};
use super::synth::SoundBus;

pub struct GlitchTexts {
    _instances: Vec<GlitchTextInstance>,
}

impl GlitchTexts {
    /// Attach an independent corruption instance to every
    /// `[data-glitch]` element in the document.
    pub fn attach_all(document: &Document, bus: SoundBus) -> Result<GlitchTexts, JsValue> {
        let mut instances = Vec::new();
        let nodes = document.query_selector_all("[data-glitch]")?;
        for i in 0..nodes.length() {
            let el = match nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                Some(el) => el,
                None => continue,
            };
            match GlitchTextInstance::attach(document, &el, bus.clone()) {
                Ok(instance) => instances.push(instance),
                Err(e) => log::warn!("glitch text skipped: {:?}", e),
            }
        }
        log::info!("{} glitch text instances attached", instances.len());
        Ok(GlitchTexts {
            _instances: instances,
        })
    }
}

struct Inner {
    state: GlitchState,
    root: Element,
    main: HtmlElement,
    layers: [HtmlElement; 2],
    bus: SoundBus,
    intensity: GlitchIntensity,
}

struct GlitchTextInstance {
    _tick: Interval,
    // Held here, not in Inner, so no reference cycle forms between the
    // pending revert and the shared state it mutates.
    _revert: Rc<RefCell<Option<Timeout>>>,
    _shared: Rc<RefCell<Inner>>,
}

impl GlitchTextInstance {
    fn attach(document: &Document, el: &Element, bus: SoundBus) -> Result<Self, JsValue> {
        let source = el.text_content().unwrap_or_default();
        let intensity = el
            .get_attribute("data-glitch-intensity")
            .and_then(|s| GlitchIntensity::parse(&s))
            .unwrap_or(GlitchIntensity::Medium);
        let speed = el
            .get_attribute("data-glitch-speed")
            .and_then(|s| GlitchSpeed::parse(&s))
            .unwrap_or(GlitchSpeed::Normal);

        // Rebuild the element as main text plus two offset echo layers.
        el.set_text_content(None);
        el.class_list().add_1("fx-glitch")?;
        let main = make_span(document, "fx-glitch-main")?;
        main.set_text_content(Some(&source));
        el.append_child(&main)?;
        let layer_a = make_span(document, "fx-glitch-layer fx-glitch-layer-a")?;
        let layer_b = make_span(document, "fx-glitch-layer fx-glitch-layer-b")?;
        layer_a.style().set_property("color", GLITCH[1])?;
        layer_b.style().set_property("color", GLITCH[2])?;
        el.append_child(&layer_a)?;
        el.append_child(&layer_b)?;

        let shared = Rc::new(RefCell::new(Inner {
            state: GlitchState::new(source, intensity),
            root: el.clone(),
            main,
            layers: [layer_a, layer_b],
            bus,
            intensity,
        }));
        let revert: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

        let tick_shared = shared.clone();
        let tick_revert = revert.clone();
        let tick = Interval::new(speed.tick_ms(), move || {
            let active = match tick_shared.borrow_mut().state.tick(&mut JsRandom) {
                Some(a) => a,
                None => return,
            };
            {
                let inner = tick_shared.borrow();
                inner.show_glitch(&active.text);
                if inner.intensity == GlitchIntensity::High {
                    inner.bus.ambient_glitch();
                }
            }
            let revert_shared = tick_shared.clone();
            let timeout = Timeout::new(active.duration_ms as u32, move || {
                let mut inner = revert_shared.borrow_mut();
                inner.state.revert();
                inner.hide_glitch();
            });
            match timeout {
                Ok(t) => *tick_revert.borrow_mut() = Some(t),
                Err(e) => {
                    // No revert timer means the corruption would stick;
                    // undo it immediately instead.
                    log::warn!("glitch revert timer failed: {:?}", e);
                    let mut inner = tick_shared.borrow_mut();
                    inner.state.revert();
                    inner.hide_glitch();
                }
            }
        })?;

        Ok(GlitchTextInstance {
            _tick: tick,
            _revert: revert,
            _shared: shared,
        })
    }
}

impl Inner {
    fn show_glitch(&self, corrupted: &str) {
        self.main.set_text_content(Some(corrupted));
        for layer in &self.layers {
            layer.set_text_content(Some(corrupted));
        }
        let offset = self.intensity.max_offset();
        let _ = self
            .root
            .dyn_ref::<HtmlElement>()
            .map(|r| r.style().set_property("--glitch-offset", &format!("{offset}px")));
        let _ = self.root.class_list().add_1("glitching");
    }

    fn hide_glitch(&self) {
        let source = self.state.displayed().to_string();
        self.main.set_text_content(Some(&source));
        let _ = self.root.class_list().remove_1("glitching");
    }
}

fn make_span(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let span = document.create_element("span")?;
    span.set_attribute("class", class)?;
    span.dyn_into::<HtmlElement>().map_err(|_| "span is not an HtmlElement".into())
}
