//! Loading overlay driver. Ticks the pure sequencer every 200 ms,
//! mirrors it into the overlay DOM, and fires the completion callback
//! exactly once, one second after progress clamps at 100.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use crate::engine::loading::{
    LoadingSequencer, COMPLETE_GRACE_MS, FLASH_MS, STATUS_LINES, TICK_MS,
};
use crate::engine::rng::JsRandom;

use super::schedule::{Interval, Timeout};

pub struct LoadingScreen {
    _tick: Rc<RefCell<Option<Interval>>>,
    _flash: Rc<RefCell<Option<Timeout>>>,
    _grace: Rc<RefCell<Option<Timeout>>>,
}

impl LoadingScreen {
    pub fn run(
        document: &Document,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<LoadingScreen, JsValue> {
        let overlay = element(document, "loading")?;
        let bar = element(document, "loading-bar")?;
        let status = element(document, "loading-status")?;
        let percent = element(document, "loading-percent")?;

        let mut seq = LoadingSequencer::new();
        let on_complete: Rc<RefCell<Option<Box<dyn FnOnce()>>>> =
            Rc::new(RefCell::new(Some(Box::new(on_complete))));

        let tick_slot: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
        let flash_slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        let grace_slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

        // Weak: the tick closure lives inside the interval this slot
        // owns, so a strong handle would form a cycle.
        let tick_slot_for_grace = Rc::downgrade(&tick_slot);
        let flash_slot_for_tick = flash_slot.clone();
        let grace_slot_for_tick = grace_slot.clone();
        let interval = Interval::new(TICK_MS, move || {
            // Post-clamp ticks return None, so a stray tick during the
            // grace window cannot advance anything or re-fire.
            let tick = match seq.tick(&mut JsRandom) {
                Some(t) => t,
                None => return,
            };

            let _ = bar
                .style()
                .set_property("width", &format!("{:.1}%", tick.progress));
            percent.set_text_content(Some(&format!("{}%", tick.progress.round() as u32)));
            status.set_text_content(Some(STATUS_LINES[tick.status_index]));

            if tick.flash {
                let _ = overlay.class_list().add_1("flash");
                let flash_overlay = overlay.clone();
                if let Ok(t) = Timeout::new(FLASH_MS, move || {
                    let _ = flash_overlay.class_list().remove_1("flash");
                }) {
                    *flash_slot_for_tick.borrow_mut() = Some(t);
                }
            }

            if tick.finished {
                let done_overlay = overlay.clone();
                let done_tick = tick_slot_for_grace.clone();
                let done_cb = on_complete.clone();
                let grace = Timeout::new(COMPLETE_GRACE_MS, move || {
                    // Release the interval here rather than inside its
                    // own callback.
                    if let Some(slot) = done_tick.upgrade() {
                        slot.borrow_mut().take();
                    }
                    let _ = done_overlay.class_list().add_1("hidden");
                    if let Some(cb) = done_cb.borrow_mut().take() {
                        cb();
                    }
                });
                match grace {
                    Ok(t) => *grace_slot_for_tick.borrow_mut() = Some(t),
                    Err(e) => log::warn!("loading completion timer failed: {:?}", e),
                }
            }
        })?;
        *tick_slot.borrow_mut() = Some(interval);

        log::info!("loading sequencer running");
        Ok(LoadingScreen {
            _tick: tick_slot,
            _flash: flash_slot,
            _grace: grace_slot,
        })
    }
}

fn element(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HtmlElement")))
}
