//! Cancellable timer and listener handles. Every recurring browser
//! resource the engine takes out is owned by one of these wrappers and
//! released in `Drop`, so dropping a subsystem is its teardown.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, EventTarget};

/// Repeating `setInterval` timer. Cleared on drop.
pub struct Interval {
    id: i32,
    _cb: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(ms: u32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = window()
            .ok_or("no window")?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms as i32,
            )?;
        Ok(Interval { id, _cb: cb })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(w) = window() {
            w.clear_interval_with_handle(self.id);
        }
    }
}

/// One-shot `setTimeout` timer. Clearing an already-fired timeout is
/// benign, so holding a spent handle costs nothing.
pub struct Timeout {
    id: i32,
    _cb: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(ms: u32, f: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = window()
            .ok_or("no window")?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                ms as i32,
            )?;
        Ok(Timeout { id, _cb: cb })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(w) = window() {
            w.clear_timeout_with_handle(self.id);
        }
    }
}

/// DOM event subscription, removed on drop. A failed removal of an
/// already-detached target is ignored.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    cb: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        f: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
        Ok(EventListener {
            target: target.clone(),
            event,
            cb,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.cb.as_ref().unchecked_ref());
    }
}

/// Self-rescheduling `requestAnimationFrame` loop.
///
/// The closure is stored in an `Option` inside an `Rc` so it can obtain
/// a reference to itself when scheduling the next frame; dropping the
/// handle cancels the pending frame and clears the slot, which breaks
/// the cycle.
pub struct FrameLoop {
    raf_id: Rc<RefCell<Option<i32>>>,
    closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    /// Start the loop. `f` receives the frame timestamp in ms.
    pub fn start(mut f: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let raf_id: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
        let closure: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let raf_for_tick = raf_id.clone();
        let closure_for_tick = closure.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            f(ts);
            // A cancelled loop has its id taken; stop rescheduling.
            if raf_for_tick.borrow().is_none() {
                return;
            }
            let next = window().and_then(|w| {
                let slot = closure_for_tick.borrow();
                let cb = slot.as_ref()?;
                w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
            });
            *raf_for_tick.borrow_mut() = next;
        }) as Box<dyn FnMut(f64)>));

        let id = window().ok_or("no window")?.request_animation_frame(
            closure
                .borrow()
                .as_ref()
                .ok_or("frame closure missing")?
                .as_ref()
                .unchecked_ref(),
        )?;
        *raf_id.borrow_mut() = Some(id);

        Ok(FrameLoop { raf_id, closure })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.raf_id.borrow_mut().take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        self.closure.borrow_mut().take();
    }
}
