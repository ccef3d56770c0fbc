//! Pointer overlay driver: smoothed cursor, decaying trail and click
//! bursts, rendered on their own canvas above the page content. The
//! whole subsystem is skipped on narrow viewports.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent};

use crate::engine::cursor::{
    prune_batches, sample_burst, spawn_burst, BurstBatch, Spring, TrailBuffer,
};
use crate::engine::intensity::{EffectProfile, Intensity};
use crate::engine::palette::NEON;
use crate::engine::rng::JsRandom;

use super::schedule::{EventListener, FrameLoop};

/// Same interactive set the sound system watches.
const INTERACTIVE: &str = "button, a, [role=\"button\"]";

struct PointerState {
    spring_x: Spring,
    spring_y: Spring,
    trail: TrailBuffer,
    bursts: Vec<BurstBatch>,
    hovering: bool,
    last_ts: Option<f64>,
}

pub struct PointerFx {
    _loop: FrameLoop,
    _listeners: Vec<EventListener>,
}

impl PointerFx {
    pub fn start(document: &Document, profile: &EffectProfile) -> Result<PointerFx, JsValue> {
        let canvas = document
            .get_element_by_id("fx-canvas")
            .ok_or("fx-canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or("2d canvas not supported")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let win = window().ok_or("no window")?;
        let w = win.inner_width()?.as_f64().ok_or("bad innerWidth")?;
        let h = win.inner_height()?.as_f64().ok_or("bad innerHeight")?;
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);

        let state = Rc::new(RefCell::new(PointerState {
            spring_x: Spring::new(w / 2.0),
            spring_y: Spring::new(h / 2.0),
            trail: TrailBuffer::new(profile.trail_count),
            bursts: Vec::new(),
            hovering: false,
            last_ts: None,
        }));

        let mut listeners = Vec::new();

        let move_state = state.clone();
        listeners.push(EventListener::new(document, "mousemove", move |evt| {
            if let Some(evt) = evt.dyn_ref::<MouseEvent>() {
                let (x, y) = (evt.client_x() as f64, evt.client_y() as f64);
                let mut s = move_state.borrow_mut();
                s.spring_x.target = x;
                s.spring_y.target = y;
                s.trail.push(x, y);
            }
        })?);

        let burst_count = profile.intensity.burst_count();
        let click_state = state.clone();
        listeners.push(EventListener::new(document, "click", move |evt| {
            if let Some(evt) = evt.dyn_ref::<MouseEvent>() {
                let now = window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or(0.0);
                let particles = spawn_burst(
                    evt.client_x() as f64,
                    evt.client_y() as f64,
                    burst_count,
                    NEON.len(),
                    &mut JsRandom,
                );
                click_state.borrow_mut().bursts.push(BurstBatch {
                    particles,
                    spawned_at_ms: now,
                });
            }
        })?);

        // Hover swap on interactive elements.
        if let Ok(nodes) = document.query_selector_all(INTERACTIVE) {
            for i in 0..nodes.length() {
                let el = match nodes.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
                    Some(el) => el,
                    None => continue,
                };
                let enter_state = state.clone();
                if let Ok(l) = EventListener::new(&el, "mouseenter", move |_| {
                    enter_state.borrow_mut().hovering = true;
                }) {
                    listeners.push(l);
                }
                let leave_state = state.clone();
                if let Ok(l) = EventListener::new(&el, "mouseleave", move |_| {
                    leave_state.borrow_mut().hovering = false;
                }) {
                    listeners.push(l);
                }
            }
        }

        let resize_canvas = canvas.clone();
        listeners.push(EventListener::new(win.as_ref(), "resize", move |_| {
            if let Some(w) = window() {
                if let (Ok(iw), Ok(ih)) = (w.inner_width(), w.inner_height()) {
                    if let (Some(iw), Some(ih)) = (iw.as_f64(), ih.as_f64()) {
                        resize_canvas.set_width(iw as u32);
                        resize_canvas.set_height(ih as u32);
                    }
                }
            }
        })?);

        let intensity = profile.intensity;
        let frame_state = state;
        let frame_loop = FrameLoop::start(move |ts| {
            let mut s = frame_state.borrow_mut();
            let dt = match s.last_ts.replace(ts) {
                Some(last) => ((ts - last) / 1000.0).max(0.0),
                None => 1.0 / 60.0,
            };
            s.spring_x.step(dt);
            s.spring_y.step(dt);
            prune_batches(&mut s.bursts, ts);
            draw(&ctx, &canvas, &s, intensity, ts);
        })?;

        log::info!("pointer effects online");
        Ok(PointerFx {
            _loop: frame_loop,
            _listeners: listeners,
        })
    }
}

fn draw(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    s: &PointerState,
    intensity: Intensity,
    now_ms: f64,
) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, w, h);

    let size = intensity.cursor_size();
    let blur = intensity.cursor_blur();
    let base_opacity = intensity.cursor_opacity();

    // Trail, oldest last so the newest point draws on top.
    for (i, point) in s.trail.iter().enumerate().rev() {
        let style = s.trail.style_at(i, base_opacity, NEON.len());
        let color = NEON[style.color_index];
        ctx.set_global_alpha(style.opacity.clamp(0.0, 1.0));
        ctx.set_fill_style_str(color);
        ctx.set_shadow_color(color);
        ctx.set_shadow_blur(blur * style.scale);
        ctx.begin_path();
        if ctx
            .arc(point.x, point.y, (size * style.scale / 2.0).max(0.1), 0.0, TAU)
            .is_ok()
        {
            ctx.fill();
        }
    }

    // Burst particles, 8px discs flying outward.
    for batch in &s.bursts {
        let age = now_ms - batch.spawned_at_ms;
        for p in &batch.particles {
            let frame = sample_burst(p, age);
            if frame.opacity <= 0.0 {
                continue;
            }
            let color = NEON[p.color_index];
            ctx.set_global_alpha(frame.opacity);
            ctx.set_fill_style_str(color);
            ctx.set_shadow_color(color);
            ctx.set_shadow_blur(10.0);
            ctx.begin_path();
            if ctx
                .arc(frame.x, frame.y, (4.0 * frame.scale).max(0.1), 0.0, TAU)
                .is_ok()
            {
                ctx.fill();
            }
        }
    }

    // Main cursor ring; hover swaps color and grows it 1.5x.
    let (color, scale, glow) = if s.hovering {
        (NEON[1], 1.5, blur * 2.0)
    } else {
        (NEON[0], 1.0, blur)
    };
    let radius = size * scale / 2.0;
    let (cx, cy) = (s.spring_x.position, s.spring_y.position);
    ctx.set_global_alpha(1.0);
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(2.0);
    ctx.set_shadow_color(color);
    ctx.set_shadow_blur(glow);
    ctx.begin_path();
    if ctx.arc(cx, cy, radius, 0.0, TAU).is_ok() {
        ctx.stroke();
    }
    // Soft inner disc.
    ctx.set_global_alpha(base_opacity * 0.5);
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    if ctx.arc(cx, cy, (radius - 3.0).max(1.0), 0.0, TAU).is_ok() {
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
}
