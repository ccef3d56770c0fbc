//! Background canvas driver: ambient particle field, optional matrix
//! rain, the animated grid, sweeping scanlines, pulsing corner brackets
//! and the occasional full-screen glitch flash. One full-viewport 2D
//! canvas redrawn per animation frame.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::engine::intensity::EffectProfile;
use crate::engine::palette::NEON;
use crate::engine::particles::{sample, spawn_field, spawn_matrix, MatrixColumn, Particle};
use crate::engine::rng::{JsRandom, RandomSource};

use super::schedule::{EventListener, FrameLoop};

const GRID_SPACING: f64 = 60.0;
const GRID_SCROLL_SECS: f64 = 20.0;
const SCANLINE_COUNT: usize = 3;
const CORNER_SIZE: f64 = 16.0;
const CORNER_PULSE_SECS: f64 = 2.0;

pub struct Background {
    _loop: FrameLoop,
    _resize: EventListener,
}

impl Background {
    pub fn start(document: &Document, profile: &EffectProfile) -> Result<Background, JsValue> {
        let canvas = document
            .get_element_by_id("bg-canvas")
            .ok_or("bg-canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or("2d canvas not supported")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (w, h) = viewport()?;
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);

        // Seeded once per session; a mid-session resize must not reshuffle
        // the field, so the resize handler only touches the backing size.
        let mut rng = JsRandom;
        let particles = if profile.show_particles {
            spawn_field(profile.intensity.particle_count(), w, h, NEON.len(), &mut rng)
        } else {
            Vec::new()
        };
        let matrix = if profile.show_matrix_rain {
            spawn_matrix(profile.intensity.matrix_columns(), w, NEON.len(), &mut rng)
        } else {
            Vec::new()
        };

        let resize_canvas = canvas.clone();
        let resize = EventListener::new(
            window().ok_or("no window")?.as_ref(),
            "resize",
            move |_| {
                if let Ok((w, h)) = viewport() {
                    resize_canvas.set_width(w as u32);
                    resize_canvas.set_height(h as u32);
                }
            },
        )?;

        let mut painter = Painter {
            ctx,
            canvas,
            particles,
            matrix,
            rng: JsRandom,
            opacity: profile.intensity.field_opacity(),
            show_grid: profile.show_grid,
            show_scanlines: profile.show_scanlines,
            start_ts: None,
            next_flash_secs: 0.0,
        };
        let frame_loop = FrameLoop::start(move |ts| painter.frame(ts))?;

        log::info!("background field online");
        Ok(Background {
            _loop: frame_loop,
            _resize: resize,
        })
    }
}

fn viewport() -> Result<(f64, f64), JsValue> {
    let w = window().ok_or("no window")?;
    let width = w.inner_width()?.as_f64().ok_or("bad innerWidth")?;
    let height = w.inner_height()?.as_f64().ok_or("bad innerHeight")?;
    Ok((width, height))
}

struct Painter {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    particles: Vec<Particle>,
    matrix: Vec<MatrixColumn>,
    rng: JsRandom,
    opacity: f64,
    show_grid: bool,
    show_scanlines: bool,
    start_ts: Option<f64>,
    next_flash_secs: f64,
}

impl Painter {
    fn frame(&mut self, ts: f64) {
        let t0 = *self.start_ts.get_or_insert(ts);
        let t = (ts - t0) / 1000.0;
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;

        self.ctx.clear_rect(0.0, 0.0, w, h);

        if self.show_grid {
            self.draw_grid(t, w, h);
        }
        self.draw_particles(t);
        self.draw_matrix(t, h);
        if self.show_scanlines {
            self.draw_scanlines(t, w, h);
        }
        self.draw_corners(t, w, h);
        self.draw_flash(t, w, h);
        self.ctx.set_global_alpha(1.0);
    }

    /// Square grid scrolling one cell every 20 s.
    fn draw_grid(&self, t: f64, w: f64, h: f64) {
        let offset = (t / GRID_SCROLL_SECS).fract() * GRID_SPACING;
        self.ctx.set_global_alpha(self.opacity * 0.6 * 0.27);
        self.ctx.set_stroke_style_str(NEON[1]);
        self.ctx.set_line_width(1.0);
        self.ctx.set_shadow_blur(0.0);
        self.ctx.begin_path();
        let mut x = offset - GRID_SPACING;
        while x <= w {
            self.ctx.move_to(x, 0.0);
            self.ctx.line_to(x, h);
            x += GRID_SPACING;
        }
        let mut y = offset - GRID_SPACING;
        while y <= h {
            self.ctx.move_to(0.0, y);
            self.ctx.line_to(w, y);
            y += GRID_SPACING;
        }
        self.ctx.stroke();
    }

    fn draw_particles(&self, t: f64) {
        for p in &self.particles {
            let frame = sample(p, t, self.opacity);
            let color = NEON[p.color_index];
            self.ctx.set_global_alpha(frame.opacity.clamp(0.0, 1.0));
            self.ctx.set_fill_style_str(color);
            self.ctx.set_shadow_color(color);
            self.ctx.set_shadow_blur(p.size * 3.0);
            self.ctx.begin_path();
            let radius = p.size * frame.scale / 2.0;
            if self
                .ctx
                .arc(frame.x, frame.y, radius.max(0.1), 0.0, TAU)
                .is_ok()
            {
                self.ctx.fill();
            }
        }
    }

    fn draw_matrix(&mut self, t: f64, h: f64) {
        if self.matrix.is_empty() {
            return;
        }
        self.ctx.set_font("bold 14px monospace");
        self.ctx.set_global_alpha(self.opacity);
        for col in &mut self.matrix {
            let y = col.sample_y(t, h, &mut self.rng);
            let color = NEON[col.color_index];
            self.ctx.set_fill_style_str(color);
            self.ctx.set_shadow_color(color);
            self.ctx.set_shadow_blur(10.0);
            let _ = self
                .ctx
                .fill_text(&col.glyph.to_string(), col.x, y);
        }
    }

    /// Three glowing lines sweeping top to bottom on staggered periods.
    fn draw_scanlines(&self, t: f64, w: f64, h: f64) {
        self.ctx.set_global_alpha(self.opacity * 0.8);
        for i in 0..SCANLINE_COUNT {
            let period = 3.0 + i as f64;
            let delay = i as f64;
            let phase = ((t - delay) / period).rem_euclid(1.0);
            let y = -2.0 + phase * (h + 4.0);
            let color = NEON[i % NEON.len()];
            self.ctx.set_fill_style_str(color);
            self.ctx.set_shadow_color(color);
            self.ctx.set_shadow_blur(10.0);
            self.ctx.fill_rect(0.0, y, w, 2.0);
        }
    }

    /// Four corner brackets pulsing on a 2 s cycle, staggered 0.5 s.
    fn draw_corners(&self, t: f64, w: f64, h: f64) {
        let m = 16.0; // margin
        let corners = [
            (m, m, 1.0, 1.0),
            (w - m, m, -1.0, 1.0),
            (m, h - m, 1.0, -1.0),
            (w - m, h - m, -1.0, -1.0),
        ];
        self.ctx.set_line_width(2.0);
        for (i, (x, y, sx, sy)) in corners.iter().enumerate() {
            let phase = ((t - i as f64 * 0.5) / CORNER_PULSE_SECS).rem_euclid(1.0);
            // 0.5 -> 1 -> 0.5 opacity, 1 -> 1.1 -> 1 scale.
            let pulse = 1.0 - (phase * 2.0 - 1.0).abs();
            let alpha = 0.5 + 0.5 * pulse;
            let len = CORNER_SIZE * (1.0 + 0.1 * pulse);
            let color = NEON[i % NEON.len()];
            self.ctx.set_global_alpha(alpha);
            self.ctx.set_stroke_style_str(color);
            self.ctx.set_shadow_color(color);
            self.ctx.set_shadow_blur(10.0);
            self.ctx.begin_path();
            self.ctx.move_to(x + sx * len, *y);
            self.ctx.line_to(*x, *y);
            self.ctx.line_to(*x, y + sy * len);
            self.ctx.stroke();
        }
    }

    /// Rare full-screen interference bands, ~100 ms every 5-15 s.
    fn draw_flash(&mut self, t: f64, w: f64, h: f64) {
        if t >= self.next_flash_secs + 0.1 {
            self.next_flash_secs = t + self.rng.range(5.0, 15.0);
            return;
        }
        if t < self.next_flash_secs {
            return;
        }
        self.ctx.set_global_alpha(0.1);
        self.ctx.set_fill_style_str(NEON[0]);
        self.ctx.set_shadow_blur(0.0);
        let mut y = 100.0;
        while y < h {
            self.ctx.fill_rect(0.0, y, w, 2.0);
            y += 102.0;
        }
    }
}
