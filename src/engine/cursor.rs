//! Cursor smoothing, the bounded trail, and click bursts.

use std::collections::VecDeque;

use crate::engine::rng::RandomSource;

/// Spring constants matching the cursor's critically-damped feel.
pub const SPRING_DAMPING: f64 = 25.0;
pub const SPRING_STIFFNESS: f64 = 700.0;

/// Burst batches live exactly this long, then vanish as a whole.
pub const BURST_LIFETIME_MS: f64 = 1000.0;

/// One smoothed scalar chasing a moving target.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
}

impl Spring {
    pub fn new(position: f64) -> Self {
        Spring {
            position,
            velocity: 0.0,
            target: position,
        }
    }

    /// Semi-implicit Euler step. `dt` is in seconds and is clamped so a
    /// background-tab frame gap cannot explode the integration.
    pub fn step(&mut self, dt: f64) {
        let dt = dt.min(0.05);
        let accel = SPRING_STIFFNESS * (self.target - self.position) - SPRING_DAMPING * self.velocity;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
}

/// Style for one rendered trail point, decaying with its index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailStyle {
    pub scale: f64,
    pub opacity: f64,
    pub color_index: usize,
}

/// Bounded most-recent-first history of pointer positions. Pushing past
/// the cap evicts the oldest point; the cap is never exceeded.
#[derive(Debug)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    cap: usize,
}

impl TrailBuffer {
    pub fn new(cap: usize) -> Self {
        TrailBuffer {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push_front(TrailPoint { x, y });
        self.points.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Most-recent-first iteration.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TrailPoint> + ExactSizeIterator {
        self.points.iter()
    }

    /// Newest point gets full scale/opacity; the decay is linear in the
    /// index so the oldest point fades to near zero.
    pub fn style_at(&self, index: usize, base_opacity: f64, palette_len: usize) -> TrailStyle {
        let frac = index as f64 / self.cap as f64;
        TrailStyle {
            scale: 1.0 - frac * 0.8,
            opacity: base_opacity * (1.0 - frac) * 0.7,
            color_index: index % palette_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurstParticle {
    pub origin_x: f64,
    pub origin_y: f64,
    pub angle_deg: f64,
    pub speed: f64,
    pub color_index: usize,
}

/// Instantaneous render state of a burst particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstFrame {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub opacity: f64,
}

/// Spawn one click batch: `count` particles at equal angular spacing
/// with random speed in `[50, 100)`.
pub fn spawn_burst(
    x: f64,
    y: f64,
    count: usize,
    palette_len: usize,
    rng: &mut dyn RandomSource,
) -> Vec<BurstParticle> {
    (0..count)
        .map(|i| BurstParticle {
            origin_x: x,
            origin_y: y,
            angle_deg: 360.0 / count as f64 * i as f64,
            speed: rng.range(50.0, 100.0),
            color_index: i % palette_len,
        })
        .collect()
}

/// Cubic ease-out over `[0, 1]`.
pub fn ease_out(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Sample a burst particle `age_ms` after its click: it flies outward
/// along its angle while shrinking and fading over the 1 s lifetime.
pub fn sample_burst(p: &BurstParticle, age_ms: f64) -> BurstFrame {
    let t = (age_ms / BURST_LIFETIME_MS).clamp(0.0, 1.0);
    let eased = ease_out(t);
    let rad = p.angle_deg.to_radians();
    BurstFrame {
        x: p.origin_x + rad.cos() * p.speed * eased,
        y: p.origin_y + rad.sin() * p.speed * eased,
        scale: 1.0 - eased,
        opacity: 1.0 - eased,
    }
}

/// A click batch plus its spawn timestamp. The render loop prunes whole
/// batches once their lifetime elapses; batches never shrink partially.
#[derive(Debug)]
pub struct BurstBatch {
    pub particles: Vec<BurstParticle>,
    pub spawned_at_ms: f64,
}

impl BurstBatch {
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_at_ms >= BURST_LIFETIME_MS
    }
}

/// Drop every batch whose lifetime has elapsed.
pub fn prune_batches(batches: &mut Vec<BurstBatch>, now_ms: f64) {
    batches.retain(|b| !b.expired(now_ms));
}
