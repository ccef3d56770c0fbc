//! Text corruption state machine. One instance per glitched text node;
//! instances share nothing. The driver ticks this on a fixed interval
//! and schedules the revert when a corruption activates.

use crate::engine::rng::RandomSource;

/// Substitution alphabet. Spaces are never substituted.
pub const GLITCH_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']', '{', '}', '|',
    ';', ':', ',', '.', '<', '>', '?', '~', '`',
];

/// Per-character substitution probability while a glitch is active.
const CORRUPT_CHANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchIntensity {
    Low,
    Medium,
    High,
}

impl GlitchIntensity {
    /// Probability of entering the active state on a given tick.
    pub fn trigger_chance(self) -> f64 {
        match self {
            GlitchIntensity::Low => 0.1,
            GlitchIntensity::Medium => 0.2,
            GlitchIntensity::High => 0.3,
        }
    }

    /// Maximum layer jitter in px while active.
    pub fn max_offset(self) -> f64 {
        match self {
            GlitchIntensity::Low => 2.0,
            GlitchIntensity::Medium => 4.0,
            GlitchIntensity::High => 8.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(GlitchIntensity::Low),
            "medium" => Some(GlitchIntensity::Medium),
            "high" => Some(GlitchIntensity::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitchSpeed {
    Slow,
    Normal,
    Fast,
}

impl GlitchSpeed {
    pub fn tick_ms(self) -> u32 {
        match self {
            GlitchSpeed::Slow => 200,
            GlitchSpeed::Normal => 100,
            GlitchSpeed::Fast => 50,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "slow" => Some(GlitchSpeed::Slow),
            "normal" => Some(GlitchSpeed::Normal),
            "fast" => Some(GlitchSpeed::Fast),
            _ => None,
        }
    }
}

/// Character-for-character corruption: every non-space character has a
/// 10% chance of being replaced by a symbol from [`GLITCH_CHARS`]. The
/// result always has the same char length as the source.
pub fn corrupt(source: &str, rng: &mut dyn RandomSource) -> String {
    source
        .chars()
        .map(|c| {
            if c != ' ' && rng.chance(CORRUPT_CHANCE) {
                GLITCH_CHARS[rng.index(GLITCH_CHARS.len())]
            } else {
                c
            }
        })
        .collect()
}

/// Outcome of a tick that activated a glitch.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGlitch {
    /// The corrupted copy to display on all layers.
    pub text: String,
    /// How long until the revert, in ms, drawn from `[50, 150)`.
    pub duration_ms: f64,
}

/// Authoritative state for one glitched string.
#[derive(Debug)]
pub struct GlitchState {
    source: String,
    displayed: String,
    active: bool,
    intensity: GlitchIntensity,
}

impl GlitchState {
    pub fn new(source: impl Into<String>, intensity: GlitchIntensity) -> Self {
        let source = source.into();
        GlitchState {
            displayed: source.clone(),
            source,
            active: false,
            intensity,
        }
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// One interval tick. Returns `Some` when this tick activated a
    /// glitch; the caller must arrange for [`revert`](Self::revert) to
    /// run after `duration_ms`. An empty source never activates, and an
    /// already-active instance waits for its revert before re-rolling.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Option<ActiveGlitch> {
        if self.active || self.source.is_empty() {
            return None;
        }
        if !rng.chance(self.intensity.trigger_chance()) {
            return None;
        }
        self.active = true;
        self.displayed = corrupt(&self.source, rng);
        Some(ActiveGlitch {
            text: self.displayed.clone(),
            duration_ms: rng.range(50.0, 150.0),
        })
    }

    /// Atomically restore the source string and leave the active state.
    pub fn revert(&mut self) {
        self.active = false;
        self.displayed = self.source.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRandom;

    #[test]
    fn corruption_preserves_length_and_spaces() {
        let mut rng = SeededRandom::new(3);
        let source = "NEON CITY LIGHTS";
        for _ in 0..200 {
            let out = corrupt(source, &mut rng);
            assert_eq!(out.chars().count(), source.chars().count());
            for (a, b) in source.chars().zip(out.chars()) {
                if a == ' ' {
                    assert_eq!(b, ' ');
                } else {
                    assert!(a == b || GLITCH_CHARS.contains(&b));
                }
            }
        }
    }

    #[test]
    fn inactive_state_displays_the_source() {
        let state = GlitchState::new("BKLNM", GlitchIntensity::High);
        assert!(!state.is_active());
        assert_eq!(state.displayed(), "BKLNM");
    }

    #[test]
    fn empty_source_never_triggers() {
        let mut state = GlitchState::new("", GlitchIntensity::High);
        let mut rng = SeededRandom::new(0);
        for _ in 0..500 {
            assert!(state.tick(&mut rng).is_none());
        }
    }

    #[test]
    fn activation_then_revert_round_trips() {
        let mut state = GlitchState::new("GLITCH ME", GlitchIntensity::High);
        let mut rng = SeededRandom::new(11);
        let active = loop {
            if let Some(a) = state.tick(&mut rng) {
                break a;
            }
        };
        assert!(state.is_active());
        assert!((50.0..150.0).contains(&active.duration_ms));
        assert_eq!(active.text.chars().count(), "GLITCH ME".chars().count());
        // No re-trigger while active.
        for _ in 0..100 {
            assert!(state.tick(&mut rng).is_none());
        }
        state.revert();
        assert!(!state.is_active());
        assert_eq!(state.displayed(), "GLITCH ME");
    }

    #[test]
    fn trigger_rate_tracks_intensity() {
        let mut rng = SeededRandom::new(42);
        let mut hits = 0;
        for _ in 0..10_000 {
            let mut state = GlitchState::new("X", GlitchIntensity::Low);
            if state.tick(&mut rng).is_some() {
                hits += 1;
            }
        }
        // 10% chance; allow generous slack.
        assert!((700..1300).contains(&hits), "hits = {hits}");
    }
}
