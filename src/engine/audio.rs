//! Tone definitions for the procedural synthesizer. Pure data: the wasm
//! driver turns a [`ToneSpec`] into an oscillator→filter→envelope chain.

use crate::engine::rng::RandomSource;

/// Default master volume when the profile does not override it.
pub const DEFAULT_VOLUME: f64 = 0.2;

/// Envelope attack applied to every tone.
pub const ATTACK_SECS: f64 = 0.01;

/// Exponential decay floor; WebAudio forbids ramping to exactly zero.
pub const DECAY_FLOOR: f32 = 0.001;

/// Ambient timer cadence and fire probability.
pub const AMBIENT_INTERVAL_MS: u32 = 3000;
pub const AMBIENT_CHANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Full recipe for one self-disposing tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub start_hz: f64,
    pub end_hz: f64,
    pub ramp: Ramp,
    /// Envelope peak after the linear attack.
    pub peak_gain: f64,
    /// Total length; the oscillator stops at start + duration.
    pub duration_secs: f64,
    /// Optional low-pass cutoff inserted before the envelope.
    pub lowpass_hz: Option<f64>,
}

/// Click: a sawtooth zap falling from 1200 to 400 Hz through a low-pass.
pub fn click_tone() -> ToneSpec {
    ToneSpec {
        waveform: Waveform::Sawtooth,
        start_hz: 1200.0,
        end_hz: 400.0,
        ramp: Ramp::Exponential,
        peak_gain: 0.05,
        duration_secs: 0.1,
        lowpass_hz: Some(2000.0),
    }
}

/// Hover: a soft sine rising 600→800 Hz.
pub fn hover_tone() -> ToneSpec {
    ToneSpec {
        waveform: Waveform::Sine,
        start_hz: 600.0,
        end_hz: 800.0,
        ramp: Ramp::Linear,
        peak_gain: 0.02,
        duration_secs: 0.05,
        lowpass_hz: None,
    }
}

/// Ambient glitch: a square wave at a random 400-1200 Hz pitch falling
/// to half frequency over a random 50-150 ms.
pub fn glitch_tone(rng: &mut dyn RandomSource) -> ToneSpec {
    let start_hz = rng.range(400.0, 1200.0);
    ToneSpec {
        waveform: Waveform::Square,
        start_hz,
        end_hz: start_hz * 0.5,
        ramp: Ramp::Exponential,
        peak_gain: 0.1,
        duration_secs: rng.range(0.05, 0.15),
        lowpass_hz: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRandom;

    #[test]
    fn click_tone_matches_its_recipe() {
        let t = click_tone();
        assert_eq!(t.waveform, Waveform::Sawtooth);
        assert_eq!(t.start_hz, 1200.0);
        assert_eq!(t.end_hz, 400.0);
        assert_eq!(t.ramp, Ramp::Exponential);
        assert_eq!(t.duration_secs, 0.1);
        assert_eq!(t.lowpass_hz, Some(2000.0));
    }

    #[test]
    fn hover_tone_is_short_and_quiet() {
        let t = hover_tone();
        assert_eq!(t.waveform, Waveform::Sine);
        assert_eq!(t.ramp, Ramp::Linear);
        assert!(t.peak_gain <= 0.02);
        assert_eq!(t.duration_secs, 0.05);
        assert!(t.lowpass_hz.is_none());
    }

    #[test]
    fn glitch_tone_halves_its_random_pitch() {
        let mut rng = SeededRandom::new(13);
        for _ in 0..100 {
            let t = glitch_tone(&mut rng);
            assert!((400.0..1200.0).contains(&t.start_hz));
            assert_eq!(t.end_hz, t.start_hz * 0.5);
            assert!((0.05..0.15).contains(&t.duration_secs));
        }
    }
}
