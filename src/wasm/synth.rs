//! WebAudio driver: one persistent context + master gain per enable
//! period, one ephemeral oscillator chain per triggered tone, and the
//! `SoundBus` handle other subsystems use to trigger sounds without
//! depending on this module's lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AudioContext, BiquadFilterNode, BiquadFilterType, Document, GainNode, OscillatorNode,
    OscillatorType,
};

use crate::engine::audio::{
    click_tone, glitch_tone, hover_tone, ToneSpec, Waveform, AMBIENT_CHANCE, AMBIENT_INTERVAL_MS,
    ATTACK_SECS, DECAY_FLOOR,
};
use crate::engine::rng::{JsRandom, RandomSource};

use super::schedule::{EventListener, Interval};

/// Selector for elements that get click/hover sounds attached.
const INTERACTIVE: &str = "button, a, [role=\"button\"]";

/// Persistent audio graph: context plus master gain. Closed exactly
/// once, when the last owner drops it.
struct Synth {
    ctx: AudioContext,
    master: GainNode,
}

impl Synth {
    fn new(volume: f64) -> Result<Self, JsValue> {
        let ctx = AudioContext::new()?;
        let master = GainNode::new(&ctx)?;
        master.gain().set_value(volume as f32);
        master.connect_with_audio_node(&ctx.destination())?;
        Ok(Synth { ctx, master })
    }

    /// Build and schedule one tone. The chain starts now and stops at
    /// now + duration; the browser reclaims the nodes after the stop,
    /// so nothing here needs manual disposal.
    fn play(&self, spec: &ToneSpec) -> Result<(), JsValue> {
        let t0 = self.ctx.current_time();
        let end = t0 + spec.duration_secs;

        let osc = OscillatorNode::new(&self.ctx)?;
        osc.set_type(match spec.waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        });
        osc.frequency().set_value_at_time(spec.start_hz as f32, t0)?;
        match spec.ramp {
            crate::engine::audio::Ramp::Linear => {
                osc.frequency()
                    .linear_ramp_to_value_at_time(spec.end_hz as f32, end)?;
            }
            crate::engine::audio::Ramp::Exponential => {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(spec.end_hz as f32, end)?;
            }
        }

        let envelope = GainNode::new(&self.ctx)?;
        envelope.gain().set_value_at_time(0.0, t0)?;
        envelope
            .gain()
            .linear_ramp_to_value_at_time(spec.peak_gain as f32, t0 + ATTACK_SECS)?;
        envelope
            .gain()
            .exponential_ramp_to_value_at_time(DECAY_FLOOR, end)?;

        if let Some(cutoff) = spec.lowpass_hz {
            let filter = BiquadFilterNode::new(&self.ctx)?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value_at_time(cutoff as f32, t0)?;
            osc.connect_with_audio_node(&filter)?;
            filter.connect_with_audio_node(&envelope)?;
        } else {
            osc.connect_with_audio_node(&envelope)?;
        }
        envelope.connect_with_audio_node(&self.master)?;

        osc.start_with_when(t0)?;
        osc.stop_with_when(end)?;
        Ok(())
    }
}

impl Drop for Synth {
    fn drop(&mut self) {
        let _ = self.ctx.close();
    }
}

/// The three triggerable effects over a live synth. Triggers swallow
/// scheduling errors; a failed tone is silent, never fatal.
pub struct SoundFx {
    synth: Synth,
}

impl SoundFx {
    pub fn hover(&self) {
        let _ = self.synth.play(&hover_tone());
    }

    pub fn click(&self) {
        let _ = self.synth.play(&click_tone());
    }

    pub fn ambient_glitch(&self) {
        let _ = self.synth.play(&glitch_tone(&mut JsRandom));
    }
}

/// Cloneable shared handle for triggering sounds. Empty until a
/// `SoundSystem` registers itself; triggers on an empty bus are no-ops,
/// which is also the degraded path when Web Audio is unavailable.
#[derive(Clone, Default)]
pub struct SoundBus {
    inner: Rc<RefCell<Option<Rc<SoundFx>>>>,
}

impl SoundBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, fx: Rc<SoundFx>) {
        *self.inner.borrow_mut() = Some(fx);
    }

    fn unregister(&self) {
        self.inner.borrow_mut().take();
    }

    fn current(&self) -> Option<Rc<SoundFx>> {
        self.inner.borrow().clone()
    }

    pub fn hover(&self) {
        if let Some(fx) = self.current() {
            fx.hover();
        }
    }

    pub fn click(&self) {
        if let Some(fx) = self.current() {
            fx.click();
        }
    }

    pub fn ambient_glitch(&self) {
        if let Some(fx) = self.current() {
            fx.ambient_glitch();
        }
    }
}

/// Owner of the audio lifecycle: registers the bus, runs the ambient
/// timer, and wires interaction listeners. Dropping it unregisters the
/// bus and, once the last `SoundFx` reference dies, closes the context.
pub struct SoundSystem {
    bus: SoundBus,
    _fx: Option<Rc<SoundFx>>,
    _ambient: Option<Interval>,
    _listeners: Vec<EventListener>,
}

impl SoundSystem {
    pub fn start(document: &Document, bus: SoundBus, volume: f64) -> SoundSystem {
        let synth = match Synth::new(volume) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Web Audio unavailable, sounds disabled: {:?}", e);
                return SoundSystem {
                    bus,
                    _fx: None,
                    _ambient: None,
                    _listeners: Vec::new(),
                };
            }
        };
        let fx = Rc::new(SoundFx { synth });
        bus.register(fx.clone());

        // Ambient glitch tone: every 3 s, a 10% roll.
        let ambient_fx = fx.clone();
        let ambient = Interval::new(AMBIENT_INTERVAL_MS, move || {
            if JsRandom.chance(AMBIENT_CHANCE) {
                ambient_fx.ambient_glitch();
            }
        })
        .map_err(|e| log::warn!("ambient sound timer failed: {:?}", e))
        .ok();

        let mut listeners = Vec::new();

        // Document-wide click zap.
        let click_fx = fx.clone();
        if let Ok(l) = EventListener::new(document, "click", move |_| click_fx.click()) {
            listeners.push(l);
        }

        // Hover blips on interactive elements.
        let mut hover_targets = 0usize;
        if let Ok(nodes) = document.query_selector_all(INTERACTIVE) {
            for i in 0..nodes.length() {
                let el = match nodes.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
                    Some(el) => el,
                    None => continue,
                };
                let hover_fx = fx.clone();
                if let Ok(l) = EventListener::new(&el, "mouseenter", move |_| hover_fx.hover()) {
                    listeners.push(l);
                    hover_targets += 1;
                }
            }
        }

        log::info!("audio synthesizer online ({hover_targets} hover targets)");
        SoundSystem {
            bus,
            _fx: Some(fx),
            _ambient: ambient,
            _listeners: listeners,
        }
    }
}

impl Drop for SoundSystem {
    fn drop(&mut self) {
        self.bus.unregister();
    }
}
