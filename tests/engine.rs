//! Host-side property tests for the effects engine. These run with a
//! plain `cargo test`; browser smoke tests live in `web.rs`.

use fx_wasm::engine::cursor::{prune_batches, spawn_burst, BurstBatch, TrailBuffer};
use fx_wasm::engine::glitch::{GlitchIntensity, GlitchState, GLITCH_CHARS};
use fx_wasm::engine::intensity::{EffectProfile, Intensity};
use fx_wasm::engine::loading::LoadingSequencer;
use fx_wasm::engine::particles::spawn_field;
use fx_wasm::engine::rng::{RandomSource, SeededRandom};

#[test]
fn trail_holds_exactly_the_cap_most_recent_first() {
    for cap in [1usize, 5, 10, 12] {
        let mut trail = TrailBuffer::new(cap);
        let events = cap + 25;
        for i in 0..events {
            trail.push(i as f64, -(i as f64));
        }
        assert_eq!(trail.len(), cap);
        let xs: Vec<f64> = trail.iter().map(|p| p.x).collect();
        let expect: Vec<f64> = (events - cap..events).rev().map(|i| i as f64).collect();
        assert_eq!(xs, expect);
    }
}

#[test]
fn corrupted_text_only_differs_at_non_space_positions() {
    let mut rng = SeededRandom::new(8);
    let source = "SYNCING CYBERPUNK VIBES";
    let mut state = GlitchState::new(source, GlitchIntensity::High);
    let mut corruptions = 0;
    for _ in 0..2000 {
        if state.tick(&mut rng).is_some() {
            let shown = state.displayed();
            assert_eq!(shown.chars().count(), source.chars().count());
            for (orig, got) in source.chars().zip(shown.chars()) {
                if orig == ' ' {
                    assert_eq!(got, ' ');
                } else if got != orig {
                    assert!(GLITCH_CHARS.contains(&got));
                    corruptions += 1;
                }
            }
            state.revert();
            assert_eq!(state.displayed(), source);
        }
    }
    assert!(corruptions > 0, "no character was ever substituted");
}

#[test]
fn loading_completes_exactly_once_per_run() {
    for seed in 0..50 {
        let mut rng = SeededRandom::new(seed);
        let mut seq = LoadingSequencer::new();
        let mut completions = 0;
        let mut prev = 0.0;
        for _ in 0..200 {
            if let Some(tick) = seq.tick(&mut rng) {
                assert!(tick.progress >= prev, "progress went backwards");
                prev = tick.progress;
                if tick.finished {
                    completions += 1;
                }
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(seq.progress(), 100.0);
        assert!(seq.is_complete());
    }
}

#[test]
fn high_intensity_click_bursts_twelve_particles_at_30_degree_spacing() {
    let mut rng = SeededRandom::new(4);
    let count = Intensity::High.burst_count();
    assert_eq!(count, 12);
    let particles = spawn_burst(100.0, 100.0, count, 4, &mut rng);
    assert_eq!(particles.len(), 12);
    for (i, p) in particles.iter().enumerate() {
        assert!((p.angle_deg - 30.0 * i as f64).abs() < 1e-9);
    }

    // The batch survives until the 1 s lifetime elapses, then vanishes
    // as a whole.
    let mut batches = vec![BurstBatch {
        particles,
        spawned_at_ms: 500.0,
    }];
    prune_batches(&mut batches, 1499.0);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].particles.len(), 12);
    prune_batches(&mut batches, 1500.0);
    assert!(batches.is_empty());
}

#[test]
fn mobile_profile_disables_pointer_and_audio() {
    let profile = EffectProfile::for_viewport(500.0);
    assert_eq!(profile.intensity, Intensity::Low);
    assert_eq!(profile.intensity.particle_count(), 20);
    assert!(!profile.pointer_effects);
    assert!(!profile.audio);
}

#[test]
fn desktop_profile_enables_everything_at_high() {
    let profile = EffectProfile::for_viewport(1440.0);
    assert_eq!(profile.intensity, Intensity::High);
    assert_eq!(profile.intensity.particle_count(), 60);
    assert_eq!(profile.trail_count, 12);
    assert!(profile.pointer_effects);
    assert!(profile.audio);
    assert!(profile.show_particles);
}

#[test]
fn particle_field_is_stable_under_reseeded_sampling() {
    // Two spawns from the same seed describe the same field: the driver
    // relies on this never depending on ambient state.
    let a = spawn_field(40, 1024.0, 768.0, 4, &mut SeededRandom::new(99));
    let b = spawn_field(40, 1024.0, 768.0, 4, &mut SeededRandom::new(99));
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.x, y.x);
        assert_eq!(x.speed, y.speed);
        assert_eq!(x.direction, y.direction);
    }
}

#[test]
fn random_source_ranges_cover_engine_contracts() {
    let mut rng = SeededRandom::new(1234);
    for _ in 0..5000 {
        assert!((0.0..1.0).contains(&rng.next_f64()));
    }
    // chance(1.0) is always true, chance(0.0) never.
    assert!(rng.chance(1.0));
    assert!(!rng.chance(0.0));
}
