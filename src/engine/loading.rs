//! Loading sequencer: a Running→Complete progress machine ticked every
//! 200 ms by the driver. Completion is signalled exactly once.

use crate::engine::rng::RandomSource;

pub const STATUS_LINES: [&str; 6] = [
    "INITIALIZING...",
    "LOADING BADASS MODE...",
    "ACTIVATING NEON SYSTEMS...",
    "PREPARING GLITCH EFFECTS...",
    "SYNCING CYBERPUNK VIBES...",
    "READY TO ROCK!",
];

/// Driver timing: tick cadence, glitch-flash length, and the grace
/// delay between hitting 100 and handing control to the page.
pub const TICK_MS: u32 = 200;
pub const FLASH_MS: u32 = 200;
pub const COMPLETE_GRACE_MS: u32 = 1000;

/// Map a progress value to its status line index.
pub fn status_index(progress: f64) -> usize {
    let idx = (progress / 100.0 * (STATUS_LINES.len() - 1) as f64) as usize;
    idx.min(STATUS_LINES.len() - 1)
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingTick {
    pub progress: f64,
    pub status_index: usize,
    /// Trigger the transient glitch flash this tick.
    pub flash: bool,
    /// True exactly once, on the tick that clamped progress to 100.
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Complete,
}

#[derive(Debug)]
pub struct LoadingSequencer {
    progress: f64,
    phase: Phase,
}

impl Default for LoadingSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingSequencer {
    pub fn new() -> Self {
        LoadingSequencer {
            progress: 0.0,
            phase: Phase::Running,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Advance by a random increment in `[5, 20)`. Returns `None` once
    /// complete, so a stray tick after the clamp cannot re-fire
    /// completion.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Option<LoadingTick> {
        if self.phase == Phase::Complete {
            return None;
        }
        self.progress += rng.range(5.0, 20.0);
        let flash = rng.chance(0.3);
        let finished = self.progress >= 100.0;
        if finished {
            self.progress = 100.0;
            self.phase = Phase::Complete;
        }
        Some(LoadingTick {
            progress: self.progress,
            status_index: status_index(self.progress),
            flash,
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRandom;

    #[test]
    fn progress_is_monotone_and_clamps_to_exactly_100_once() {
        for seed in 0..20 {
            let mut rng = SeededRandom::new(seed);
            let mut seq = LoadingSequencer::new();
            let mut last = 0.0;
            let mut finishes = 0;
            for _ in 0..100 {
                match seq.tick(&mut rng) {
                    Some(t) => {
                        assert!(t.progress >= last);
                        assert!(t.progress <= 100.0);
                        last = t.progress;
                        if t.finished {
                            finishes += 1;
                            assert_eq!(t.progress, 100.0);
                        }
                    }
                    None => assert!(seq.is_complete()),
                }
            }
            assert_eq!(finishes, 1);
            assert_eq!(seq.progress(), 100.0);
        }
    }

    #[test]
    fn ticks_after_completion_are_inert() {
        let mut rng = SeededRandom::new(1);
        let mut seq = LoadingSequencer::new();
        while let Some(t) = seq.tick(&mut rng) {
            if t.finished {
                break;
            }
        }
        for _ in 0..50 {
            assert!(seq.tick(&mut rng).is_none());
            assert_eq!(seq.progress(), 100.0);
        }
    }

    #[test]
    fn status_index_spans_the_list() {
        assert_eq!(status_index(0.0), 0);
        assert_eq!(status_index(19.9), 0);
        assert_eq!(status_index(20.0), 1);
        assert_eq!(status_index(50.0), 2);
        assert_eq!(status_index(99.9), 4);
        assert_eq!(status_index(100.0), 5);
        assert_eq!(status_index(140.0), 5);
    }

    #[test]
    fn sequencer_finishes_in_a_sane_tick_count() {
        // Increments are [5, 20) so completion takes 6 to 20 ticks.
        let mut rng = SeededRandom::new(77);
        let mut seq = LoadingSequencer::new();
        let mut ticks = 0;
        while seq.tick(&mut rng).map(|t| !t.finished).unwrap_or(false) {
            ticks += 1;
            assert!(ticks <= 20);
        }
        assert!(ticks >= 5);
    }
}
