//! Device classification and the intensity policy: one coarse viewport
//! measurement fans out into every per-subsystem tuning knob.

/// Coarse viewport class. Breakpoints follow the usual 768/1024 split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(width_px: f64) -> Self {
        if width_px <= 768.0 {
            DeviceClass::Mobile
        } else if width_px <= 1024.0 {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Effect intensity level. Pure data; all derived values live in the
/// lookup methods below so the tables stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn for_device(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Mobile => Intensity::Low,
            DeviceClass::Tablet => Intensity::Medium,
            DeviceClass::Desktop => Intensity::High,
        }
    }

    pub fn particle_count(self) -> usize {
        match self {
            Intensity::Low => 20,
            Intensity::Medium => 40,
            Intensity::High => 60,
        }
    }

    pub fn matrix_columns(self) -> usize {
        match self {
            Intensity::Low => 10,
            Intensity::Medium => 20,
            Intensity::High => 30,
        }
    }

    pub fn field_opacity(self) -> f64 {
        match self {
            Intensity::Low => 0.3,
            Intensity::Medium => 0.5,
            Intensity::High => 0.7,
        }
    }

    pub fn burst_count(self) -> usize {
        match self {
            Intensity::Low => 4,
            Intensity::Medium => 8,
            Intensity::High => 12,
        }
    }

    /// Cursor disc diameter in px.
    pub fn cursor_size(self) -> f64 {
        match self {
            Intensity::Low => 8.0,
            Intensity::Medium => 12.0,
            Intensity::High => 16.0,
        }
    }

    /// Glow radius for the cursor and trail.
    pub fn cursor_blur(self) -> f64 {
        match self {
            Intensity::Low => 5.0,
            Intensity::Medium => 10.0,
            Intensity::High => 15.0,
        }
    }

    pub fn cursor_opacity(self) -> f64 {
        match self {
            Intensity::Low => 0.6,
            Intensity::Medium => 0.8,
            Intensity::High => 1.0,
        }
    }
}

/// Full effect configuration for one session, derived from the viewport
/// once at mount. Mid-session resizes deliberately do not re-derive it.
#[derive(Debug, Clone, Copy)]
pub struct EffectProfile {
    pub intensity: Intensity,
    pub trail_count: usize,
    /// Cursor trail, click bursts and related pointer work.
    pub pointer_effects: bool,
    /// Ambient tone synthesis and interaction sounds.
    pub audio: bool,
    pub audio_volume: f64,
    pub show_grid: bool,
    pub show_particles: bool,
    pub show_scanlines: bool,
    /// Implemented but shipped off; see the background driver.
    pub show_matrix_rain: bool,
}

impl EffectProfile {
    pub fn for_viewport(width_px: f64) -> Self {
        let class = DeviceClass::from_width(width_px);
        let mobile = class == DeviceClass::Mobile;
        EffectProfile {
            intensity: Intensity::for_device(class),
            trail_count: match class {
                DeviceClass::Mobile => 5,
                DeviceClass::Tablet => 8,
                DeviceClass::Desktop => 12,
            },
            pointer_effects: !mobile,
            audio: !mobile,
            audio_volume: 0.2,
            show_grid: true,
            show_particles: !mobile,
            show_scanlines: true,
            show_matrix_rain: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_viewport_resolves_low_and_disables_pointer_work() {
        let profile = EffectProfile::for_viewport(500.0);
        assert_eq!(profile.intensity, Intensity::Low);
        assert_eq!(profile.intensity.particle_count(), 20);
        assert!(!profile.pointer_effects);
        assert!(!profile.audio);
        assert!(!profile.show_particles);
    }

    #[test]
    fn wide_viewport_resolves_high_with_everything_on() {
        let profile = EffectProfile::for_viewport(1440.0);
        assert_eq!(profile.intensity, Intensity::High);
        assert_eq!(profile.intensity.particle_count(), 60);
        assert_eq!(profile.trail_count, 12);
        assert!(profile.pointer_effects);
        assert!(profile.audio);
    }

    #[test]
    fn tablet_band_is_medium() {
        assert_eq!(DeviceClass::from_width(900.0), DeviceClass::Tablet);
        let profile = EffectProfile::for_viewport(900.0);
        assert_eq!(profile.intensity, Intensity::Medium);
        assert_eq!(profile.trail_count, 8);
        assert_eq!(profile.intensity.burst_count(), 8);
    }

    #[test]
    fn breakpoint_edges() {
        assert_eq!(DeviceClass::from_width(768.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(769.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1024.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1025.0), DeviceClass::Desktop);
    }
}
