//! Neon color tokens shared by every visual subsystem.

/// Ordered palette: pink, blue, green, purple. Index order matters —
/// the cursor uses entry 0 at rest and entry 1 while hovering, and the
/// trail/burst systems cycle through all four.
pub const NEON: [&str; 4] = ["#ff2d95", "#00e5ff", "#39ff14", "#b026ff"];

/// Three-color sub-palette used by the text corruption layers.
pub const GLITCH: [&str; 3] = [NEON[0], NEON[1], NEON[2]];
