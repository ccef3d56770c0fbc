//! Pure effects engine: state machines and sampling functions with no
//! browser dependencies. Everything here compiles and tests on the host;
//! the `wasm` drivers feed these with real timers, events and canvases.

pub mod audio;
pub mod cursor;
pub mod glitch;
pub mod intensity;
pub mod loading;
pub mod palette;
pub mod particles;
pub mod rng;
