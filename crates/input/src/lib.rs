//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`InputAction`]s (game commands plus camera
//! orbit) and rate-limits each binding with a per-key [`KeyGate`]. Terminals
//! auto-repeat held keys, so the gate is what turns a held key into a steady
//! command rate.

pub mod gate;
pub mod map;

pub use tetris3d_types as types;

pub use gate::KeyGate;
pub use map::{map_key, should_quit, InputAction};
