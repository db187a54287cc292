//! Terminal dashboard for the 3D game.
//!
//! A terminal cannot show the lattice in perspective, so the view is a
//! top-down height map of the floor, rotated with the camera heading, next to
//! a per-plane fill gauge and a HUD. Everything renders into a plain
//! framebuffer first; only changed rows reach the terminal.

pub mod fb;
pub mod renderer;
pub mod view;

pub use tetris3d_core as core;
pub use tetris3d_types as types;

pub use fb::{Cell, FrameBuffer, Rgb, Style};
pub use renderer::{encode_full_into, encode_rows_into, TerminalRenderer};
pub use view::{project, GameView, Viewport};
