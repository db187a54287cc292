//! Async session driver.
//!
//! Runs a [`GameState`](tetris3d_core::GameState) on a tokio task: one
//! cancellable fall timer plus a stream of player commands, serialised through
//! a single `select!` loop. Events go out through an [`EventSink`] without
//! waiting on consumers; snapshots are published on a `watch` channel.

pub mod camera;
pub mod session;
pub mod timer;

pub use tetris3d_core as core;
pub use tetris3d_types as types;

pub use camera::CameraRig;
pub use session::{ChannelSink, EventSink, NullSink, Session, SessionCommand};
pub use timer::FallTimer;
