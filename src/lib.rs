//! 3D falling-block puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `tetris3d::{core,engine,input,term,types}`
//! so the binary, integration tests and benches share one import path.

pub use tetris3d_core as core;
pub use tetris3d_engine as engine;
pub use tetris3d_input as input;
pub use tetris3d_term as term;
pub use tetris3d_types as types;
