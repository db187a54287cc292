//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds every rule of the 3D falling-block game: the occupancy
//! lattice, block shapes and their rotation algebra, the issue queue with the
//! hold slot, scoring, the view-relative control mapping and the placement
//! engine that ties them together. It has no terminal, timer or thread
//! dependencies; drive it from any loop.
//!
//! # Module Structure
//!
//! - [`grid`]: bordered `X × Y × Z` lattice with plane clearing and gravity
//! - [`block`]: shape catalog, live blocks and the six rotation operators
//! - [`rng`]: deterministic LCG
//! - [`queue`]: no-repeat issue order and the hold/save slot
//! - [`scoring`]: combo-scaled clear scoring and the fall speed ramp
//! - [`control`]: camera heading → world move/rotation remapping
//! - [`game_state`]: the placement & scoring engine and match lifecycle
//! - [`snapshot`]: serializable read-only views for collaborators
//! - [`scoreboard`]: ranked score list with JSON persistence
//! - [`config`] / [`error`]: tunables and construction-time errors
//!
//! # Example
//!
//! ```
//! use tetris3d_core::{GameConfig, GameState};
//! use tetris3d_types::{Direction, Heading};
//!
//! let mut game = GameState::new(GameConfig::default().with_seed(12345)).unwrap();
//!
//! // Movement is relative to the camera heading
//! game.try_move(Direction::Left, Heading::Deg90);
//!
//! // Drop and lock
//! game.hard_drop();
//! assert!(!game.is_game_over());
//! ```
//!
//! # Timing
//!
//! The fall period starts at 1000ms and shrinks by 10% on every big clear,
//! down to 100ms. Call [`GameState::tick`](game_state::GameState::tick) with
//! elapsed time, or call `soft_drop_tick` from an external timer.

pub mod block;
pub mod config;
pub mod control;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod queue;
pub mod rng;
pub mod scoreboard;
pub mod scoring;
pub mod snapshot;

pub use tetris3d_types as types;

// Re-export commonly used types for convenience
pub use block::{shape, Block, BlockShape};
pub use config::{GameConfig, TestConfig};
pub use control::{movement_delta, world_rotation, HeadingProvider};
pub use error::ConfigError;
pub use game_state::{
    DropOutcome, GameState, HoldOutcome, LockReport, MoveOutcome, Status, TickOutcome,
};
pub use grid::{Cell, Grid, TestStack};
pub use queue::BlockQueue;
pub use rng::SimpleRng;
pub use scoreboard::{ScoreBoard, ScoreBoardError, ScoreEntry};
pub use scoring::{ScoreResult, ScoreRules};
pub use snapshot::{BlockSnapshot, GameSnapshot, OccupiedCell};
