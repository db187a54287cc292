//! Construction-time errors.
//!
//! In-game situations (blocked moves, unavailable hold, top-out) are modelled as
//! outcome enums in [`crate::game_state`]; only malformed configuration and
//! piece tables surface as errors.

use crate::types::BlockKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must have exactly 3 extents, got {0}")]
    GridArity(usize),

    #[error("grid extent along {axis} is {value}, minimum is {min}")]
    GridTooSmall {
        axis: char,
        value: usize,
        min: usize,
    },

    #[error("test stack of height {height} leaves no room in a grid of height {size_y}")]
    TestStackTooTall { height: usize, size_y: usize },

    #[error("block table for {kind:?} is malformed: {reason}")]
    MalformedBlock {
        kind: BlockKind,
        reason: &'static str,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },
}
