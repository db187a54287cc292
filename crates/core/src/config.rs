//! Game configuration.
//!
//! Every tunable lives in [`GameConfig`]. Defaults mirror the constants in
//! [`crate::types`]; `from_env` layers environment overrides on top:
//!
//! - `TETRIS3D_GRID`: grid extents as `"X,Y,Z"` (default "10,22,10")
//! - `TETRIS3D_SEED`: RNG seed (default: random)
//! - `TETRIS3D_HEAVY_DROP`: heavy hard-drop threshold in cells (default 2)
//! - `TETRIS3D_DOWN_INTERVAL_MS`: initial fall period (default 1000)
//! - `TETRIS3D_SPEED_UP`: fall period factor on big clears (default 0.9)
//! - `TETRIS3D_TEST_STACK`: pre-filled near-topout stack height (default off)
//! - `TETRIS3D_TEST_REGEN`: "1"/"true" to rebuild the test stack after clears
//! - `TETRIS3D_TEST_BLOCK`: force every block to one kind ("i", "o", ...)
//!
//! Values that fail to parse are logged and ignored.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::types::{
    BlockKind, BASE_SCORE, DEFAULT_GRID_SIZE, DEFAULT_TEST_STACK_HEIGHT, DOWN_INTERVAL_MS,
    HEAVY_DROP_THRESHOLD, MIN_DOWN_INTERVAL_MS, MIN_GRID_EXTENT, SCORE_VALUES, SPEED_UP_FACTOR,
};

/// Test-only scenario switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Pre-fill this many bottom planes, each missing one corner cell.
    pub stack_height: Option<usize>,
    /// Rebuild the pre-filled stack after every plane sweep.
    pub regen_stack: bool,
    /// Issue only this block kind (disables the no-repeat rule).
    pub forced_kind: Option<BlockKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical grid extents `[X, Y, Z]`.
    pub grid_size: Vec<usize>,
    pub seed: Option<u32>,
    pub base_score: u64,
    pub score_values: [u64; 4],
    pub heavy_drop_threshold: u32,
    pub down_interval_ms: u64,
    pub speed_up_factor: f64,
    pub min_down_interval_ms: u64,
    pub test: TestConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE.to_vec(),
            seed: None,
            base_score: BASE_SCORE,
            score_values: SCORE_VALUES,
            heavy_drop_threshold: HEAVY_DROP_THRESHOLD,
            down_interval_ms: DOWN_INTERVAL_MS,
            speed_up_factor: SPEED_UP_FACTOR,
            min_down_interval_ms: MIN_DOWN_INTERVAL_MS,
            test: TestConfig::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("TETRIS3D_GRID") {
            match parse_grid(&raw) {
                Some(size) => config.grid_size = size,
                None => warn!(value = %raw, "ignoring unparsable TETRIS3D_GRID"),
            }
        }
        if let Some(seed) = env_parse("TETRIS3D_SEED") {
            config.seed = Some(seed);
        }
        if let Some(threshold) = env_parse("TETRIS3D_HEAVY_DROP") {
            config.heavy_drop_threshold = threshold;
        }
        if let Some(ms) = env_parse("TETRIS3D_DOWN_INTERVAL_MS") {
            config.down_interval_ms = ms;
        }
        if let Some(factor) = env_parse("TETRIS3D_SPEED_UP") {
            config.speed_up_factor = factor;
        }
        if let Some(height) = env_parse("TETRIS3D_TEST_STACK") {
            config.test.stack_height = Some(height);
        }
        if let Ok(raw) = env::var("TETRIS3D_TEST_REGEN") {
            config.test.regen_stack = raw == "1" || raw.eq_ignore_ascii_case("true");
        }
        if let Ok(raw) = env::var("TETRIS3D_TEST_BLOCK") {
            match BlockKind::from_str(&raw) {
                Some(kind) => config.test.forced_kind = Some(kind),
                None => warn!(value = %raw, "ignoring unknown TETRIS3D_TEST_BLOCK"),
            }
        }

        config
    }

    /// The near-topout test scenario: default stack height, regeneration on, I blocks only.
    pub fn test_scenario() -> Self {
        Self {
            test: TestConfig {
                stack_height: Some(DEFAULT_TEST_STACK_HEIGHT),
                regen_stack: true,
                forced_kind: Some(BlockKind::I),
            },
            ..Self::default()
        }
    }

    pub fn with_grid_size(mut self, size: &[usize]) -> Self {
        self.grid_size = size.to_vec();
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_forced_kind(mut self, kind: BlockKind) -> Self {
        self.test.forced_kind = Some(kind);
        self
    }

    pub fn down_interval(&self) -> Duration {
        Duration::from_millis(self.down_interval_ms)
    }

    pub fn min_down_interval(&self) -> Duration {
        Duration::from_millis(self.min_down_interval_ms)
    }

    /// Check every value; a match must not start on a malformed config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [_, size_y, _] = grid_extents(&self.grid_size)?;

        if let Some(height) = self.test.stack_height {
            if height >= size_y {
                return Err(ConfigError::TestStackTooTall { height, size_y });
            }
        }

        if self.base_score == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "base_score",
                reason: "must be positive",
            });
        }
        if self.score_values.iter().any(|&v| v == 0) {
            return Err(ConfigError::InvalidTuning {
                field: "score_values",
                reason: "entries must be positive",
            });
        }
        if self.down_interval_ms == 0 || self.min_down_interval_ms == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "down_interval_ms",
                reason: "fall periods must be positive",
            });
        }
        if self.min_down_interval_ms > self.down_interval_ms {
            return Err(ConfigError::InvalidTuning {
                field: "min_down_interval_ms",
                reason: "floor exceeds the initial fall period",
            });
        }
        if !(self.speed_up_factor > 0.0 && self.speed_up_factor <= 1.0) {
            return Err(ConfigError::InvalidTuning {
                field: "speed_up_factor",
                reason: "must be in (0, 1]",
            });
        }

        Ok(())
    }
}

/// Validate a grid-size array and split it into `[X, Y, Z]`.
pub fn grid_extents(size: &[usize]) -> Result<[usize; 3], ConfigError> {
    let &[x, y, z] = size else {
        return Err(ConfigError::GridArity(size.len()));
    };
    for (axis, value) in [('x', x), ('y', y), ('z', z)] {
        if value < MIN_GRID_EXTENT {
            return Err(ConfigError::GridTooSmall {
                axis,
                value,
                min: MIN_GRID_EXTENT,
            });
        }
    }
    Ok([x, y, z])
}

fn parse_grid(raw: &str) -> Option<Vec<usize>> {
    raw.split(',')
        .map(|part| part.trim().parse().ok())
        .collect()
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}
