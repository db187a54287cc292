use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::types::{BlockKind, Coord};

/// Pose of a block in world coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub kind: BlockKind,
    pub pos: Coord,
    /// World coordinates of every tile.
    pub cells: Vec<Coord>,
}

impl From<&Block> for BlockSnapshot {
    fn from(block: &Block) -> Self {
        Self {
            kind: block.kind(),
            pos: block.pos(),
            cells: block.tile_positions().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupiedCell {
    pub pos: Coord,
    pub kind: BlockKind,
}

/// Read-only view of a match for collaborators (rendering, persistence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Logical grid extents `[X, Y, Z]`.
    pub dimensions: [usize; 3],
    pub current: Option<BlockSnapshot>,
    pub shadow: Option<BlockSnapshot>,
    pub next: Option<BlockKind>,
    pub held: Option<BlockKind>,
    pub can_hold: bool,
    pub paused: bool,
    pub game_over: bool,
    pub total_score: u64,
    pub combo_index: u32,
    pub down_interval_ms: u64,
    pub episode_id: u32,
    pub occupied: Vec<OccupiedCell>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Occupied cell at a coordinate, if any.
    pub fn cell_at(&self, pos: Coord) -> Option<BlockKind> {
        self.occupied
            .iter()
            .find(|cell| cell.pos == pos)
            .map(|cell| cell.kind)
    }
}
