//! Block queue - issue order and the hold slot
//!
//! The queue keeps one pre-drawn `next` block. Normal draws are redrawn
//! until the kind differs from the one just issued, so the same shape never
//! appears twice in a row. When a kind is forced (test scenarios) every draw
//! is that kind and the no-repeat rule is off.
//!
//! The hold slot is a strict two-slot swap, not a queue.

use crate::block::Block;
use crate::rng::SimpleRng;
use crate::types::{BlockKind, BLOCK_KIND_COUNT};

#[derive(Debug, Clone)]
pub struct BlockQueue {
    next: Block,
    saved: Option<Block>,
    rng: SimpleRng,
    forced: Option<BlockKind>,
    extent_x: usize,
    extent_z: usize,
}

impl BlockQueue {
    /// Create a queue for a grid with the given horizontal extents.
    pub fn new(seed: u32, extent_x: usize, extent_z: usize) -> Self {
        Self::with_forced_kind(seed, extent_x, extent_z, None)
    }

    pub fn with_forced_kind(
        seed: u32,
        extent_x: usize,
        extent_z: usize,
        forced: Option<BlockKind>,
    ) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = Block::new(draw_kind(&mut rng, forced));
        Self {
            next,
            saved: None,
            rng,
            forced,
            extent_x,
            extent_z,
        }
    }

    /// Issue the pre-drawn block with a fresh spawn pose and pre-draw the
    /// following one.
    pub fn get_and_update_block(&mut self) -> Block {
        let issued_kind = self.next.kind();

        let mut kind = draw_kind(&mut self.rng, self.forced);
        if self.forced.is_none() {
            while kind == issued_kind {
                kind = draw_kind(&mut self.rng, None);
            }
        }

        let mut issued = std::mem::replace(&mut self.next, Block::new(kind));
        issued.reset(&mut self.rng, self.extent_x, self.extent_z);
        issued
    }

    /// Bank `current` and hand back its replacement.
    ///
    /// With an empty slot the block is banked and a freshly issued block is
    /// returned. Otherwise the banked block is re-posed, swapped with
    /// `current`, and returned.
    pub fn save_and_update_block(&mut self, current: Block) -> Block {
        match self.saved.take() {
            None => {
                self.saved = Some(current);
                self.get_and_update_block()
            }
            Some(mut banked) => {
                banked.reset(&mut self.rng, self.extent_x, self.extent_z);
                self.saved = Some(current);
                banked
            }
        }
    }

    /// Empty the hold slot.
    pub fn save_block_reset(&mut self) {
        self.saved = None;
    }

    pub fn next_kind(&self) -> BlockKind {
        self.next.kind()
    }

    pub fn saved_kind(&self) -> Option<BlockKind> {
        self.saved.as_ref().map(Block::kind)
    }

    pub fn forced_kind(&self) -> Option<BlockKind> {
        self.forced
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// Current RNG state, used to continue the sequence after a restart.
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }
}

fn draw_kind(rng: &mut SimpleRng, forced: Option<BlockKind>) -> BlockKind {
    forced.unwrap_or_else(|| BlockKind::ALL[rng.next_range(BLOCK_KIND_COUNT as u32) as usize])
}
