//! Block module - piece shapes and the 90° rotation algebra
//!
//! Each kind has an immutable descriptor in [`CATALOG`]: the edge length of
//! its cubic local box and the local tile offsets inside that box. A live
//! [`Block`] owns a mutable copy of those offsets plus a world anchor.
//!
//! Rotations act on local offsets only, reflecting through `size - 1 - v`:
//!
//! | Operator | Effect |
//! |----------|--------|
//! | X cw  | `y' = size-1-z`, `z' = y` |
//! | Y cw  | `x' = size-1-z`, `z' = x` |
//! | Z cw  | `x' = size-1-y`, `y' = x` |
//!
//! The ccw operators are exact inverses, so any rejected rotation can be
//! rolled back without keeping a copy of the old pose.

use arrayvec::ArrayVec;

use crate::error::ConfigError;
use crate::rng::SimpleRng;
use crate::types::{Axis, BlockKind, Coord, Rotation, Spin, MAX_TILES};

/// Immutable per-kind shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockShape {
    pub kind: BlockKind,
    /// Edge length of the cubic local box.
    pub size: i32,
    pub tiles: &'static [Coord],
}

const fn c(x: i32, y: i32, z: i32) -> Coord {
    Coord::new(x, y, z)
}

const I_TILES: [Coord; 4] = [c(0, 1, 1), c(1, 1, 1), c(2, 1, 1), c(3, 1, 1)];
const L_TILES: [Coord; 4] = [c(1, 0, 1), c(1, 1, 1), c(1, 2, 1), c(2, 2, 1)];
const T_TILES: [Coord; 4] = [c(0, 1, 1), c(1, 1, 1), c(2, 1, 1), c(1, 2, 1)];
const O_TILES: [Coord; 8] = [
    c(0, 0, 0),
    c(1, 0, 0),
    c(0, 0, 1),
    c(1, 0, 1),
    c(0, 1, 0),
    c(1, 1, 0),
    c(0, 1, 1),
    c(1, 1, 1),
];
const J_TILES: [Coord; 4] = [c(1, 0, 1), c(1, 1, 1), c(1, 2, 1), c(0, 2, 1)];
const Z_TILES: [Coord; 4] = [c(0, 0, 1), c(1, 0, 1), c(1, 1, 1), c(2, 1, 1)];
const S_TILES: [Coord; 4] = [c(0, 1, 1), c(1, 1, 1), c(1, 0, 1), c(2, 0, 1)];

/// Shape table in id order.
pub static CATALOG: [BlockShape; 7] = [
    BlockShape { kind: BlockKind::I, size: 4, tiles: &I_TILES },
    BlockShape { kind: BlockKind::L, size: 3, tiles: &L_TILES },
    BlockShape { kind: BlockKind::T, size: 3, tiles: &T_TILES },
    BlockShape { kind: BlockKind::O, size: 2, tiles: &O_TILES },
    BlockShape { kind: BlockKind::J, size: 3, tiles: &J_TILES },
    BlockShape { kind: BlockKind::Z, size: 3, tiles: &Z_TILES },
    BlockShape { kind: BlockKind::S, size: 3, tiles: &S_TILES },
];

/// Look up the descriptor for a kind.
pub fn shape(kind: BlockKind) -> &'static BlockShape {
    &CATALOG[(kind.id() - 1) as usize]
}

/// Check the shape table: ids in order, tiles inside the box, no duplicates.
pub fn validate_catalog() -> Result<(), ConfigError> {
    for (i, shape) in CATALOG.iter().enumerate() {
        let malformed = |reason| ConfigError::MalformedBlock {
            kind: shape.kind,
            reason,
        };
        if shape.kind.id() as usize != i + 1 {
            return Err(malformed("catalog entry out of id order"));
        }
        if shape.tiles.is_empty() || shape.tiles.len() > MAX_TILES {
            return Err(malformed("tile count out of range"));
        }
        let in_box = |v: i32| (0..shape.size).contains(&v);
        if !shape.tiles.iter().all(|t| in_box(t.x) && in_box(t.y) && in_box(t.z)) {
            return Err(malformed("tile outside the local box"));
        }
        for (j, tile) in shape.tiles.iter().enumerate() {
            if shape.tiles[..j].contains(tile) {
                return Err(malformed("duplicate tile"));
            }
        }
    }
    Ok(())
}

/// Apply one rotation operator to a local offset inside a `size`³ box.
#[inline]
pub fn rotate_tile(tile: Coord, size: i32, rotation: Rotation) -> Coord {
    let n = size - 1;
    let Coord { x, y, z } = tile;
    match (rotation.axis, rotation.spin) {
        (Axis::X, Spin::Cw) => Coord::new(x, n - z, y),
        (Axis::X, Spin::Ccw) => Coord::new(x, z, n - y),
        (Axis::Y, Spin::Cw) => Coord::new(n - z, y, x),
        (Axis::Y, Spin::Ccw) => Coord::new(z, y, n - x),
        (Axis::Z, Spin::Cw) => Coord::new(n - y, x, z),
        (Axis::Z, Spin::Ccw) => Coord::new(y, n - x, z),
    }
}

/// A live piece: kind, mutable local tiles and a world anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    size: i32,
    tiles: ArrayVec<Coord, MAX_TILES>,
    pos: Coord,
}

impl Block {
    /// Fresh instance of a kind in its catalog orientation at the origin.
    pub fn new(kind: BlockKind) -> Self {
        let shape = shape(kind);
        Self {
            kind,
            size: shape.size,
            tiles: shape.tiles.iter().copied().collect(),
            pos: Coord::ZERO,
        }
    }

    pub fn id(&self) -> u8 {
        self.kind.id()
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    pub fn pos(&self) -> Coord {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Coord) {
        self.pos = pos;
    }

    /// Shift the anchor; tiles are untouched.
    pub fn translate(&mut self, delta: Coord) {
        self.pos += delta;
    }

    /// Rotate every local tile in place; the anchor is untouched.
    pub fn rotate(&mut self, rotation: Rotation) {
        let size = self.size;
        for tile in self.tiles.iter_mut() {
            *tile = rotate_tile(*tile, size, rotation);
        }
    }

    /// Re-issue the block: random legal spawn anchor on plane 0 and 0..=3
    /// random clockwise turns per axis.
    ///
    /// The anchor is drawn from `[0, extent_x - size] × {0} × [0, extent_z - size]`
    /// so the whole local box starts inside the grid.
    pub fn reset(&mut self, rng: &mut SimpleRng, extent_x: usize, extent_z: usize) {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let turns = rng.next_range(4);
            for _ in 0..turns {
                self.rotate(Rotation::new(axis, Spin::Cw));
            }
        }

        let span = |extent: usize| (extent as i32 - self.size).max(0) as u32;
        let x = rng.next_inclusive(span(extent_x)) as i32;
        let z = rng.next_inclusive(span(extent_z)) as i32;
        self.pos = Coord::new(x, 0, z);
    }

    /// World coordinates of every tile (`tile + pos`).
    ///
    /// The iterator is lazy and can be cloned to walk the tiles again.
    pub fn tile_positions(&self) -> impl Iterator<Item = Coord> + Clone + '_ {
        let pos = self.pos;
        self.tiles.iter().map(move |&t| t + pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(tiles: &[Coord]) -> Vec<(i32, i32, i32)> {
        let mut v: Vec<_> = tiles.iter().map(|t| (t.x, t.y, t.z)).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_catalog_is_valid() {
        assert!(validate_catalog().is_ok());
        assert_eq!(shape(BlockKind::I).size, 4);
        assert_eq!(shape(BlockKind::O).size, 2);
        assert_eq!(shape(BlockKind::O).tiles.len(), 8);
        assert_eq!(shape(BlockKind::S).size, 3);
    }

    #[test]
    fn test_rotation_inverse_restores_tiles_exactly() {
        for kind in BlockKind::ALL {
            for rotation in Rotation::ALL {
                let mut block = Block::new(kind);
                let before = block.clone();
                block.rotate(rotation);
                block.rotate(rotation.inverse());
                assert_eq!(block, before, "{kind:?} {rotation:?}");
            }
        }
    }

    #[test]
    fn test_four_turns_are_identity() {
        for kind in BlockKind::ALL {
            for rotation in Rotation::ALL {
                let mut block = Block::new(kind);
                for _ in 0..4 {
                    block.rotate(rotation);
                }
                assert_eq!(block.tiles(), shape(kind).tiles);
            }
        }
    }

    #[test]
    fn test_rotation_stays_in_box() {
        for kind in BlockKind::ALL {
            let mut block = Block::new(kind);
            for rotation in Rotation::ALL {
                block.rotate(rotation);
                let size = block.size();
                assert!(block
                    .tiles()
                    .iter()
                    .all(|t| (0..size).contains(&t.x) && (0..size).contains(&t.y) && (0..size).contains(&t.z)));
            }
        }
    }

    #[test]
    fn test_i_block_z_turn_stands_upright() {
        let mut block = Block::new(BlockKind::I);
        block.rotate(Rotation::new(Axis::Z, Spin::Cw));
        assert_eq!(
            sorted(block.tiles()),
            vec![(2, 0, 1), (2, 1, 1), (2, 2, 1), (2, 3, 1)]
        );
    }

    #[test]
    fn test_o_block_is_rotation_invariant_as_a_set() {
        let mut block = Block::new(BlockKind::O);
        let before = sorted(block.tiles());
        for rotation in Rotation::ALL {
            block.rotate(rotation);
            assert_eq!(sorted(block.tiles()), before);
        }
    }

    #[test]
    fn test_translate_moves_anchor_only() {
        let mut block = Block::new(BlockKind::T);
        let tiles = block.tiles().to_vec();
        block.translate(Coord::new(2, 3, -1));
        assert_eq!(block.pos(), Coord::new(2, 3, -1));
        assert_eq!(block.tiles(), &tiles[..]);
        let first = block.tile_positions().next().unwrap();
        assert_eq!(first, tiles[0] + Coord::new(2, 3, -1));
    }

    #[test]
    fn test_reset_spawns_inside_bounds() {
        let mut rng = SimpleRng::new(42);
        for kind in BlockKind::ALL {
            for _ in 0..50 {
                let mut block = Block::new(kind);
                block.reset(&mut rng, 6, 5);
                let pos = block.pos();
                assert_eq!(pos.y, 0);
                assert!(pos.x >= 0 && pos.x <= 6 - block.size());
                assert!(pos.z >= 0 && pos.z <= 5 - block.size());
                assert_eq!(block.tiles().len(), shape(kind).tiles.len());
            }
        }
    }

    #[test]
    fn test_tile_positions_restartable() {
        let block = Block::new(BlockKind::L);
        let iter = block.tile_positions();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }
}
