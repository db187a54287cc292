//! Grid module - the bounded 3D occupancy lattice
//!
//! The grid is an `X × Y × Z` lattice where each cell is empty or owned by a
//! block kind. Storage is a flat vector over a border-inclusive
//! `(X+2) × (Y+2) × (Z+2)` box: the one-cell border is a permanent wall on the
//! four sides and the floor, while the border plane above `y = 0` stays open so
//! that anything reaching plane 0 is still inside the playfield.
//!
//! Callers always use zero-based logical coordinates; the `+1` shift into the
//! bordered storage happens here.
//!
//! Coordinates: `y = 0` is the top plane, `y = Y - 1` the floor plane.

use crate::config::{grid_extents, GameConfig};
use crate::error::ConfigError;
use crate::types::{BlockKind, Coord};

/// Raw value of a border wall cell.
const WALL: i8 = -1;

/// Raw value of an empty cell.
const EMPTY: i8 = 0;

/// A logical cell: `None` when empty, otherwise the owning block kind.
pub type Cell = Option<BlockKind>;

/// Pre-filled near-topout stack used by test scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestStack {
    /// Number of bottom planes to fill.
    pub height: usize,
    /// Rebuild the stack after every plane sweep.
    pub regen: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size_x: usize,
    size_y: usize,
    size_z: usize,
    /// Border-inclusive storage, plane-major: `(by * (X+2) + bx) * (Z+2) + bz`.
    cells: Vec<i8>,
    test_stack: Option<TestStack>,
}

impl Grid {
    /// Build an empty grid from a `[X, Y, Z]` size array.
    pub fn new(size: &[usize]) -> Result<Self, ConfigError> {
        let [size_x, size_y, size_z] = grid_extents(size)?;

        let mut grid = Self {
            size_x,
            size_y,
            size_z,
            cells: vec![EMPTY; (size_x + 2) * (size_y + 2) * (size_z + 2)],
            test_stack: None,
        };
        grid.build_walls();
        Ok(grid)
    }

    /// Build a grid carrying the near-topout test stack.
    pub fn with_test_stack(size: &[usize], stack: TestStack) -> Result<Self, ConfigError> {
        let mut grid = Self::new(size)?;
        if stack.height >= grid.size_y {
            return Err(ConfigError::TestStackTooTall {
                height: stack.height,
                size_y: grid.size_y,
            });
        }
        grid.test_stack = Some(stack);
        grid.fill_test_stack();
        Ok(grid)
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        match config.test.stack_height {
            Some(height) => Self::with_test_stack(
                &config.grid_size,
                TestStack {
                    height,
                    regen: config.test.regen_stack,
                },
            ),
            None => Self::new(&config.grid_size),
        }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    pub fn dimensions(&self) -> [usize; 3] {
        [self.size_x, self.size_y, self.size_z]
    }

    /// Flat index into bordered storage.
    #[inline(always)]
    fn index(&self, bx: usize, by: usize, bz: usize) -> usize {
        (by * (self.size_x + 2) + bx) * (self.size_z + 2) + bz
    }

    /// Flat index of a logical coordinate, `None` outside the playfield.
    #[inline(always)]
    fn logical_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.is_inside(x, y, z) {
            return None;
        }
        Some(self.index(x as usize + 1, y as usize + 1, z as usize + 1))
    }

    fn build_walls(&mut self) {
        let (bx_max, by_max, bz_max) = (self.size_x + 1, self.size_y + 1, self.size_z + 1);
        for by in 0..=by_max {
            for bx in 0..=bx_max {
                for bz in 0..=bz_max {
                    // The border plane above y = 0 is left open.
                    let wall = bx == 0 || bx == bx_max || by == by_max || bz == 0 || bz == bz_max;
                    let idx = self.index(bx, by, bz);
                    self.cells[idx] = if wall { WALL } else { EMPTY };
                }
            }
        }
    }

    fn fill_test_stack(&mut self) {
        let Some(stack) = self.test_stack else {
            return;
        };
        let filler = BlockKind::I.id() as i8;
        for y in (self.size_y - stack.height)..self.size_y {
            for x in 0..self.size_x {
                for z in 0..self.size_z {
                    let idx = self.index(x + 1, y + 1, z + 1);
                    self.cells[idx] = filler;
                }
            }
            let hole = self.index(self.size_x, y + 1, self.size_z);
            self.cells[hole] = EMPTY;
        }
    }

    /// Whether a logical coordinate lies inside the playfield.
    pub fn is_inside(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.size_x
            && (y as usize) < self.size_y
            && (z as usize) < self.size_z
    }

    /// Get the cell at a logical coordinate, `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Cell> {
        self.logical_index(x, y, z)
            .map(|idx| BlockKind::from_id(self.cells[idx] as u8))
    }

    /// Set the cell at a logical coordinate.
    /// Returns false if out of bounds (the border is never written).
    pub fn set(&mut self, x: i32, y: i32, z: i32, cell: Cell) -> bool {
        match self.logical_index(x, y, z) {
            Some(idx) => {
                self.cells[idx] = cell.map_or(EMPTY, |kind| kind.id() as i8);
                true
            }
            None => false,
        }
    }

    /// True iff the coordinate is inside the playfield and unoccupied.
    ///
    /// Out-of-bounds coordinates are never empty, which is what rejects moves
    /// through the walls, the floor, or above the top plane.
    pub fn is_empty(&self, x: i32, y: i32, z: i32) -> bool {
        matches!(self.logical_index(x, y, z), Some(idx) if self.cells[idx] == EMPTY)
    }

    pub fn is_empty_at(&self, pos: Coord) -> bool {
        self.is_empty(pos.x, pos.y, pos.z)
    }

    fn plane_cells(&self, y: usize) -> impl Iterator<Item = i8> + '_ {
        (0..self.size_x).flat_map(move |x| {
            (0..self.size_z).map(move |z| self.cells[self.index(x + 1, y + 1, z + 1)])
        })
    }

    /// Check if every cell of plane `y` is occupied.
    /// Planes outside the grid are never full.
    pub fn is_plane_full(&self, y: usize) -> bool {
        y < self.size_y && self.plane_cells(y).all(|c| c != EMPTY)
    }

    /// Check if no cell of plane `y` is occupied.
    /// Planes outside the grid hold nothing and count as empty.
    pub fn is_plane_empty(&self, y: usize) -> bool {
        y >= self.size_y || self.plane_cells(y).all(|c| c == EMPTY)
    }

    /// Number of occupied cells in plane `y`.
    pub fn plane_fill(&self, y: usize) -> usize {
        if y >= self.size_y {
            return 0;
        }
        self.plane_cells(y).filter(|&c| c != EMPTY).count()
    }

    fn clear_plane(&mut self, y: usize) {
        for x in 0..self.size_x {
            for z in 0..self.size_z {
                let idx = self.index(x + 1, y + 1, z + 1);
                self.cells[idx] = EMPTY;
            }
        }
    }

    fn move_plane_down(&mut self, y: usize, planes: usize) {
        for x in 0..self.size_x {
            for z in 0..self.size_z {
                let src = self.index(x + 1, y + 1, z + 1);
                let dst = self.index(x + 1, y + 1 + planes, z + 1);
                self.cells[dst] = self.cells[src];
                self.cells[src] = EMPTY;
            }
        }
    }

    /// Clear all full planes and compact everything above them downward.
    ///
    /// Scans from the floor (`Y - 1`) up to the top (`0`). Full planes are
    /// zeroed and recorded; every other plane is shifted down by the number of
    /// planes cleared so far. Returns the cleared plane indices in scan order
    /// (bottom-first, i.e. descending `y`).
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();

        for y in (0..self.size_y).rev() {
            if self.is_plane_full(y) {
                self.clear_plane(y);
                cleared.push(y);
            } else if !cleared.is_empty() {
                self.move_plane_down(y, cleared.len());
            }
        }

        if matches!(self.test_stack, Some(TestStack { regen: true, .. })) {
            self.fill_test_stack();
        }

        cleared
    }

    /// Iterate occupied cells (for rendering).
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, BlockKind)> + '_ {
        (0..self.size_y).flat_map(move |y| {
            (0..self.size_x).flat_map(move |x| {
                (0..self.size_z).filter_map(move |z| {
                    let raw = self.cells[self.index(x + 1, y + 1, z + 1)];
                    BlockKind::from_id(raw as u8)
                        .filter(|_| raw > 0)
                        .map(|kind| (Coord::new(x as i32, y as i32, z as i32), kind))
                })
            })
        })
    }

    /// Topmost occupied plane of the column at `(x, z)`, if any.
    pub fn column_top(&self, x: usize, z: usize) -> Option<usize> {
        if x >= self.size_x || z >= self.size_z {
            return None;
        }
        (0..self.size_y).find(|&y| self.cells[self.index(x + 1, y + 1, z + 1)] != EMPTY)
    }

    /// Whether every border cell still holds its construction value.
    pub fn border_intact(&self) -> bool {
        let (bx_max, by_max, bz_max) = (self.size_x + 1, self.size_y + 1, self.size_z + 1);
        for by in 0..=by_max {
            for bx in 0..=bx_max {
                for bz in 0..=bz_max {
                    let side = bx == 0 || bx == bx_max || bz == 0 || bz == bz_max;
                    let expected = if side || by == by_max {
                        WALL
                    } else if by == 0 {
                        EMPTY
                    } else {
                        continue;
                    };
                    if self.cells[self.index(bx, by, bz)] != expected {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Empty the playfield (re-applying the test stack if configured).
    pub fn clear(&mut self) {
        for y in 0..self.size_y {
            self.clear_plane(y);
        }
        self.fill_test_stack();
    }
}
