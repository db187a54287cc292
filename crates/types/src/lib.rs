//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental vocabulary used throughout the workspace:
//! integer lattice coordinates, the view-relative direction tables, block kinds,
//! rotation operators, player commands and the events the core emits.
//! Everything here is plain data, usable from core logic, the async session
//! driver and the terminal front-end alike.
//!
//! # Lattice Orientation
//!
//! The playfield is an `X × Y × Z` lattice of unit cubes:
//!
//! - **X / Z**: the horizontal floor axes
//! - **Y**: the vertical axis, growing *downwards* (`y = 0` is the open top plane,
//!   `y = SizeY - 1` is the floor)
//!
//! Pieces spawn on plane `y = 0` and fall towards larger `y`.
//!
//! # Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_SIZE` | 10×22×10 | Logical playfield extents |
//! | `BASE_SCORE` | 100 | Score unit for one cleared plane |
//! | `SCORE_VALUES` | 1, 2, 4, 8 | Per-clear-count base, raised to the combo index |
//! | `HEAVY_DROP_THRESHOLD` | 2 | Hard drops longer than this are "heavy" |
//! | `DOWN_INTERVAL_MS` | 1000 | Initial fall period |
//! | `SPEED_UP_FACTOR` | 0.9 | Geometric fall period scale on big clears |
//! | `MIN_DOWN_INTERVAL_MS` | 100 | Fall period floor |
//!
//! # Examples
//!
//! ```
//! use tetris3d_types::{BlockKind, Coord, Direction, GameCommand, Heading};
//!
//! // Block ids are 1-based and stable
//! assert_eq!(BlockKind::I.id(), 1);
//! assert_eq!(BlockKind::from_id(4), Some(BlockKind::O));
//!
//! // "Left" depends on where the camera is looking
//! assert_eq!(Direction::Left.delta(Heading::Deg0), Coord::new(-1, 0, 0));
//! assert_eq!(Direction::Left.delta(Heading::Deg90), Coord::new(0, 0, 1));
//!
//! // Parse a command
//! let cmd = GameCommand::from_str("hardDrop").unwrap();
//! assert_eq!(cmd, GameCommand::HardDrop);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Default logical playfield extents `[X, Y, Z]`.
pub const DEFAULT_GRID_SIZE: [usize; 3] = [10, 22, 10];

/// Smallest accepted extent along any axis (the I block needs a 4-wide box).
pub const MIN_GRID_EXTENT: usize = 4;

/// Score unit for clearing planes.
pub const BASE_SCORE: u64 = 100;

/// Per-clear-count base values, indexed by `cleared - 1`.
///
/// The score for a lock is `BASE_SCORE * SCORE_VALUES[n - 1] ^ combo_index`.
pub const SCORE_VALUES: [u64; 4] = [1, 2, 4, 8];

/// Hard drops that fall more than this many cells are reported as heavy.
pub const HEAVY_DROP_THRESHOLD: u32 = 2;

/// Initial fall period in milliseconds.
pub const DOWN_INTERVAL_MS: u64 = 1000;

/// Factor applied to the fall period on every speed-up.
pub const SPEED_UP_FACTOR: f64 = 0.9;

/// Fall period floor in milliseconds.
pub const MIN_DOWN_INTERVAL_MS: u64 = 100;

/// Height of the pre-filled near-topout stack used by the test configuration.
pub const DEFAULT_TEST_STACK_HEIGHT: usize = 7;

/// Number of distinct block kinds.
pub const BLOCK_KIND_COUNT: usize = 7;

/// Upper bound on tiles in any block (the O block is a 2×2×2 cube).
pub const MAX_TILES: usize = 8;

/// Integer lattice coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord::new(0, 0, 0);

    /// One step towards the open top of the lattice.
    pub const UP: Coord = Coord::new(0, -1, 0);

    /// One step towards the floor.
    pub const DOWN: Coord = Coord::new(0, 1, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        self + -rhs
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        *self = *self + rhs;
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Coord) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// World delta for "move right", indexed by heading quadrant.
pub const RIGHT: [Coord; 4] = [
    Coord::new(1, 0, 0),
    Coord::new(0, 0, -1),
    Coord::new(-1, 0, 0),
    Coord::new(0, 0, 1),
];

/// World delta for "move left", indexed by heading quadrant.
pub const LEFT: [Coord; 4] = [
    Coord::new(-1, 0, 0),
    Coord::new(0, 0, 1),
    Coord::new(1, 0, 0),
    Coord::new(0, 0, -1),
];

/// World delta for "move forward", indexed by heading quadrant.
pub const FORWARD: [Coord; 4] = [
    Coord::new(0, 0, 1),
    Coord::new(1, 0, 0),
    Coord::new(0, 0, -1),
    Coord::new(-1, 0, 0),
];

/// World delta for "move backward", indexed by heading quadrant.
pub const BACKWARD: [Coord; 4] = [
    Coord::new(0, 0, -1),
    Coord::new(-1, 0, 0),
    Coord::new(0, 0, 1),
    Coord::new(1, 0, 0),
];

/// Camera heading quadrant around the vertical axis.
///
/// The camera orbits the lattice horizontally; its yaw is bucketed into four
/// 90° sectors which decide what "left" or "rotate about X" means to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Deg0, Heading::Deg90, Heading::Deg180, Heading::Deg270];

    /// Quadrant index (0..=3) used to address the direction tables.
    pub fn index(self) -> usize {
        match self {
            Heading::Deg0 => 0,
            Heading::Deg90 => 1,
            Heading::Deg180 => 2,
            Heading::Deg270 => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Bucket a camera yaw angle (degrees, any range) into its quadrant.
    ///
    /// Sector boundaries are inclusive at the upper edge:
    /// `(315, 45]` → 0, `(45, 135]` → 1, `(135, 225]` → 2, `(225, 315]` → 3.
    ///
    /// ```
    /// use tetris3d_types::Heading;
    ///
    /// assert_eq!(Heading::from_yaw(0.0), Heading::Deg0);
    /// assert_eq!(Heading::from_yaw(45.0), Heading::Deg0);
    /// assert_eq!(Heading::from_yaw(45.5), Heading::Deg90);
    /// assert_eq!(Heading::from_yaw(-90.0), Heading::Deg270);
    /// ```
    pub fn from_yaw(yaw_deg: f32) -> Self {
        let yaw = yaw_deg.rem_euclid(360.0);
        if yaw <= 45.0 || yaw > 315.0 {
            Heading::Deg0
        } else if yaw <= 135.0 {
            Heading::Deg90
        } else if yaw <= 225.0 {
            Heading::Deg180
        } else {
            Heading::Deg270
        }
    }

    /// Next quadrant in increasing yaw.
    pub fn turn_cw(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    /// Previous quadrant in increasing yaw.
    pub fn turn_ccw(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }
}

/// View-relative horizontal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
}

impl Direction {
    /// World-space delta for this direction as seen from `heading`.
    pub fn delta(self, heading: Heading) -> Coord {
        let table = match self {
            Direction::Left => &LEFT,
            Direction::Right => &RIGHT,
            Direction::Forward => &FORWARD,
            Direction::Backward => &BACKWARD,
        };
        table[heading.index()]
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// World rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Turn sense of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Cw,
    Ccw,
}

impl Spin {
    pub fn inverse(self) -> Self {
        match self {
            Spin::Cw => Spin::Ccw,
            Spin::Ccw => Spin::Cw,
        }
    }
}

/// A concrete 90° rotation operator about a world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation {
    pub axis: Axis,
    pub spin: Spin,
}

impl Rotation {
    pub const fn new(axis: Axis, spin: Spin) -> Self {
        Self { axis, spin }
    }

    /// The operator that undoes this one.
    pub fn inverse(self) -> Self {
        Self {
            axis: self.axis,
            spin: self.spin.inverse(),
        }
    }

    /// All six operators.
    pub const ALL: [Rotation; 6] = [
        Rotation::new(Axis::X, Spin::Cw),
        Rotation::new(Axis::X, Spin::Ccw),
        Rotation::new(Axis::Y, Spin::Cw),
        Rotation::new(Axis::Y, Spin::Ccw),
        Rotation::new(Axis::Z, Spin::Cw),
        Rotation::new(Axis::Z, Spin::Ccw),
    ];
}

/// The seven block kinds.
///
/// Ids are 1-based and are what the grid stores for occupied cells:
/// - **I** (1): 4-long bar in a 4³ box
/// - **L** (2), **T** (3), **J** (5), **Z** (6), **S** (7): tetrominoes in a 3³ box
/// - **O** (4): a full 2×2×2 cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    I,
    L,
    T,
    O,
    J,
    Z,
    S,
}

impl BlockKind {
    pub const ALL: [BlockKind; BLOCK_KIND_COUNT] = [
        BlockKind::I,
        BlockKind::L,
        BlockKind::T,
        BlockKind::O,
        BlockKind::J,
        BlockKind::Z,
        BlockKind::S,
    ];

    /// Stable 1-based id.
    pub fn id(self) -> u8 {
        match self {
            BlockKind::I => 1,
            BlockKind::L => 2,
            BlockKind::T => 3,
            BlockKind::O => 4,
            BlockKind::J => 5,
            BlockKind::Z => 6,
            BlockKind::S => 7,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Parse a block kind from its letter (case-insensitive)
    ///
    /// ```
    /// use tetris3d_types::BlockKind;
    ///
    /// assert_eq!(BlockKind::from_str("i"), Some(BlockKind::I));
    /// assert_eq!(BlockKind::from_str("O"), Some(BlockKind::O));
    /// assert_eq!(BlockKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "i" => Some(BlockKind::I),
            "l" => Some(BlockKind::L),
            "t" => Some(BlockKind::T),
            "o" => Some(BlockKind::O),
            "j" => Some(BlockKind::J),
            "z" => Some(BlockKind::Z),
            "s" => Some(BlockKind::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::I => "i",
            BlockKind::L => "l",
            BlockKind::T => "t",
            BlockKind::O => "o",
            BlockKind::J => "j",
            BlockKind::Z => "z",
            BlockKind::S => "s",
        }
    }
}

/// Discrete player commands.
///
/// Movement and rotation are expressed in the player's view frame; the core
/// remaps them to world operators using the current [`Heading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Translate one cell in a view-relative direction
    Move(Direction),
    /// Rotate 90° about a view-relative axis
    Rotate(Axis, Spin),
    /// Drop one cell, locking if blocked
    SoftDrop,
    /// Drop to the landing pose and lock
    HardDrop,
    /// Swap the current block with the held one (once per block)
    Hold,
    /// Toggle pause
    Pause,
    /// Start a fresh match
    Restart,
}

impl GameCommand {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use tetris3d_types::{Axis, Direction, GameCommand, Spin};
    ///
    /// assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::Move(Direction::Left)));
    /// assert_eq!(GameCommand::from_str("rotateZCcw"), Some(GameCommand::Rotate(Axis::Z, Spin::Ccw)));
    /// assert_eq!(GameCommand::from_str("nope"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let cmd = match s.to_lowercase().as_str() {
            "moveleft" => GameCommand::Move(Direction::Left),
            "moveright" => GameCommand::Move(Direction::Right),
            "moveforward" => GameCommand::Move(Direction::Forward),
            "movebackward" => GameCommand::Move(Direction::Backward),
            "rotatexcw" => GameCommand::Rotate(Axis::X, Spin::Cw),
            "rotatexccw" => GameCommand::Rotate(Axis::X, Spin::Ccw),
            "rotateycw" => GameCommand::Rotate(Axis::Y, Spin::Cw),
            "rotateyccw" => GameCommand::Rotate(Axis::Y, Spin::Ccw),
            "rotatezcw" => GameCommand::Rotate(Axis::Z, Spin::Cw),
            "rotatezccw" => GameCommand::Rotate(Axis::Z, Spin::Ccw),
            "softdrop" => GameCommand::SoftDrop,
            "harddrop" => GameCommand::HardDrop,
            "hold" => GameCommand::Hold,
            "pause" => GameCommand::Pause,
            "restart" => GameCommand::Restart,
            _ => return None,
        };
        Some(cmd)
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::Move(Direction::Left) => "moveLeft",
            GameCommand::Move(Direction::Right) => "moveRight",
            GameCommand::Move(Direction::Forward) => "moveForward",
            GameCommand::Move(Direction::Backward) => "moveBackward",
            GameCommand::Rotate(Axis::X, Spin::Cw) => "rotateXCw",
            GameCommand::Rotate(Axis::X, Spin::Ccw) => "rotateXCcw",
            GameCommand::Rotate(Axis::Y, Spin::Cw) => "rotateYCw",
            GameCommand::Rotate(Axis::Y, Spin::Ccw) => "rotateYCcw",
            GameCommand::Rotate(Axis::Z, Spin::Cw) => "rotateZCw",
            GameCommand::Rotate(Axis::Z, Spin::Ccw) => "rotateZCcw",
            GameCommand::SoftDrop => "softDrop",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::Hold => "hold",
            GameCommand::Pause => "pause",
            GameCommand::Restart => "restart",
        }
    }

    /// Whether the command is rejected while paused.
    pub fn is_gameplay(&self) -> bool {
        !matches!(self, GameCommand::Pause | GameCommand::Restart)
    }
}

/// Feedback events emitted by the core.
///
/// Collaborators (audio, effects, UI) consume these fire-and-forget; the core
/// never waits on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A new current block was issued
    Spawned { kind: BlockKind },
    /// A translation was accepted
    Moved,
    /// A rotation was accepted (world operator actually applied)
    Rotated { rotation: Rotation },
    /// A move, rotation or hold was rejected
    Unavailable,
    /// The current block landed; `heavy` for long hard drops
    Dropped { heavy: bool },
    /// The landed block was written into the grid
    Locked { kind: BlockKind },
    /// Result of the plane sweep after a lock (possibly empty), bottom-first
    PlanesCleared { planes: Vec<usize> },
    /// Four planes cleared in one lock
    BigClear,
    /// Score changed after a clearing lock
    Scored { delta: u64, total: u64, combo: u32 },
    /// The fall period shrank
    SpeedUp { interval_ms: u64 },
    /// The current block was banked in the hold slot
    Held { kind: BlockKind },
    Paused,
    Resumed,
    GameOver { score: u64 },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tables_match_published_values() {
        assert_eq!(Direction::Left.delta(Heading::Deg0), Coord::new(-1, 0, 0));
        assert_eq!(Direction::Left.delta(Heading::Deg90), Coord::new(0, 0, 1));
        assert_eq!(Direction::Right.delta(Heading::Deg180), Coord::new(-1, 0, 0));
        assert_eq!(Direction::Forward.delta(Heading::Deg270), Coord::new(-1, 0, 0));
        assert_eq!(Direction::Backward.delta(Heading::Deg90), Coord::new(-1, 0, 0));
    }

    #[test]
    fn opposite_directions_cancel_at_every_heading() {
        for heading in Heading::ALL {
            for dir in [
                Direction::Left,
                Direction::Right,
                Direction::Forward,
                Direction::Backward,
            ] {
                assert_eq!(
                    dir.delta(heading) + dir.opposite().delta(heading),
                    Coord::ZERO
                );
            }
        }
    }

    #[test]
    fn coord_arithmetic() {
        let a = Coord::new(1, 2, 3);
        let b = Coord::new(-4, 5, 0);
        assert_eq!(a + b, Coord::new(-3, 7, 3));
        assert_eq!(a - a, Coord::ZERO);
        assert_eq!(-(Coord::UP), Coord::DOWN);
    }

    #[test]
    fn block_ids_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind));
            assert_eq!(BlockKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(BlockKind::from_id(0), None);
        assert_eq!(BlockKind::from_id(8), None);
    }

    #[test]
    fn heading_turns_wrap() {
        assert_eq!(Heading::Deg270.turn_cw(), Heading::Deg0);
        assert_eq!(Heading::Deg0.turn_ccw(), Heading::Deg270);
        assert_eq!(Heading::from_index(4), None);
    }

    #[test]
    fn heading_yaw_sector_boundaries() {
        assert_eq!(Heading::from_yaw(315.0), Heading::Deg270);
        assert_eq!(Heading::from_yaw(315.1), Heading::Deg0);
        assert_eq!(Heading::from_yaw(135.0), Heading::Deg90);
        assert_eq!(Heading::from_yaw(225.0), Heading::Deg180);
        assert_eq!(Heading::from_yaw(720.0), Heading::Deg0);
    }

    #[test]
    fn command_names_round_trip() {
        let all = [
            GameCommand::Move(Direction::Left),
            GameCommand::Move(Direction::Backward),
            GameCommand::Rotate(Axis::X, Spin::Cw),
            GameCommand::Rotate(Axis::Y, Spin::Ccw),
            GameCommand::SoftDrop,
            GameCommand::HardDrop,
            GameCommand::Hold,
            GameCommand::Pause,
            GameCommand::Restart,
        ];
        for cmd in all {
            assert_eq!(GameCommand::from_str(cmd.as_str()), Some(cmd));
        }
    }

    #[test]
    fn tuning_defaults() {
        assert_eq!(BASE_SCORE, 100);
        assert_eq!(SCORE_VALUES, [1, 2, 4, 8]);
        assert_eq!(HEAVY_DROP_THRESHOLD, 2);
        assert_eq!(DEFAULT_GRID_SIZE, [10, 22, 10]);
    }
}
