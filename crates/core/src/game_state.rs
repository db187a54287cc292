//! Game state - placement, locking, scoring and the match lifecycle
//!
//! [`GameState`] owns the grid, the block queue, the current block and its
//! shadow, and every run counter. All mutation goes through its methods, which
//! return explicit outcomes; nothing here fails once a match has started.
//!
//! Per block: **Falling → Lock → (planes cleared or not) → Falling(next)**, or
//! **GameOver** when the lock leaves plane 0 occupied or the next block cannot
//! be placed.

use std::time::Duration;

use tracing::{debug, info};

use crate::block::{validate_catalog, Block};
use crate::config::GameConfig;
use crate::control::{movement_delta, world_rotation};
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::queue::BlockQueue;
use crate::scoring::{ScoreResult, ScoreRules};
use crate::snapshot::{BlockSnapshot, GameSnapshot, OccupiedCell};
use crate::types::{Axis, BlockKind, CoreEvent, Coord, Direction, GameCommand, Heading, Spin};

/// Result of a translation or rotation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    Rejected,
}

impl MoveOutcome {
    pub fn is_accepted(self) -> bool {
        self == MoveOutcome::Accepted
    }
}

/// What happened when a block locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    pub kind: BlockKind,
    /// Cleared plane indices, bottom-first.
    pub cleared_planes: Vec<usize>,
    pub is_tetris: bool,
    pub game_over: bool,
    /// Only ever set by hard drops.
    pub heavy_drop: bool,
    /// Cells fallen by a hard drop (0 for fall ticks).
    pub drop_distance: u32,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The block fell one cell (or the fall period has not elapsed yet).
    Continued,
    Locked(LockReport),
    /// Paused or game over.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Locked(LockReport),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The new current block's kind.
    Swapped(BlockKind),
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    rules: ScoreRules,
    grid: Grid,
    queue: BlockQueue,
    current: Block,
    shadow: Block,
    can_save: bool,
    combo_index: u32,
    total_score: u64,
    down_interval: Duration,
    /// Time accumulated towards the next fall step.
    fall_elapsed: Duration,
    status: Status,
    events: Vec<CoreEvent>,
    /// Monotonic match id (increments on reset).
    episode_id: u32,
    seed: u32,
}

impl GameState {
    /// Start a match. Fails on a malformed config or block table.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_catalog()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let grid = Grid::from_config(&config)?;
        let mut queue = BlockQueue::with_forced_kind(
            seed,
            grid.size_x(),
            grid.size_z(),
            config.test.forced_kind,
        );
        let current = queue.get_and_update_block();

        let mut state = Self {
            rules: ScoreRules::from_config(&config),
            down_interval: config.down_interval(),
            shadow: current.clone(),
            current,
            grid,
            queue,
            can_save: true,
            combo_index: 0,
            total_score: 0,
            fall_elapsed: Duration::ZERO,
            status: Status::Running,
            events: Vec::new(),
            episode_id: 0,
            seed,
            config,
        };
        info!(seed, dimensions = ?state.grid.dimensions(), "match started");
        state.enter_current();
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for scenario setup.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn current(&self) -> &Block {
        &self.current
    }

    pub fn shadow(&self) -> &Block {
        &self.shadow
    }

    pub fn next_kind(&self) -> BlockKind {
        self.queue.next_kind()
    }

    pub fn held_kind(&self) -> Option<BlockKind> {
        self.queue.saved_kind()
    }

    pub fn can_save(&self) -> bool {
        self.can_save
    }

    pub fn combo_index(&self) -> u32 {
        self.combo_index
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn down_interval(&self) -> Duration {
        self.down_interval
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Take every event emitted since the last call.
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether every world tile of `block` is an empty in-bounds cell.
    pub fn block_fits(&self, block: &Block) -> bool {
        fits(&self.grid, block)
    }

    /// Replace the current block if the new pose fits.
    pub fn place_current(&mut self, block: Block) -> MoveOutcome {
        if !self.is_running() || !self.block_fits(&block) {
            return MoveOutcome::Rejected;
        }
        self.current = block;
        self.refresh_shadow();
        MoveOutcome::Accepted
    }

    /// Translate the current block one cell in a view-relative direction.
    pub fn try_move(&mut self, direction: Direction, heading: Heading) -> MoveOutcome {
        if !self.is_running() {
            return MoveOutcome::Rejected;
        }

        let delta = movement_delta(direction, heading);
        self.current.translate(delta);
        if !fits(&self.grid, &self.current) {
            self.current.translate(-delta);
            self.events.push(CoreEvent::Unavailable);
            return MoveOutcome::Rejected;
        }

        self.refresh_shadow();
        self.events.push(CoreEvent::Moved);
        MoveOutcome::Accepted
    }

    /// Rotate the current block 90° about a view-relative axis.
    pub fn try_rotate(&mut self, axis: Axis, spin: Spin, heading: Heading) -> MoveOutcome {
        if !self.is_running() {
            return MoveOutcome::Rejected;
        }

        let rotation = world_rotation(axis, spin, heading);
        self.current.rotate(rotation);
        if !fits(&self.grid, &self.current) {
            self.current.rotate(rotation.inverse());
            self.events.push(CoreEvent::Unavailable);
            return MoveOutcome::Rejected;
        }

        self.refresh_shadow();
        self.events.push(CoreEvent::Rotated { rotation });
        MoveOutcome::Accepted
    }

    /// One fall step: move down, or lock if blocked.
    pub fn soft_drop_tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Rejected;
        }
        self.fall_elapsed = Duration::ZERO;

        self.current.translate(Coord::DOWN);
        if fits(&self.grid, &self.current) {
            return TickOutcome::Continued;
        }
        self.current.translate(Coord::UP);

        TickOutcome::Locked(self.lock(false, 0))
    }

    /// Drop to the landing pose and lock.
    ///
    /// Steps are counted up to and including the first blocked one; more than
    /// `heavy_drop_threshold` steps classify the drop as heavy.
    pub fn hard_drop(&mut self) -> DropOutcome {
        if !self.is_running() {
            return DropOutcome::Rejected;
        }
        self.fall_elapsed = Duration::ZERO;

        let mut steps: u32 = 0;
        loop {
            self.current.translate(Coord::DOWN);
            steps += 1;
            if !fits(&self.grid, &self.current) {
                break;
            }
        }
        self.current.translate(Coord::UP);

        let heavy = steps > self.config.heavy_drop_threshold;
        self.events.push(CoreEvent::Dropped { heavy });

        DropOutcome::Locked(self.lock(heavy, steps - 1))
    }

    /// Swap the current block through the hold slot (once per block).
    pub fn hold_swap(&mut self) -> HoldOutcome {
        if !self.is_running() {
            return HoldOutcome::Rejected;
        }
        if !self.can_save {
            self.events.push(CoreEvent::Unavailable);
            return HoldOutcome::Rejected;
        }

        let outgoing = self.current.clone();
        let held = outgoing.kind();
        self.current = self.queue.save_and_update_block(outgoing);
        self.can_save = false;
        self.events.push(CoreEvent::Held { kind: held });
        debug!(held = ?held, current = ?self.current.kind(), "hold swap");

        let kind = self.current.kind();
        if fits(&self.grid, &self.current) {
            self.refresh_shadow();
        } else {
            self.finish();
        }
        HoldOutcome::Swapped(kind)
    }

    /// Stop the fall timer and reject gameplay until resumed.
    pub fn pause(&mut self) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.status = Status::Paused;
        self.fall_elapsed = Duration::ZERO;
        self.events.push(CoreEvent::Paused);
        true
    }

    /// Resume; the next fall step is a full period away.
    pub fn resume(&mut self) -> bool {
        if self.status != Status::Paused {
            return false;
        }
        self.status = Status::Running;
        self.fall_elapsed = Duration::ZERO;
        self.events.push(CoreEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            Status::Running => self.pause(),
            Status::Paused => self.resume(),
            Status::GameOver => false,
        }
    }

    /// Re-initialise grid, queue and run state for a fresh match.
    ///
    /// The queue keeps its RNG sequence, so consecutive matches differ.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.queue.save_block_reset();
        self.current = self.queue.get_and_update_block();
        self.can_save = true;
        self.combo_index = 0;
        self.total_score = 0;
        self.down_interval = self.config.down_interval();
        self.fall_elapsed = Duration::ZERO;
        self.status = Status::Running;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.events.push(CoreEvent::Reset);
        info!(episode = self.episode_id, "match reset");
        self.enter_current();
    }

    /// Advance the fall timer by `elapsed`; runs one fall step when a full
    /// period has accumulated.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Rejected;
        }
        self.fall_elapsed += elapsed;
        if self.fall_elapsed < self.down_interval {
            return TickOutcome::Continued;
        }
        self.soft_drop_tick()
    }

    /// Dispatch a discrete command. Returns whether it took effect.
    pub fn apply_command(&mut self, command: GameCommand, heading: Heading) -> bool {
        match command {
            GameCommand::Move(direction) => self.try_move(direction, heading).is_accepted(),
            GameCommand::Rotate(axis, spin) => self.try_rotate(axis, spin, heading).is_accepted(),
            GameCommand::SoftDrop => !matches!(self.soft_drop_tick(), TickOutcome::Rejected),
            GameCommand::HardDrop => matches!(self.hard_drop(), DropOutcome::Locked(_)),
            GameCommand::Hold => matches!(self.hold_swap(), HoldOutcome::Swapped(_)),
            GameCommand::Pause => self.toggle_pause(),
            GameCommand::Restart => {
                self.reset();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let live = !self.is_game_over();
        out.dimensions = self.grid.dimensions();
        out.current = live.then(|| BlockSnapshot::from(&self.current));
        out.shadow = live.then(|| BlockSnapshot::from(&self.shadow));
        out.next = Some(self.queue.next_kind());
        out.held = self.queue.saved_kind();
        out.can_hold = self.can_save;
        out.paused = self.is_paused();
        out.game_over = self.is_game_over();
        out.total_score = self.total_score;
        out.combo_index = self.combo_index;
        out.down_interval_ms = self.down_interval.as_millis() as u64;
        out.episode_id = self.episode_id;
        out.occupied.clear();
        out.occupied.extend(
            self.grid
                .occupied()
                .map(|(pos, kind)| OccupiedCell { pos, kind }),
        );
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Make the freshly issued current block live, or end the match if it
    /// cannot be placed.
    fn enter_current(&mut self) {
        if !fits(&self.grid, &self.current) {
            self.finish();
            return;
        }
        self.refresh_shadow();
        self.events.push(CoreEvent::Spawned {
            kind: self.current.kind(),
        });
    }

    fn refresh_shadow(&mut self) {
        let mut shadow = self.current.clone();
        loop {
            shadow.translate(Coord::DOWN);
            if !fits(&self.grid, &shadow) {
                break;
            }
        }
        shadow.translate(Coord::UP);
        self.shadow = shadow;
    }

    fn lock(&mut self, heavy_drop: bool, drop_distance: u32) -> LockReport {
        let kind = self.current.kind();
        for pos in self.current.tile_positions() {
            self.grid.set(pos.x, pos.y, pos.z, Some(kind));
        }
        self.events.push(CoreEvent::Locked { kind });

        let cleared_planes = self.grid.clear_full_rows();
        let score = self.rules.score_lock(cleared_planes.len(), self.combo_index);
        self.combo_index = score.combo_index;
        self.total_score = self.total_score.saturating_add(score.delta);
        debug!(kind = ?kind, cleared = ?cleared_planes, delta = score.delta, "block locked");

        let is_tetris = cleared_planes.len() == 4;
        self.events.push(CoreEvent::PlanesCleared {
            planes: cleared_planes.clone(),
        });
        if is_tetris {
            self.events.push(CoreEvent::BigClear);
        }
        if score.delta > 0 {
            self.events.push(CoreEvent::Scored {
                delta: score.delta,
                total: self.total_score,
                combo: self.combo_index,
            });
        }
        if score.speed_up {
            self.down_interval = self.rules.next_interval(self.down_interval);
            let interval_ms = self.down_interval.as_millis() as u64;
            self.events.push(CoreEvent::SpeedUp { interval_ms });
            info!(interval_ms, "fall speed up");
        }

        if self.grid.is_plane_empty(0) {
            self.current = self.queue.get_and_update_block();
            self.can_save = true;
            self.enter_current();
        } else {
            self.finish();
        }

        LockReport {
            kind,
            cleared_planes,
            is_tetris,
            game_over: self.is_game_over(),
            heavy_drop,
            drop_distance,
            score,
        }
    }

    fn finish(&mut self) {
        self.status = Status::GameOver;
        self.fall_elapsed = Duration::ZERO;
        self.events.push(CoreEvent::GameOver {
            score: self.total_score,
        });
        info!(score = self.total_score, episode = self.episode_id, "game over");
    }
}

fn fits(grid: &Grid, block: &Block) -> bool {
    block.tile_positions().all(|pos| grid.is_empty_at(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn small(kind: BlockKind) -> GameState {
        let config = GameConfig::default()
            .with_grid_size(&[4, 6, 4])
            .with_seed(11)
            .with_forced_kind(kind);
        GameState::new(config).unwrap()
    }

    /// Fill `planes` completely except a 2×2 column at `(hx, hz)`.
    fn fill_except_hole(grid: &mut Grid, planes: std::ops::Range<i32>, hx: i32, hz: i32) {
        for y in planes {
            for x in 0..4 {
                for z in 0..4 {
                    let hole = (hx..hx + 2).contains(&x) && (hz..hz + 2).contains(&z);
                    if !hole {
                        grid.set(x, y, z, Some(BlockKind::T));
                    }
                }
            }
        }
    }

    fn drop_o_at(game: &mut GameState, x: i32, z: i32) -> LockReport {
        let mut block = Block::new(BlockKind::O);
        block.set_pos(Coord::new(x, 0, z));
        assert_eq!(game.place_current(block), MoveOutcome::Accepted);
        match game.hard_drop() {
            DropOutcome::Locked(report) => report,
            DropOutcome::Rejected => panic!("hard drop rejected"),
        }
    }

    #[test]
    fn test_combo_scoring_sequence() {
        let mut game = small(BlockKind::O);

        fill_except_hole(game.grid_mut(), 5..6, 0, 0);
        let report = drop_o_at(&mut game, 0, 0);
        assert_eq!(report.cleared_planes, vec![5]);
        assert_eq!(report.score.delta, 100);
        assert_eq!(game.combo_index(), 1);

        game.grid_mut().clear();
        fill_except_hole(game.grid_mut(), 4..6, 2, 2);
        let report = drop_o_at(&mut game, 2, 2);
        assert_eq!(report.cleared_planes, vec![5, 4]);
        assert_eq!(report.score.delta, 400);
        assert_eq!(game.combo_index(), 2);
        assert_eq!(game.total_score(), 500);

        game.grid_mut().clear();
        let report = drop_o_at(&mut game, 0, 0);
        assert!(report.cleared_planes.is_empty());
        assert_eq!(game.combo_index(), 0);
        assert_eq!(game.total_score(), 500);

        game.grid_mut().clear();
        fill_except_hole(game.grid_mut(), 4..6, 2, 2);
        let report = drop_o_at(&mut game, 2, 2);
        assert_eq!(report.score.delta, 200);
        assert_eq!(game.total_score(), 700);
        assert!(!report.game_over);
    }

    #[test]
    fn test_big_clear_speeds_up_fall() {
        let mut game = small(BlockKind::I);
        for y in 2..6 {
            for x in 0..4 {
                for z in 0..4 {
                    if (x, z) != (2, 1) {
                        game.grid_mut().set(x, y, z, Some(BlockKind::L));
                    }
                }
            }
        }

        let mut upright = Block::new(BlockKind::I);
        upright.rotate(Rotation::new(Axis::Z, Spin::Cw));
        upright.set_pos(Coord::ZERO);
        assert_eq!(game.place_current(upright), MoveOutcome::Accepted);
        assert_eq!(game.shadow().pos(), Coord::new(0, 2, 0));
        game.take_events();

        let DropOutcome::Locked(report) = game.hard_drop() else {
            panic!("hard drop rejected");
        };
        assert_eq!(report.cleared_planes, vec![5, 4, 3, 2]);
        assert!(report.is_tetris);
        assert!(report.heavy_drop);
        assert_eq!(report.drop_distance, 2);
        assert_eq!(report.score.delta, 800);
        assert!(report.score.speed_up);
        assert_eq!(game.down_interval(), Duration::from_millis(900));

        let events = game.take_events();
        assert!(events.contains(&CoreEvent::Dropped { heavy: true }));
        assert!(events.contains(&CoreEvent::BigClear));
        assert!(events.contains(&CoreEvent::SpeedUp { interval_ms: 900 }));
        assert_eq!(game.grid().occupied().count(), 0);
    }

    #[test]
    fn test_lock_in_top_plane_ends_match() {
        let mut game = small(BlockKind::I);
        for x in 0..4 {
            for z in 0..4 {
                if (x, z) != (3, 3) {
                    game.grid_mut().set(x, 1, z, Some(BlockKind::S));
                }
            }
        }
        let mut block = Block::new(BlockKind::I);
        block.set_pos(Coord::new(0, -1, 0));
        assert_eq!(game.place_current(block), MoveOutcome::Accepted);

        let TickOutcome::Locked(report) = game.soft_drop_tick() else {
            panic!("expected a lock");
        };
        assert!(report.game_over);
        assert!(game.is_game_over());

        let before = game.grid().clone();
        assert_eq!(game.try_move(Direction::Left, Heading::Deg0), MoveOutcome::Rejected);
        assert_eq!(
            game.try_rotate(Axis::Y, Spin::Cw, Heading::Deg0),
            MoveOutcome::Rejected
        );
        assert_eq!(game.soft_drop_tick(), TickOutcome::Rejected);
        assert_eq!(game.hard_drop(), DropOutcome::Rejected);
        assert_eq!(game.hold_swap(), HoldOutcome::Rejected);
        assert_eq!(game.grid(), &before);
    }

    #[test]
    fn test_hold_is_once_per_block() {
        let config = GameConfig::default().with_seed(2024);
        let mut game = GameState::new(config).unwrap();
        let first = game.current().kind();
        let next = game.next_kind();

        assert_eq!(game.hold_swap(), HoldOutcome::Swapped(next));
        assert_eq!(game.held_kind(), Some(first));
        game.take_events();

        assert_eq!(game.hold_swap(), HoldOutcome::Rejected);
        assert_eq!(game.take_events(), vec![CoreEvent::Unavailable]);

        game.hard_drop();
        assert!(game.can_save());
        assert_eq!(game.hold_swap(), HoldOutcome::Swapped(first));
    }

    #[test]
    fn test_pause_rejects_gameplay() {
        let mut game = GameState::new(GameConfig::default().with_seed(3)).unwrap();
        assert!(game.pause());
        let pos = game.current().pos();
        assert_eq!(game.try_move(Direction::Right, Heading::Deg0), MoveOutcome::Rejected);
        assert_eq!(game.tick(Duration::from_secs(5)), TickOutcome::Rejected);
        assert_eq!(game.current().pos(), pos);
        assert!(game.resume());
        assert!(!game.resume());
    }

    #[test]
    fn test_tick_accumulates_to_one_fall_step() {
        let mut game = GameState::new(GameConfig::default().with_seed(8)).unwrap();
        let y = game.current().pos().y;
        assert_eq!(game.tick(Duration::from_millis(600)), TickOutcome::Continued);
        assert_eq!(game.current().pos().y, y);
        assert_eq!(game.tick(Duration::from_millis(400)), TickOutcome::Continued);
        assert_eq!(game.current().pos().y, y + 1);
    }

    #[test]
    fn test_rejected_move_restores_pose() {
        let mut game = small(BlockKind::O);
        let mut block = Block::new(BlockKind::O);
        block.set_pos(Coord::ZERO);
        game.place_current(block.clone());
        game.take_events();

        assert_eq!(game.try_move(Direction::Left, Heading::Deg0), MoveOutcome::Rejected);
        assert_eq!(game.current(), &block);
        assert_eq!(game.take_events(), vec![CoreEvent::Unavailable]);
    }
}
