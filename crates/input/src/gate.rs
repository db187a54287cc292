//! Per-binding repeat gate.
//!
//! Each action may fire at most once per its interval. Driven by elapsed
//! milliseconds so it stays deterministic under test.

use arrayvec::ArrayVec;

use crate::map::InputAction;
use crate::types::GameCommand;

/// Default minimum gap between two firings of one binding.
pub const DEFAULT_REPEAT_MS: u32 = 200;
pub const SOFT_DROP_REPEAT_MS: u32 = 100;
pub const PAUSE_REPEAT_MS: u32 = 2000;

const MAX_COOLDOWNS: usize = 32;

#[derive(Debug, Clone)]
pub struct KeyGate {
    cooldowns: ArrayVec<(InputAction, u32), MAX_COOLDOWNS>,
    default_ms: u32,
    soft_drop_ms: u32,
    pause_ms: u32,
}

impl KeyGate {
    pub fn new() -> Self {
        Self::with_intervals(DEFAULT_REPEAT_MS, SOFT_DROP_REPEAT_MS, PAUSE_REPEAT_MS)
    }

    pub fn with_intervals(default_ms: u32, soft_drop_ms: u32, pause_ms: u32) -> Self {
        Self {
            cooldowns: ArrayVec::new(),
            default_ms,
            soft_drop_ms,
            pause_ms,
        }
    }

    pub fn interval_for(&self, action: InputAction) -> u32 {
        match action {
            InputAction::Command(GameCommand::SoftDrop) => self.soft_drop_ms,
            InputAction::Command(GameCommand::Pause) => self.pause_ms,
            _ => self.default_ms,
        }
    }

    /// Fire `action` if its cooldown has expired, starting a new cooldown.
    pub fn try_fire(&mut self, action: InputAction) -> bool {
        if self.remaining_ms(action).is_some() {
            return false;
        }
        let interval = self.interval_for(action);
        if interval > 0 {
            // A full table only loses rate limiting, never input.
            let _ = self.cooldowns.try_push((action, interval));
        }
        true
    }

    /// Time left before `action` may fire again.
    pub fn remaining_ms(&self, action: InputAction) -> Option<u32> {
        self.cooldowns
            .iter()
            .find(|(a, _)| *a == action)
            .map(|&(_, ms)| ms)
    }

    /// Advance every cooldown by `elapsed_ms`, dropping expired ones.
    pub fn update(&mut self, elapsed_ms: u32) {
        for (_, ms) in self.cooldowns.iter_mut() {
            *ms = ms.saturating_sub(elapsed_ms);
        }
        self.cooldowns.retain(|(_, ms)| *ms > 0);
    }

    pub fn clear(&mut self) {
        self.cooldowns.clear();
    }
}

impl Default for KeyGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    const LEFT: InputAction = InputAction::Command(GameCommand::Move(Direction::Left));

    #[test]
    fn test_blocks_until_interval_elapses() {
        let mut gate = KeyGate::new();
        assert!(gate.try_fire(LEFT));
        assert!(!gate.try_fire(LEFT));
        gate.update(150);
        assert!(!gate.try_fire(LEFT));
        gate.update(50);
        assert!(gate.try_fire(LEFT));
    }

    #[test]
    fn test_bindings_are_independent() {
        let mut gate = KeyGate::new();
        assert!(gate.try_fire(LEFT));
        assert!(gate.try_fire(InputAction::OrbitRight));
        assert!(gate.try_fire(InputAction::Command(GameCommand::HardDrop)));
    }

    #[test]
    fn test_per_action_intervals() {
        let mut gate = KeyGate::new();
        let soft = InputAction::Command(GameCommand::SoftDrop);
        let pause = InputAction::Command(GameCommand::Pause);
        gate.try_fire(soft);
        gate.try_fire(pause);
        assert_eq!(gate.remaining_ms(soft), Some(100));
        assert_eq!(gate.remaining_ms(pause), Some(2000));
        gate.update(100);
        assert!(gate.try_fire(soft));
        assert!(!gate.try_fire(pause));
    }
}
