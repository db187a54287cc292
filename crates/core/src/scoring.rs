//! Scoring module - combo-scaled plane clear scoring and the speed ramp
//!
//! For a lock that clears `n` planes with combo index `k` (already counting
//! this lock), the score delta is `base_score * score_values[n-1] ^ k`.
//! A delta of at least `base_score * score_values[3]` speeds up the fall
//! timer by a geometric factor, down to a floor.

use std::time::Duration;

use crate::config::GameConfig;

/// Tunables for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRules {
    pub base_score: u64,
    pub score_values: [u64; 4],
    pub speed_up_factor: f64,
    pub min_down_interval: Duration,
}

/// Score calculation result for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub delta: u64,
    /// Combo index after this lock (0 when nothing cleared).
    pub combo_index: u32,
    /// Whether this lock triggers a fall speed-up.
    pub speed_up: bool,
}

impl ScoreRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            base_score: config.base_score,
            score_values: config.score_values,
            speed_up_factor: config.speed_up_factor,
            min_down_interval: config.min_down_interval(),
        }
    }

    /// Delta for clearing `cleared` planes at combo index `combo_index`.
    /// Returns 0 for no clear. Counts above 4 use the 4-plane value.
    pub fn clear_score(&self, cleared: usize, combo_index: u32) -> u64 {
        if cleared == 0 {
            return 0;
        }
        let value = self.score_values[cleared.min(4) - 1];
        self.base_score
            .saturating_mul(value.saturating_pow(combo_index))
    }

    pub fn triggers_speed_up(&self, delta: u64) -> bool {
        delta >= self.base_score.saturating_mul(self.score_values[3])
    }

    /// Fall period after one speed-up step.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let ms = (current.as_millis() as f64 * self.speed_up_factor).round() as u64;
        Duration::from_millis(ms).max(self.min_down_interval)
    }

    /// Score a lock given the combo index before it.
    pub fn score_lock(&self, cleared: usize, previous_combo: u32) -> ScoreResult {
        if cleared == 0 {
            return ScoreResult::default();
        }
        let combo_index = previous_combo.saturating_add(1);
        let delta = self.clear_score(cleared, combo_index);
        ScoreResult {
            delta,
            combo_index,
            speed_up: self.triggers_speed_up(delta),
        }
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_score_table() {
        let rules = ScoreRules::default();
        assert_eq!(rules.clear_score(0, 1), 0);
        assert_eq!(rules.clear_score(1, 1), 100);
        assert_eq!(rules.clear_score(2, 2), 400);
        assert_eq!(rules.clear_score(4, 1), 800);
        assert_eq!(rules.clear_score(3, 3), 6400);
    }

    #[test]
    fn test_combo_chain() {
        let rules = ScoreRules::default();
        let first = rules.score_lock(1, 0);
        assert_eq!(first, ScoreResult { delta: 100, combo_index: 1, speed_up: false });

        let second = rules.score_lock(2, first.combo_index);
        assert_eq!(second.delta, 400);
        assert_eq!(second.combo_index, 2);

        let miss = rules.score_lock(0, second.combo_index);
        assert_eq!(miss.combo_index, 0);
        assert_eq!(miss.delta, 0);
    }

    #[test]
    fn test_speed_up_threshold() {
        let rules = ScoreRules::default();
        assert!(!rules.triggers_speed_up(799));
        assert!(rules.triggers_speed_up(800));
        // Single-plane clears never reach it, two-plane clears do at combo 3.
        assert!(!rules.score_lock(1, 10).speed_up);
        assert!(rules.score_lock(2, 2).speed_up);
    }

    #[test]
    fn test_interval_floor() {
        let rules = ScoreRules::default();
        assert_eq!(
            rules.next_interval(Duration::from_millis(1000)),
            Duration::from_millis(900)
        );
        assert_eq!(
            rules.next_interval(Duration::from_millis(105)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_huge_combo_saturates() {
        let rules = ScoreRules::default();
        assert_eq!(rules.clear_score(4, 200), u64::MAX);
    }
}
