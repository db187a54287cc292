//! Cancellable repeating fall timer.

use std::future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Fires once per fall period while running; pending forever when stopped.
#[derive(Debug, Default)]
pub struct FallTimer {
    interval: Option<Interval>,
}

impl FallTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start with a fresh schedule: the first tick is one full `period`
    /// from now. Any partial period from before is discarded.
    pub fn start(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn cancel(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Wait for the next tick. Never completes while cancelled.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_one_full_period_away() {
        let mut timer = FallTimer::new();
        let start = Instant::now();
        timer.start(Duration::from_millis(1000));

        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let mut timer = FallTimer::new();
        timer.start(Duration::from_millis(100));
        timer.cancel();
        assert!(!timer.is_running());
        assert!(timeout(Duration::from_secs(10), timer.tick()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_discards_partial_period() {
        let mut timer = FallTimer::new();
        timer.start(Duration::from_millis(1000));
        tokio::time::sleep(Duration::from_millis(700)).await;

        let restarted = Instant::now();
        timer.start(Duration::from_millis(900));
        assert_eq!(timer.period(), Some(Duration::from_millis(900)));
        timer.tick().await;
        assert_eq!(restarted.elapsed(), Duration::from_millis(900));
    }
}
