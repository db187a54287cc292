//! Session loop: fall ticks and player commands on one task.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use tetris3d_core::{GameSnapshot, GameState, HeadingProvider};
use tetris3d_types::{CoreEvent, GameCommand};

use crate::timer::FallTimer;

/// Inbound messages for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// A player command; the heading is polled when it is applied.
    Play(GameCommand),
    Pause,
    Resume,
    Reset,
    /// Stop the loop and hand back the final state.
    Shutdown,
}

/// Fire-and-forget consumer of core events.
pub trait EventSink {
    fn emit(&mut self, event: CoreEvent);
}

/// Forwards events over an unbounded channel; a dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::UnboundedSender<CoreEvent>);

impl EventSink for ChannelSink {
    fn emit(&mut self, event: CoreEvent) {
        let _ = self.0.send(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CoreEvent) {}
}

impl EventSink for Vec<CoreEvent> {
    fn emit(&mut self, event: CoreEvent) {
        self.push(event);
    }
}

enum Step {
    Fall,
    Command(SessionCommand),
    Closed,
}

pub struct Session<H, S> {
    game: GameState,
    timer: FallTimer,
    heading: H,
    sink: S,
    snapshots: Option<watch::Sender<GameSnapshot>>,
}

impl<H: HeadingProvider, S: EventSink> Session<H, S> {
    pub fn new(game: GameState, heading: H, sink: S) -> Self {
        Self {
            game,
            timer: FallTimer::new(),
            heading,
            sink,
            snapshots: None,
        }
    }

    /// Publish a snapshot after every step.
    pub fn with_snapshots(mut self, snapshots: watch::Sender<GameSnapshot>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn timer(&self) -> &FallTimer {
        &self.timer
    }

    /// Apply one command synchronously. Returns false on `Shutdown`.
    pub fn handle(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Shutdown => return false,
            SessionCommand::Pause => {
                self.game.pause();
            }
            SessionCommand::Resume => {
                self.game.resume();
            }
            SessionCommand::Reset => {
                self.timer.cancel();
                self.game.reset();
            }
            SessionCommand::Play(cmd) => {
                if cmd == GameCommand::Restart {
                    self.timer.cancel();
                }
                let heading = self.heading.heading();
                self.game.apply_command(cmd, heading);
            }
        }
        self.settle();
        true
    }

    /// One fall step from the timer.
    pub fn fall(&mut self) {
        self.game.soft_drop_tick();
        self.settle();
    }

    /// Drive the session until `Shutdown` or the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> GameState {
        info!(episode = self.game.episode_id(), "session started");
        self.settle();

        loop {
            let step = tokio::select! {
                _ = self.timer.tick() => Step::Fall,
                command = commands.recv() => match command {
                    Some(command) => Step::Command(command),
                    None => Step::Closed,
                },
            };

            match step {
                Step::Fall => self.fall(),
                Step::Command(command) => {
                    if !self.handle(command) {
                        break;
                    }
                }
                Step::Closed => break,
            }
        }

        self.timer.cancel();
        info!(score = self.game.total_score(), "session stopped");
        self.game
    }

    /// Align the timer with the game, then push events and the snapshot out.
    fn settle(&mut self) {
        self.sync_timer();
        for event in self.game.take_events() {
            self.sink.emit(event);
        }
        if let Some(snapshots) = &self.snapshots {
            snapshots.send_modify(|snapshot| self.game.snapshot_into(snapshot));
        }
    }

    fn sync_timer(&mut self) {
        if !self.game.is_running() {
            if self.timer.is_running() {
                self.timer.cancel();
                debug!("fall timer cancelled");
            }
            return;
        }
        let period = self.game.down_interval();
        if self.timer.period() != Some(period) {
            self.timer.start(period);
            debug!(period_ms = period.as_millis() as u64, "fall timer started");
        }
    }
}
