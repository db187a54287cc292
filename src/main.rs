//! Terminal 3D block game (default binary).
//!
//! The session runs on the tokio runtime and owns the game; the terminal loop
//! runs on a blocking thread, turning key presses into session commands and
//! drawing the latest published snapshot.

use std::env;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tetris3d::core::{GameConfig, GameSnapshot, GameState, HeadingProvider, ScoreBoard};
use tetris3d::engine::{CameraRig, ChannelSink, Session, SessionCommand};
use tetris3d::input::{map_key, should_quit, InputAction, KeyGate};
use tetris3d::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris3d::types::CoreEvent;

const DEFAULT_FILTER: &str = "tetris3d=info,tetris3d_core=info,tetris3d_engine=info";
const DEFAULT_SCORES_PATH: &str = "scores.json";
const FRAME: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = GameConfig::from_env();
    let game = GameState::new(config).context("invalid game configuration")?;

    let camera = CameraRig::new();
    let (command_tx, command_rx) = mpsc::channel(64);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());

    let session = Session::new(game, camera.clone(), ChannelSink(event_tx))
        .with_snapshots(snapshot_tx);
    let session_task = tokio::spawn(session.run(command_rx));

    // Ends once the session (and with it the sink) is gone.
    let events_task = tokio::spawn(async move {
        let mut finished = Vec::new();
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "core event");
            if let CoreEvent::GameOver { score } = event {
                finished.push(score);
            }
        }
        finished
    });

    let ui_result = tokio::task::spawn_blocking(move || run_ui(camera, command_tx, snapshot_rx))
        .await
        .context("terminal thread panicked")?;

    let game = session_task.await.context("session task panicked")?;
    let finished = events_task.await.context("event task panicked")?;
    info!(score = game.total_score(), matches = finished.len(), "exiting");

    record_scores(&finished)?;
    ui_result
}

/// Log to `TETRIS3D_LOG_PATH`; the terminal owns stdout and stderr, so nothing
/// is logged without it.
fn init_tracing() -> Result<()> {
    let Ok(path) = env::var("TETRIS3D_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .init();
    Ok(())
}

fn record_scores(scores: &[u64]) -> Result<()> {
    if scores.is_empty() {
        return Ok(());
    }
    let path = env::var("TETRIS3D_SCORES").unwrap_or_else(|_| DEFAULT_SCORES_PATH.to_string());
    let name = env::var("USER").unwrap_or_else(|_| "player".to_string());

    let mut board = ScoreBoard::load(&path).with_context(|| format!("reading {path}"))?;
    for &score in scores {
        board.add_entry(name.clone(), score);
    }
    board.save(&path).with_context(|| format!("writing {path}"))?;
    info!(path, best = ?board.best().map(|e| e.score), "scores saved");
    Ok(())
}

fn run_ui(
    camera: CameraRig,
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<GameSnapshot>,
) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = ui_loop(&mut term, &camera, &commands, &snapshots);

    // Always try to restore terminal state.
    let _ = term.exit();
    let _ = commands.blocking_send(SessionCommand::Shutdown);
    result
}

fn ui_loop(
    term: &mut TerminalRenderer,
    camera: &CameraRig,
    commands: &mpsc::Sender<SessionCommand>,
    snapshots: &watch::Receiver<GameSnapshot>,
) -> Result<()> {
    let view = GameView::default();
    let mut gate = KeyGate::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_frame = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snapshots.borrow(), camera.heading(), Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    let Some(action) = map_key(key) else {
                        continue;
                    };
                    if !gate.try_fire(action) {
                        continue;
                    }
                    match action {
                        InputAction::Command(command) => {
                            if commands.blocking_send(SessionCommand::Play(command)).is_err() {
                                return Ok(());
                            }
                        }
                        InputAction::OrbitLeft => {
                            camera.orbit_left();
                        }
                        InputAction::OrbitRight => {
                            camera.orbit_right();
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        gate.update(last_frame.elapsed().as_millis() as u32);
        last_frame = Instant::now();
    }
}
