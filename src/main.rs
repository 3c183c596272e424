//! Breakout Sim entry point
//!
//! Runs the simulation headless: an autopilot plays the input role, moving
//! the paddle under the ball and relaunching after every lost ball or
//! cleared level. Snapshots go to stdout as JSON lines.
//!
//! Usage: `breakout-sim [settings.json] [seconds]`

use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use breakout_sim::Settings;
use breakout_sim::levels::{BuiltinLevels, DirectoryLevels, LevelLoader};
use breakout_sim::observer::{ChannelPresenter, JsonLinesPresenter, LogTelemetry, Presenter};
use breakout_sim::platform::SharedPaddle;
use breakout_sim::runner::Runner;
use breakout_sim::sim::{GameEvent, Session, SessionPhase};

/// Write every Nth snapshot (event-carrying snapshots are always written)
const SNAPSHOT_EVERY: u64 = 40;
const DEFAULT_RUN_SECS: u64 = 30;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Breakout Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&PathBuf::from(path))?,
        None => Settings::default(),
    };
    let run_for = Duration::from_secs(
        args.next()
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(DEFAULT_RUN_SECS),
    );

    let loader: Box<dyn LevelLoader> = match &settings.level_dir {
        Some(dir) => Box::new(DirectoryLevels::new(dir)),
        None => Box::new(BuiltinLevels),
    };

    let paddle = SharedPaddle::new(
        settings.play_area(),
        settings.paddle_size(),
        settings.paddle_margin,
    );
    let session = Session::new(&settings, loader, &paddle.snapshot())?;

    let (tx, rx) = mpsc::channel();
    let runner = Runner::spawn(
        session,
        paddle.clone(),
        &settings,
        Box::new(ChannelPresenter::new(tx)),
        Some(Box::new(LogTelemetry)),
    )?;
    runner.start();

    let mut out = JsonLinesPresenter::new(std::io::stdout(), SNAPSHOT_EVERY);
    let deadline = Instant::now() + run_for;

    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        let snapshot = match rx.recv_timeout(remaining) {
            Ok(snapshot) => snapshot,
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Driver exited early");
                break;
            }
        };

        if let Err(e) = out.present(&snapshot) {
            log::warn!("Could not write snapshot: {}", e);
        }

        // Autopilot: keep the paddle under the ball, off-center by a slowly
        // drifting amount so bounces get steered
        let half = snapshot.paddle.size.x / 2.0;
        let drift = (snapshot.tick as f32 * 0.05).sin() * half * 0.6;
        paddle.set_paddle_x(snapshot.ball.center().x - half + drift);

        if snapshot.events.contains(&GameEvent::GameFinished) {
            log::info!("All levels cleared");
            break;
        }
        if matches!(
            snapshot.phase,
            SessionPhase::NotStarted | SessionPhase::LevelComplete
        ) {
            runner.start();
        }
    }

    let session = runner.stop().ok_or("driver thread panicked")?;
    let stats = session.stats();
    println!(
        "level {} | ticks {} | bricks destroyed {} | balls lost {} | levels cleared {}",
        session.level(),
        stats.ticks,
        stats.bricks_destroyed,
        stats.balls_lost,
        stats.levels_cleared
    );
    Ok(())
}
