//! Threaded tick driver
//!
//! One thread owns the `Session` and ticks it at a fixed rate. Control
//! commands arrive over a channel; the paddle is read from a `SharedPaddle`
//! once per tick. While the session is paused or finished the thread blocks
//! on the command channel instead of ticking.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::observer::{Presenter, Telemetry};
use crate::platform::{FrameClock, SharedPaddle};
use crate::settings::Settings;
use crate::sim::geometry::PlayArea;
use crate::sim::state::{Paddle, SessionPhase};
use crate::sim::tick::{Session, StartOutcome, TickReport};

/// Control messages for the driver thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Resize(PlayArea),
    Stop,
}

/// Handle to a running driver thread
#[derive(Debug)]
pub struct Runner {
    tx: Sender<Command>,
    handle: JoinHandle<Session>,
}

impl Runner {
    /// Spawn the driver thread. Ticking is governed by the session phase:
    /// call `start` to launch the ball.
    pub fn spawn(
        session: Session,
        paddle: SharedPaddle,
        settings: &Settings,
        presenter: Box<dyn Presenter>,
        telemetry: Option<Box<dyn Telemetry>>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let clock = match settings.fixed_frame_time {
            Some(dt) => FrameClock::fixed(dt),
            None => FrameClock::measured(settings.max_frame_time),
        };
        let driver = Driver {
            session,
            paddle,
            clock,
            interval: settings.tick_interval(),
            rx,
            publisher: Publisher {
                presenter,
                telemetry,
                presenter_failures: 0,
                telemetry_failures: 0,
            },
        };

        let handle = thread::Builder::new()
            .name("breakout-driver".into())
            .spawn(move || driver.run())?;
        log::info!("Driver thread started");
        Ok(Self { tx, handle })
    }

    /// Queue a command. Returns false if the driver has already exited.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn start(&self) -> bool {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> bool {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(Command::Resume)
    }

    pub fn resize(&self, area: PlayArea) -> bool {
        self.send(Command::Resize(area))
    }

    /// Stop the driver and hand back the session. `None` if the driver
    /// thread panicked.
    pub fn stop(self) -> Option<Session> {
        let _ = self.tx.send(Command::Stop);
        match self.handle.join() {
            Ok(session) => Some(session),
            Err(_) => {
                log::error!("Driver thread panicked");
                None
            }
        }
    }
}

/// Outbound sinks plus failure bookkeeping so a dead sink warns once
struct Publisher {
    presenter: Box<dyn Presenter>,
    telemetry: Option<Box<dyn Telemetry>>,
    presenter_failures: u64,
    telemetry_failures: u64,
}

impl Publisher {
    fn publish(&mut self, session: &Session, paddle: &Paddle, report: TickReport) {
        let collision = report.collision;
        let snapshot = session.snapshot(paddle, report.events);
        if let Err(e) = self.presenter.present(&snapshot) {
            self.presenter_failures += 1;
            if self.presenter_failures == 1 {
                log::warn!("Presenter failed: {}", e);
            } else {
                log::debug!("Presenter failed ({} times): {}", self.presenter_failures, e);
            }
        }

        if let Some(telemetry) = self.telemetry.as_mut() {
            if let Err(e) = telemetry.report(&session.telemetry(collision)) {
                self.telemetry_failures += 1;
                if self.telemetry_failures == 1 {
                    log::warn!("Telemetry failed: {}", e);
                }
            }
        }
    }
}

struct Driver {
    session: Session,
    paddle: SharedPaddle,
    clock: FrameClock,
    interval: Duration,
    rx: Receiver<Command>,
    publisher: Publisher,
}

impl Driver {
    fn run(mut self) -> Session {
        loop {
            if self.suspended() {
                // Cooperative pause: no ticks until a command arrives
                match self.rx.recv() {
                    Ok(command) => {
                        if !self.apply(command) {
                            break;
                        }
                        self.clock.restart();
                        continue;
                    }
                    Err(_) => break,
                }
            }

            if !self.drain_commands() {
                break;
            }
            if self.suspended() {
                continue;
            }

            let frame_start = Instant::now();
            let dt = self.clock.next_frame();
            let paddle = self.paddle.snapshot();
            let report = self.session.tick(dt, &paddle);
            self.publisher.publish(&self.session, &paddle, report);

            thread::sleep(self.interval.saturating_sub(frame_start.elapsed()));
        }

        log::info!("Driver thread stopping: {:?}", self.session);
        self.session
    }

    fn suspended(&self) -> bool {
        matches!(
            self.session.phase(),
            SessionPhase::Paused | SessionPhase::Finished
        )
    }

    /// Apply all queued commands. Returns false when the driver should exit.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(command) => {
                    if !self.apply(command) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Returns false on `Stop`
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => {
                let outcome = self.session.start();
                if outcome != StartOutcome::Started {
                    log::debug!("Start ignored: {:?}", outcome);
                }
            }
            Command::Pause => {
                self.session.pause();
            }
            Command::Resume => {
                if self.session.resume() {
                    self.clock.restart();
                }
            }
            Command::Resize(area) => {
                self.session.resize(area);
                self.paddle.resize(area);
            }
            Command::Stop => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::levels::BuiltinLevels;
    use crate::observer::{ChannelPresenter, Snapshot, TelemetryFrame};
    use std::sync::{Arc, Mutex};

    fn fast_settings() -> Settings {
        Settings {
            tick_rate: 1000,
            fixed_frame_time: Some(0.01),
            ..Default::default()
        }
    }

    fn spawn_with(
        presenter: Box<dyn Presenter>,
        telemetry: Option<Box<dyn Telemetry>>,
    ) -> (Runner, SharedPaddle) {
        let settings = fast_settings();
        let paddle = SharedPaddle::new(
            settings.play_area(),
            settings.paddle_size(),
            settings.paddle_margin,
        );
        let session =
            Session::new(&settings, Box::new(BuiltinLevels), &paddle.snapshot()).unwrap();
        let runner =
            Runner::spawn(session, paddle.clone(), &settings, presenter, telemetry).unwrap();
        (runner, paddle)
    }

    struct FailingPresenter;

    impl Presenter for FailingPresenter {
        fn present(&mut self, _: &Snapshot) -> Result<(), PublishError> {
            Err(PublishError::Disconnected)
        }
    }

    struct RecordingTelemetry(Arc<Mutex<Vec<TelemetryFrame>>>);

    impl Telemetry for RecordingTelemetry {
        fn report(&mut self, frame: &TelemetryFrame) -> Result<(), PublishError> {
            self.0.lock().unwrap().push(*frame);
            Ok(())
        }
    }

    #[test]
    fn test_runner_ticks_after_start() {
        let (tx, rx) = mpsc::channel();
        let (runner, _paddle) = spawn_with(Box::new(ChannelPresenter::new(tx)), None);

        let first = rx.recv().unwrap();
        assert_eq!(first.phase, SessionPhase::NotStarted);

        assert!(runner.start());
        let running = rx
            .iter()
            .find(|s| s.phase == SessionPhase::Running && s.tick > 3)
            .unwrap();
        assert!(running.tick > 3);

        let session = runner.stop().unwrap();
        assert!(session.stats().ticks >= 4);
    }

    #[test]
    fn test_runner_pause_stops_ticks() {
        let (tx, rx) = mpsc::channel();
        let (runner, _paddle) = spawn_with(Box::new(ChannelPresenter::new(tx)), None);
        runner.start();
        rx.iter().find(|s| s.tick > 2).unwrap();

        runner.pause();
        // Wait until the driver has seen the pause, then drain
        std::thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "ticked while paused");

        let session = runner.stop().unwrap();
        assert_eq!(session.phase(), SessionPhase::Paused);
    }

    #[test]
    fn test_publish_failures_do_not_stop_ticks() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let telemetry = RecordingTelemetry(frames.clone());
        let (runner, _paddle) = spawn_with(Box::new(FailingPresenter), Some(Box::new(telemetry)));
        runner.start();
        std::thread::sleep(Duration::from_millis(100));

        let session = runner.stop().unwrap();
        assert!(session.stats().ticks > 0);
        assert!(!frames.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resize_reaches_session_and_paddle() {
        let (tx, _rx) = mpsc::channel();
        let (runner, paddle) = spawn_with(Box::new(ChannelPresenter::new(tx)), None);
        let area = PlayArea::new(600.0, 400.0);
        runner.resize(area);

        let session = runner.stop().unwrap();
        assert_eq!(session.area(), area);
        assert_eq!(paddle.snapshot().pos.y, 400.0 - 10.0 - 2.0);
    }
}
