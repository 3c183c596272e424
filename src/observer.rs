//! Outbound collaborators: presentation and telemetry
//!
//! The driver never renders or transmits anything itself. Each tick it hands
//! a value snapshot to a `Presenter` and an optional debug frame to a
//! `Telemetry` sink. Failures in either are reported back as `PublishError`
//! and logged by the driver; they never affect the simulation.

use std::io::Write;
use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::error::PublishError;
use crate::sim::collision::CollisionKind;
use crate::sim::state::{Ball, Brick, GameEvent, Paddle, SessionPhase, SessionStats};

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: SessionPhase,
    pub level: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    pub events: Vec<GameEvent>,
    pub stats: SessionStats,
}

/// Debug information for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub tick: u64,
    pub heading: f32,
    pub collision: Option<CollisionKind>,
}

pub trait Presenter: Send {
    fn present(&mut self, snapshot: &Snapshot) -> Result<(), PublishError>;
}

pub trait Telemetry: Send {
    fn report(&mut self, frame: &TelemetryFrame) -> Result<(), PublishError>;
}

/// Forwards snapshots over a channel
#[derive(Debug)]
pub struct ChannelPresenter {
    tx: Sender<Snapshot>,
}

impl ChannelPresenter {
    pub fn new(tx: Sender<Snapshot>) -> Self {
        Self { tx }
    }
}

impl Presenter for ChannelPresenter {
    fn present(&mut self, snapshot: &Snapshot) -> Result<(), PublishError> {
        self.tx
            .send(snapshot.clone())
            .map_err(|_| PublishError::Disconnected)
    }
}

/// Writes every `every`-th snapshot, plus any snapshot carrying events, as
/// one JSON document per line
#[derive(Debug)]
pub struct JsonLinesPresenter<W: Write + Send> {
    out: W,
    every: u64,
}

impl<W: Write + Send> JsonLinesPresenter<W> {
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Presenter for JsonLinesPresenter<W> {
    fn present(&mut self, snapshot: &Snapshot) -> Result<(), PublishError> {
        if snapshot.events.is_empty() && snapshot.tick % self.every != 0 {
            return Ok(());
        }
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Logs heading and collisions at debug level
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn report(&mut self, frame: &TelemetryFrame) -> Result<(), PublishError> {
        match frame.collision {
            Some(kind) => log::debug!(
                "tick {}: heading {:.1} after {:?}",
                frame.tick,
                frame.heading,
                kind
            ),
            None => log::trace!("tick {}: heading {:.1}", frame.tick, frame.heading),
        }
        Ok(())
    }
}
