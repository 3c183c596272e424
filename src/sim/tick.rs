//! Session and per-tick simulation
//!
//! A `Session` is the explicit context that owns the ball, the collision
//! memory, the current brick field and the RNG. The paddle is not owned
//! here: each tick receives a snapshot of it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Collision, CollisionKind, CollisionResolver, reflect_heading};
use super::geometry::PlayArea;
use super::state::{Ball, BrickField, GameEvent, Paddle, SessionPhase, SessionStats};
use crate::error::LevelError;
use crate::levels::LevelLoader;
use crate::observer::{Snapshot, TelemetryFrame};
use crate::settings::{LevelExhaustion, Settings};

/// Result of asking a session to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Running or paused already; nothing changed
    AlreadyRunning,
    /// No levels left to play
    Finished,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub collision: Option<CollisionKind>,
    pub events: Vec<GameEvent>,
}

/// One player's run through the levels
pub struct Session {
    phase: SessionPhase,
    area: PlayArea,
    ball: Ball,
    resolver: CollisionResolver,
    field: BrickField,
    level: u32,
    first_level: u32,
    on_last_level: LevelExhaustion,
    loader: Box<dyn LevelLoader>,
    rng: Pcg32,
    stats: SessionStats,
    /// Events from outside `tick` (level loads) waiting for the next report
    pending: Vec<GameEvent>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("level", &self.level)
            .field("ball", &self.ball)
            .field("bricks", &self.field.active_count())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Session {
    /// Create a session on `settings.start_level`, with the ball resting on
    /// `paddle`. Fails if the first level cannot be loaded or has no bricks.
    pub fn new(
        settings: &Settings,
        loader: Box<dyn LevelLoader>,
        paddle: &Paddle,
    ) -> Result<Self, LevelError> {
        let field = loader.load(settings.start_level)?;
        if field.is_done() {
            log::warn!("Level {} has no bricks", settings.start_level);
            return Err(LevelError::NotFound(settings.start_level));
        }
        let mut ball = Ball::new(
            paddle.pos,
            settings.ball_radius,
            settings.start_heading,
            settings.ball_speed,
        );
        ball.rest_on(paddle);

        log::info!(
            "Session created on level {} (seed {})",
            settings.start_level,
            settings.seed
        );

        Ok(Self {
            phase: SessionPhase::NotStarted,
            area: settings.play_area(),
            ball,
            resolver: CollisionResolver::new(),
            field,
            level: settings.start_level,
            first_level: settings.start_level,
            on_last_level: settings.on_last_level,
            loader,
            rng: Pcg32::seed_from_u64(settings.seed),
            stats: SessionStats::default(),
            pending: vec![GameEvent::LevelStarted {
                level: settings.start_level,
            }],
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn field(&self) -> &BrickField {
        &self.field
    }

    pub fn area(&self) -> PlayArea {
        self.area
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn last_collision(&self) -> CollisionKind {
        self.resolver.last_collision()
    }

    /// Begin (or continue after a cleared level) ticking the ball
    pub fn start(&mut self) -> StartOutcome {
        match self.phase {
            SessionPhase::NotStarted | SessionPhase::LevelComplete => {
                self.phase = SessionPhase::Running;
                log::info!("Level {} started", self.level);
                StartOutcome::Started
            }
            SessionPhase::Running | SessionPhase::Paused => StartOutcome::AlreadyRunning,
            SessionPhase::Finished => StartOutcome::Finished,
        }
    }

    /// Suspend ticking. Returns false if the session was not running.
    pub fn pause(&mut self) -> bool {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Paused;
            log::info!("Paused");
            true
        } else {
            false
        }
    }

    /// Continue after `pause`. Returns false if the session was not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Running;
            log::info!("Resumed");
            true
        } else {
            false
        }
    }

    /// The play area changed size (window resize)
    pub fn resize(&mut self, area: PlayArea) {
        log::info!("Play area resized to {}x{}", area.width, area.height);
        self.area = area;
    }

    /// Advance the simulation by `dt` seconds against a paddle snapshot
    pub fn tick(&mut self, dt: f32, paddle: &Paddle) -> TickReport {
        let mut report = TickReport {
            collision: None,
            events: std::mem::take(&mut self.pending),
        };

        match self.phase {
            SessionPhase::Paused | SessionPhase::Finished => return report,
            SessionPhase::NotStarted | SessionPhase::LevelComplete => {
                // Ball waits on the paddle and follows it
                self.ball.rest_on(paddle);
                return report;
            }
            SessionPhase::Running => {}
        }

        self.stats.ticks += 1;

        let delta = self.ball.advance(dt);
        let Some(hit) = self
            .resolver
            .resolve(&self.ball, paddle, &mut self.field, self.area)
        else {
            return report;
        };
        report.collision = Some(hit.kind);

        if hit.kind == CollisionKind::BottomWall {
            self.lose_ball(paddle);
            report.events.push(GameEvent::BallLost);
            return report;
        }

        // Bounce at the start of the step: undo, turn, move again
        let heading = reflect_heading(hit.kind, &self.ball, paddle);
        self.ball.retreat(delta);
        self.ball.set_heading(heading);
        self.ball.advance(dt);

        if hit.kind.is_brick() {
            self.apply_brick_hit(&hit, paddle, &mut report.events);
        }
        report
    }

    fn apply_brick_hit(&mut self, hit: &Collision, paddle: &Paddle, events: &mut Vec<GameEvent>) {
        if let Some(brick) = hit.destroyed {
            self.stats.bricks_destroyed += 1;
            events.push(GameEvent::BrickDestroyed { id: brick.id });
        }
        if hit.field_cleared {
            events.push(GameEvent::LevelComplete { level: self.level });
            self.stats.levels_cleared += 1;
            self.advance_level(paddle, events);
        }
    }

    /// Seeded launch heading, one of -50, -40, ..., 40 degrees
    fn launch_heading(&mut self) -> f32 {
        (self.rng.random_range(0..10) * 10 - 50) as f32
    }

    /// Ball fell past the paddle: back onto the paddle with a fresh launch
    /// heading. The brick field is left as it is.
    fn lose_ball(&mut self, paddle: &Paddle) {
        let heading = self.launch_heading();
        self.ball.set_heading(heading);
        self.ball.rest_on(paddle);
        self.resolver.reset();
        self.phase = SessionPhase::NotStarted;
        self.stats.balls_lost += 1;
        log::info!(
            "Ball lost on level {}, relaunch heading {:.0}",
            self.level,
            self.ball.heading()
        );
    }

    fn advance_level(&mut self, paddle: &Paddle, events: &mut Vec<GameEvent>) {
        let next = self.level + 1;
        log::info!("Level {} complete", self.level);

        match self.load_level(next) {
            Some(field) => self.enter_level(next, field, paddle, events),
            None => match self.on_last_level {
                LevelExhaustion::LoopToFirst => match self.load_level(self.first_level) {
                    Some(field) => self.enter_level(self.first_level, field, paddle, events),
                    None => self.finish(events),
                },
                LevelExhaustion::Stop => self.finish(events),
            },
        }
    }

    /// Missing and malformed layouts both count as "no such level"
    fn load_level(&self, level: u32) -> Option<BrickField> {
        match self.loader.load(level) {
            Ok(field) if !field.is_done() => Some(field),
            Ok(_) => {
                log::warn!("Level {} has no bricks, skipping", level);
                None
            }
            Err(LevelError::NotFound(_)) => None,
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    /// Swap in the next layout with the ball back on the paddle, aimed up
    fn enter_level(
        &mut self,
        level: u32,
        field: BrickField,
        paddle: &Paddle,
        events: &mut Vec<GameEvent>,
    ) {
        self.level = level;
        self.field = field;
        let heading = self.launch_heading();
        self.ball.set_heading(heading);
        self.ball.rest_on(paddle);
        self.resolver.reset();
        self.phase = SessionPhase::LevelComplete;
        events.push(GameEvent::LevelStarted { level });
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        log::info!("No more levels after {}", self.level);
        self.phase = SessionPhase::Finished;
        events.push(GameEvent::GameFinished);
    }

    /// Value snapshot for the presentation layer
    pub fn snapshot(&self, paddle: &Paddle, events: Vec<GameEvent>) -> Snapshot {
        Snapshot {
            tick: self.stats.ticks,
            phase: self.phase,
            level: self.level,
            ball: self.ball,
            paddle: *paddle,
            bricks: self.field.iter().copied().collect(),
            events,
            stats: self.stats,
        }
    }

    /// Debug frame for the telemetry sink
    pub fn telemetry(&self, collision: Option<CollisionKind>) -> TelemetryFrame {
        TelemetryFrame {
            tick: self.stats.ticks,
            heading: self.ball.heading(),
            collision,
        }
    }
}
