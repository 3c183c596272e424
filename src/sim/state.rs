//! Simulation state types
//!
//! Ball, paddle and brick field. Everything here is plain data plus the
//! small amount of behavior each entity owns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{PlayArea, Rect};
use crate::consts::*;
use crate::{heading_to_unit, normalize_heading};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ball resting on the paddle, waiting for start
    NotStarted,
    /// Active gameplay
    Running,
    /// Ticks suspended, all state retained
    Paused,
    /// Previous level cleared, next layout loaded, waiting for start
    LevelComplete,
    /// No layouts left to play
    Finished,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    BrickDestroyed { id: u32 },
    LevelComplete { level: u32 },
    BallLost,
    GameFinished,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Top-left corner of the bounding square
    pub pos: Vec2,
    pub radius: f32,
    /// Degrees clockwise from straight up, always in [0, 360)
    heading: f32,
    /// Pixels per second
    pub speed: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, heading: f32, speed: f32) -> Self {
        Self {
            pos,
            radius,
            heading: normalize_heading(heading),
            speed,
        }
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_heading(heading);
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::splat(self.radius * 2.0),
        }
    }

    /// Displacement the ball would cover in `dt` seconds on its current heading
    pub fn displacement(&self, dt: f32) -> Vec2 {
        heading_to_unit(self.heading) * (self.speed * dt)
    }

    /// Move along the current heading and return the displacement applied
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        let delta = self.displacement(dt);
        check_movement_bound(delta, self.speed, dt);
        self.pos += delta;
        delta
    }

    /// Undo a displacement previously returned by `advance`
    pub fn retreat(&mut self, delta: Vec2) {
        self.pos -= delta;
    }

    /// Place the ball just above the paddle's middle
    pub fn rest_on(&mut self, paddle: &Paddle) {
        let rect = paddle.rect();
        self.pos = Vec2::new(
            rect.center().x - self.radius,
            rect.pos.y - 3.0 * self.radius,
        );
    }
}

/// Movement may never exceed `speed * dt`. A violation means the heading or
/// time math is broken, so debug builds stop here and release builds log it.
fn check_movement_bound(delta: Vec2, speed: f32, dt: f32) {
    let moved = delta.length();
    let allowed = speed * dt + MOVEMENT_EPSILON;
    if moved > allowed {
        log::error!(
            "Ball moved {:.4}px in {:.4}s, faster than {}px/s allows",
            moved,
            dt,
            speed
        );
        debug_assert!(moved <= allowed, "ball moved faster than its speed allows");
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    /// Paddle centered horizontally, resting just above the bottom edge
    pub fn centered(area: PlayArea, size: Vec2, margin: f32) -> Self {
        Self {
            pos: Vec2::new(
                (area.width - size.x) / 2.0,
                area.height - size.y - margin,
            ),
            size,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Self::centered(
            PlayArea::new(FIELD_WIDTH, FIELD_HEIGHT),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            PADDLE_MARGIN,
        )
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    #[default]
    Standard,
    /// Decorative variants, identical for collision purposes
    Sparkle,
    Heart,
}

/// A destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub kind: BrickKind,
    /// 0xRRGGBB, presentation only
    pub color: Option<u32>,
}

/// A level's bricks in layout order. Destroyed bricks leave an empty slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickField {
    slots: Vec<Option<Brick>>,
}

impl BrickField {
    pub fn new(bricks: impl IntoIterator<Item = Brick>) -> Self {
        Self {
            slots: bricks.into_iter().map(Some).collect(),
        }
    }

    /// Active bricks in layout order
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.slots.iter().flatten()
    }

    /// Remove a brick by id. Returns `None` if it was already destroyed.
    pub fn remove(&mut self, id: u32) -> Option<Brick> {
        self.slots
            .iter_mut()
            .find(|slot| slot.is_some_and(|b| b.id == id))
            .and_then(Option::take)
    }

    pub fn get(&self, id: u32) -> Option<&Brick> {
        self.iter().find(|b| b.id == id)
    }

    /// True once every brick has been destroyed
    pub fn is_done(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn active_count(&self) -> usize {
        self.iter().count()
    }

    /// Total slots, including destroyed ones
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// Running counters for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub bricks_destroyed: u32,
    pub balls_lost: u32,
    pub levels_cleared: u32,
}
