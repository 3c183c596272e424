//! Breakout Sim - A single-ball brick breaker simulation core
//!
//! Core modules:
//! - `sim`: Simulation (ball, paddle, bricks, collision resolution, session)
//! - `levels`: Brick layouts loaded from JSON
//! - `observer`: Presentation and telemetry collaborators
//! - `platform`: Input handoff and frame timing
//! - `runner`: Threaded tick driver
//! - `settings`: Data-driven configuration

pub mod error;
pub mod levels;
pub mod observer;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::{LevelError, PublishError, SettingsError};
pub use settings::{LevelExhaustion, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play area defaults (pixels)
    pub const FIELD_WIDTH: f32 = 480.0;
    pub const FIELD_HEIGHT: f32 = 360.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between paddle bottom and the bottom edge
    pub const PADDLE_MARGIN: f32 = 2.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 3.0;
    /// Pixels per second
    pub const BALL_SPEED: f32 = 200.0;
    /// Degrees, clockwise from straight up
    pub const BALL_START_HEADING: f32 = 320.0;

    /// Brick size used when a layout omits one
    pub const BRICK_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 15.0;

    /// Paddle bounce limits: the ball always leaves upward
    pub const PADDLE_MAX_RIGHT_HEADING: f32 = 70.0;
    pub const PADDLE_MIN_LEFT_HEADING: f32 = 290.0;
    /// Degrees of steering at the very edge of the paddle
    pub const PADDLE_STEERING: f32 = 80.0;

    /// Slack allowed on the movement bound (pixels)
    pub const MOVEMENT_EPSILON: f32 = 0.01;

    /// Default tick rate (Hz)
    pub const TICK_RATE: u32 = 40;
    /// Measured frame times are clamped to this (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;
}

/// Normalize a heading in degrees to [0, 360)
#[inline]
pub fn normalize_heading(heading: f32) -> f32 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Unit direction for a heading (0° = up, clockwise, screen y grows downward)
#[inline]
pub fn heading_to_unit(heading: f32) -> Vec2 {
    let rad = heading.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}
