//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! input and timing concerns:
//! - Elapsed time is passed in, never read
//! - The paddle arrives as a snapshot
//! - Randomness comes from the session's seeded RNG

pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use collision::{Collision, CollisionKind, CollisionResolver, reflect_heading};
pub use geometry::{PlayArea, Rect};
pub use state::{
    Ball, Brick, BrickField, BrickKind, GameEvent, Paddle, SessionPhase, SessionStats,
};
pub use tick::{Session, StartOutcome, TickReport};
