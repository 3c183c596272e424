//! Collision detection and response
//!
//! The ball is tested against the four walls, then the bricks, then the
//! paddle, and the first hit wins. A single-slot memory of the last surface
//! kind keeps an overlapping ball from bouncing off the same surface twice
//! in a row.

use serde::{Deserialize, Serialize};

use super::geometry::{PlayArea, Rect};
use super::state::{Ball, Brick, BrickField, Paddle};
use crate::consts::*;
use crate::normalize_heading;

/// What the ball collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    LeftWall,
    RightWall,
    TopWall,
    /// Losing condition: the ball fell past the paddle
    BottomWall,
    /// Brick hit through a face parallel to the x axis (top or bottom)
    BrickXAxis,
    /// Brick hit through a face parallel to the y axis (left or right)
    BrickYAxis,
    Paddle,
}

impl CollisionKind {
    pub fn is_brick(self) -> bool {
        matches!(self, Self::BrickXAxis | Self::BrickYAxis)
    }
}

/// Outcome of a resolution step that found a collision
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub kind: CollisionKind,
    /// The brick removed from the field, for brick hits
    pub destroyed: Option<Brick>,
    /// The field became empty with this hit
    pub field_cleared: bool,
}

impl Collision {
    fn surface(kind: CollisionKind) -> Self {
        Self {
            kind,
            destroyed: None,
            field_cleared: false,
        }
    }
}

/// Relative-distance overlap test shared by bricks and the paddle.
/// Returns the reflection axis kind on overlap.
fn rect_hit(rect: &Rect, ball: &Ball) -> Option<CollisionKind> {
    let rel = rect.relative_distance(ball.center(), ball.radius);
    if rel.x <= 1.0 && rel.y <= 1.0 {
        // Smaller relative distance on x means the ball is inside the
        // brick's horizontal span, so it came through the top or bottom
        Some(if rel.x < rel.y {
            CollisionKind::BrickXAxis
        } else {
            CollisionKind::BrickYAxis
        })
    } else {
        None
    }
}

/// Stateful resolver holding the last-collision memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionResolver {
    last: CollisionKind,
}

impl Default for CollisionResolver {
    /// The ball starts on the paddle, so the paddle is the initial memory
    fn default() -> Self {
        Self {
            last: CollisionKind::Paddle,
        }
    }
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with a specific memory value
    pub fn with_memory(last: CollisionKind) -> Self {
        Self { last }
    }

    #[inline]
    pub fn last_collision(&self) -> CollisionKind {
        self.last
    }

    /// Forget everything except that the ball is on the paddle
    pub fn reset(&mut self) {
        self.last = CollisionKind::Paddle;
    }

    /// Check the ball's tentative position for a collision.
    ///
    /// On a brick hit the brick is removed from `field` before returning.
    pub fn resolve(
        &mut self,
        ball: &Ball,
        paddle: &Paddle,
        field: &mut BrickField,
        area: PlayArea,
    ) -> Option<Collision> {
        if let Some(kind) = self.wall_collision(ball, area) {
            self.last = kind;
            return Some(Collision::surface(kind));
        }

        if let Some(hit) = self.brick_collision(ball, field) {
            self.last = hit.kind;
            return Some(hit);
        }

        if self.paddle_collision(ball, paddle) {
            self.last = CollisionKind::Paddle;
            return Some(Collision::surface(CollisionKind::Paddle));
        }

        None
    }

    fn wall_collision(&self, ball: &Ball, area: PlayArea) -> Option<CollisionKind> {
        let bounds = ball.bounding_rect();
        let candidates = [
            (bounds.min().x <= 0.0, CollisionKind::LeftWall),
            (bounds.max().x >= area.width, CollisionKind::RightWall),
            (bounds.min().y <= ball.radius, CollisionKind::TopWall),
            (bounds.max().y >= area.height, CollisionKind::BottomWall),
        ];

        candidates
            .into_iter()
            .find(|&(crossed, kind)| crossed && self.last != kind)
            .map(|(_, kind)| kind)
    }

    fn brick_collision(&self, ball: &Ball, field: &mut BrickField) -> Option<Collision> {
        let (id, kind) = field
            .iter()
            .find_map(|brick| rect_hit(&brick.rect, ball).map(|kind| (brick.id, kind)))?;

        let destroyed = field.remove(id);
        let field_cleared = field.is_done();
        log::debug!(
            "Brick {} hit ({:?}), {} left",
            id,
            kind,
            field.active_count()
        );

        Some(Collision {
            kind,
            destroyed,
            field_cleared,
        })
    }

    fn paddle_collision(&self, ball: &Ball, paddle: &Paddle) -> bool {
        if self.last == CollisionKind::Paddle {
            return false;
        }
        rect_hit(&paddle.rect(), ball).is_some()
    }
}

/// Heading after bouncing off `kind`.
///
/// `ball` and `paddle` are only consulted for paddle hits, where the offset
/// of the ball from the paddle middle steers the bounce.
pub fn reflect_heading(kind: CollisionKind, ball: &Ball, paddle: &Paddle) -> f32 {
    let heading = ball.heading();
    match kind {
        CollisionKind::LeftWall | CollisionKind::RightWall | CollisionKind::BrickYAxis => {
            normalize_heading(360.0 - heading)
        }
        CollisionKind::TopWall | CollisionKind::BrickXAxis => normalize_heading(180.0 - heading),
        CollisionKind::BottomWall => heading,
        CollisionKind::Paddle => paddle_bounce(heading, ball, paddle),
    }
}

/// Mirror off the paddle, steer by hit offset, then clamp so the ball
/// never leaves at a flat angle.
fn paddle_bounce(heading: f32, ball: &Ball, paddle: &Paddle) -> f32 {
    let rect = paddle.rect();
    let offset = (ball.center().x - rect.center().x) / rect.half_extents().x;
    let steered = normalize_heading(180.0 - heading + PADDLE_STEERING * offset);
    clamp_paddle_heading(steered)
}

/// Clamp a normalized heading into [0, 70] ∪ [290, 360)
pub fn clamp_paddle_heading(heading: f32) -> f32 {
    if (PADDLE_MAX_RIGHT_HEADING..180.0).contains(&heading) {
        PADDLE_MAX_RIGHT_HEADING
    } else if (180.0..=PADDLE_MIN_LEFT_HEADING).contains(&heading) {
        PADDLE_MIN_LEFT_HEADING
    } else {
        heading
    }
}
