//! Paddle handoff between the input thread and the tick thread
//!
//! Pointer events write the paddle; the driver copies a snapshot once per
//! tick, so a tick never sees a half-updated rectangle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;

use crate::sim::geometry::PlayArea;
use crate::sim::state::Paddle;

/// Paddle state shared between the input collaborator and the driver
#[derive(Debug, Clone)]
pub struct SharedPaddle {
    inner: Arc<Mutex<PaddleSlot>>,
}

#[derive(Debug)]
struct PaddleSlot {
    paddle: Paddle,
    area: PlayArea,
    margin: f32,
}

impl SharedPaddle {
    /// Paddle centered at the bottom of `area`
    pub fn new(area: PlayArea, size: Vec2, margin: f32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PaddleSlot {
                paddle: Paddle::centered(area, size, margin),
                area,
                margin,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PaddleSlot> {
        // A panicking writer cannot leave a Copy rect half-written
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent copy for one tick
    pub fn snapshot(&self) -> Paddle {
        self.lock().paddle
    }

    /// Move the paddle's left edge to `x`, clamped into the play area
    pub fn set_paddle_x(&self, x: f32) {
        let mut slot = self.lock();
        let max_x = (slot.area.width - slot.paddle.size.x).max(0.0);
        slot.paddle.pos.x = x.clamp(0.0, max_x);
    }

    /// Center the paddle on a pointer. Pointers that would push the paddle
    /// past either edge are ignored. Returns whether the paddle moved.
    pub fn follow_pointer(&self, pointer_x: f32) -> bool {
        let mut slot = self.lock();
        let half = slot.paddle.size.x / 2.0;
        if pointer_x > half && pointer_x < slot.area.width - half {
            slot.paddle.pos.x = pointer_x - half;
            true
        } else {
            false
        }
    }

    /// Re-anchor the paddle after the play area changed size
    pub fn resize(&self, area: PlayArea) {
        let mut slot = self.lock();
        slot.area = area;
        slot.paddle.pos.y = area.height - slot.paddle.size.y - slot.margin;
        let max_x = (area.width - slot.paddle.size.x).max(0.0);
        slot.paddle.pos.x = slot.paddle.pos.x.clamp(0.0, max_x);
    }
}
