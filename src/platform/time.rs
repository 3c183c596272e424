//! Frame timing for the tick driver

use std::time::Instant;

/// Produces the elapsed time fed to each tick
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    fixed: Option<f32>,
    max_frame_time: f32,
}

impl FrameClock {
    /// Measure wall-clock time between frames, clamped to `max_frame_time`
    pub fn measured(max_frame_time: f32) -> Self {
        Self {
            last: Instant::now(),
            fixed: None,
            max_frame_time,
        }
    }

    /// Always report `frame_time`, regardless of wall-clock time
    pub fn fixed(frame_time: f32) -> Self {
        Self {
            last: Instant::now(),
            fixed: Some(frame_time),
            max_frame_time: frame_time,
        }
    }

    /// Forget time spent while ticks were suspended
    pub fn restart(&mut self) {
        self.last = Instant::now();
    }

    /// Seconds since the previous call (or since construction/restart)
    pub fn next_frame(&mut self) -> f32 {
        let now = Instant::now();
        let measured = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        match self.fixed {
            Some(dt) => dt,
            None => measured.min(self.max_frame_time),
        }
    }
}
