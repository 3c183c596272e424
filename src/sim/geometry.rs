//! Axis-aligned geometry for bricks, paddle and the play area
//!
//! Screen coordinates: origin at the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Penetration of a circle into this rect, per axis, normalized by the
    /// half-extent on that axis. Both components `<= 1` means overlap.
    pub fn relative_distance(&self, circle_center: Vec2, radius: f32) -> Vec2 {
        let gap = (self.center() - circle_center).abs() - Vec2::splat(radius);
        gap / self.half_extents()
    }
}

/// Dimensions of the walled play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let r = Rect::new(10.0, 20.0, 40.0, 10.0);
        assert_eq!(r.min(), Vec2::new(10.0, 20.0));
        assert_eq!(r.max(), Vec2::new(50.0, 30.0));
        assert_eq!(r.center(), Vec2::new(30.0, 25.0));
        assert_eq!(r.half_extents(), Vec2::new(20.0, 5.0));
        assert!(r.contains_point(Vec2::new(30.0, 25.0)));
        assert!(!r.contains_point(Vec2::new(9.0, 25.0)));
    }

    #[test]
    fn test_relative_distance_overlap() {
        let r = Rect::new(0.0, 0.0, 40.0, 10.0);
        // Circle centered on the rect
        let d = r.relative_distance(Vec2::new(20.0, 5.0), 3.0);
        assert!(d.x <= 1.0 && d.y <= 1.0);

        // Circle just touching the right edge
        let d = r.relative_distance(Vec2::new(43.0, 5.0), 3.0);
        assert!((d.x - 1.0).abs() < 1e-6);
        assert!(d.y <= 1.0);
    }

    #[test]
    fn test_relative_distance_miss() {
        let r = Rect::new(0.0, 0.0, 40.0, 10.0);
        let d = r.relative_distance(Vec2::new(20.0, 30.0), 3.0);
        assert!(d.y > 1.0);
    }
}
