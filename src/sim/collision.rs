//! Axis-aligned box geometry for hitboxes, hurtboxes and projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `min` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Centre of the overlapping region (contact point for effects)
    pub fn intersection_center(&self, other: &Rect) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let lo = self.min.max(other.min);
        let hi = self.max().min(other.max());
        Some((lo + hi) * 0.5)
    }

    /// Horizontal penetration depth between two overlapping rectangles
    pub fn overlap_x(&self, other: &Rect) -> f32 {
        (self.max().x.min(other.max().x) - self.min.x.max(other.min.x)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Shared edge only
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_intersection_center() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 2.0, 10.0, 4.0);
        let p = a.intersection_center(&b).unwrap();
        assert!((p.x - 8.0).abs() < 1e-5);
        assert!((p.y - 4.0).abs() < 1e-5);
        assert!(a.intersection_center(&Rect::new(50.0, 50.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        assert_eq!(r.min, Vec2::new(8.0, 9.0));
        assert_eq!(r.center(), Vec2::new(10.0, 10.0));
        assert!((r.overlap_x(&Rect::new(11.0, 0.0, 10.0, 20.0)) - 1.0).abs() < 1e-5);
    }
}
