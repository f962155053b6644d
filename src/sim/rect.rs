//! Axis-aligned rectangle geometry for bricks, paddle and pickups
//!
//! Screen space: origin top-left, y grows downward.

use glam::Vec2;

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True if the interiors overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Grow by `dx` on the left and right and by `dy` on the top and bottom
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x - dx, self.y - dy, self.w + 2.0 * dx, self.h + 2.0 * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let crossing = Rect::new(9.5, 5.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn test_inflate_keeps_center() {
        let r = Rect::new(100.0, 50.0, 40.0, 20.0);
        let big = r.inflate(50.0, 50.0);
        assert_eq!(big.center(), r.center());
        assert_eq!(big.w, 140.0);
        assert_eq!(big.h, 120.0);
    }

    #[test]
    fn test_circle_bounds() {
        let r = Rect::around_circle(Vec2::new(20.0, 30.0), 5.0);
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (15.0, 25.0, 25.0, 35.0));
        assert_eq!(r.center(), Vec2::new(20.0, 30.0));
    }
}
