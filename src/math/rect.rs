//! Axis-aligned rectangle
//!
//! Position is the top-left corner. Collision, hit tests and drawing all
//! share this convention.

use super::vec::{vec2, Vec2};

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
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

    /// Build from a top-left position and a size vector
    pub fn from_vecs(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.w, self.h)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Check if point is inside (right and bottom edges exclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Intersection of two rectangles, `None` if they do not overlap.
    pub fn overlap_area(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        ))
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Grow by padding on all sides (negative padding shrinks)
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x - padding,
            self.y - padding,
            (self.w + padding * 2.0).max(0.0),
            (self.h + padding * 2.0).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains_point(vec2(50.0, 40.0)));
        assert!(!r.contains_point(vec2(5.0, 40.0)));
        assert!(!r.contains_point(vec2(50.0, 100.0)));
        assert!(!r.contains_point(vec2(110.0, 40.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlap_area(&b).is_none());
    }

    #[test]
    fn test_overlap_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 8.0, 10.0, 10.0);
        let area = a.overlap_area(&b).unwrap();
        assert_eq!(area, Rect::new(5.0, 8.0, 5.0, 2.0));
    }

    #[test]
    fn test_center_and_translate() {
        let r = Rect::new(0.0, 0.0, 20.0, 10.0).translate(vec2(5.0, 5.0));
        assert_eq!(r.center(), vec2(15.0, 10.0));
        assert_eq!(r.pad(1.0), Rect::new(4.0, 4.0, 22.0, 12.0));
    }
}
