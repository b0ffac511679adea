//! 2D vector math

use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector, also used for points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Shorthand constructor.
pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2 { x, y }
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector pointing from `p1` to `p2`.
    pub fn from_points(p1: Vec2, p2: Vec2) -> Vec2 {
        vec2(p2.x - p1.x, p2.y - p1.y)
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle in radians, atan2(y, x).
    pub fn argument(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn sum(self, other: Vec2) -> Vec2 {
        vec2(self.x + other.x, self.y + other.y)
    }

    pub fn negate(self) -> Vec2 {
        vec2(-self.x, -self.y)
    }

    pub fn scalar_multiply(self, scalar: f32) -> Vec2 {
        vec2(self.x * scalar, self.y * scalar)
    }

    pub fn entrywise_multiply(self, other: Vec2) -> Vec2 {
        vec2(self.x * other.x, self.y * other.y)
    }

    pub fn entrywise_divide(self, other: Vec2) -> Vec2 {
        vec2(self.x / other.x, self.y / other.y)
    }

    /// In-place sum.
    pub fn add_in_place(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        self.sum(other)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        self.sum(other.negate())
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        self.add_in_place(other);
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        self.negate()
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, scalar: f32) -> Vec2 {
        self.scalar_multiply(scalar)
    }
}

pub fn rad_to_deg(a: f32) -> f32 {
    180.0 / PI * a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let v = Vec2::from_points(vec2(1.0, 2.0), vec2(4.0, 6.0));
        assert_eq!(v, vec2(3.0, 4.0));
        assert!((v.magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_argument_and_degrees() {
        let v = vec2(0.0, 1.0);
        assert!((rad_to_deg(v.argument()) - 90.0).abs() < 1e-4);
        assert!((rad_to_deg(vec2(-1.0, 0.0).argument()) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_entrywise_ops() {
        let a = vec2(2.0, 9.0);
        let b = vec2(4.0, 3.0);
        assert_eq!(a.entrywise_multiply(b), vec2(8.0, 27.0));
        assert_eq!(a.entrywise_divide(b), vec2(0.5, 3.0));
        assert_eq!(-a, vec2(-2.0, -9.0));
        assert_eq!(a * 0.5, vec2(1.0, 4.5));
    }

    #[test]
    fn test_in_place_add() {
        let mut v = vec2(1.0, 1.0);
        v.add_in_place(vec2(2.0, -3.0));
        v += vec2(1.0, 1.0);
        assert_eq!(v, vec2(4.0, -1.0));
    }
}
