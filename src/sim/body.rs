//! Bodies and the viewport they move in

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape tag. Only affects rendering; collisions use the bounding circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Circle,
    Rect,
    Triangle,
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rect => "rect",
            Shape::Triangle => "triangle",
        }
    }
}

/// Visual attributes assigned at creation, never touched by the core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tint {
    /// HSL hue in degrees (network particles)
    Hue(u16),
    /// Packed 0xRRGGBB (sandbox palette)
    Rgb(u32),
    /// Base brightness in [0, 1] (stars)
    Alpha(f32),
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    /// Bounding circle radius (> 0)
    pub radius: f32,
    pub shape: Shape,
    /// Rotation (radians), cosmetic
    pub angle: f32,
    /// Rotation per tick, cosmetic
    pub angular_vel: f32,
    pub tint: Tint,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius: radius.max(f32::EPSILON),
            shape: Shape::Circle,
            angle: 0.0,
            angular_vel: 0.0,
            tint: Tint::Alpha(1.0),
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_spin(mut self, angle: f32, angular_vel: f32) -> Self {
        self.angle = angle;
        self.angular_vel = angular_vel;
        self
    }

    /// Current speed (pixels per tick)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True when position and velocity hold no NaN/Infinity
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Drawable area in the same units as body positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport; negative or non-finite extents collapse to zero
    pub fn new(width: f32, height: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: clean(width),
            height: clean(height),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        // Panel canvases fall back to 500px tall in the page
        Self::new(800.0, 500.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_radius_positive() {
        let body = Body::new(Vec2::ZERO, Vec2::ZERO, -3.0);
        assert!(body.radius > 0.0);
    }

    #[test]
    fn test_viewport_sanitizes_extents() {
        let vp = Viewport::new(-10.0, f32::NAN);
        assert_eq!(vp.width, 0.0);
        assert_eq!(vp.height, 0.0);
        assert!(vp.is_empty());
        assert!(!Viewport::default().is_empty());
    }
}
