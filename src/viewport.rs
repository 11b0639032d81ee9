//! Pan/zoom transform between screen space and world space.
//!
//! `screen = world * scale + offset`. The scale is always kept inside the
//! configured [`ScaleBounds`]; the offset is unbounded.

use crate::model::Point;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 2.0;

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
        }
    }
}

impl ScaleBounds {
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    scale: f64,
    bounds: ScaleBounds,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ScaleBounds::default())
    }
}

impl Viewport {
    /// Identity transform (clamped into `bounds`).
    pub fn new(bounds: ScaleBounds) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: bounds.clamp(1.0),
            bounds,
        }
    }

    /// Build a viewport with an explicit offset and scale; the scale is clamped.
    pub fn with_transform(bounds: ScaleBounds, offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale: bounds.clamp(scale),
            bounds,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.offset_x,
            world.y * self.scale + self.offset_y,
        )
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the scale by `factor`, keeping the world point under `screen`
    /// fixed. Returns false when the scale did not change.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let anchor = self.to_world(screen);
        let new_scale = self.bounds.clamp(self.scale * factor);
        if new_scale == self.scale {
            return false;
        }
        self.scale = new_scale;
        self.offset_x = screen.x - anchor.x * new_scale;
        self.offset_y = screen.y - anchor.y * new_scale;
        true
    }

    /// Back to zero offset and unit scale.
    pub fn reset(&mut self) {
        *self = Self::new(self.bounds);
    }
}
