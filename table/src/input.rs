//! Per-frame input handed to [`crate::TableState::tick`].

use crate::geometry::Point;

/// Pointer state sampled by the host once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub pointer: Point,
    pub pressed: bool,
}

impl InputSnapshot {
    pub const fn new(x: f64, y: f64, pressed: bool) -> Self {
        Self {
            pointer: Point::new(x, y),
            pressed,
        }
    }
}

/// Drawable area in table units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000.0, 500.0)
    }
}

/// Everything one tick needs: input, elapsed time and the viewport size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub input: InputSnapshot,
    pub delta_seconds: f64,
    pub viewport: Viewport,
}

impl Frame {
    pub fn new(input: InputSnapshot, delta_seconds: f64, viewport: Viewport) -> Self {
        Self {
            input,
            delta_seconds,
            viewport,
        }
    }

    /// Elapsed time with non-finite and negative values treated as zero.
    pub fn elapsed(&self) -> f64 {
        if self.delta_seconds.is_finite() && self.delta_seconds > 0.0 {
            self.delta_seconds
        } else {
            0.0
        }
    }
}
