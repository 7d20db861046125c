//! Viewport module: maps device (pointer) coordinates to canvas space.
//!
//! Zoom and pan are view-only. Nothing here is ever written to the scene.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom scale.
pub const MIN_SCALE: f64 = 0.10;
/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 2.00;
/// Scale change per wheel tick.
pub const WHEEL_ZOOM_STEP: f64 = 0.10;

/// View transform between device pixels and canvas pixels.
///
/// `canvas = (device - origin - pan) / scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Device position of the canvas's top-left corner before panning.
    pub origin: Point,
    /// Additive screen-space translation.
    pub pan: Vec2,
    /// Zoom scale, kept within [`MIN_SCALE`, `MAX_SCALE`].
    scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            pan: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport at 100% with no pan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport whose canvas sits at `origin` in device space.
    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Current zoom scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = round_scale(scale.clamp(MIN_SCALE, MAX_SCALE));
        }
    }

    /// Transform from canvas space to device space.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2() + self.pan) * Affine::scale(self.scale)
    }

    /// Transform from device space to canvas space.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-(self.origin.to_vec2() + self.pan))
    }

    /// Convert a device point to canvas coordinates.
    pub fn device_to_canvas(&self, device_point: Point) -> Point {
        self.inverse_transform() * device_point
    }

    /// Convert a canvas point to device coordinates.
    pub fn canvas_to_device(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a device-space distance to canvas space.
    pub fn device_to_canvas_distance(&self, distance: f64) -> f64 {
        distance / self.scale
    }

    /// Pan by a delta in device pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Zoom by whole wheel ticks (positive zooms in). Pan is untouched.
    pub fn zoom_by_steps(&mut self, steps: f64) {
        self.set_scale(self.scale + steps * WHEEL_ZOOM_STEP);
    }

    /// Zoom by wheel ticks while keeping `device_point` over the same
    /// canvas point.
    pub fn zoom_at(&mut self, device_point: Point, steps: f64) {
        let canvas_point = self.device_to_canvas(device_point);
        let old_scale = self.scale;
        self.zoom_by_steps(steps);
        if (self.scale - old_scale).abs() < f64::EPSILON {
            return;
        }
        let moved = self.canvas_to_device(canvas_point);
        self.pan += device_point - moved;
    }

    /// Fit the canvas inside `available` (device rect), centred, with
    /// `padding` on each side. The scale never exceeds [`MAX_SCALE`].
    pub fn fit(&mut self, canvas: Size, available: Rect, padding: f64) {
        if canvas.width <= 0.0 || canvas.height <= 0.0 {
            return;
        }
        let inner = Size::new(
            (available.width() - padding * 2.0).max(1.0),
            (available.height() - padding * 2.0).max(1.0),
        );
        let fitted = (inner.width / canvas.width).min(inner.height / canvas.height);
        // Round down so the fitted canvas never overflows after rounding.
        self.scale = ((fitted * 100.0).floor() / 100.0).clamp(MIN_SCALE, MAX_SCALE);
        self.pan = Vec2::ZERO;

        let shown = Size::new(canvas.width * self.scale, canvas.height * self.scale);
        let center = available.center();
        self.origin = Point::new(center.x - shown.width / 2.0, center.y - shown.height / 2.0);
    }

    /// Reset to 100% with no pan.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.pan = Vec2::ZERO;
    }
}

/// Round to two decimals so repeated 0.10 steps don't accumulate drift.
fn round_scale(scale: f64) -> f64 {
    (scale * 100.0).round() / 100.0
}
