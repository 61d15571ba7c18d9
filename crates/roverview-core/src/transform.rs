//! Screen-space / image-space mapping.
//!
//! Screen space is device pixels relative to the top-left of the visible
//! canvas. Image space is pixels relative to the top-left of the full
//! resolution source image. The two are separate types so that a point can
//! only cross between them through a [`ViewportState`].

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{MAP_MAX_SCALE, MAP_MIN_SCALE};
use crate::error::{Result, ViewerError};

/// A point in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for ScreenPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ScreenPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A point in source-image pixels, independent of pan and zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

impl ImagePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle in screen space, `min` inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl ScreenRect {
    pub fn from_min_size(min: ScreenPoint, width: f32, height: f32) -> Self {
        Self {
            min,
            max: ScreenPoint::new(min.x + width, min.y + height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Overlap of two rectangles, or `None` when they do not overlap.
    pub fn intersect(&self, other: &ScreenRect) -> Option<ScreenRect> {
        let r = ScreenRect {
            min: ScreenPoint::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: ScreenPoint::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        (!r.is_empty()).then_some(r)
    }
}

/// Axis-aligned rectangle in image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Closed-interval containment: points on the border are inside.
    pub fn contains(&self, p: ImagePoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn top_left(&self) -> ImagePoint {
        ImagePoint::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> ImagePoint {
        ImagePoint::new(self.x + self.width, self.y + self.height)
    }
}

/// Allowed zoom range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl ZoomBounds {
    pub fn new(min_scale: f32, max_scale: f32) -> Result<Self> {
        if !(min_scale > 0.0 && min_scale.is_finite() && max_scale.is_finite()) {
            return Err(ViewerError::InvalidConfig(format!(
                "min_scale must be a positive finite number, got {min_scale}"
            )));
        }
        if min_scale > max_scale {
            return Err(ViewerError::InvalidConfig(format!(
                "min_scale {min_scale} exceeds max_scale {max_scale}"
            )));
        }
        Ok(Self {
            min_scale,
            max_scale,
        })
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min_scale: MAP_MIN_SCALE,
            max_scale: MAP_MAX_SCALE,
        }
    }
}

/// Pan offset and zoom scale defining the screen/image mapping.
///
/// `screen = image * scale + offset`. The scale always lies within `bounds`;
/// the offset is unconstrained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    scale: f32,
    offset: ScreenPoint,
    bounds: ZoomBounds,
}

impl ViewportState {
    /// Identity view (`scale = 1`, no pan), with 1 clamped into `bounds`.
    pub fn new(bounds: ZoomBounds) -> Self {
        Self {
            scale: bounds.clamp(1.0),
            offset: ScreenPoint::ORIGIN,
            bounds,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> ScreenPoint {
        self.offset
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    pub fn screen_to_image(&self, p: ScreenPoint) -> ImagePoint {
        ImagePoint::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    pub fn image_to_screen(&self, p: ImagePoint) -> ScreenPoint {
        ScreenPoint::new(
            p.x * self.scale + self.offset.x,
            p.y * self.scale + self.offset.y,
        )
    }

    /// Add `delta` to the scale, clamped to the bounds. Zoom is anchored at
    /// the canvas origin, so the offset is left untouched.
    pub fn zoom_by(self, delta: f32) -> Self {
        Self {
            scale: self.bounds.clamp(self.scale + delta),
            ..self
        }
    }

    /// Set an explicit scale, clamped to the bounds.
    pub fn with_scale(self, scale: f32) -> Self {
        Self {
            scale: self.bounds.clamp(scale),
            ..self
        }
    }

    pub fn pan_to(self, offset: ScreenPoint) -> Self {
        Self { offset, ..self }
    }

    pub fn reset(self) -> Self {
        Self::new(self.bounds)
    }

    /// Screen rectangle covered by an image of the given natural size.
    pub fn image_rect_on_screen(&self, width: u32, height: u32) -> ScreenRect {
        ScreenRect {
            min: self.image_to_screen(ImagePoint::new(0.0, 0.0)),
            max: self.image_to_screen(ImagePoint::new(width as f32, height as f32)),
        }
    }

    /// Image-space region visible in a canvas of the given size.
    pub fn visible_image_rect(&self, canvas_width: f32, canvas_height: f32) -> ImageRect {
        let tl = self.screen_to_image(ScreenPoint::ORIGIN);
        let br = self.screen_to_image(ScreenPoint::new(canvas_width, canvas_height));
        ImageRect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(ZoomBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_disjoint() {
        let a = ScreenRect::from_min_size(ScreenPoint::new(0.0, 0.0), 10.0, 10.0);
        let b = ScreenRect::from_min_size(ScreenPoint::new(20.0, 20.0), 5.0, 5.0);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn test_intersect_overlap() {
        let a = ScreenRect::from_min_size(ScreenPoint::new(0.0, 0.0), 10.0, 10.0);
        let b = ScreenRect::from_min_size(ScreenPoint::new(5.0, -5.0), 10.0, 10.0);
        let r = a.intersect(&b).unwrap();
        assert_eq!(r.min, ScreenPoint::new(5.0, 0.0));
        assert_eq!(r.max, ScreenPoint::new(10.0, 5.0));
    }

    #[test]
    fn test_new_clamps_identity_scale_into_bounds() {
        let v = ViewportState::new(ZoomBounds::new(1.5, 3.0).unwrap());
        assert_eq!(v.scale(), 1.5);
    }
}
