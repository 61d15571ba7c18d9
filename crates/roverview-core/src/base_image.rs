use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::Result;

/// An already-decoded raster shown under the overlays.
///
/// Cheap to clone: the pixels are shared, so a copy can be handed to a
/// detector on another thread while the viewer keeps drawing.
#[derive(Clone, Debug)]
pub struct BaseImage {
    pixels: Arc<RgbaImage>,
}

impl BaseImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }

    /// Decode an image file with whatever formats the `image` crate supports.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_dynamic(image::open(path)?))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Nearest-neighbour sample at fractional image coordinates, clamped to the edges.
    pub fn sample(&self, x: f32, y: f32) -> Rgba<u8> {
        let cx = (x.floor().max(0.0) as u32).min(self.width().saturating_sub(1));
        let cy = (y.floor().max(0.0) as u32).min(self.height().saturating_sub(1));
        *self.pixels.get_pixel(cx, cy)
    }
}
