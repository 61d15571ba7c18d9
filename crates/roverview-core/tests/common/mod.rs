#![allow(dead_code)]

use image::{Rgba, RgbaImage};

use roverview_core::base_image::BaseImage;
use roverview_core::config::ViewerConfig;
use roverview_core::controller::Viewer;
use roverview_core::overlay::{DetectionBox, Priority};
use roverview_core::transform::ImageRect;

/// Uniform gray base image.
pub fn gray_image(width: u32, height: u32) -> BaseImage {
    BaseImage::new(RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255])))
}

/// Map-preset viewer with a gray base image loaded.
pub fn viewer_with_image(width: u32, height: u32) -> Viewer {
    let mut viewer = Viewer::new(ViewerConfig::map()).unwrap();
    viewer.load_image(gray_image(width, height));
    viewer
}

pub fn detection(id: &str, x: f32, y: f32, w: f32, h: f32) -> DetectionBox {
    DetectionBox {
        id: id.to_string(),
        label: format!("Object {id}"),
        confidence: 0.87,
        bounds: ImageRect::new(x, y, w, h),
        description: String::new(),
        priority: Priority::High,
    }
}
