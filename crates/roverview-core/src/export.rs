use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::info;

use crate::controller::Viewer;
use crate::error::{Result, ViewerError};
use crate::hit_test::HitTester;
use crate::render::{RasterCanvas, ScaledCanvas};

/// Render the current view into an owned raster of the configured canvas
/// size. The result does not change when the viewer does.
pub fn snapshot<H: HitTester>(viewer: &Viewer<H>) -> Result<RgbaImage> {
    let view = &viewer.config().view;
    let mut canvas =
        RasterCanvas::from_style(view.canvas_width, view.canvas_height, &viewer.config().style)?;
    viewer.render(&mut canvas);
    Ok(canvas.into_image())
}

/// Render the current view as seen on a `width` x `height` surface measured
/// in logical points, at `pixels_per_point` output pixels per point.
pub fn snapshot_at<H: HitTester>(
    viewer: &Viewer<H>,
    width: f32,
    height: f32,
    pixels_per_point: f32,
) -> Result<RgbaImage> {
    if !(pixels_per_point.is_finite() && pixels_per_point > 0.0) {
        return Err(ViewerError::DegenerateInput(format!(
            "pixels per point must be positive, got {pixels_per_point}"
        )));
    }
    let pw = (width * pixels_per_point).round();
    let ph = (height * pixels_per_point).round();
    if !(pw >= 1.0 && ph >= 1.0 && pw <= u32::MAX as f32 && ph <= u32::MAX as f32) {
        return Err(ViewerError::DegenerateInput(format!(
            "snapshot size {width}x{height} pt is not drawable"
        )));
    }
    let raster = RasterCanvas::from_style(pw as u32, ph as u32, &viewer.config().style)?;
    let mut canvas = ScaledCanvas::new(raster, pixels_per_point);
    viewer.render(&mut canvas);
    Ok(canvas.into_inner().into_image())
}

/// Save a snapshot, choosing the format from the file extension.
/// JPEG has no alpha channel, so it is flattened to RGB first.
pub fn save_snapshot(image: &RgbaImage, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => {
            DynamicImage::ImageRgba8(image.clone())
                .to_rgb8()
                .save_with_format(path, ImageFormat::Jpeg)?;
        }
        Some("tif" | "tiff") => image.save_with_format(path, ImageFormat::Tiff)?,
        _ => image.save_with_format(path, ImageFormat::Png)?,
    }
    info!(
        "Saved {}x{} snapshot to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
