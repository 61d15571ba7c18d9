pub mod config;
pub mod detect;
pub mod info;
pub mod plan;
pub mod render;
pub mod rover;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use roverview_core::base_image::BaseImage;
use roverview_core::config::ViewerConfig;
use roverview_core::controller::Viewer;
use roverview_core::export::{save_snapshot, snapshot};
use roverview_core::transform::ImagePoint;

/// Read a TOML viewer config, or fall back to `default`.
pub fn load_config(path: Option<&Path>, default: ViewerConfig) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(default);
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ViewerConfig = toml::from_str(&contents).context("Invalid viewer config")?;
    config.validate().context("Invalid viewer config")?;
    Ok(config)
}

/// Viewer with the given image loaded.
pub fn open_viewer(image: &Path, config: ViewerConfig) -> Result<Viewer> {
    let base = BaseImage::open(image)
        .with_context(|| format!("Failed to open image {}", image.display()))?;
    let mut viewer = Viewer::new(config)?;
    viewer.load_image(base);
    Ok(viewer)
}

pub fn write_snapshot(viewer: &Viewer, output: &Path) -> Result<()> {
    let image = snapshot(viewer)?;
    save_snapshot(&image, output)
        .with_context(|| format!("Failed to save snapshot to {}", output.display()))?;
    println!("Snapshot saved to {}", output.display());
    Ok(())
}

/// Spinner shown while a collaborator runs.
pub fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Parse an image-space point given as `x,y`.
pub fn parse_point(s: &str) -> std::result::Result<ImagePoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(ImagePoint::new(x, y))
}
