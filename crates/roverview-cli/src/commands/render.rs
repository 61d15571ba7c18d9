use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use roverview_core::config::ViewerConfig;
use roverview_core::scene::Scene;

use super::{load_config, open_viewer, write_snapshot};

#[derive(Args)]
pub struct RenderArgs {
    /// Base image file
    pub image: PathBuf,

    /// Scene file (TOML) with view, markers, path and detections
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the detection view preset instead of the map preset
    #[arg(long)]
    pub detection_view: bool,

    /// Output file path (png, jpg or tiff)
    #[arg(short, long, default_value = "snapshot.png")]
    pub output: PathBuf,
}

pub fn run(args: &RenderArgs) -> Result<()> {
    let preset = if args.detection_view {
        ViewerConfig::detection()
    } else {
        ViewerConfig::map()
    };
    let config = load_config(args.config.as_deref(), preset)?;
    let mut viewer = open_viewer(&args.image, config)?;

    if let Some(ref scene_path) = args.scene {
        let contents = std::fs::read_to_string(scene_path)
            .with_context(|| format!("Failed to read scene {}", scene_path.display()))?;
        let scene: Scene = toml::from_str(&contents).context("Invalid scene file")?;
        scene
            .apply(&mut viewer)
            .with_context(|| format!("Cannot apply scene {}", scene_path.display()))?;
    }

    write_snapshot(&viewer, &args.output)
}
