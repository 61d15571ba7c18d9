use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use roverview_core::collab::{Detector, MockDetector};
use roverview_core::config::ViewerConfig;
use roverview_core::overlay::Selection;

use super::{load_config, open_viewer, spinner, write_snapshot};
use crate::summary::print_detections;

#[derive(Args)]
pub struct DetectArgs {
    /// Image to analyze
    pub image: PathBuf,

    /// Seed for the mock detector
    #[arg(long)]
    pub seed: Option<u64>,

    /// Id of a detected object to highlight (e.g. obj-0)
    #[arg(long)]
    pub select: Option<String>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save a snapshot of the annotated image
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &DetectArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), ViewerConfig::detection())?;
    let mut viewer = open_viewer(&args.image, config)?;

    let mut detector = match args.seed {
        Some(seed) => MockDetector::with_seed(seed),
        None => MockDetector::new(),
    };

    let (ticket, image) = viewer.begin_detection()?;
    let pb = spinner("Analyzing image")?;
    let result = detector.detect(&image);
    pb.finish_and_clear();
    viewer.complete_detection(ticket, result)?;

    if let Some(ref id) = args.select {
        viewer
            .select(Some(Selection::Detection(id.clone())))
            .with_context(|| format!("No detected object with id {id:?}"))?;
    }

    print_detections(viewer.overlay().detections(), args.select.as_deref());

    if let Some(ref output) = args.output {
        write_snapshot(&viewer, output)?;
    }
    Ok(())
}
