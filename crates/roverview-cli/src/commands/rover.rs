use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use roverview_core::config::ViewerConfig;
use roverview_core::rover::{MockRoverDetector, RoverDetector};
use tracing::info;

use super::{load_config, open_viewer, spinner};
use crate::summary::print_rover_report;

#[derive(Args)]
pub struct RoverArgs {
    /// Image to search
    pub image: PathBuf,

    /// Seed for the mock rover detector
    #[arg(long)]
    pub seed: Option<u64>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &RoverArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), ViewerConfig::detection())?;
    let mut viewer = open_viewer(&args.image, config)?;

    let mut detector = match args.seed {
        Some(seed) => MockRoverDetector::with_seed(seed),
        None => MockRoverDetector::new(),
    };

    let (ticket, image) = viewer.begin_rover_search()?;
    let pb = spinner("Searching for rover")?;
    let result = detector.detect_rover(&image);
    pb.finish_and_clear();
    viewer.complete_rover_search(ticket, result)?;

    let Some(report) = viewer.rover_report() else {
        return Ok(());
    };
    info!(probability = report.probability, "Rover search complete");
    print_rover_report(report);
    Ok(())
}
