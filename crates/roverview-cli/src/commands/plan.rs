use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use roverview_core::collab::{MockPlanner, Planner};
use roverview_core::config::ViewerConfig;
use roverview_core::overlay::MarkerRole;
use roverview_core::transform::ImagePoint;

use super::{load_config, open_viewer, parse_point, spinner, write_snapshot};
use crate::summary::print_route_summary;

#[derive(Args)]
pub struct PlanArgs {
    /// Base image file
    pub image: PathBuf,

    /// Start point in image pixels, as x,y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub start: ImagePoint,

    /// End point in image pixels, as x,y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub end: ImagePoint,

    /// Seed for the mock planner
    #[arg(long)]
    pub seed: Option<u64>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save a snapshot of the planned route
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &PlanArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), ViewerConfig::map())?;
    let mut viewer = open_viewer(&args.image, config)?;
    viewer.place_marker(MarkerRole::Start, args.start)?;
    viewer.place_marker(MarkerRole::End, args.end)?;

    let mut planner = match args.seed {
        Some(seed) => MockPlanner::with_seed(seed),
        None => MockPlanner::new(),
    };

    let (ticket, start, end) = viewer.begin_planning()?;
    let pb = spinner("Calculating path")?;
    let result = planner.plan(start, end);
    pb.finish_and_clear();
    viewer.complete_planning(ticket, result)?;

    if let (Some(path), Some(metrics)) = (viewer.overlay().path(), viewer.metrics()) {
        print_route_summary(path, metrics);
    }

    if let Some(ref output) = args.output {
        write_snapshot(&viewer, output)?;
    }
    Ok(())
}
