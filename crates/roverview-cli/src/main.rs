mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roverview", about = "Annotated surface imagery viewer")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions
    Info(commands::info::InfoArgs),
    /// Render an image with a scene of overlays to a file
    Render(commands::render::RenderArgs),
    /// Plan a route between two points and print its metrics
    Plan(commands::plan::PlanArgs),
    /// Detect objects of interest in an image
    Detect(commands::detect::DetectArgs),
    /// Estimate whether a stranded rover is visible in an image
    Rover(commands::rover::RoverArgs),
    /// Print or save the default viewer config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Rover(args) => commands::rover::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
