use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use roverview_core::base_image::BaseImage;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let image = BaseImage::open(&args.file)
        .with_context(|| format!("Failed to open image {}", args.file.display()))?;

    let pixels = image.width() as u64 * image.height() as u64;
    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", image.width(), image.height());
    println!("Megapixels:  {:.2}", pixels as f64 / 1_000_000.0);
    println!(
        "RGBA size:   {:.1} MB",
        (pixels * 4) as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}
