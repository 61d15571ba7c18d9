use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::Context;
use image::RgbaImage;
use roverview_core::base_image::BaseImage;
use roverview_core::export::save_snapshot;

use crate::messages::WorkerResult;

use super::{send, send_error, send_log};

pub(super) fn handle_load_image(
    path: &Path,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let start = Instant::now();
    match BaseImage::open(path).with_context(|| format!("Failed to open {}", path.display())) {
        Ok(image) => {
            send_log(
                tx,
                ctx,
                format!(
                    "Decoded {}x{} image in {:.0}ms",
                    image.width(),
                    image.height(),
                    start.elapsed().as_millis()
                ),
            );
            send(
                tx,
                ctx,
                WorkerResult::ImageLoaded {
                    path: path.to_path_buf(),
                    image,
                },
            );
        }
        Err(e) => send_error(tx, ctx, format!("{e:#}")),
    }
}

pub(super) fn handle_save_snapshot(
    path: &Path,
    image: &RgbaImage,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match save_snapshot(image, path) {
        Ok(()) => send(
            tx,
            ctx,
            WorkerResult::SnapshotSaved {
                path: path.to_path_buf(),
            },
        ),
        Err(e) => send_error(tx, ctx, format!("Failed to save snapshot: {e}")),
    }
}
