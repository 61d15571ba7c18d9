use std::sync::mpsc;
use std::time::Duration;

use roverview_core::collab::{MockDetector, MockPlanner};
use roverview_core::rover::MockRoverDetector;

use crate::messages::{WorkerCommand, WorkerResult};

use super::{collab, io};

/// Simulated planner round trip.
const PLAN_LATENCY: Duration = Duration::from_millis(2500);
/// Simulated detector round trip.
const DETECT_LATENCY: Duration = Duration::from_millis(4000);
/// Simulated rover search round trip.
const ROVER_LATENCY: Duration = Duration::from_millis(3000);

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("roverview-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

pub(crate) fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

pub(crate) fn send_log(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Log {
            message: msg.into(),
        },
    );
}

pub(crate) fn send_error(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: msg.into(),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let mut planner = MockPlanner::new().with_latency(PLAN_LATENCY);
    let mut detector = MockDetector::new().with_latency(DETECT_LATENCY);
    let mut rover_detector = MockRoverDetector::new().with_latency(ROVER_LATENCY);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadImage { path } => {
                io::handle_load_image(&path, &tx, &ctx);
            }
            WorkerCommand::Plan { ticket, start, end } => {
                collab::handle_plan(&mut planner, ticket, start, end, &tx, &ctx);
            }
            WorkerCommand::Detect { ticket, image } => {
                collab::handle_detect(&mut detector, ticket, &image, &tx, &ctx);
            }
            WorkerCommand::DetectRover { ticket, image } => {
                collab::handle_rover(&mut rover_detector, ticket, &image, &tx, &ctx);
            }
            WorkerCommand::SaveSnapshot { path, image } => {
                io::handle_save_snapshot(&path, &image, &tx, &ctx);
            }
        }
    }
}
