use std::sync::mpsc;
use std::time::Instant;

use roverview_core::base_image::BaseImage;
use roverview_core::collab::{Detector, Planner, RequestTicket};
use roverview_core::rover::RoverDetector;
use roverview_core::transform::ImagePoint;

use crate::messages::WorkerResult;

use super::send;

pub(super) fn handle_plan(
    planner: &mut dyn Planner,
    ticket: RequestTicket,
    start: ImagePoint,
    end: ImagePoint,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let t0 = Instant::now();
    let result = planner.plan(start, end);
    send(
        tx,
        ctx,
        WorkerResult::PlanComplete {
            ticket,
            result,
            elapsed: t0.elapsed(),
        },
    );
}

pub(super) fn handle_detect(
    detector: &mut dyn Detector,
    ticket: RequestTicket,
    image: &BaseImage,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let t0 = Instant::now();
    let result = detector.detect(image);
    send(
        tx,
        ctx,
        WorkerResult::DetectComplete {
            ticket,
            result,
            elapsed: t0.elapsed(),
        },
    );
}

pub(super) fn handle_rover(
    detector: &mut dyn RoverDetector,
    ticket: RequestTicket,
    image: &BaseImage,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    let t0 = Instant::now();
    let result = detector.detect_rover(image);
    send(
        tx,
        ctx,
        WorkerResult::RoverComplete {
            ticket,
            result,
            elapsed: t0.elapsed(),
        },
    );
}
