use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;
use roverview_core::base_image::BaseImage;
use roverview_core::collab::{CollaboratorError, PlanResult, RequestTicket};
use roverview_core::config::ViewerConfig;
use roverview_core::overlay::DetectionBox;
use roverview_core::rover::RoverReport;
use roverview_core::transform::ImagePoint;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Decode an image file to use as the base image.
    LoadImage { path: PathBuf },

    /// Plan a route between the placed markers.
    Plan {
        ticket: RequestTicket,
        start: ImagePoint,
        end: ImagePoint,
    },

    /// Run object detection on the current base image.
    Detect {
        ticket: RequestTicket,
        image: BaseImage,
    },

    /// Search the current base image for the stranded rover.
    DetectRover {
        ticket: RequestTicket,
        image: BaseImage,
    },

    /// Write an already-rendered snapshot to disk.
    SaveSnapshot { path: PathBuf, image: RgbaImage },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    ImageLoaded {
        path: PathBuf,
        image: BaseImage,
    },
    PlanComplete {
        ticket: RequestTicket,
        result: Result<PlanResult, CollaboratorError>,
        elapsed: Duration,
    },
    DetectComplete {
        ticket: RequestTicket,
        result: Result<Vec<DetectionBox>, CollaboratorError>,
        elapsed: Duration,
    },
    RoverComplete {
        ticket: RequestTicket,
        result: Result<RoverReport, CollaboratorError>,
        elapsed: Duration,
    },
    SnapshotSaved {
        path: PathBuf,
    },
    ConfigImported {
        config: ViewerConfig,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
