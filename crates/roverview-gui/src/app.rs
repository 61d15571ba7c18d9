use std::sync::mpsc;

use roverview_core::base_image::BaseImage;
use roverview_core::collab::Delivery;
use roverview_core::config::ViewerConfig;
use roverview_core::controller::Viewer;

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{TextureState, UIState, ViewPreset};
use crate::workers;

pub struct RoverviewApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    /// Cloned into file-dialog threads that report straight back to the UI.
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub viewer: Viewer,
    pub ui_state: UIState,
    pub image_texture: TextureState,
    pub show_about: bool,
}

impl RoverviewApp {
    pub fn new(ctx: &egui::Context) -> anyhow::Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = workers::spawn_worker(result_tx.clone(), ctx.clone())?;
        let viewer = Viewer::new(ViewerConfig::map())?;

        Ok(Self {
            cmd_tx,
            result_tx,
            result_rx,
            viewer,
            ui_state: UIState::default(),
            image_texture: TextureState::default(),
            show_about: false,
        })
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded { path, image } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}x{})",
                        path.display(),
                        image.width(),
                        image.height()
                    ));
                    self.upload_texture(ctx, &image);
                    self.viewer.load_image(image);
                    self.ui_state.image_path = Some(path);
                }
                WorkerResult::PlanComplete {
                    ticket,
                    result,
                    elapsed,
                } => match self.viewer.complete_planning(ticket, result) {
                    Ok(Delivery::Applied(())) => {
                        let segments = self
                            .viewer
                            .overlay()
                            .path()
                            .map_or(0, |p| p.segment_count());
                        self.ui_state.add_log(format!(
                            "Route planned ({segments} segments) in {}",
                            format_duration(elapsed)
                        ));
                    }
                    Ok(Delivery::Stale) => {}
                    Err(e) => self.ui_state.add_log(format!("ERROR: Pathfinding failed: {e}")),
                },
                WorkerResult::DetectComplete {
                    ticket,
                    result,
                    elapsed,
                } => match self.viewer.complete_detection(ticket, result) {
                    Ok(Delivery::Applied(count)) => {
                        self.ui_state.add_log(format!(
                            "{count} objects detected in {}",
                            format_duration(elapsed)
                        ));
                    }
                    Ok(Delivery::Stale) => {}
                    Err(e) => self.ui_state.add_log(format!("ERROR: Analysis failed: {e}")),
                },
                WorkerResult::RoverComplete {
                    ticket,
                    result,
                    elapsed,
                } => match self.viewer.complete_rover_search(ticket, result) {
                    Ok(Delivery::Applied(())) => {
                        if let Some(report) = self.viewer.rover_report() {
                            self.ui_state.add_log(format!(
                                "Rover search: {} ({:.1}%) in {}",
                                report.verdict(),
                                report.probability,
                                format_duration(elapsed)
                            ));
                        }
                    }
                    Ok(Delivery::Stale) => {}
                    Err(e) => self.ui_state.add_log(format!("ERROR: Rover search failed: {e}")),
                },
                WorkerResult::SnapshotSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                WorkerResult::ConfigImported { config } => {
                    if self.apply_config(config) {
                        self.ui_state.preset = ViewPreset::Custom;
                        self.ui_state.add_log("Config imported".into());
                    }
                }
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    fn upload_texture(&mut self, ctx: &egui::Context, image: &BaseImage) {
        let size = [image.width() as usize, image.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, image.pixels().as_raw());
        self.image_texture.texture =
            Some(ctx.load_texture("base-image", color, egui::TextureOptions::NEAREST));
    }

    /// Swap in a new configuration. Image, overlay, view and requests in
    /// flight all stay with the viewer.
    pub fn apply_config(&mut self, config: ViewerConfig) -> bool {
        match self.viewer.set_config(config) {
            Ok(()) => true,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: Invalid config: {e}"));
                false
            }
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

impl eframe::App for RoverviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::details::show(ctx, self);
        panels::viewport::show(ctx, self);

        // Keep the spinner moving while a collaborator is busy.
        if self.viewer.is_processing() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if self.show_about {
            egui::Window::new("About Roverview")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Roverview");
                        ui.label("Rover route planning and object detection viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}

pub(crate) fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = secs / 60.0;
        format!("{mins:.1}min")
    }
}
