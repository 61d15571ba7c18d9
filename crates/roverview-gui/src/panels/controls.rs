use roverview_core::controller::{EventOutcome, IgnoreReason, InputEvent, InputState};
use roverview_core::overlay::MarkerRole;

use crate::app::RoverviewApp;
use crate::messages::WorkerCommand;
use crate::panels::{menu_bar, section_header};
use crate::states::ViewPreset;

const LEFT_PANEL_WIDTH: f32 = 240.0;

pub fn show(ctx: &egui::Context, app: &mut RoverviewApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ui, app);
                ui.separator();
                route_section(ui, app);
                ui.separator();
                analysis_section(ui, app);
                ui.separator();
                view_section(ui, app);
            });
        });
}

fn file_section(ui: &mut egui::Ui, app: &mut RoverviewApp) {
    section_header(ui, "File", None);
    ui.add_space(4.0);

    if ui.button("Open Image...").clicked() {
        menu_bar::open_image(app);
    }

    if let Some(ref path) = app.ui_state.image_path {
        ui.label(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
    }
    if let Some(image) = app.viewer.image() {
        ui.small(format!("{}x{}", image.width(), image.height()));
    }
}

fn route_section(ui: &mut egui::Ui, app: &mut RoverviewApp) {
    let status = app.viewer.is_planning().then_some("planning...");
    section_header(ui, "Route", status);
    ui.add_space(4.0);

    let enabled = app.viewer.image().is_some() && !app.viewer.is_processing();
    let placing = match app.viewer.state() {
        InputState::PlacingMarker(role) => Some(role),
        _ => None,
    };

    ui.horizontal(|ui| {
        for role in [MarkerRole::Start, MarkerRole::End] {
            let label = format!("Set {role}");
            let button = egui::Button::new(label).selected(placing == Some(role));
            if ui.add_enabled(enabled, button).clicked() {
                let outcome = app.viewer.handle(InputEvent::BeginPlacing(role));
                log_ignored(app, outcome);
            }
        }
    });

    let markers = app.viewer.overlay().markers();
    for role in [MarkerRole::Start, MarkerRole::End] {
        match markers.get(role) {
            Some(p) => ui.small(format!("{role}: ({:.0}, {:.0})", p.x, p.y)),
            None => ui.small(format!("{role}: not set")),
        };
    }

    ui.add_space(4.0);
    let can_plan = enabled && markers.endpoints().is_some();
    ui.horizontal(|ui| {
        if ui.add_enabled(can_plan, egui::Button::new("Find Path")).clicked() {
            match app.viewer.begin_planning() {
                Ok((ticket, start, end)) => {
                    app.ui_state.add_log(format!("Planning route {ticket}..."));
                    app.send_command(WorkerCommand::Plan { ticket, start, end });
                }
                Err(e) => app.ui_state.add_log(format!("ERROR: {e}")),
            }
        }
        if ui.add_enabled(enabled, egui::Button::new("Clear")).clicked() {
            app.viewer.clear_overlay();
            app.ui_state.add_log("Overlay cleared".into());
        }
    });
}

fn analysis_section(ui: &mut egui::Ui, app: &mut RoverviewApp) {
    let status = if app.viewer.is_detecting() {
        Some("analyzing...")
    } else if app.viewer.is_searching_rover() {
        Some("searching...")
    } else {
        None
    };
    section_header(ui, "Analysis", status);
    ui.add_space(4.0);

    let enabled = app.viewer.image().is_some() && !app.viewer.is_processing();
    if ui.add_enabled(enabled, egui::Button::new("Analyze Image")).clicked() {
        match app.viewer.begin_detection() {
            Ok((ticket, image)) => {
                app.ui_state.add_log(format!("Analyzing image {ticket}..."));
                app.send_command(WorkerCommand::Detect { ticket, image });
            }
            Err(e) => app.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    let count = app.viewer.overlay().detections().len();
    if count > 0 {
        ui.small(format!("{count} objects"));
    }

    ui.add_space(4.0);
    if ui.add_enabled(enabled, egui::Button::new("Search for Rover")).clicked() {
        match app.viewer.begin_rover_search() {
            Ok((ticket, image)) => {
                app.ui_state.add_log(format!("Searching for rover {ticket}..."));
                app.send_command(WorkerCommand::DetectRover { ticket, image });
            }
            Err(e) => app.ui_state.add_log(format!("ERROR: {e}")),
        }
    }
}

fn view_section(ui: &mut egui::Ui, app: &mut RoverviewApp) {
    section_header(ui, "View", None);
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui.button("\u{2212}").clicked() {
            app.viewer.handle(InputEvent::ZoomOut);
        }
        ui.label(format!("{:.0}%", app.viewer.viewport().scale() * 100.0));
        if ui.button("+").clicked() {
            app.viewer.handle(InputEvent::ZoomIn);
        }
        if ui.button("Reset").clicked() {
            app.viewer.handle(InputEvent::ResetView);
        }
    });

    ui.add_space(4.0);
    let current = app.ui_state.preset;
    egui::ComboBox::from_label("Preset")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for preset in [ViewPreset::Map, ViewPreset::Detection] {
                if ui
                    .selectable_label(current == preset, preset.label())
                    .clicked()
                    && current != preset
                {
                    if let Some(config) = preset.config() {
                        if app.apply_config(config) {
                            app.ui_state.preset = preset;
                        }
                    }
                }
            }
        });
}

fn log_ignored(app: &mut RoverviewApp, outcome: EventOutcome) {
    if let EventOutcome::Ignored(reason) = outcome {
        let message = match reason {
            IgnoreReason::NoImage => "Open an image first",
            IgnoreReason::Processing => "Wait for the current request to finish",
            IgnoreReason::InvalidPointerState | IgnoreReason::SuppressedAfterDrag => return,
        };
        app.ui_state.add_log(message.into());
    }
}
