use roverview_core::controller::InputState;

use crate::app::RoverviewApp;

pub fn show(ctx: &egui::Context, app: &mut RoverviewApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        ui.horizontal(|ui| {
            if app.viewer.is_processing() {
                ui.spinner();
                let mut busy = Vec::new();
                if app.viewer.is_planning() {
                    busy.push("planning route");
                }
                if app.viewer.is_detecting() {
                    busy.push("analyzing image");
                }
                if app.viewer.is_searching_rover() {
                    busy.push("searching for rover");
                }
                ui.label(capitalize(&format!("{}...", busy.join(", "))));
            } else {
                ui.label("");
            }
        });

        // Log area, fixed height for 4 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            if let Some(image) = app.viewer.image() {
                ui.label(format!("{}x{}", image.width(), image.height()));
                ui.separator();
            }
            let vp = app.viewer.viewport();
            ui.label(format!("Zoom: {:.0}%", vp.scale() * 100.0));
            ui.separator();
            ui.label(format!("Offset: ({:.0}, {:.0})", vp.offset().x, vp.offset().y));
            ui.separator();
            let mode = match app.viewer.state() {
                InputState::Idle => "Idle".to_string(),
                InputState::PlacingMarker(role) => format!("Placing {role}"),
                InputState::Panning { .. } => "Panning".to_string(),
            };
            ui.label(mode);
            ui.separator();
            ui.label(format!("Preset: {}", app.ui_state.preset.label()));
        });

        ui.add_space(2.0);
    });
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
