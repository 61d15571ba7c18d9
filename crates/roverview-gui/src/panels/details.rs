use roverview_core::collab::PathMetrics;
use roverview_core::overlay::{Priority, Selection};
use roverview_core::render::priority_color;
use roverview_core::rover::{RoverReport, RoverVerdict};

use crate::app::RoverviewApp;
use crate::panels::section_header;

const RIGHT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut RoverviewApp) {
    egui::SidePanel::right("details")
        .default_width(RIGHT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(RIGHT_PANEL_WIDTH - 20.0);

                route_section(ui, app);
                ui.separator();
                detections_section(ui, app);
                ui.separator();
                rover_section(ui, app);
            });
        });
}

fn route_section(ui: &mut egui::Ui, app: &RoverviewApp) {
    section_header(ui, "Route Analysis", None);
    ui.add_space(4.0);

    match app.viewer.metrics() {
        Some(metrics) => metrics_grid(ui, metrics),
        None => {
            ui.weak("No route planned");
        }
    }
}

fn metrics_grid(ui: &mut egui::Ui, m: &PathMetrics) {
    egui::Grid::new("route_metrics")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui.label("Distance");
            ui.label(&m.distance_label);
            ui.end_row();

            ui.label("ETA");
            ui.label(&m.eta_label);
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.label("Terrain difficulty");
    ui.add(
        egui::ProgressBar::new(f32::from(m.terrain_difficulty) / 100.0)
            .text(format!("{}%", m.terrain_difficulty)),
    );
    ui.label("Environmental risk");
    ui.add(
        egui::ProgressBar::new(f32::from(m.environmental_risk) / 100.0)
            .text(format!("{}%", m.environmental_risk)),
    );

    ui.add_space(6.0);
    egui::Grid::new("route_environment")
        .num_columns(2)
        .show(ui, |ui| {
            for (name, value) in [
                ("Weather", &m.weather),
                ("Temperature", &m.temperature),
                ("Wind", &m.wind_speed),
                ("Visibility", &m.visibility),
            ] {
                ui.label(name);
                ui.label(value);
                ui.end_row();
            }
        });
}

fn detections_section(ui: &mut egui::Ui, app: &mut RoverviewApp) {
    let count = app.viewer.overlay().detections().len();
    let status = (count > 0).then(|| format!("{count}"));
    section_header(ui, "Detected Objects", status.as_deref());
    ui.add_space(4.0);

    if count == 0 {
        ui.weak("Run analysis to detect objects");
        return;
    }

    let mut clicked = None;
    for b in app.viewer.overlay().detections() {
        let selected = app.viewer.overlay().is_detection_selected(&b.id);
        let [r, g, bl, _] = priority_color(b.priority, true).0;
        ui.horizontal(|ui| {
            ui.colored_label(egui::Color32::from_rgb(r, g, bl), priority_glyph(b.priority));
            if ui.selectable_label(selected, b.chip_text()).clicked() {
                clicked = Some((b.id.clone(), selected));
            }
        });
        if selected && !b.description.is_empty() {
            ui.small(&b.description);
        }
    }

    if let Some((id, was_selected)) = clicked {
        let selection = (!was_selected).then_some(Selection::Detection(id));
        if let Err(e) = app.viewer.select(selection) {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }
}

fn rover_section(ui: &mut egui::Ui, app: &RoverviewApp) {
    let status = app.viewer.is_searching_rover().then_some("searching...");
    section_header(ui, "Rover Search", status);
    ui.add_space(4.0);

    match app.viewer.rover_report() {
        Some(report) => rover_report(ui, report),
        None => {
            ui.weak("Search the image for the stranded rover");
        }
    }
}

fn rover_report(ui: &mut egui::Ui, r: &RoverReport) {
    let verdict = r.verdict();
    let color = match verdict {
        RoverVerdict::High => egui::Color32::from_rgb(0x33, 0xcc, 0x33),
        RoverVerdict::Medium => egui::Color32::from_rgb(0xff, 0xcc, 0x00),
        RoverVerdict::Low => egui::Color32::from_rgb(0xff, 0x33, 0x33),
    };
    ui.add(
        egui::ProgressBar::new(r.probability / 100.0)
            .fill(color)
            .text(format!("{:.1}%", r.probability)),
    );
    ui.colored_label(color, verdict.to_string());

    ui.add_space(6.0);
    let c = &r.conditions;
    let confidence = format!("{:.1}%", c.confidence);
    egui::Grid::new("rover_report")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            for (name, value) in [
                ("Latitude", r.latitude.as_str()),
                ("Longitude", r.longitude.as_str()),
                ("Surface temp", c.surface_temp.as_str()),
                ("Light", c.light_level.as_str()),
                ("Terrain", c.terrain_type.as_str()),
                ("Confidence", confidence.as_str()),
            ] {
                ui.label(name);
                ui.label(value);
                ui.end_row();
            }
        });
}

fn priority_glyph(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "\u{25B2}",
        Priority::Medium => "\u{25C6}",
        Priority::Low => "\u{25CF}",
    }
}
