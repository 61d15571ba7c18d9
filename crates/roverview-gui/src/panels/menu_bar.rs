use roverview_core::controller::InputEvent;
use roverview_core::export;

use crate::app::RoverviewApp;
use crate::messages::{WorkerCommand, WorkerResult};

pub fn show(ctx: &egui::Context, app: &mut RoverviewApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Image...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_image(app);
                }

                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui.add(egui::Button::new("Export Snapshot...").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    export_snapshot(ctx, app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Zoom In").clicked() {
                    app.viewer.handle(InputEvent::ZoomIn);
                }
                if ui.button("Zoom Out").clicked() {
                    app.viewer.handle(InputEvent::ZoomOut);
                }
                if ui.button("Reset View").clicked() {
                    ui.close();
                    app.viewer.handle(InputEvent::ResetView);
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_image(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            export_snapshot(ctx, app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

pub(crate) fn open_image(app: &mut RoverviewApp) {
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadImage { path });
        }
    });
}

/// Render the current view off-screen at display resolution, then let the
/// worker write it.
fn export_snapshot(ctx: &egui::Context, app: &mut RoverviewApp) {
    let rendered = match app.ui_state.canvas_size {
        Some((w, h)) => export::snapshot_at(&app.viewer, w, h, ctx.pixels_per_point()),
        None => export::snapshot(&app.viewer),
    };
    let image = match rendered {
        Ok(image) => image,
        Err(e) => {
            app.ui_state.add_log(format!("ERROR: Snapshot failed: {e}"));
            return;
        }
    };

    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("TIFF", &["tiff", "tif"])
            .set_file_name("snapshot.png")
            .save_file()
        {
            let _ = cmd_tx.send(WorkerCommand::SaveSnapshot { path, image });
        }
    });
}

fn import_config(app: &mut RoverviewApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()));
        let result = match parsed {
            Ok(config) => WorkerResult::ConfigImported { config },
            Err(message) => WorkerResult::Error {
                message: format!("Failed to read {}: {message}", path.display()),
            },
        };
        let _ = result_tx.send(result);
    });
}

fn export_config(app: &mut RoverviewApp) {
    let config = app.viewer.config().clone();
    let result_tx = app.result_tx.clone();

    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("roverview.toml")
            .save_file()
        {
            let written = toml::to_string_pretty(&config)
                .map_err(|e| e.to_string())
                .and_then(|content| std::fs::write(&path, content).map_err(|e| e.to_string()));
            let result = match written {
                Ok(()) => WorkerResult::Log {
                    message: format!("Config written to {}", path.display()),
                },
                Err(message) => WorkerResult::Error { message },
            };
            let _ = result_tx.send(result);
        }
    });
}
