use roverview_core::controller::{EventOutcome, InputEvent, InputState};
use roverview_core::transform::ScreenPoint;

use crate::app::RoverviewApp;
use crate::canvas::EguiCanvas;

pub fn show(ctx: &egui::Context, app: &mut RoverviewApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            app.ui_state.canvas_size = Some((rect.width(), rect.height()));

            if handle_pointer(ui, &response, app, rect) {
                ctx.request_repaint();
            }
            set_cursor(ui, &response, app);

            let painter = ui.painter_at(rect);
            let mut canvas = EguiCanvas::new(&painter, rect, app.image_texture.id());
            app.viewer.render(&mut canvas);

            if app.viewer.image().is_none() {
                show_placeholder(&painter, rect);
            } else if let InputState::PlacingMarker(role) = app.viewer.state() {
                draw_hint(
                    &painter,
                    rect,
                    &format!("Click to place the {role} marker, Esc to cancel"),
                );
            }
        });
}

fn local(rect: egui::Rect, pos: egui::Pos2) -> ScreenPoint {
    ScreenPoint::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

/// Translate this frame's raw pointer input into viewer events. Returns
/// true when any of them changed what is on screen.
fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut RoverviewApp,
    rect: egui::Rect,
) -> bool {
    let (pressed, released, moved, pos, scroll, escape) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.delta() != egui::Vec2::ZERO,
            i.pointer.latest_pos(),
            i.raw_scroll_delta.y,
            i.key_pressed(egui::Key::Escape),
        )
    });

    let mut events = Vec::new();

    if escape && matches!(app.viewer.state(), InputState::PlacingMarker(_)) {
        events.push(InputEvent::CancelPlacing);
    }

    if response.hovered() && scroll != 0.0 {
        events.push(if scroll > 0.0 {
            InputEvent::ZoomIn
        } else {
            InputEvent::ZoomOut
        });
    }

    if pressed && response.hovered() {
        if let Some(p) = pos {
            app.ui_state.pointer_captured = true;
            events.push(InputEvent::PointerDown(local(rect, p)));
        }
    }

    if app.ui_state.pointer_captured {
        match pos {
            Some(p) if released => {
                app.ui_state.pointer_captured = false;
                if rect.contains(p) {
                    let sp = local(rect, p);
                    events.push(InputEvent::PointerUp(sp));
                    events.push(InputEvent::Click(sp));
                } else {
                    events.push(InputEvent::PointerLeave);
                }
            }
            Some(p) if moved => events.push(InputEvent::PointerMove(local(rect, p))),
            Some(_) => {}
            None => {
                app.ui_state.pointer_captured = false;
                events.push(InputEvent::PointerLeave);
            }
        }
    }

    let mut repaint = false;
    for event in events {
        repaint |= app.viewer.handle(event) == EventOutcome::Repaint;
    }
    repaint
}

fn set_cursor(ui: &egui::Ui, response: &egui::Response, app: &RoverviewApp) {
    if !response.hovered() {
        return;
    }
    let icon = match app.viewer.state() {
        InputState::PlacingMarker(_) => egui::CursorIcon::Crosshair,
        InputState::Panning { .. } => egui::CursorIcon::Grabbing,
        InputState::Idle if app.viewer.is_processing() => egui::CursorIcon::Progress,
        InputState::Idle => egui::CursorIcon::Grab,
    };
    ui.ctx().set_cursor_icon(icon);
}

fn draw_hint(painter: &egui::Painter, rect: egui::Rect, text: &str) {
    let pos = rect.center_top() + egui::vec2(0.0, 16.0);
    let galley = painter.layout_no_wrap(
        text.to_owned(),
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
    let bg = egui::Rect::from_center_size(
        pos + egui::vec2(0.0, galley.size().y / 2.0),
        galley.size() + egui::vec2(16.0, 8.0),
    );
    painter.rect_filled(bg, 4.0, egui::Color32::from_black_alpha(180));
    painter.galley(bg.min + egui::vec2(8.0, 4.0), galley, egui::Color32::WHITE);
}

fn show_placeholder(painter: &egui::Painter, rect: egui::Rect) {
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Open an image to begin (File > Open Image...)",
        egui::FontId::proportional(18.0),
        egui::Color32::from_white_alpha(160),
    );
}
