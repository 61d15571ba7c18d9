use roverview_core::base_image::BaseImage;
use roverview_core::render::{Canvas, Color, Stroke, TextAnchor};
use roverview_core::transform::{ScreenPoint, ScreenRect};

/// Paints renderer output through an egui painter clipped to the viewport.
///
/// Screen coordinates are relative to the viewport's top-left corner. The
/// base image is drawn from an already-uploaded texture.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    texture: Option<egui::TextureId>,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, rect: egui::Rect, texture: Option<egui::TextureId>) -> Self {
        Self {
            painter,
            rect,
            texture,
        }
    }

    fn pos(&self, p: ScreenPoint) -> egui::Pos2 {
        self.rect.min + egui::vec2(p.x, p.y)
    }

    fn to_rect(&self, r: ScreenRect) -> egui::Rect {
        egui::Rect::from_min_max(self.pos(r.min), self.pos(r.max))
    }
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

fn stroke32(s: Stroke) -> egui::Stroke {
    egui::Stroke::new(s.width, color32(s.color))
}

impl Canvas for EguiCanvas<'_> {
    fn size(&self) -> (f32, f32) {
        (self.rect.width(), self.rect.height())
    }

    fn clear(&mut self, color: Color) {
        self.painter.rect_filled(self.rect, 0.0, color32(color));
    }

    fn draw_image(&mut self, _image: &BaseImage, dest: ScreenRect) {
        let Some(texture) = self.texture else {
            return;
        };
        self.painter.image(
            texture,
            self.to_rect(dest),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.painter.rect_filled(self.to_rect(rect), 0.0, color32(color));
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: Stroke) {
        let r = self.to_rect(rect);
        if stroke.dash.is_some() {
            let corners = [
                r.left_top(),
                r.right_top(),
                r.right_bottom(),
                r.left_bottom(),
                r.left_top(),
            ];
            self.dashed(&corners, stroke);
        } else {
            self.painter
                .rect_stroke(r, 0.0, stroke32(stroke), egui::StrokeKind::Middle);
        }
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Stroke) {
        let points = [self.pos(from), self.pos(to)];
        if stroke.dash.is_some() {
            self.dashed(&points, stroke);
        } else {
            self.painter.line_segment(points, stroke32(stroke));
        }
    }

    fn polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) {
        let points: Vec<egui::Pos2> = points.iter().map(|&p| self.pos(p)).collect();
        if stroke.dash.is_some() {
            self.dashed(&points, stroke);
        } else {
            self.painter.add(egui::Shape::line(points, stroke32(stroke)));
        }
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        self.painter
            .circle_filled(self.pos(center), radius, color32(color));
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke) {
        self.painter
            .circle_stroke(self.pos(center), radius, stroke32(stroke));
    }

    fn text(&mut self, pos: ScreenPoint, anchor: TextAnchor, text: &str, size: f32, color: Color) {
        let align = match anchor {
            TextAnchor::Center => egui::Align2::CENTER_CENTER,
            TextAnchor::LeftCenter => egui::Align2::LEFT_CENTER,
        };
        self.painter.text(
            self.pos(pos),
            align,
            text,
            egui::FontId::proportional(size),
            color32(color),
        );
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.painter
            .layout_no_wrap(
                text.to_owned(),
                egui::FontId::proportional(size),
                egui::Color32::WHITE,
            )
            .size()
            .x
    }
}

impl EguiCanvas<'_> {
    fn dashed(&self, points: &[egui::Pos2], stroke: Stroke) {
        let (on, off) = stroke.dash.unwrap_or((1.0, 0.0));
        self.painter
            .extend(egui::Shape::dashed_line(points, stroke32(stroke), on, off));
    }
}
