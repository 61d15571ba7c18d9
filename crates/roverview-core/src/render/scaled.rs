use crate::base_image::BaseImage;
use crate::transform::{ScreenPoint, ScreenRect};

use super::{Canvas, Color, Stroke, TextAnchor};

/// Presents a logical-unit canvas over a denser physical one, e.g. egui
/// points over exported pixels. Everything drawn is multiplied by `factor`.
pub struct ScaledCanvas<C> {
    inner: C,
    factor: f32,
}

impl<C: Canvas> ScaledCanvas<C> {
    /// Non-positive or non-finite factors fall back to 1.
    pub fn new(inner: C, factor: f32) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        Self { inner, factor }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn point(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(p.x * self.factor, p.y * self.factor)
    }

    fn rect(&self, r: ScreenRect) -> ScreenRect {
        ScreenRect {
            min: self.point(r.min),
            max: self.point(r.max),
        }
    }

    fn stroke(&self, s: Stroke) -> Stroke {
        Stroke {
            color: s.color,
            width: s.width * self.factor,
            dash: s.dash.map(|(on, off)| (on * self.factor, off * self.factor)),
        }
    }
}

impl<C: Canvas> Canvas for ScaledCanvas<C> {
    fn size(&self) -> (f32, f32) {
        let (w, h) = self.inner.size();
        (w / self.factor, h / self.factor)
    }

    fn clear(&mut self, color: Color) {
        self.inner.clear(color);
    }

    fn draw_image(&mut self, image: &BaseImage, dest: ScreenRect) {
        let dest = self.rect(dest);
        self.inner.draw_image(image, dest);
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        let rect = self.rect(rect);
        self.inner.fill_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: Stroke) {
        let (rect, stroke) = (self.rect(rect), self.stroke(stroke));
        self.inner.stroke_rect(rect, stroke);
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Stroke) {
        let (from, to, stroke) = (self.point(from), self.point(to), self.stroke(stroke));
        self.inner.line(from, to, stroke);
    }

    fn polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) {
        let points: Vec<ScreenPoint> = points.iter().map(|p| self.point(*p)).collect();
        let stroke = self.stroke(stroke);
        self.inner.polyline(&points, stroke);
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        let center = self.point(center);
        self.inner.fill_circle(center, radius * self.factor, color);
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke) {
        let (center, stroke) = (self.point(center), self.stroke(stroke));
        self.inner.stroke_circle(center, radius * self.factor, stroke);
    }

    fn text(&mut self, pos: ScreenPoint, anchor: TextAnchor, text: &str, size: f32, color: Color) {
        let pos = self.point(pos);
        self.inner.text(pos, anchor, text, size * self.factor, color);
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        self.inner.text_width(text, size * self.factor) / self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawOp, RecordingCanvas, WHITE};

    #[test]
    fn test_scales_geometry_and_reports_logical_size() {
        let mut canvas = ScaledCanvas::new(RecordingCanvas::new(800.0, 500.0), 2.0);
        assert_eq!(canvas.size(), (400.0, 250.0));

        canvas.line(
            ScreenPoint::new(10.0, 20.0),
            ScreenPoint::new(30.0, 40.0),
            Stroke::dashed(WHITE, 1.5, (4.0, 2.0)),
        );
        canvas.fill_circle(ScreenPoint::new(5.0, 5.0), 3.0, WHITE);

        let ops = canvas.into_inner().into_ops();
        assert_eq!(
            ops[0],
            DrawOp::Line {
                from: ScreenPoint::new(20.0, 40.0),
                to: ScreenPoint::new(60.0, 80.0),
                stroke: Stroke::dashed(WHITE, 3.0, (8.0, 4.0)),
            }
        );
        assert_eq!(
            ops[1],
            DrawOp::FillCircle {
                center: ScreenPoint::new(10.0, 10.0),
                radius: 6.0,
                color: WHITE,
            }
        );
    }

    #[test]
    fn test_invalid_factor_is_identity() {
        let canvas = ScaledCanvas::new(RecordingCanvas::new(100.0, 50.0), f32::NAN);
        assert_eq!(canvas.factor(), 1.0);
        assert_eq!(canvas.size(), (100.0, 50.0));
    }
}
