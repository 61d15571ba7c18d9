use crate::base_image::BaseImage;
use crate::consts::{FALLBACK_CHAR_WIDTH, LABEL_FONT_SIZE};
use crate::transform::{ScreenPoint, ScreenRect};

use super::{Canvas, Color, Stroke, TextAnchor};

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Image {
        dest: ScreenRect,
        width: u32,
        height: u32,
    },
    FillRect {
        rect: ScreenRect,
        color: Color,
    },
    StrokeRect {
        rect: ScreenRect,
        stroke: Stroke,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<ScreenPoint>,
        stroke: Stroke,
    },
    FillCircle {
        center: ScreenPoint,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: ScreenPoint,
        radius: f32,
        stroke: Stroke,
    },
    Text {
        pos: ScreenPoint,
        anchor: TextAnchor,
        text: String,
        size: f32,
        color: Color,
    },
}

/// Canvas that records draw calls instead of producing pixels.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[ScreenPoint]> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    /// Centers of filled circles with the given radius.
    pub fn circles_with_radius(&self, radius: f32) -> Vec<ScreenPoint> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { center, radius: r, .. } if (*r - radius).abs() < 1e-6 => {
                    Some(*center)
                }
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn stroke_rects(&self) -> Vec<(ScreenRect, Stroke)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeRect { rect, stroke } => Some((*rect, *stroke)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn draw_image(&mut self, image: &BaseImage, dest: ScreenRect) {
        self.ops.push(DrawOp::Image {
            dest,
            width: image.width(),
            height: image.height(),
        });
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: Stroke) {
        self.ops.push(DrawOp::StrokeRect { rect, stroke });
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Stroke) {
        self.ops.push(DrawOp::Line { from, to, stroke });
    }

    fn polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke) {
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    fn text(&mut self, pos: ScreenPoint, anchor: TextAnchor, text: &str, size: f32, color: Color) {
        self.ops.push(DrawOp::Text {
            pos,
            anchor,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * FALLBACK_CHAR_WIDTH * size / LABEL_FONT_SIZE
    }
}
