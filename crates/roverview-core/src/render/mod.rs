//! Full-repaint renderer for the annotated viewport.
//!
//! Layers, back to front: base image, tint, grid, markers, path, detection
//! boxes. Every call repaints the whole canvas from the viewport and overlay;
//! nothing is cached between frames.

pub mod raster;
pub mod recording;
pub mod scaled;

use image::Rgba;

use crate::base_image::BaseImage;
use crate::config::StyleConfig;
use crate::consts::{
    BOX_DASH, BOX_WIDTH_SELECTED, BOX_WIDTH_UNSELECTED, CORNER_HANDLE_SIZE, END_MARKER_RGB,
    LABEL_BG_ALPHA_SELECTED, LABEL_BG_ALPHA_UNSELECTED, LABEL_FONT_SIZE, LABEL_PADDING,
    MARKER_FONT_SIZE, MARKER_RING_WIDTH, PATH_RGBA, START_MARKER_RGB,
};
use crate::overlay::{DetectionBox, MarkerRole, OverlayModel, Priority, Selection};
use crate::transform::{ImagePoint, ImageRect, ScreenPoint, ScreenRect, ViewportState};

pub use raster::RasterCanvas;
pub use recording::{DrawOp, RecordingCanvas};
pub use scaled::ScaledCanvas;

pub type Color = Rgba<u8>;

pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Build a color from RGB plus a [0, 1] alpha.
pub fn rgba(rgb: [u8; 3], alpha: f32) -> Color {
    Rgba([rgb[0], rgb[1], rgb[2], (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// `(on, off)` lengths in screen pixels, or `None` for a solid line.
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: (f32, f32)) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text centered on the position in both axes.
    Center,
    /// Text starts at the position, vertically centered on it.
    LeftCenter,
}

/// A 2D surface the renderer draws on. All coordinates are screen space.
pub trait Canvas {
    fn size(&self) -> (f32, f32);
    fn clear(&mut self, color: Color);
    /// Draw the whole base image stretched over `dest`.
    fn draw_image(&mut self, image: &BaseImage, dest: ScreenRect);
    fn fill_rect(&mut self, rect: ScreenRect, color: Color);
    fn stroke_rect(&mut self, rect: ScreenRect, stroke: Stroke);
    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Stroke);
    fn polyline(&mut self, points: &[ScreenPoint], stroke: Stroke);
    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke);
    fn text(&mut self, pos: ScreenPoint, anchor: TextAnchor, text: &str, size: f32, color: Color);
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Stroke color of a detection box.
pub fn priority_color(priority: Priority, selected: bool) -> Color {
    let rgb = match (priority, selected) {
        (Priority::High, true) => [0xff, 0x33, 0x33],
        (Priority::High, false) => [0xff, 0x66, 0x66],
        (Priority::Medium, true) => [0xff, 0xcc, 0x00],
        (Priority::Medium, false) => [0xff, 0xdd, 0x44],
        (Priority::Low, true) => [0x33, 0xcc, 0x33],
        (Priority::Low, false) => [0x66, 0xdd, 0x66],
    };
    rgba(rgb, 1.0)
}

pub fn marker_color(role: MarkerRole) -> Color {
    match role {
        MarkerRole::Start => rgba(START_MARKER_RGB, 1.0),
        MarkerRole::End => rgba(END_MARKER_RGB, 1.0),
    }
}

/// Repaint everything. A missing base image skips the image and tint layers;
/// the grid then covers the visible region instead of the image extent.
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    image: Option<&BaseImage>,
    viewport: &ViewportState,
    overlay: &OverlayModel,
    style: &StyleConfig,
) {
    let bg = style.background;
    canvas.clear(Rgba(bg));

    let grid_extent = match image.filter(|img| !img.is_empty()) {
        Some(img) => {
            let dest = viewport.image_rect_on_screen(img.width(), img.height());
            canvas.draw_image(img, dest);
            draw_tint(canvas, dest, style);
            ImageRect::new(0.0, 0.0, img.width() as f32, img.height() as f32)
        }
        None => {
            let (w, h) = canvas.size();
            viewport.visible_image_rect(w, h)
        }
    };

    draw_grid(canvas, viewport, grid_extent, style);
    draw_markers(canvas, viewport, overlay, style);
    draw_path(canvas, viewport, overlay, style);
    draw_detections(canvas, viewport, overlay, style);
}

fn canvas_rect<C: Canvas + ?Sized>(canvas: &C) -> ScreenRect {
    let (w, h) = canvas.size();
    ScreenRect::from_min_size(ScreenPoint::ORIGIN, w, h)
}

fn draw_tint<C: Canvas + ?Sized>(canvas: &mut C, image_rect: ScreenRect, style: &StyleConfig) {
    if style.tint_alpha <= 0.0 {
        return;
    }
    if let Some(visible) = image_rect.intersect(&canvas_rect(canvas)) {
        canvas.fill_rect(visible, rgba(style.tint_rgb, style.tint_alpha));
    }
}

/// Grid lines at multiples of the spacing, limited to the part of `extent`
/// that is on screen.
fn draw_grid<C: Canvas + ?Sized>(
    canvas: &mut C,
    viewport: &ViewportState,
    extent: ImageRect,
    style: &StyleConfig,
) {
    let spacing = style.grid_spacing;
    if spacing <= 0.0 || style.grid_alpha <= 0.0 {
        return;
    }
    // Lines closer than a pixel on screen would paint a solid sheet.
    let step_on_screen = spacing * viewport.scale();
    if !(step_on_screen >= 1.0) {
        return;
    }
    let (w, h) = canvas.size();
    let visible = viewport.visible_image_rect(w, h);

    let x0 = extent.x.max(visible.x);
    let x1 = (extent.x + extent.width).min(visible.x + visible.width);
    let y0 = extent.y.max(visible.y);
    let y1 = (extent.y + extent.height).min(visible.y + visible.height);
    if !(x0 <= x1 && y0 <= y1) {
        return;
    }

    let stroke = Stroke::solid(rgba([255, 255, 255], style.grid_alpha), 1.0);
    for x in grid_positions(x0, x1, spacing, max_grid_lines(w, step_on_screen)) {
        canvas.line(
            viewport.image_to_screen(ImagePoint::new(x, y0)),
            viewport.image_to_screen(ImagePoint::new(x, y1)),
            stroke,
        );
    }
    for y in grid_positions(y0, y1, spacing, max_grid_lines(h, step_on_screen)) {
        canvas.line(
            viewport.image_to_screen(ImagePoint::new(x0, y)),
            viewport.image_to_screen(ImagePoint::new(x1, y)),
            stroke,
        );
    }
}

/// Upper bound on grid lines across `extent` screen pixels.
fn max_grid_lines(extent: f32, step_on_screen: f32) -> usize {
    (extent / step_on_screen).ceil().max(0.0) as usize + 2
}

/// Multiples of `spacing` within `[lo, hi]`, at most `limit` of them.
///
/// Positions are computed from an integer index so that far-away extents,
/// where adding `spacing` to an `f32` no longer changes it, still terminate.
fn grid_positions(lo: f32, hi: f32, spacing: f32, limit: usize) -> impl Iterator<Item = f32> {
    let spacing = f64::from(spacing);
    let first = (f64::from(lo) / spacing).ceil();
    let last = (f64::from(hi) / spacing).floor();
    let count = if first.is_finite() && last.is_finite() && last >= first {
        ((last - first) as usize).saturating_add(1).min(limit)
    } else {
        0
    };
    (0..count).map(move |k| ((first + k as f64) * spacing) as f32)
}

fn draw_markers<C: Canvas + ?Sized>(
    canvas: &mut C,
    viewport: &ViewportState,
    overlay: &OverlayModel,
    style: &StyleConfig,
) {
    for marker in overlay.markers().iter() {
        let center = viewport.image_to_screen(marker.position);
        let selected = overlay.selection() == Some(&Selection::Marker(marker.role));
        let ring = if selected {
            MARKER_RING_WIDTH * 2.0
        } else {
            MARKER_RING_WIDTH
        };

        canvas.fill_circle(center, style.marker_radius, marker_color(marker.role));
        canvas.stroke_circle(center, style.marker_radius, Stroke::solid(WHITE, ring));
        canvas.text(
            center,
            TextAnchor::Center,
            marker.role.letter(),
            MARKER_FONT_SIZE,
            WHITE,
        );
    }
}

fn draw_path<C: Canvas + ?Sized>(
    canvas: &mut C,
    viewport: &ViewportState,
    overlay: &OverlayModel,
    style: &StyleConfig,
) {
    let Some(path) = overlay.path() else {
        return;
    };
    let color = Rgba(PATH_RGBA);
    let screen: Vec<ScreenPoint> = path
        .points()
        .iter()
        .map(|p| viewport.image_to_screen(*p))
        .collect();

    canvas.polyline(&screen, Stroke::solid(color, style.path_width));

    if let Some(Selection::PathSegment(i)) = overlay.selection() {
        if let (Some(a), Some(b)) = (screen.get(*i), screen.get(*i + 1)) {
            canvas.line(*a, *b, Stroke::solid(WHITE, style.path_width + 2.0));
        }
    }

    for p in path.interior_points() {
        canvas.fill_circle(viewport.image_to_screen(*p), style.path_dot_radius, color);
    }
}

fn draw_detections<C: Canvas + ?Sized>(
    canvas: &mut C,
    viewport: &ViewportState,
    overlay: &OverlayModel,
    style: &StyleConfig,
) {
    for b in overlay.detections() {
        let selected = overlay.is_detection_selected(&b.id);
        draw_detection_box(canvas, viewport, b, selected, style.label_height);
    }
}

fn draw_detection_box<C: Canvas + ?Sized>(
    canvas: &mut C,
    viewport: &ViewportState,
    b: &DetectionBox,
    selected: bool,
    label_height: f32,
) {
    let color = priority_color(b.priority, selected);
    let rect = ScreenRect {
        min: viewport.image_to_screen(b.bounds.top_left()),
        max: viewport.image_to_screen(b.bounds.bottom_right()),
    };

    let stroke = if selected {
        Stroke::solid(color, BOX_WIDTH_SELECTED)
    } else {
        Stroke::dashed(color, BOX_WIDTH_UNSELECTED, BOX_DASH)
    };
    canvas.stroke_rect(rect, stroke);

    // Label chip sits on top of the box, anchored at its top-left corner.
    let text = b.chip_text();
    let chip_width = canvas.text_width(&text, LABEL_FONT_SIZE) + LABEL_PADDING * 2.0;
    let chip = ScreenRect::from_min_size(
        ScreenPoint::new(rect.min.x, rect.min.y - label_height),
        chip_width,
        label_height,
    );
    let bg_alpha = if selected {
        LABEL_BG_ALPHA_SELECTED
    } else {
        LABEL_BG_ALPHA_UNSELECTED
    };
    canvas.fill_rect(chip, rgba([0, 0, 0], bg_alpha));
    canvas.text(
        ScreenPoint::new(rect.min.x + LABEL_PADDING, rect.min.y - label_height / 2.0),
        TextAnchor::LeftCenter,
        &text,
        LABEL_FONT_SIZE,
        color,
    );

    if selected {
        let half = CORNER_HANDLE_SIZE / 2.0;
        let corners = [
            rect.min,
            ScreenPoint::new(rect.max.x, rect.min.y),
            ScreenPoint::new(rect.min.x, rect.max.y),
            rect.max,
        ];
        for c in corners {
            canvas.fill_rect(
                ScreenRect::from_min_size(
                    ScreenPoint::new(c.x - half, c.y - half),
                    CORNER_HANDLE_SIZE,
                    CORNER_HANDLE_SIZE,
                ),
                color,
            );
        }
    }
}
