use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut,
    draw_polygon_mut, draw_text_mut, text_size, Blend,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rayon::prelude::*;
use tracing::warn;

use crate::base_image::BaseImage;
use crate::config::StyleConfig;
use crate::consts::{FALLBACK_CHAR_WIDTH, LABEL_FONT_SIZE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, ViewerError};
use crate::transform::{ScreenPoint, ScreenRect};

use super::{Canvas, Color, Stroke, TextAnchor};

/// Lines at most this wide are drawn as single-pixel Bresenham lines.
const HAIRLINE_WIDTH: f32 = 1.5;

/// CPU raster canvas over an RGBA buffer. Every primitive is alpha-blended.
pub struct RasterCanvas {
    target: Blend<RgbaImage>,
    font: Option<FontArc>,
}

impl RasterCanvas {
    /// Blank canvas that labels with the bundled font.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Blend(RgbaImage::new(width, height)),
            font: builtin_font(),
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Drop label text; widths fall back to a per-character estimate.
    pub fn without_font(mut self) -> Self {
        self.font = None;
        self
    }

    /// Canvas sized `width` x `height` using the font named by the style,
    /// or the bundled one.
    pub fn from_style(width: u32, height: u32, style: &StyleConfig) -> Result<Self> {
        let canvas = Self::new(width, height);
        match &style.font_path {
            Some(path) => Ok(canvas.with_font(load_font(path)?)),
            None => Ok(canvas),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.target.0
    }

    fn bounds(&self) -> ScreenRect {
        let (w, h) = self.target.0.dimensions();
        ScreenRect::from_min_size(ScreenPoint::ORIGIN, w as f32, h as f32)
    }

    fn solid_segment(&mut self, a: ScreenPoint, b: ScreenPoint, width: f32, color: Color) {
        if width <= HAIRLINE_WIDTH {
            draw_line_segment_mut(&mut self.target, (a.x, a.y), (b.x, b.y), color);
            return;
        }

        let half = width / 2.0;
        let len = a.distance(b);
        if len < 0.5 {
            self.fill_circle(a, half, color);
            return;
        }

        let nx = -(b.y - a.y) / len * half;
        let ny = (b.x - a.x) / len * half;
        let corner = |p: ScreenPoint, sign: f32| {
            Point::new((p.x + sign * nx).round() as i32, (p.y + sign * ny).round() as i32)
        };
        let quad = [corner(a, 1.0), corner(b, 1.0), corner(b, -1.0), corner(a, -1.0)];
        if quad[0] == quad[3] {
            draw_line_segment_mut(&mut self.target, (a.x, a.y), (b.x, b.y), color);
        } else {
            draw_polygon_mut(&mut self.target, &quad, color);
        }
    }

    fn dashed_segment(
        &mut self,
        a: ScreenPoint,
        b: ScreenPoint,
        width: f32,
        color: Color,
        (on, off): (f32, f32),
    ) {
        let len = a.distance(b);
        let period = on + off;
        if len <= 0.0 || on <= 0.0 || period <= 0.0 {
            return;
        }
        let (ux, uy) = ((b.x - a.x) / len, (b.y - a.y) / len);
        let at = |t: f32| ScreenPoint::new(a.x + ux * t, a.y + uy * t);

        let mut t = 0.0;
        while t < len {
            let end = (t + on).min(len);
            self.solid_segment(at(t), at(end), width, color);
            t += period;
        }
    }
}

/// Sans-serif face bundled with the binary.
pub fn builtin_font() -> Option<FontArc> {
    match FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Bundled label font unusable, label text will be skipped: {e}");
            None
        }
    }
}

/// Load a TrueType/OpenType font for label text.
pub fn load_font(path: &Path) -> Result<FontArc> {
    let bytes = std::fs::read(path)?;
    FontArc::try_from_vec(bytes).map_err(|e| {
        ViewerError::InvalidConfig(format!("cannot load font {}: {e}", path.display()))
    })
}

/// Clip segment `a`-`b` to `rect` (Liang-Barsky). `None` if it lies outside.
fn clip_segment(
    a: ScreenPoint,
    b: ScreenPoint,
    rect: &ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    let edges = [
        (-dx, a.x - rect.min.x),
        (dx, rect.max.x - a.x),
        (-dy, a.y - rect.min.y),
        (dy, rect.max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((
        ScreenPoint::new(a.x + t0 * dx, a.y + t0 * dy),
        ScreenPoint::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

/// Expand a rectangle by `margin` on every side.
fn inflate(rect: ScreenRect, margin: f32) -> ScreenRect {
    ScreenRect {
        min: ScreenPoint::new(rect.min.x - margin, rect.min.y - margin),
        max: ScreenPoint::new(rect.max.x + margin, rect.max.y + margin),
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (f32, f32) {
        let (w, h) = self.target.0.dimensions();
        (w as f32, h as f32)
    }

    fn clear(&mut self, color: Color) {
        for px in self.target.0.pixels_mut() {
            *px = color;
        }
    }

    fn draw_image(&mut self, image: &BaseImage, dest: ScreenRect) {
        let (cw, ch) = self.target.0.dimensions();
        if cw == 0 || ch == 0 || image.is_empty() || dest.is_empty() {
            return;
        }
        let Some(visible) = dest.intersect(&self.bounds()) else {
            return;
        };

        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let sx = iw / dest.width();
        let sy = ih / dest.height();
        let row_range = visible.min.y.floor().max(0.0) as usize..(visible.max.y.ceil() as usize).min(ch as usize);
        let col_range = visible.min.x.floor().max(0.0) as usize..(visible.max.x.ceil() as usize).min(cw as usize);

        // Nearest-neighbour inverse mapping: each canvas pixel center picks
        // the source pixel it lands on.
        let fill_row = |row: usize, chunk: &mut [u8]| {
            if !row_range.contains(&row) {
                return;
            }
            let y = (row as f32 + 0.5 - dest.min.y) * sy;
            if !(0.0..ih).contains(&y) {
                return;
            }
            for col in col_range.clone() {
                let x = (col as f32 + 0.5 - dest.min.x) * sx;
                if !(0.0..iw).contains(&x) {
                    continue;
                }
                let px = &mut chunk[col * 4..col * 4 + 4];
                let mut dst = Rgba([px[0], px[1], px[2], px[3]]);
                dst.blend(&image.sample(x, y));
                px.copy_from_slice(&dst.0);
            }
        };

        let stride = cw as usize * 4;
        let buf: &mut [u8] = &mut self.target.0;
        if cw as usize * ch as usize >= PARALLEL_PIXEL_THRESHOLD {
            buf.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(row, chunk)| fill_row(row, chunk));
        } else {
            buf.chunks_mut(stride)
                .enumerate()
                .for_each(|(row, chunk)| fill_row(row, chunk));
        }
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return;
        };
        let x0 = r.min.x.round() as i32;
        let y0 = r.min.y.round() as i32;
        let x1 = r.max.x.round() as i32;
        let y1 = r.max.y.round() as i32;
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        draw_filled_rect_mut(
            &mut self.target,
            Rect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32),
            color,
        );
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: Stroke) {
        let tl = rect.min;
        let tr = ScreenPoint::new(rect.max.x, rect.min.y);
        let br = rect.max;
        let bl = ScreenPoint::new(rect.min.x, rect.max.y);
        for (a, b) in [(tl, tr), (tr, br), (br, bl), (bl, tl)] {
            self.line(a, b, stroke);
        }
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Stroke) {
        let clip = inflate(self.bounds(), stroke.width + 2.0);
        let Some((a, b)) = clip_segment(from, to, &clip) else {
            return;
        };
        match stroke.dash {
            Some(dash) => self.dashed_segment(a, b, stroke.width, stroke.color, dash),
            None => self.solid_segment(a, b, stroke.width, stroke.color),
        }
    }

    fn polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) {
        let joined = stroke.dash.is_none() && stroke.width > HAIRLINE_WIDTH && points.len() > 2;
        if !joined {
            for pair in points.windows(2) {
                self.line(pair[0], pair[1], stroke);
            }
            return;
        }

        // Segments and round joins overlap, so the shape is painted opaque
        // on a scratch layer and blended onto the target once per pixel.
        let (w, h) = self.target.0.dimensions();
        let mut layer = Self {
            target: Blend(RgbaImage::new(w, h)),
            font: None,
        };
        let [r, g, b, alpha] = stroke.color.0;
        let opaque = Rgba([r, g, b, 255]);
        for pair in points.windows(2) {
            layer.line(pair[0], pair[1], Stroke::solid(opaque, stroke.width));
        }
        for p in &points[1..points.len() - 1] {
            layer.fill_circle(*p, stroke.width / 2.0, opaque);
        }
        for (dst, src) in self.target.0.pixels_mut().zip(layer.target.0.pixels()) {
            if src.0[3] != 0 {
                dst.blend(&Rgba([r, g, b, alpha]));
            }
        }
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        if !point_in(&inflate(self.bounds(), radius), center) {
            return;
        }
        draw_filled_circle_mut(
            &mut self.target,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round().max(1.0) as i32,
            color,
        );
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke) {
        if !point_in(&inflate(self.bounds(), radius + stroke.width), center) {
            return;
        }
        let c = (center.x.round() as i32, center.y.round() as i32);
        let inner = (radius - stroke.width / 2.0).round() as i32;
        let rings = stroke.width.round().max(1.0) as i32;
        for k in 0..rings {
            let r = inner + k;
            if r > 0 {
                draw_hollow_circle_mut(&mut self.target, c, r, stroke.color);
            }
        }
    }

    fn text(&mut self, pos: ScreenPoint, anchor: TextAnchor, text: &str, size: f32, color: Color) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(size);
        let (tw, th) = text_size(scale, font, text);
        let (x, y) = match anchor {
            TextAnchor::Center => (pos.x - tw as f32 / 2.0, pos.y - th as f32 / 2.0),
            TextAnchor::LeftCenter => (pos.x, pos.y - th as f32 / 2.0),
        };
        draw_text_mut(
            &mut self.target,
            color,
            x.round() as i32,
            y.round() as i32,
            scale,
            font,
            text,
        );
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        match &self.font {
            Some(font) => text_size(PxScale::from(size), font, text).0 as f32,
            None => text.chars().count() as f32 * FALLBACK_CHAR_WIDTH * size / LABEL_FONT_SIZE,
        }
    }
}

fn point_in(rect: &ScreenRect, p: ScreenPoint) -> bool {
    p.x >= rect.min.x && p.x <= rect.max.x && p.y >= rect.min.y && p.y <= rect.max.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f32, h: f32) -> ScreenRect {
        ScreenRect::from_min_size(ScreenPoint::ORIGIN, w, h)
    }

    #[test]
    fn test_clip_segment_inside_unchanged() {
        let a = ScreenPoint::new(1.0, 1.0);
        let b = ScreenPoint::new(5.0, 5.0);
        assert_eq!(clip_segment(a, b, &rect(10.0, 10.0)), Some((a, b)));
    }

    #[test]
    fn test_clip_segment_crossing() {
        let (a, b) = clip_segment(
            ScreenPoint::new(-10.0, 5.0),
            ScreenPoint::new(20.0, 5.0),
            &rect(10.0, 10.0),
        )
        .unwrap();
        assert!((a.x - 0.0).abs() < 1e-5);
        assert!((b.x - 10.0).abs() < 1e-5);
        assert_eq!(a.y, 5.0);
    }

    #[test]
    fn test_clip_segment_outside() {
        let clipped = clip_segment(
            ScreenPoint::new(-10.0, -10.0),
            ScreenPoint::new(-1.0, 50.0),
            &rect(10.0, 10.0),
        );
        assert!(clipped.is_none());
    }

    #[test]
    fn test_dashed_line_leaves_gaps() {
        let mut canvas = RasterCanvas::new(40, 5);
        canvas.clear(Rgba([0, 0, 0, 255]));
        canvas.line(
            ScreenPoint::new(0.0, 2.0),
            ScreenPoint::new(39.0, 2.0),
            Stroke::dashed(Rgba([255, 255, 255, 255]), 1.0, (5.0, 3.0)),
        );
        let img = canvas.into_image();
        // First dash covers x in [0, 5], first gap lies strictly inside (5, 8).
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(6, 2).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_translucent_polyline_joins_match_segments() {
        let mut canvas = RasterCanvas::new(40, 40);
        canvas.clear(Rgba([0, 0, 0, 255]));
        let points = [
            ScreenPoint::new(4.0, 10.0),
            ScreenPoint::new(20.0, 10.0),
            ScreenPoint::new(20.0, 34.0),
        ];
        canvas.polyline(&points, Stroke::solid(Rgba([255, 0, 0, 128]), 6.0));
        let img = canvas.into_image();

        let mid_segment = *img.get_pixel(12, 10);
        assert_ne!(mid_segment, Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(20, 10), mid_segment);
        assert_eq!(*img.get_pixel(20, 20), mid_segment);
    }
}
