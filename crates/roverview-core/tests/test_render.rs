mod common;

use image::Rgba;

use roverview_core::config::{StyleConfig, ViewerConfig};
use roverview_core::consts::{BOX_DASH, MARKER_RADIUS, PATH_DOT_RADIUS};
use roverview_core::controller::Viewer;
use roverview_core::overlay::{MarkerRole, PathPolyline, Selection};
use roverview_core::render::{
    priority_color, render, Canvas, DrawOp, RasterCanvas, RecordingCanvas, TextAnchor,
};
use roverview_core::transform::{ImagePoint, ScreenPoint, ViewportState};

use common::{detection, viewer_with_image};

/// Start (100,100), End (700,500) and a 10-vertex path between them.
fn route_viewer() -> (Viewer, Vec<ImagePoint>) {
    let mut v = viewer_with_image(800, 600);
    let start = ImagePoint::new(100.0, 100.0);
    let end = ImagePoint::new(700.0, 500.0);
    v.place_marker(MarkerRole::Start, start).unwrap();
    v.place_marker(MarkerRole::End, end).unwrap();

    let points: Vec<ImagePoint> = (0..10)
        .map(|i| {
            let t = i as f32 / 9.0;
            ImagePoint::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            )
        })
        .collect();
    v.replace_path(Some(PathPolyline::new(points.clone()).unwrap()));
    (v, points)
}

fn first(ops: &[DrawOp], pred: impl Fn(&DrawOp) -> bool) -> usize {
    ops.iter().position(pred).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario: path over an 800x600 image
// ---------------------------------------------------------------------------

#[test]
fn test_path_scenario_primitive_counts() {
    let (v, points) = route_viewer();
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    v.render(&mut canvas);

    let polylines: Vec<&[ScreenPoint]> = canvas.polylines().collect();
    assert_eq!(polylines.len(), 1);
    assert_eq!(polylines[0].len(), 10);

    let markers = canvas.circles_with_radius(MARKER_RADIUS);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0], ScreenPoint::new(100.0, 100.0));
    assert_eq!(markers[1], ScreenPoint::new(700.0, 500.0));

    let dots = canvas.circles_with_radius(PATH_DOT_RADIUS);
    assert_eq!(dots.len(), 8);
    let p0 = ScreenPoint::new(points[0].x, points[0].y);
    let p9 = ScreenPoint::new(points[9].x, points[9].y);
    assert!(!dots.contains(&p0));
    assert!(!dots.contains(&p9));

    let texts = canvas.texts();
    assert!(texts.contains(&"S"));
    assert!(texts.contains(&"E"));
}

#[test]
fn test_layer_order() {
    let (mut v, _) = route_viewer();
    v.replace_detections(vec![detection("obj-0", 200.0, 200.0, 60.0, 60.0)])
        .unwrap();
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    v.render(&mut canvas);

    let ops = canvas.ops();
    let clear = first(ops, |op| matches!(op, DrawOp::Clear(_)));
    let image = first(ops, |op| matches!(op, DrawOp::Image { .. }));
    let marker = first(ops, |op| {
        matches!(op, DrawOp::FillCircle { radius, .. } if *radius == MARKER_RADIUS)
    });
    let path = first(ops, |op| matches!(op, DrawOp::Polyline { .. }));
    let boxes = first(ops, |op| matches!(op, DrawOp::StrokeRect { .. }));

    assert_eq!(clear, 0);
    assert!(image < marker);
    assert!(marker < path);
    assert!(path < boxes);
}

#[test]
fn test_markers_keep_size_under_zoom() {
    let (mut v, _) = route_viewer();
    v.set_view(0.5, ScreenPoint::ORIGIN).unwrap();
    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    v.render(&mut canvas);

    let markers = canvas.circles_with_radius(MARKER_RADIUS);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1], ScreenPoint::new(350.0, 250.0));
}

// ---------------------------------------------------------------------------
// Detection boxes
// ---------------------------------------------------------------------------

#[test]
fn test_selected_box_is_solid_unselected_dashed() {
    let mut v = viewer_with_image(800, 600);
    v.replace_detections(vec![
        detection("a", 10.0, 40.0, 50.0, 50.0),
        detection("b", 200.0, 200.0, 50.0, 50.0),
    ])
    .unwrap();
    v.select(Some(Selection::Detection("a".into()))).unwrap();

    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    v.render(&mut canvas);
    let rects = canvas.stroke_rects();
    assert_eq!(rects.len(), 2);

    let (_, selected) = rects[0];
    assert!(selected.dash.is_none());
    assert_eq!(selected.width, 3.0);
    assert_eq!(selected.color, priority_color(v.overlay().detections()[0].priority, true));

    let (_, unselected) = rects[1];
    assert_eq!(unselected.dash, Some(BOX_DASH));
    assert_eq!(unselected.width, 2.0);
}

#[test]
fn test_label_chip_text_and_position() {
    let mut v = viewer_with_image(800, 600);
    let mut b = detection("a", 10.0, 40.0, 50.0, 50.0);
    b.label = "Heat Signature".into();
    b.confidence = 0.912;
    v.replace_detections(vec![b]).unwrap();

    let mut canvas = RecordingCanvas::new(800.0, 600.0);
    v.render(&mut canvas);

    let chip = canvas.ops().iter().find_map(|op| match op {
        DrawOp::Text {
            pos, anchor, text, ..
        } if text.starts_with("Heat") => Some((*pos, *anchor, text.clone())),
        _ => None,
    });
    let (pos, anchor, text) = chip.unwrap();
    assert_eq!(text, "Heat Signature (91%)");
    assert_eq!(anchor, TextAnchor::LeftCenter);
    assert_eq!(pos, ScreenPoint::new(15.0, 28.0));
}

#[test]
fn test_selected_box_has_corner_handles() {
    let mut v = viewer_with_image(800, 600);
    v.replace_detections(vec![detection("a", 100.0, 100.0, 50.0, 50.0)])
        .unwrap();

    let count_fills = |v: &Viewer| {
        let mut c = RecordingCanvas::new(800.0, 600.0);
        v.render(&mut c);
        c.ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { .. }))
            .count()
    };

    let unselected = count_fills(&v);
    v.select(Some(Selection::Detection("a".into()))).unwrap();
    assert_eq!(count_fills(&v), unselected + 4);
}

// ---------------------------------------------------------------------------
// Degraded rendering
// ---------------------------------------------------------------------------

#[test]
fn test_render_without_image_still_draws_overlays() {
    let mut overlay = roverview_core::overlay::OverlayModel::default();
    overlay.place_marker(MarkerRole::Start, ImagePoint::new(10.0, 10.0));
    let mut canvas = RecordingCanvas::new(200.0, 100.0);
    render(
        &mut canvas,
        None,
        &ViewportState::default(),
        &overlay,
        &StyleConfig::default(),
    );

    assert!(!canvas
        .ops()
        .iter()
        .any(|op| matches!(op, DrawOp::Image { .. })));
    assert_eq!(canvas.circles_with_radius(MARKER_RADIUS).len(), 1);
    // Grid over the visible 200x100 region at 50px spacing: x = 0..200, y = 0..100.
    let grid_lines = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { .. }))
        .count();
    assert_eq!(grid_lines, 5 + 3);
}

#[test]
fn test_grid_terminates_at_far_pan() {
    let mut v = Viewer::new(ViewerConfig::map()).unwrap();
    v.set_view(1.0, ScreenPoint::new(-2.0e10, 0.0)).unwrap();

    let mut canvas = RecordingCanvas::new(800.0, 500.0);
    v.render(&mut canvas);

    let lines = canvas
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { .. }))
        .count();
    // 800/50 + 2 vertical and 500/50 + 2 horizontal at most.
    assert!(lines <= 18 + 12, "got {lines} grid lines");
}

#[test]
fn test_grid_skipped_below_one_pixel_spacing() {
    let mut style = StyleConfig::default();
    style.grid_spacing = 0.5;
    let mut canvas = RecordingCanvas::new(200.0, 100.0);
    render(
        &mut canvas,
        None,
        &ViewportState::default(),
        &roverview_core::overlay::OverlayModel::default(),
        &style,
    );
    assert!(!canvas
        .ops()
        .iter()
        .any(|op| matches!(op, DrawOp::Line { .. })));
}

// ---------------------------------------------------------------------------
// Raster output
// ---------------------------------------------------------------------------

#[test]
fn test_raster_canvas_draws_markers() {
    let (v, _) = route_viewer();
    // Marker letters would cover the disc center.
    let mut canvas = RasterCanvas::new(800, 600).without_font();
    v.render(&mut canvas);
    let img = canvas.into_image();

    // Center of the Start disc is the start marker color.
    let px = img.get_pixel(100, 103);
    assert!(px.0[1] > px.0[0], "expected green-dominant pixel, got {px:?}");
    // Far corner is tinted gray image, not background.
    assert_ne!(*img.get_pixel(790, 590), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_raster_canvas_pans_image_off_canvas() {
    let mut v = Viewer::new(ViewerConfig::map()).unwrap();
    v.load_image(common::gray_image(100, 100));
    v.set_view(1.0, ScreenPoint::new(150.0, 0.0)).unwrap();

    let mut canvas = RasterCanvas::new(200, 100);
    canvas.clear(Rgba([0, 0, 0, 255]));
    v.render(&mut canvas);
    let img = canvas.image();

    assert_eq!(*img.get_pixel(20, 50), Rgba([0, 0, 0, 255]));
    assert_ne!(*img.get_pixel(170, 50), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_raster_text_width_estimate_without_font() {
    let canvas = RasterCanvas::new(10, 10).without_font();
    assert_eq!(canvas.text_width("abcd", 12.0), 28.0);
}

#[test]
fn test_raster_canvas_has_builtin_label_font() {
    let mut canvas = RasterCanvas::new(60, 20);
    canvas.clear(Rgba([0, 0, 0, 255]));
    canvas.text(
        ScreenPoint::new(2.0, 10.0),
        TextAnchor::LeftCenter,
        "High",
        12.0,
        Rgba([255, 255, 255, 255]),
    );
    let lit = canvas.image().pixels().filter(|p| p.0[0] > 128).count();
    assert!(lit > 10, "only {lit} text pixels drawn");
}
