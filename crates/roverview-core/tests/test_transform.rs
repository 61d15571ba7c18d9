use approx::assert_abs_diff_eq;

use roverview_core::consts::EPSILON;
use roverview_core::transform::{ImagePoint, ImageRect, ScreenPoint, ViewportState, ZoomBounds};

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

#[test]
fn test_identity_view_maps_one_to_one() {
    let v = ViewportState::default();
    let p = v.screen_to_image(ScreenPoint::new(123.0, 45.0));
    assert_eq!(p, ImagePoint::new(123.0, 45.0));
}

#[test]
fn test_screen_to_image_formula() {
    let v = ViewportState::default()
        .with_scale(2.0)
        .pan_to(ScreenPoint::new(10.0, -20.0));
    let p = v.screen_to_image(ScreenPoint::new(110.0, 80.0));
    assert_abs_diff_eq!(p.x, 50.0, epsilon = EPSILON);
    assert_abs_diff_eq!(p.y, 50.0, epsilon = EPSILON);
}

#[test]
fn test_round_trip_within_epsilon() {
    let bounds = ZoomBounds::new(0.5, 3.0).unwrap();
    let offsets = [(0.0, 0.0), (-137.5, 42.25), (300.0, -800.0)];
    let scales = [0.5, 0.75, 1.0, 1.9, 3.0];
    let points = [(0.0, 0.0), (1.5, 2.5), (799.0, 599.0), (-40.0, 1234.5)];

    for (ox, oy) in offsets {
        for s in scales {
            let v = ViewportState::new(bounds)
                .with_scale(s)
                .pan_to(ScreenPoint::new(ox, oy));
            for (x, y) in points {
                let p = ImagePoint::new(x, y);
                let back = v.screen_to_image(v.image_to_screen(p));
                assert_abs_diff_eq!(back.x, p.x, epsilon = EPSILON * 10.0);
                assert_abs_diff_eq!(back.y, p.y, epsilon = EPSILON * 10.0);
            }
        }
    }
}

#[test]
fn test_visible_image_rect_follows_pan_and_zoom() {
    let v = ViewportState::default()
        .with_scale(2.0)
        .pan_to(ScreenPoint::new(-100.0, 0.0));
    let r = v.visible_image_rect(800.0, 500.0);
    assert_abs_diff_eq!(r.x, 50.0, epsilon = EPSILON);
    assert_abs_diff_eq!(r.y, 0.0, epsilon = EPSILON);
    assert_abs_diff_eq!(r.width, 400.0, epsilon = EPSILON);
    assert_abs_diff_eq!(r.height, 250.0, epsilon = EPSILON);
}

#[test]
fn test_image_rect_on_screen() {
    let v = ViewportState::default()
        .with_scale(0.5)
        .pan_to(ScreenPoint::new(10.0, 20.0));
    let r = v.image_rect_on_screen(800, 600);
    assert_eq!(r.min, ScreenPoint::new(10.0, 20.0));
    assert_eq!(r.max, ScreenPoint::new(410.0, 320.0));
}

// ---------------------------------------------------------------------------
// Zoom bounds
// ---------------------------------------------------------------------------

#[test]
fn test_repeated_zoom_in_stays_at_max() {
    let mut v = ViewportState::default();
    for _ in 0..100 {
        v = v.zoom_by(0.1);
        assert!(v.scale() <= 2.0);
    }
    assert_abs_diff_eq!(v.scale(), 2.0);
}

#[test]
fn test_repeated_zoom_out_stays_at_min() {
    let mut v = ViewportState::new(ZoomBounds::new(0.5, 3.0).unwrap());
    for _ in 0..100 {
        v = v.zoom_by(-0.25);
        assert!(v.scale() >= 0.5);
    }
    assert_abs_diff_eq!(v.scale(), 0.5);
}

#[test]
fn test_zoom_is_anchored_at_origin() {
    let v = ViewportState::default().pan_to(ScreenPoint::new(30.0, 40.0));
    let zoomed = v.zoom_by(0.5);
    assert_eq!(zoomed.offset(), ScreenPoint::new(30.0, 40.0));
    assert_abs_diff_eq!(zoomed.scale(), 1.5);
}

#[test]
fn test_reset_restores_identity() {
    let v = ViewportState::default()
        .with_scale(1.7)
        .pan_to(ScreenPoint::new(-5.0, 9.0))
        .reset();
    assert_eq!(v.scale(), 1.0);
    assert_eq!(v.offset(), ScreenPoint::ORIGIN);
}

#[test]
fn test_zoom_bounds_reject_inverted_range() {
    assert!(ZoomBounds::new(2.0, 1.0).is_err());
}

#[test]
fn test_zoom_bounds_reject_non_positive_min() {
    assert!(ZoomBounds::new(0.0, 1.0).is_err());
    assert!(ZoomBounds::new(-1.0, 1.0).is_err());
}

// ---------------------------------------------------------------------------
// Pan
// ---------------------------------------------------------------------------

#[test]
fn test_pan_to_same_offset_is_noop() {
    let v = ViewportState::default().pan_to(ScreenPoint::new(12.0, 34.0));
    let again = v.pan_to(v.offset());
    assert_eq!(v, again);
}

// ---------------------------------------------------------------------------
// ImageRect
// ---------------------------------------------------------------------------

#[test]
fn test_image_rect_contains_is_closed() {
    let r = ImageRect::new(10.0, 10.0, 50.0, 50.0);
    assert!(r.contains(ImagePoint::new(10.0, 10.0)));
    assert!(r.contains(ImagePoint::new(60.0, 60.0)));
    assert!(!r.contains(ImagePoint::new(60.01, 30.0)));
}
