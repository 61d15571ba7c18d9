mod common;

use image::RgbaImage;

use roverview_core::export::{save_snapshot, snapshot, snapshot_at};
use roverview_core::overlay::{MarkerRole, Selection};
use roverview_core::render::RasterCanvas;
use roverview_core::transform::ImagePoint;

use common::{detection, viewer_with_image};

/// Pixels in the selected high-priority label color.
fn label_red_pixels(img: &RgbaImage) -> usize {
    img.pixels()
        .filter(|p| p.0[0] > 150 && p.0[1] < 100 && p.0[2] < 100)
        .count()
}

#[test]
fn test_snapshot_uses_canvas_size() {
    let v = viewer_with_image(320, 240);
    let img = snapshot(&v).unwrap();
    assert_eq!(img.dimensions(), (800, 500));
}

#[test]
fn test_snapshot_draws_label_text_without_configured_font() {
    let mut v = viewer_with_image(800, 600);
    assert!(v.config().style.font_path.is_none());
    v.replace_detections(vec![detection("a", 100.0, 100.0, 120.0, 80.0)])
        .unwrap();
    v.select(Some(Selection::Detection("a".into()))).unwrap();

    let exported = snapshot(&v).unwrap();
    let mut bare = RasterCanvas::new(800, 500).without_font();
    v.render(&mut bare);
    let bare = bare.into_image();

    assert!(label_red_pixels(&exported) > label_red_pixels(&bare) + 10);
}

#[test]
fn test_snapshot_at_scales_points_to_pixels() {
    let mut v = viewer_with_image(400, 250);
    v.place_marker(MarkerRole::Start, ImagePoint::new(50.0, 50.0))
        .unwrap();
    let img = snapshot_at(&v, 400.0, 250.0, 2.0).unwrap();
    assert_eq!(img.dimensions(), (800, 500));

    assert!(snapshot_at(&v, 400.0, 250.0, 0.0).is_err());
    assert!(snapshot_at(&v, 0.0, 250.0, 1.0).is_err());
}

#[test]
fn test_snapshot_is_independent_of_later_changes() {
    let mut v = viewer_with_image(800, 600);
    let before = snapshot(&v).unwrap();
    v.place_marker(MarkerRole::Start, ImagePoint::new(100.0, 100.0))
        .unwrap();
    let after = snapshot(&v).unwrap();

    assert_ne!(before, after);
    assert_eq!(before, snapshot(&viewer_with_image(800, 600)).unwrap());
}

#[test]
fn test_save_png_and_reload() {
    let v = viewer_with_image(64, 64);
    let img = snapshot(&v).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.png");

    save_snapshot(&img, &path).unwrap();
    let loaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(loaded, img);
}

#[test]
fn test_save_jpeg() {
    let v = viewer_with_image(64, 64);
    let img = snapshot(&v).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.JPG");

    save_snapshot(&img, &path).unwrap();
    let loaded = image::open(&path).unwrap();
    assert_eq!(loaded.width(), 800);
    assert_eq!(loaded.height(), 500);
}

#[test]
fn test_unknown_extension_defaults_to_png() {
    let v = viewer_with_image(16, 16);
    let img = snapshot(&v).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.out");

    save_snapshot(&img, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_save_to_missing_directory_fails() {
    let v = viewer_with_image(16, 16);
    let img = snapshot(&v).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("view.png");
    assert!(save_snapshot(&img, &path).is_err());
}
