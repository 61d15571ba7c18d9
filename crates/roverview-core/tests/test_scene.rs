mod common;

use roverview_core::config::ViewerConfig;
use roverview_core::controller::Viewer;
use roverview_core::error::ViewerError;
use roverview_core::overlay::{MarkerRole, Selection};
use roverview_core::scene::{Scene, SceneView};
use roverview_core::transform::{ImagePoint, ScreenPoint};

use common::{detection, viewer_with_image};

fn sample_scene() -> Scene {
    Scene {
        view: Some(SceneView {
            scale: 1.5,
            offset_x: -20.0,
            offset_y: 10.0,
        }),
        start: Some(ImagePoint::new(100.0, 100.0)),
        end: Some(ImagePoint::new(700.0, 500.0)),
        path: vec![
            ImagePoint::new(100.0, 100.0),
            ImagePoint::new(400.0, 320.0),
            ImagePoint::new(700.0, 500.0),
        ],
        detections: vec![
            detection("obj-0", 10.0, 10.0, 50.0, 50.0),
            detection("obj-1", 300.0, 300.0, 80.0, 60.0),
        ],
        selected: Some("obj-1".into()),
    }
}

#[test]
fn test_apply_installs_everything() {
    let mut v = viewer_with_image(800, 600);
    sample_scene().apply(&mut v).unwrap();

    assert_eq!(v.viewport().scale(), 1.5);
    assert_eq!(v.viewport().offset(), ScreenPoint::new(-20.0, 10.0));
    assert_eq!(v.overlay().markers().len(), 2);
    assert_eq!(v.overlay().path().unwrap().points().len(), 3);
    assert_eq!(v.overlay().detections().len(), 2);
    assert_eq!(
        v.overlay().selection(),
        Some(&Selection::Detection("obj-1".into()))
    );
}

#[test]
fn test_capture_round_trips() {
    let mut v = viewer_with_image(800, 600);
    let scene = sample_scene();
    scene.apply(&mut v).unwrap();
    assert_eq!(Scene::capture(&v), scene);
}

#[test]
fn test_scale_is_clamped() {
    let mut v = viewer_with_image(800, 600);
    let scene = Scene {
        view: Some(SceneView {
            scale: 10.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }),
        ..Scene::default()
    };
    scene.apply(&mut v).unwrap();
    assert_eq!(v.viewport().scale(), 2.0);
}

#[test]
fn test_bad_scene_leaves_viewer_unchanged() {
    let mut v = viewer_with_image(800, 600);
    v.place_marker(MarkerRole::Start, ImagePoint::new(1.0, 2.0))
        .unwrap();

    let mut scene = sample_scene();
    scene.selected = Some("missing".into());
    assert!(scene.apply(&mut v).is_err());

    let mut scene = sample_scene();
    scene.path = vec![ImagePoint::new(0.0, 0.0)];
    assert!(scene.apply(&mut v).is_err());

    assert_eq!(v.overlay().markers().len(), 1);
    assert!(v.overlay().detections().is_empty());
    assert_eq!(v.viewport().scale(), 1.0);
}

#[test]
fn test_non_finite_view_is_rejected_before_any_change() {
    let mut v = viewer_with_image(800, 600);
    for view in [
        SceneView {
            scale: f32::NAN,
            offset_x: 0.0,
            offset_y: 0.0,
        },
        SceneView {
            scale: 1.5,
            offset_x: f32::INFINITY,
            offset_y: 0.0,
        },
    ] {
        let scene = Scene {
            view: Some(view),
            ..sample_scene()
        };
        assert!(matches!(
            scene.apply(&mut v),
            Err(ViewerError::DegenerateInput(_))
        ));
    }

    assert!(v.overlay().markers().is_empty());
    assert!(v.overlay().detections().is_empty());
    assert_eq!(v.viewport().scale(), 1.0);
    assert_eq!(v.viewport().offset(), ScreenPoint::ORIGIN);
}

#[test]
fn test_markers_need_image() {
    let mut v = Viewer::new(ViewerConfig::map()).unwrap();
    assert!(sample_scene().apply(&mut v).is_err());
}

#[test]
fn test_scene_from_json() {
    let json = r#"{
        "start": {"x": 10, "y": 20},
        "detections": [{
            "id": "rock",
            "label": "Rocky Formation",
            "confidence": 0.8,
            "bounds": {"x": 0, "y": 0, "width": 40, "height": 30},
            "priority": "low"
        }]
    }"#;
    let scene: Scene = serde_json::from_str(json).unwrap();
    assert!(scene.view.is_none());
    assert!(scene.path.is_empty());
    assert_eq!(scene.detections[0].id, "rock");
}
