mod common;

use roverview_core::hit_test::{hit_test, HitTester, LinearHitTester};
use roverview_core::overlay::OverlayModel;
use roverview_core::transform::{ScreenPoint, ViewportState};

use common::detection;

fn overlapping() -> OverlayModel {
    let mut overlay = OverlayModel::default();
    overlay
        .set_detections(vec![
            detection("box1", 10.0, 10.0, 50.0, 50.0),
            detection("box2", 30.0, 30.0, 50.0, 50.0),
        ])
        .unwrap();
    overlay
}

#[test]
fn test_first_inserted_box_wins_overlap() {
    let overlay = overlapping();
    let hit = hit_test(ScreenPoint::new(40.0, 40.0), &ViewportState::default(), &overlay);
    assert_eq!(hit.map(|b| b.id.as_str()), Some("box1"));
}

#[test]
fn test_only_second_box_outside_first() {
    let overlay = overlapping();
    let hit = hit_test(ScreenPoint::new(70.0, 70.0), &ViewportState::default(), &overlay);
    assert_eq!(hit.map(|b| b.id.as_str()), Some("box2"));
}

#[test]
fn test_miss_returns_none() {
    let overlay = overlapping();
    assert!(hit_test(ScreenPoint::new(5.0, 5.0), &ViewportState::default(), &overlay).is_none());
}

#[test]
fn test_edge_counts_as_hit() {
    let overlay = overlapping();
    let hit = hit_test(ScreenPoint::new(10.0, 10.0), &ViewportState::default(), &overlay);
    assert_eq!(hit.map(|b| b.id.as_str()), Some("box1"));
}

#[test]
fn test_hit_test_respects_viewport() {
    let overlay = overlapping();
    // At 2x with a pan, image (12, 12) lands on screen (124, 124).
    let v = ViewportState::default()
        .with_scale(2.0)
        .pan_to(ScreenPoint::new(100.0, 100.0));
    let hit = LinearHitTester.hit_test(ScreenPoint::new(124.0, 124.0), &v, &overlay);
    assert_eq!(hit.map(|b| b.id.as_str()), Some("box1"));
    assert!(LinearHitTester
        .hit_test(ScreenPoint::new(40.0, 40.0), &v, &overlay)
        .is_none());
}

#[test]
fn test_hit_test_is_deterministic() {
    let overlay = overlapping();
    let v = ViewportState::default();
    let first = hit_test(ScreenPoint::new(45.0, 45.0), &v, &overlay).map(|b| b.id.clone());
    for _ in 0..10 {
        let again = hit_test(ScreenPoint::new(45.0, 45.0), &v, &overlay).map(|b| b.id.clone());
        assert_eq!(first, again);
    }
}
