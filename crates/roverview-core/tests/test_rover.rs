mod common;

use image::RgbaImage;

use roverview_core::base_image::BaseImage;
use roverview_core::collab::{CollaboratorError, Delivery};
use roverview_core::config::ViewerConfig;
use roverview_core::controller::Viewer;
use roverview_core::error::ViewerError;
use roverview_core::rover::{
    terrain_for, MockRoverDetector, RoverConditions, RoverDetector, RoverReport, RoverVerdict,
};

use common::{gray_image, viewer_with_image};

fn report(probability: f32) -> RoverReport {
    RoverReport {
        probability,
        latitude: "1.0000° N".into(),
        longitude: "2.0000° E".into(),
        conditions: RoverConditions {
            surface_temp: "-12°C".into(),
            light_level: "Daylight".into(),
            terrain_type: terrain_for(probability).into(),
            confidence: 80.0,
        },
    }
}

// ---------------------------------------------------------------------------
// Mock detector
// ---------------------------------------------------------------------------

#[test]
fn test_mock_is_deterministic_per_seed() {
    let image = gray_image(64, 64);
    let a = MockRoverDetector::with_seed(11).detect_rover(&image).unwrap();
    let b = MockRoverDetector::with_seed(11).detect_rover(&image).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_mock_reports_are_consistent() {
    let image = gray_image(64, 64);
    let mut detector = MockRoverDetector::with_seed(5);
    for _ in 0..50 {
        let r = detector.detect_rover(&image).unwrap();
        assert!(r.validate().is_ok());
        assert!((0.0..=100.0).contains(&r.probability));
        // One decimal place.
        assert!(((r.probability * 10.0).round() - r.probability * 10.0).abs() < 1e-3);
        assert_eq!(r.conditions.terrain_type, terrain_for(r.probability));
        assert!(r.conditions.confidence <= 95.0);
        assert!(r.conditions.confidence >= r.probability.min(95.0));
        let expected_light = if r.probability > 50.0 { "Daylight" } else { "Low Light" };
        assert_eq!(r.conditions.light_level, expected_light);
        assert!(r.latitude.ends_with("° N"));
        assert!(r.longitude.ends_with("° E"));
    }
}

#[test]
fn test_mock_rejects_empty_image() {
    let empty = BaseImage::new(RgbaImage::new(0, 0));
    assert!(MockRoverDetector::with_seed(1).detect_rover(&empty).is_err());
}

#[test]
fn test_verdict_labels() {
    assert_eq!(report(90.0).verdict(), RoverVerdict::High);
    assert_eq!(report(50.0).verdict(), RoverVerdict::Medium);
    assert_eq!(report(10.0).verdict().to_string(), "Low Probability");
    assert_eq!(terrain_for(90.0), "Ancient Riverbed");
}

// ---------------------------------------------------------------------------
// Viewer delivery
// ---------------------------------------------------------------------------

#[test]
fn test_rover_search_needs_image() {
    let mut v = Viewer::new(ViewerConfig::map()).unwrap();
    assert!(matches!(
        v.begin_rover_search(),
        Err(ViewerError::DegenerateInput(_))
    ));
    assert!(!v.is_processing());
}

#[test]
fn test_rover_search_round_trip() {
    let mut v = viewer_with_image(320, 240);
    let (ticket, image) = v.begin_rover_search().unwrap();
    assert!(v.is_searching_rover());
    assert!(v.is_processing());

    let result = MockRoverDetector::with_seed(2).detect_rover(&image);
    let expected = result.clone().unwrap();
    assert_eq!(
        v.complete_rover_search(ticket, result).unwrap(),
        Delivery::Applied(())
    );
    assert!(!v.is_processing());
    assert_eq!(v.rover_report(), Some(&expected));
}

#[test]
fn test_superseded_rover_search_is_stale() {
    let mut v = viewer_with_image(320, 240);
    let (old, _) = v.begin_rover_search().unwrap();
    let (new, _) = v.begin_rover_search().unwrap();

    assert!(v.complete_rover_search(old, Ok(report(80.0))).unwrap().is_stale());
    assert!(v.rover_report().is_none());
    assert!(v.is_searching_rover());

    v.complete_rover_search(new, Ok(report(30.0))).unwrap();
    assert_eq!(v.rover_report().map(|r| r.probability), Some(30.0));
}

#[test]
fn test_out_of_range_probability_is_collaborator_failure() {
    let mut v = viewer_with_image(320, 240);
    let (ticket, _) = v.begin_rover_search().unwrap();
    assert!(matches!(
        v.complete_rover_search(ticket, Ok(report(140.0))),
        Err(ViewerError::CollaboratorFailure(_))
    ));
    assert!(!v.is_processing());
    assert!(v.rover_report().is_none());

    let (ticket, _) = v.begin_rover_search().unwrap();
    let failed = v.complete_rover_search(ticket, Err(CollaboratorError("offline".into())));
    assert!(matches!(failed, Err(ViewerError::CollaboratorFailure(_))));
}

#[test]
fn test_loading_image_clears_rover_report() {
    let mut v = viewer_with_image(320, 240);
    let (ticket, _) = v.begin_rover_search().unwrap();
    v.complete_rover_search(ticket, Ok(report(60.0))).unwrap();
    assert!(v.rover_report().is_some());

    v.load_image(gray_image(100, 100));
    assert!(v.rover_report().is_none());
}
