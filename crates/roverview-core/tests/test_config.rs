use roverview_core::config::{ViewConfig, ViewerConfig};
use roverview_core::controller::Viewer;
use roverview_core::error::ViewerError;

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[test]
fn test_map_preset() {
    let c = ViewerConfig::map();
    assert_eq!(c.view.min_scale, 0.5);
    assert_eq!(c.view.max_scale, 2.0);
    assert_eq!(c.view.zoom_step, 0.1);
    assert_eq!(c.style.tint_alpha, 0.2);
    assert_eq!((c.view.canvas_width, c.view.canvas_height), (800, 500));
    c.validate().unwrap();
}

#[test]
fn test_detection_preset() {
    let c = ViewerConfig::detection();
    assert_eq!(c.view.max_scale, 3.0);
    assert_eq!(c.view.zoom_step, 0.25);
    assert_eq!(c.style.tint_alpha, 0.1);
    c.validate().unwrap();
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

#[test]
fn test_partial_config_fills_defaults() {
    let json = r#"{"view": {"max_scale": 4.0}, "style": {"grid_spacing": 25.0}}"#;
    let c: ViewerConfig = serde_json::from_str(json).unwrap();
    assert_eq!(c.view.max_scale, 4.0);
    assert_eq!(c.view.min_scale, 0.5);
    assert_eq!(c.style.grid_spacing, 25.0);
    assert_eq!(c.style.marker_radius, 10.0);
    assert_eq!(c.input.drag_threshold, 3.0);
    assert!(c.style.font_path.is_none());
}

#[test]
fn test_empty_config_is_default() {
    let c: ViewerConfig = serde_json::from_str("{}").unwrap();
    let d = ViewerConfig::default();
    assert_eq!(c.view.zoom_step, d.view.zoom_step);
    assert_eq!(c.style.background, d.style.background);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_inverted_zoom_rejected() {
    let c = ViewerConfig {
        view: ViewConfig {
            min_scale: 3.0,
            max_scale: 1.0,
            ..ViewConfig::default()
        },
        ..ViewerConfig::default()
    };
    assert!(matches!(c.validate(), Err(ViewerError::InvalidConfig(_))));
    assert!(Viewer::new(c).is_err());
}

#[test]
fn test_alpha_out_of_range_rejected() {
    let mut c = ViewerConfig::default();
    c.style.grid_alpha = 1.5;
    assert!(c.validate().is_err());
}

#[test]
fn test_zero_canvas_rejected() {
    let mut c = ViewerConfig::default();
    c.view.canvas_width = 0;
    assert!(c.validate().is_err());
}

#[test]
fn test_negative_drag_threshold_rejected() {
    let mut c = ViewerConfig::default();
    c.input.drag_threshold = -1.0;
    assert!(c.validate().is_err());
}
