use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BACKGROUND_RGBA, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_DRAG_THRESHOLD,
    DETECTION_MAX_SCALE, DETECTION_MIN_SCALE, DETECTION_TINT_ALPHA, DETECTION_ZOOM_STEP,
    GRID_ALPHA, GRID_SPACING, LABEL_HEIGHT, MAP_MAX_SCALE, MAP_MIN_SCALE, MAP_TINT_ALPHA,
    MAP_ZOOM_STEP, MARKER_RADIUS, PATH_DOT_RADIUS, PATH_WIDTH, TINT_RGB,
};
use crate::error::{Result, ViewerError};
use crate::transform::ZoomBounds;

/// Complete viewer configuration. Every field has a default, so a TOML file
/// only needs the values it changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl ViewerConfig {
    /// Path-planning map: 0.5x-2x zoom in 0.1 steps, stronger tint.
    pub fn map() -> Self {
        Self::default()
    }

    /// Detection result view: 0.5x-3x zoom in 0.25 steps, lighter tint.
    pub fn detection() -> Self {
        Self {
            view: ViewConfig {
                min_scale: DETECTION_MIN_SCALE,
                max_scale: DETECTION_MAX_SCALE,
                zoom_step: DETECTION_ZOOM_STEP,
                ..ViewConfig::default()
            },
            style: StyleConfig {
                tint_alpha: DETECTION_TINT_ALPHA,
                ..StyleConfig::default()
            },
            input: InputConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.view.zoom_bounds()?;
        if self.view.canvas_width == 0 || self.view.canvas_height == 0 {
            return Err(ViewerError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.view.canvas_width, self.view.canvas_height
            )));
        }
        if !(self.view.zoom_step > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "zoom_step must be positive, got {}",
                self.view.zoom_step
            )));
        }
        if !(self.style.grid_spacing > 0.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "grid_spacing must be positive, got {}",
                self.style.grid_spacing
            )));
        }
        for (name, alpha) in [
            ("tint_alpha", self.style.tint_alpha),
            ("grid_alpha", self.style.grid_alpha),
        ] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ViewerError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {alpha}"
                )));
            }
        }
        if self.input.drag_threshold < 0.0 {
            return Err(ViewerError::InvalidConfig(format!(
                "drag_threshold must not be negative, got {}",
                self.input.drag_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Canvas size in screen pixels, used for headless rendering and export.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale added or removed by one zoom-in / zoom-out step.
    pub zoom_step: f32,
}

impl ViewConfig {
    pub fn zoom_bounds(&self) -> Result<ZoomBounds> {
        ZoomBounds::new(self.min_scale, self.max_scale)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            min_scale: MAP_MIN_SCALE,
            max_scale: MAP_MAX_SCALE,
            zoom_step: MAP_ZOOM_STEP,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: [u8; 4],
    pub tint_rgb: [u8; 3],
    pub tint_alpha: f32,
    /// Grid line spacing in image-space units.
    pub grid_spacing: f32,
    pub grid_alpha: f32,
    /// Marker radius in screen pixels.
    pub marker_radius: f32,
    pub path_width: f32,
    pub path_dot_radius: f32,
    pub label_height: f32,
    /// TrueType/OpenType font for labels. Without one, the bundled face is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND_RGBA,
            tint_rgb: TINT_RGB,
            tint_alpha: MAP_TINT_ALPHA,
            grid_spacing: GRID_SPACING,
            grid_alpha: GRID_ALPHA,
            marker_radius: MARKER_RADIUS,
            path_width: PATH_WIDTH,
            path_dot_radius: PATH_DOT_RADIUS,
            label_height: LABEL_HEIGHT,
            font_path: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Pointer travel in screen pixels after which a press is a drag.
    pub drag_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}
