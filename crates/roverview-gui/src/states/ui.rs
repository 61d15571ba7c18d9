use std::path::PathBuf;

use roverview_core::config::ViewerConfig;

/// Which built-in configuration the viewer was last switched to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewPreset {
    #[default]
    Map,
    Detection,
    /// Loaded from a TOML file.
    Custom,
}

impl ViewPreset {
    pub fn config(self) -> Option<ViewerConfig> {
        match self {
            ViewPreset::Map => Some(ViewerConfig::map()),
            ViewPreset::Detection => Some(ViewerConfig::detection()),
            ViewPreset::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewPreset::Map => "Map",
            ViewPreset::Detection => "Detection",
            ViewPreset::Custom => "Custom",
        }
    }
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub image_path: Option<PathBuf>,
    pub preset: ViewPreset,

    /// Last canvas size in points, used for snapshot export.
    pub canvas_size: Option<(f32, f32)>,
    /// The primary button went down inside the viewport and is still held.
    pub pointer_captured: bool,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }
}
