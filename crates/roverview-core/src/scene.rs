//! Serializable snapshot of a viewer session: view, markers, path,
//! detections and the selected box.

use serde::{Deserialize, Serialize};

use crate::controller::{check_view, Viewer};
use crate::error::{Result, ViewerError};
use crate::hit_test::HitTester;
use crate::overlay::{validate_detections, DetectionBox, MarkerRole, PathPolyline, Selection};
use crate::transform::{ImagePoint, ScreenPoint};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub scale: f32,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<SceneView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ImagePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ImagePoint>,
    /// Empty means no path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<ImagePoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detections: Vec<DetectionBox>,
    /// Id of the selected detection box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl Scene {
    /// Replace the viewer's overlay and view with this scene.
    ///
    /// Everything is validated before the viewer is touched, so a bad scene
    /// leaves the viewer unchanged.
    pub fn apply<H: HitTester>(&self, viewer: &mut Viewer<H>) -> Result<()> {
        let path = match self.path.len() {
            0 => None,
            _ => Some(PathPolyline::new(self.path.clone())?),
        };
        validate_detections(&self.detections)?;
        if let Some(id) = &self.selected {
            if !self.detections.iter().any(|b| &b.id == id) {
                return Err(ViewerError::DegenerateInput(format!(
                    "selected box {id:?} is not part of the scene"
                )));
            }
        }
        if let Some(view) = self.view {
            check_view(view.scale, ScreenPoint::new(view.offset_x, view.offset_y))?;
        }
        let has_markers = self.start.is_some() || self.end.is_some();
        if has_markers && viewer.image().is_none() {
            return Err(ViewerError::DegenerateInput(
                "scene markers need a base image".into(),
            ));
        }

        viewer.clear_overlay();
        if let Some(view) = self.view {
            viewer.set_view(view.scale, ScreenPoint::new(view.offset_x, view.offset_y))?;
        }
        for (role, position) in [(MarkerRole::Start, self.start), (MarkerRole::End, self.end)] {
            if let Some(p) = position {
                viewer.place_marker(role, p)?;
            }
        }
        viewer.replace_path(path);
        viewer.replace_detections(self.detections.clone())?;
        viewer.select(self.selected.clone().map(Selection::Detection))?;
        Ok(())
    }

    /// Describe the viewer's current state as a scene.
    pub fn capture<H: HitTester>(viewer: &Viewer<H>) -> Self {
        let vp = viewer.viewport();
        let overlay = viewer.overlay();
        Self {
            view: Some(SceneView {
                scale: vp.scale(),
                offset_x: vp.offset().x,
                offset_y: vp.offset().y,
            }),
            start: overlay.markers().get(MarkerRole::Start),
            end: overlay.markers().get(MarkerRole::End),
            path: overlay
                .path()
                .map(|p| p.points().to_vec())
                .unwrap_or_default(),
            detections: overlay.detections().to_vec(),
            selected: overlay.selected_detection().map(|b| b.id.clone()),
        }
    }
}
