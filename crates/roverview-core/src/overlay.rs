//! Overlay primitives drawn over the base image and the current selection.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::transform::{ImagePoint, ImageRect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Start,
    End,
}

impl MarkerRole {
    pub const ALL: [Self; 2] = [Self::Start, Self::End];

    /// Single-letter label drawn inside the marker disc.
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Start => "S",
            Self::End => "E",
        }
    }
}

impl fmt::Display for MarkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::End => write!(f, "End"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub role: MarkerRole,
    pub position: ImagePoint,
}

/// At most one marker per role.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Markers {
    start: Option<ImagePoint>,
    end: Option<ImagePoint>,
}

impl Markers {
    pub fn get(&self, role: MarkerRole) -> Option<ImagePoint> {
        match role {
            MarkerRole::Start => self.start,
            MarkerRole::End => self.end,
        }
    }

    /// Upsert the marker for `role`, returning the position it replaced.
    pub fn set(&mut self, role: MarkerRole, position: ImagePoint) -> Option<ImagePoint> {
        let slot = match role {
            MarkerRole::Start => &mut self.start,
            MarkerRole::End => &mut self.end,
        };
        slot.replace(position)
    }

    /// Markers in draw order (Start before End).
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        MarkerRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|position| Marker { role, position }))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both endpoints, when both are placed.
    pub fn endpoints(&self) -> Option<(ImagePoint, ImagePoint)> {
        Some((self.start?, self.end?))
    }
}

/// Ordered path of at least two image-space points.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPolyline(Vec<ImagePoint>);

impl PathPolyline {
    pub fn new(points: Vec<ImagePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ViewerError::DegenerateInput(format!(
                "a path needs at least 2 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ViewerError::DegenerateInput(
                "path contains a non-finite coordinate".into(),
            ));
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[ImagePoint] {
        &self.0
    }

    pub fn segment_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Points other than the two endpoints, which coincide with the markers.
    pub fn interior_points(&self) -> &[ImagePoint] {
        &self.0[1..self.0.len() - 1]
    }

    /// Sum of segment lengths in image pixels.
    pub fn length(&self) -> f32 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// One detected object of interest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub id: String,
    pub label: String,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
    #[serde(alias = "coordinates")]
    pub bounds: ImageRect,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
}

impl DetectionBox {
    /// Text of the label chip, e.g. `"Water Ice (87%)"`.
    pub fn chip_text(&self) -> String {
        format!("{} ({}%)", self.label, self.confidence_percent())
    }

    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Check a detection result before it replaces the current one.
pub fn validate_detections(boxes: &[DetectionBox]) -> Result<()> {
    let mut seen = HashSet::with_capacity(boxes.len());
    for b in boxes {
        if !seen.insert(b.id.as_str()) {
            return Err(ViewerError::InvalidDetection(format!(
                "duplicate id {:?}",
                b.id
            )));
        }
        if !(0.0..=1.0).contains(&b.confidence) {
            return Err(ViewerError::InvalidDetection(format!(
                "{}: confidence {} outside [0, 1]",
                b.id, b.confidence
            )));
        }
        let r = &b.bounds;
        let finite = [r.x, r.y, r.width, r.height].iter().all(|v| v.is_finite());
        if !finite || r.width < 0.0 || r.height < 0.0 {
            return Err(ViewerError::InvalidDetection(format!(
                "{}: invalid bounds {:?}",
                b.id, r
            )));
        }
    }
    Ok(())
}

/// Weak reference to one overlay primitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Detection(String),
    Marker(MarkerRole),
    /// Segment `i` joins path points `i` and `i + 1`.
    PathSegment(usize),
}

/// Everything drawn on top of the base image.
///
/// Sub-collections are only ever replaced whole, and the selection is dropped
/// whenever the primitive it points at goes away.
#[derive(Clone, Debug, Default)]
pub struct OverlayModel {
    markers: Markers,
    path: Option<PathPolyline>,
    detections: Vec<DetectionBox>,
    selection: Option<Selection>,
}

impl OverlayModel {
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn path(&self) -> Option<&PathPolyline> {
        self.path.as_ref()
    }

    pub fn detections(&self) -> &[DetectionBox] {
        &self.detections
    }

    pub fn detection(&self, id: &str) -> Option<&DetectionBox> {
        self.detections.iter().find(|b| b.id == id)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_detection(&self) -> Option<&DetectionBox> {
        match &self.selection {
            Some(Selection::Detection(id)) => self.detection(id),
            _ => None,
        }
    }

    pub fn is_detection_selected(&self, id: &str) -> bool {
        matches!(&self.selection, Some(Selection::Detection(sel)) if sel == id)
    }

    pub fn place_marker(&mut self, role: MarkerRole, position: ImagePoint) -> Option<ImagePoint> {
        self.markers.set(role, position)
    }

    pub fn clear_markers(&mut self) {
        self.markers = Markers::default();
        if matches!(self.selection, Some(Selection::Marker(_))) {
            self.selection = None;
        }
    }

    /// Replace the path wholesale. Any selected segment referred to the old
    /// path and is cleared.
    pub fn set_path(&mut self, path: Option<PathPolyline>) {
        self.path = path;
        if matches!(self.selection, Some(Selection::PathSegment(_))) {
            self.selection = None;
        }
    }

    /// Replace the detection set wholesale. A selected box survives only if
    /// a box with the same id is part of the new set.
    pub fn set_detections(&mut self, boxes: Vec<DetectionBox>) -> Result<()> {
        validate_detections(&boxes)?;
        self.detections = boxes;
        if let Some(Selection::Detection(id)) = &self.selection {
            if self.detection(id).is_none() {
                self.selection = None;
            }
        }
        Ok(())
    }

    /// Select a primitive. Selecting something that does not exist is rejected.
    pub fn select(&mut self, selection: Option<Selection>) -> Result<()> {
        if let Some(sel) = &selection {
            let exists = match sel {
                Selection::Detection(id) => self.detection(id).is_some(),
                Selection::Marker(role) => self.markers.get(*role).is_some(),
                Selection::PathSegment(i) => {
                    self.path.as_ref().is_some_and(|p| *i < p.segment_count())
                }
            };
            if !exists {
                return Err(ViewerError::DegenerateInput(format!(
                    "cannot select {sel:?}: no such primitive"
                )));
            }
        }
        self.selection = selection;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
