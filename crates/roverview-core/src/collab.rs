//! Collaborator contracts for path planning and object detection, plus the
//! mock implementations the front-ends ship with.
//!
//! Collaborators never touch the viewport. Their results reach the overlay
//! through [`crate::controller::Viewer::complete_planning`] and
//! [`crate::controller::Viewer::complete_detection`], which replace whole
//! collections.

use std::fmt;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::base_image::BaseImage;
use crate::overlay::{DetectionBox, PathPolyline, Priority};
use crate::transform::{ImagePoint, ImageRect};

/// Identifies one outstanding collaborator request. Tickets increase
/// monotonically per viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestTicket(pub u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of delivering a collaborator result to the viewer.
#[derive(Debug, PartialEq)]
pub enum Delivery<T> {
    /// The result belonged to the latest request and was applied.
    Applied(T),
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

impl<T> Delivery<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

/// Route metrics, passed through to the details panel untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    pub distance_label: String,
    pub eta_label: String,
    /// 0-100.
    pub terrain_difficulty: u8,
    /// 0-100.
    pub environmental_risk: u8,
    pub weather: String,
    pub temperature: String,
    pub wind_speed: String,
    pub visibility: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanResult {
    pub path: PathPolyline,
    pub metrics: PathMetrics,
}

pub trait Planner: Send {
    fn plan(&mut self, start: ImagePoint, end: ImagePoint)
        -> Result<PlanResult, CollaboratorError>;
}

pub trait Detector: Send {
    fn detect(&mut self, image: &BaseImage) -> Result<Vec<DetectionBox>, CollaboratorError>;
}

const WEATHER: [&str; 4] = ["Clear", "Dusty", "Light Dust Storm", "Windy"];
const VISIBILITY: [&str; 4] = ["Low", "Moderate", "Good", "Excellent"];

/// Half-width of the uniform jitter applied to interior path points.
const PATH_JITTER: f32 = 25.0;
/// Image pixels per reported kilometre.
const PIXELS_PER_KM: f32 = 20.0;
/// Image pixels covered per reported hour of travel.
const PIXELS_PER_HOUR: f32 = 80.0;

/// Produces a jittered straight-line route with random metrics.
pub struct MockPlanner {
    rng: StdRng,
    latency: Duration,
}

impl MockPlanner {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Sleep this long before answering, to exercise the busy state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            latency: Duration::ZERO,
        }
    }

    fn metrics(&mut self, distance: f32) -> PathMetrics {
        let rng = &mut self.rng;
        let hours = (distance / PIXELS_PER_HOUR).floor() as u32 + 1;
        PathMetrics {
            distance_label: format!("{:.1} km", distance / PIXELS_PER_KM),
            eta_label: format!("{hours} hours, {} minutes", rng.gen_range(0..60)),
            terrain_difficulty: rng.gen_range(10..90),
            environmental_risk: rng.gen_range(10..70),
            weather: pick(rng, &WEATHER),
            temperature: format!("{}°C", rng.gen_range(-60..-30)),
            wind_speed: format!("{} km/h", rng.gen_range(10..60)),
            visibility: pick(rng, &VISIBILITY),
        }
    }
}

impl Default for MockPlanner {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(rng: &mut StdRng, choices: &[&str]) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}

impl Planner for MockPlanner {
    fn plan(
        &mut self,
        start: ImagePoint,
        end: ImagePoint,
    ) -> Result<PlanResult, CollaboratorError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let steps: usize = self.rng.gen_range(8..=12);
        let mut points = Vec::with_capacity(steps);
        points.push(start);
        for i in 1..steps - 1 {
            let t = i as f32 / (steps - 1) as f32;
            let jx = self.rng.gen_range(-PATH_JITTER..PATH_JITTER);
            let jy = self.rng.gen_range(-PATH_JITTER..PATH_JITTER);
            points.push(ImagePoint::new(
                start.x + (end.x - start.x) * t + jx,
                start.y + (end.y - start.y) * t + jy,
            ));
        }
        points.push(end);

        let path = PathPolyline::new(points).map_err(|e| CollaboratorError(e.to_string()))?;
        let metrics = self.metrics(start.distance(end));
        debug!(points = steps, distance = %metrics.distance_label, "Mock route planned");
        Ok(PlanResult { path, metrics })
    }
}

struct Family {
    priority: Priority,
    labels: [&'static str; 5],
    descriptions: [&'static str; 5],
}

const FAMILIES: [Family; 3] = [
    Family {
        priority: Priority::Low,
        labels: [
            "Rocky Formation",
            "Cave Entrance",
            "Impact Crater",
            "Dust Devil",
            "Sand Dune",
        ],
        descriptions: [
            "Natural rock formation with unusual stratification patterns",
            "Potential cave entrance, showing signs of shadow depth",
            "Recent impact crater with distinctive ejecta pattern",
            "Active dust devil showing vertical cloud formation",
            "Large sand dune with ripple patterns indicating wind direction",
        ],
    },
    Family {
        priority: Priority::Medium,
        labels: [
            "Rover Tracks",
            "Metal Debris",
            "Abandoned Equipment",
            "Solar Panel",
            "Parachute Fabric",
        ],
        descriptions: [
            "Track patterns consistent with rover wheel design, heading northwest",
            "Metallic debris approximately 0.5m in length, possibly spacecraft component",
            "Equipment resembling scientific instruments, partially buried",
            "Reflective surface consistent with solar panel technology",
            "Fabric material with pattern matching mission parachute design",
        ],
    },
    Family {
        priority: Priority::High,
        labels: [
            "Water Ice",
            "Methane Emission",
            "Unusual Coloration",
            "Organic Material",
            "Heat Signature",
        ],
        descriptions: [
            "Surface reflectivity suggests exposed water ice deposits",
            "Spectral analysis indicates potential methane emission point",
            "Unusual color variation inconsistent with surrounding mineralogy",
            "Patterns consistent with potential microbial mat formation",
            "Thermal anomaly detected, possible geothermal activity",
        ],
    },
];

/// Scatters 3-7 labelled boxes over the image.
pub struct MockDetector {
    rng: StdRng,
    latency: Duration,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            latency: Duration::ZERO,
        }
    }

    /// Random extent in [50, 150) clamped to the image, and an origin that
    /// keeps the box fully inside.
    fn span(&mut self, extent: u32) -> (f32, f32) {
        let size = self.rng.gen_range(50..150).min(extent);
        let origin = self.rng.gen_range(0..=extent - size);
        (origin as f32, size as f32)
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for MockDetector {
    fn detect(&mut self, image: &BaseImage) -> Result<Vec<DetectionBox>, CollaboratorError> {
        if image.is_empty() {
            return Err(CollaboratorError("cannot analyze an empty image".into()));
        }
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let count = self.rng.gen_range(3..=7);
        let mut boxes = Vec::with_capacity(count);
        for i in 0..count {
            let family = &FAMILIES[self.rng.gen_range(0..FAMILIES.len())];
            let which = self.rng.gen_range(0..family.labels.len());
            let (x, width) = self.span(image.width());
            let (y, height) = self.span(image.height());
            boxes.push(DetectionBox {
                id: format!("obj-{i}"),
                label: family.labels[which].to_string(),
                confidence: self.rng.gen_range(0.65..0.95),
                bounds: ImageRect::new(x, y, width, height),
                description: family.descriptions[which].to_string(),
                priority: family.priority,
            });
        }
        debug!(count, "Mock detection finished");
        Ok(boxes)
    }
}
