//! Rover search: estimate how likely it is that a stranded rover appears in
//! the base image, plus the surface conditions reported with it.

use std::fmt;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base_image::BaseImage;
use crate::collab::CollaboratorError;

/// Probability (percent) above which a sighting is rated high.
pub const HIGH_PROBABILITY: f32 = 75.0;
/// Probability (percent) above which a sighting is rated medium.
pub const MEDIUM_PROBABILITY: f32 = 40.0;
/// Reported confidence never exceeds this (percent).
const MAX_CONFIDENCE: f32 = 95.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoverVerdict {
    High,
    Medium,
    Low,
}

impl RoverVerdict {
    pub fn from_probability(probability: f32) -> Self {
        if probability > HIGH_PROBABILITY {
            Self::High
        } else if probability > MEDIUM_PROBABILITY {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RoverVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High Probability"),
            Self::Medium => write!(f, "Medium Probability"),
            Self::Low => write!(f, "Low Probability"),
        }
    }
}

/// Terrain class implied by the sighting probability.
pub fn terrain_for(probability: f32) -> &'static str {
    if probability > HIGH_PROBABILITY {
        "Ancient Riverbed"
    } else if probability > MEDIUM_PROBABILITY {
        "Crater Basin"
    } else {
        "Rocky Plains"
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoverConditions {
    pub surface_temp: String,
    pub light_level: String,
    pub terrain_type: String,
    /// Percent, capped at 95.
    pub confidence: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoverReport {
    /// Rover presence probability in percent, [0, 100].
    pub probability: f32,
    pub latitude: String,
    pub longitude: String,
    pub conditions: RoverConditions,
}

impl RoverReport {
    pub fn verdict(&self) -> RoverVerdict {
        RoverVerdict::from_probability(self.probability)
    }

    /// Reject reports whose probability is not a finite percentage.
    pub fn validate(&self) -> Result<(), CollaboratorError> {
        if !self.probability.is_finite() || !(0.0..=100.0).contains(&self.probability) {
            return Err(CollaboratorError(format!(
                "rover probability must be within 0-100, got {}",
                self.probability
            )));
        }
        Ok(())
    }
}

pub trait RoverDetector: Send {
    fn detect_rover(&mut self, image: &BaseImage) -> Result<RoverReport, CollaboratorError>;
}

/// Answers with a random probability and matching surface conditions.
pub struct MockRoverDetector {
    rng: StdRng,
    latency: Duration,
}

impl MockRoverDetector {
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
}

impl Default for MockRoverDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RoverDetector for MockRoverDetector {
    fn detect_rover(&mut self, image: &BaseImage) -> Result<RoverReport, CollaboratorError> {
        if image.is_empty() {
            return Err(CollaboratorError("cannot search an empty image".into()));
        }
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let rng = &mut self.rng;
        let probability = (rng.gen_range(0.0f32..100.0) * 10.0).round() / 10.0;
        let latitude = rng.gen_range(-10.0f32..10.0);
        let longitude = rng.gen_range(-20.0f32..20.0);
        let confidence = (probability + rng.gen_range(0..10) as f32).min(MAX_CONFIDENCE);

        let report = RoverReport {
            probability,
            latitude: format!("{latitude:.4}° N"),
            longitude: format!("{longitude:.4}° E"),
            conditions: RoverConditions {
                surface_temp: format!("{}°C", rng.gen_range(-40..20)),
                light_level: if probability > 50.0 { "Daylight" } else { "Low Light" }.into(),
                terrain_type: terrain_for(probability).into(),
                confidence,
            },
        };
        debug!(probability, "Mock rover search finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(RoverVerdict::from_probability(75.0), RoverVerdict::Medium);
        assert_eq!(RoverVerdict::from_probability(75.1), RoverVerdict::High);
        assert_eq!(RoverVerdict::from_probability(40.0), RoverVerdict::Low);
        assert_eq!(terrain_for(40.0), "Rocky Plains");
        assert_eq!(terrain_for(60.0), "Crater Basin");
    }
}
