//! Orbit stability and habitability classification
//!
//! Works on the planet's distance from the origin (the binary's barycenter)
//! at every sample of a restricted three-body trajectory.

use std::fmt;

use crate::simulation::states::Trajectory;

/// Farthest a stable planet may wander
pub const MAX_STABLE_DISTANCE: f64 = 8.0;
/// Closest a stable planet may approach
pub const MIN_STABLE_DISTANCE: f64 = 0.4;
/// Habitable band on the mean distance, inclusive
pub const HABITABLE_MIN: f64 = 1.8;
pub const HABITABLE_MAX: f64 = 3.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Habitable,
    StableButInhospitable,
    Unstable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Habitable => "stable orbit inside the habitable zone",
            Verdict::StableButInhospitable => "stable orbit outside the habitable zone",
            Verdict::Unstable => "unstable orbit: planet ejected or collided",
        };
        f.write_str(text)
    }
}

/// Summary statistics of a distance series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSummary {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
}

impl OrbitSummary {
    /// Max, min and mean of `distances`. An empty slice or any NaN yields a
    /// NaN summary.
    pub fn from_distances(distances: &[f64]) -> Self {
        if distances.is_empty() || distances.iter().any(|d| d.is_nan()) {
            return Self { max: f64::NAN, min: f64::NAN, mean: f64::NAN };
        }
        let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        Self { max, min, mean }
    }

    pub fn is_finite(&self) -> bool {
        self.max.is_finite() && self.min.is_finite() && self.mean.is_finite()
    }

    /// Classify from the statistics alone
    pub fn verdict(&self) -> Verdict {
        if !self.is_finite() {
            return Verdict::Unstable;
        }
        if !(self.max < MAX_STABLE_DISTANCE && self.min > MIN_STABLE_DISTANCE) {
            return Verdict::Unstable;
        }
        if (HABITABLE_MIN..=HABITABLE_MAX).contains(&self.mean) {
            Verdict::Habitable
        } else {
            Verdict::StableButInhospitable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub summary: OrbitSummary,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (max {:.3}, min {:.3}, mean {:.3})",
            self.verdict, self.summary.max, self.summary.min, self.summary.mean
        )
    }
}

/// Classify a planet from its distance series
pub fn classify_distances(distances: &[f64]) -> Classification {
    let summary = OrbitSummary::from_distances(distances);
    Classification {
        verdict: summary.verdict(),
        summary,
    }
}

/// `sqrt(x² + y²)` of the planet at every sample
pub fn distances_from_origin(trajectory: &Trajectory) -> Vec<f64> {
    let xs = trajectory.column(0);
    let ys = trajectory.column(1);
    xs.iter().zip(ys.iter()).map(|(x, y)| x.hypot(*y)).collect()
}

pub fn classify_trajectory(trajectory: &Trajectory) -> Classification {
    classify_distances(&distances_from_origin(trajectory))
}
