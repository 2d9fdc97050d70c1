//! Analytic binary-star orbit for the restricted three-body scenario.
//!
//! The stars are never integrated: their positions are closed-form functions
//! of time. One orbital period is one time unit. Both stars orbit the barycenter
//! at the origin with semi-major axes `a1 = m2/(m1+m2)` and `a2 = m1/(m1+m2)`
//! of a unit separation.

use std::f64::consts::TAU;

use crate::simulation::states::NVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryOrbit {
    pub m1: f64,
    pub m2: f64,
    pub e: f64,  // eccentricity, 0 <= e < 1
    pub a1: f64, // semi-major axis fraction of star 1
    pub a2: f64, // semi-major axis fraction of star 2
}

impl BinaryOrbit {
    pub fn new(m1: f64, m2: f64, e: f64) -> Self {
        let total = m1 + m2;
        Self {
            m1,
            m2,
            e,
            a1: m2 / total,
            a2: m1 / total,
        }
    }

    /// Positions of star 1 and star 2 at time `t`
    pub fn star_positions(&self, t: f64) -> (NVec2, NVec2) {
        let ep = (1.0 - self.e * self.e).sqrt();
        let (s, c) = (TAU * t).sin_cos();

        let r1 = NVec2::new(-self.a1 * (c - self.e), -ep * self.a1 * s);
        let r2 = NVec2::new(self.a2 * (c - self.e), ep * self.a2 * s);
        (r1, r2)
    }
}
