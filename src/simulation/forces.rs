//! Acceleration contributors for the N-body equations of motion
//!
//! An [`AccelSet`] sums any number of [`Acceleration`] terms; the disk
//! scenario registers a single [`SoftenedGravity`] term.

use crate::simulation::states::NVec3;

/// Collection of acceleration terms.
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations at time `t`
    /// - `out[i]` is overwritten with the sum of every term for body `i`
    pub fn accumulate_accels(&self, t: f64, positions: &[NVec3], masses: &[f64], out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, positions, masses, out);
        }
    }
}

/// Acceleration source. Implementations add their contribution into `out[i]`
pub trait Acceleration {
    fn acceleration(&self, t: f64, positions: &[NVec3], masses: &[f64], out: &mut [NVec3]);
}

/// Newtonian gravity with Plummer softening, direct O(N²) pair sum.
///
/// `a_i = Σ_j k1·m_j·(r_j − r_i) / (|r_j − r_i|² + ε²)^{3/2}`
///
/// Every pair is visited once. Cost grows with N², which is the bottleneck
/// for anything beyond a few hundred bodies.
#[derive(Debug, Clone, Copy)]
pub struct SoftenedGravity {
    pub k1: f64,        // normalized force coefficient
    pub softening: f64, // ε, added in quadrature to the separation
}

impl SoftenedGravity {
    /// `1 / (r² + ε²)^{3/2}`
    #[inline]
    pub fn inv_r3(&self, r2: f64) -> f64 {
        let inv_r = (r2 + self.softening * self.softening).sqrt().recip();
        inv_r * inv_r * inv_r
    }
}

impl Acceleration for SoftenedGravity {
    fn acceleration(&self, _t: f64, positions: &[NVec3], masses: &[f64], out: &mut [NVec3]) {
        let n = positions.len();

        for i in 0..n {
            let xi = positions[i];
            let mi = masses[i];

            for j in (i + 1)..n {
                // r points from i to j: i is pulled along +r, j along -r
                let r = positions[j] - xi;
                let coef = self.k1 * self.inv_r3(r.dot(&r));

                out[i] += coef * masses[j] * r;
                out[j] -= coef * mi * r;
            }
        }
    }
}
