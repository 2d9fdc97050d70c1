//! Equations of motion
//!
//! [`EquationsOfMotion`] is the seam between scenarios and the integrator:
//! `evaluate(t, state) -> d(state)/dt`. Two implementations:
//! - [`NBodyEquations`]: full softened N-body system, state length 6N
//! - [`RestrictedThreeBody`]: one test particle under two analytic stars,
//!   state `[x, y, vx, vy]`
//!
//! Neither traps numerical blow-up. A zero separation yields inf/NaN which
//! the caller sees in the trajectory.

use std::cell::RefCell;

use crate::simulation::forces::{AccelSet, SoftenedGravity};
use crate::simulation::kepler::BinaryOrbit;
use crate::simulation::states::{position_of, velocity_of, NVec2, NVec3};
use crate::simulation::units::Normalization;

/// Right-hand side of a first-order ODE system
pub trait EquationsOfMotion {
    /// Length of the state vector this system expects
    fn dimension(&self) -> usize;

    /// Write `d(state)/dt` at time `t` into `out`.
    /// `state` and `out` both have length [`Self::dimension`]
    fn evaluate(&self, t: f64, state: &[f64], out: &mut [f64]);
}

/// Position and acceleration buffers reused across evaluations
struct Scratch {
    positions: Vec<NVec3>,
    accels: Vec<NVec3>,
}

/// Softened gravity between every pair of `N` bodies
pub struct NBodyEquations {
    masses: Vec<f64>,
    k2: f64,
    forces: AccelSet,
    scratch: RefCell<Scratch>,
}

impl NBodyEquations {
    pub fn new(masses: Vec<f64>, units: Normalization, softening: f64) -> Self {
        let forces = AccelSet::new().with(SoftenedGravity {
            k1: units.k1,
            softening,
        });
        let n = masses.len();
        Self {
            masses,
            k2: units.k2,
            forces,
            scratch: RefCell::new(Scratch {
                positions: vec![NVec3::zeros(); n],
                accels: vec![NVec3::zeros(); n],
            }),
        }
    }
}

impl EquationsOfMotion for NBodyEquations {
    fn dimension(&self) -> usize {
        6 * self.masses.len()
    }

    fn evaluate(&self, t: f64, state: &[f64], out: &mut [f64]) {
        let n = self.masses.len();
        let mut scratch = self.scratch.borrow_mut();
        let Scratch { positions, accels } = &mut *scratch;

        for (i, p) in positions.iter_mut().enumerate() {
            *p = position_of(state, i);
        }
        self.forces.accumulate_accels(t, positions, &self.masses, accels);

        // dr/dt = k2 * v
        for i in 0..n {
            let v = velocity_of(state, n, i);
            out[3 * i..3 * i + 3].copy_from_slice((self.k2 * v).as_slice());
        }
        // dv/dt = accumulated gravity
        for (i, a) in accels.iter().enumerate() {
            let o = 3 * n + 3 * i;
            out[o..o + 3].copy_from_slice(a.as_slice());
        }
    }
}

/// Massless planet moving under two stars on a prescribed orbit.
///
/// Unlike [`NBodyEquations`] there is no softening here: a planet that hits a
/// star produces an unbounded acceleration. The two variants are kept as they
/// are rather than unified; the classifier treats the resulting non-finite
/// distances as an unstable orbit.
#[derive(Debug, Clone, Copy)]
pub struct RestrictedThreeBody {
    pub orbit: BinaryOrbit,
    pub units: Normalization,
}

impl RestrictedThreeBody {
    pub fn new(orbit: BinaryOrbit, units: Normalization) -> Self {
        Self { orbit, units }
    }

    /// Planet acceleration at position `r3` and time `t`
    pub fn acceleration(&self, t: f64, r3: NVec2) -> NVec2 {
        let (r1, r2) = self.orbit.star_positions(t);
        let d1 = r1 - r3;
        let d2 = r2 - r3;
        let n1 = d1.norm();
        let n2 = d2.norm();

        self.units.k1 * self.orbit.m1 * d1 / (n1 * n1 * n1)
            + self.units.k1 * self.orbit.m2 * d2 / (n2 * n2 * n2)
    }
}

impl EquationsOfMotion for RestrictedThreeBody {
    fn dimension(&self) -> usize {
        4
    }

    fn evaluate(&self, t: f64, state: &[f64], out: &mut [f64]) {
        let a = self.acceleration(t, NVec2::new(state[0], state[1]));
        out[0] = self.units.k2 * state[2];
        out[1] = self.units.k2 * state[3];
        out[2] = a.x;
        out[3] = a.y;
    }
}
