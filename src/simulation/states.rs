//! Core state types for the simulation.
//!
//! - `Body3` holds one body of the vortex disk (3D, `NVec3`)
//! - state vectors are flat `Vec<f64>` laid out as all positions then all
//!   velocities, ordered by body index
//! - `Trajectory` is the dense (samples x state) matrix handed to consumers

use nalgebra::{DMatrix, Vector2, Vector3};

pub type NVec2 = Vector2<f64>;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body3 {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64,   // mass, never changes after creation
}

/// What a body represents, so the renderer can size and color it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    CentralMass,
    DiskStar,
    Star,
    Planet,
}

/// Per-body metadata that travels next to the trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMeta {
    pub mass: f64,
    pub role: BodyRole,
}

/// Flatten bodies into `[x0,y0,z0, .., vx0,vy0,vz0, ..]` (length 6N)
pub fn pack_state(bodies: &[Body3]) -> Vec<f64> {
    let n = bodies.len();
    let mut state = vec![0.0; 6 * n];
    for (i, b) in bodies.iter().enumerate() {
        state[3 * i..3 * i + 3].copy_from_slice(b.x.as_slice());
        state[3 * n + 3 * i..3 * n + 3 * i + 3].copy_from_slice(b.v.as_slice());
    }
    state
}

/// Position of body `i` inside a packed N-body state
#[inline]
pub fn position_of(state: &[f64], i: usize) -> NVec3 {
    NVec3::new(state[3 * i], state[3 * i + 1], state[3 * i + 2])
}

/// Velocity of body `i` inside a packed N-body state holding `n` bodies
#[inline]
pub fn velocity_of(state: &[f64], n: usize, i: usize) -> NVec3 {
    let o = 3 * n + 3 * i;
    NVec3::new(state[o], state[o + 1], state[o + 2])
}

/// Rebuild bodies from a packed state, taking masses from `masses`
pub fn unpack_state(state: &[f64], masses: &[f64]) -> Vec<Body3> {
    let n = masses.len();
    masses
        .iter()
        .enumerate()
        .map(|(i, &m)| Body3 {
            x: position_of(state, i),
            v: velocity_of(state, n, i),
            m,
        })
        .collect()
}

/// Sampled solution of an initial value problem.
///
/// Row `k` of `states` is the state at `times[k]`. Built once by the
/// integrator and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: DMatrix<f64>,
}

impl Trajectory {
    /// `data` is row-major, one state per sample
    pub fn from_rows(times: Vec<f64>, dimension: usize, data: &[f64]) -> Self {
        let states = DMatrix::from_row_slice(times.len(), dimension, data);
        Self { times, states }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.states.ncols()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.states
    }

    /// Copy of the state at sample `k`
    pub fn state(&self, k: usize) -> Vec<f64> {
        self.states.row(k).iter().copied().collect()
    }

    /// One state component across every sample
    pub fn column(&self, c: usize) -> Vec<f64> {
        self.states.column(c).iter().copied().collect()
    }

    /// Position of body `i` at sample `k` for an N-body trajectory
    pub fn body_position(&self, k: usize, i: usize) -> NVec3 {
        NVec3::new(
            self.states[(k, 3 * i)],
            self.states[(k, 3 * i + 1)],
            self.states[(k, 3 * i + 2)],
        )
    }
}
