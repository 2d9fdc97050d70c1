//! Validated runtime parameters for each scenario
//!
//! Every field is checked against its declared range before anything is
//! generated or integrated. Out-of-range input is an error, never clamped.

use crate::error::{check_positive, check_range, SimError, SimResult};

pub const MIN_BODIES: usize = 2;
pub const MAX_BODIES: usize = 60;
/// Upper bound on output samples; the trajectory is fully materialized
pub const MAX_SAMPLES: usize = 100_000;

/// Rotating-disk ("vortex") scenario
#[derive(Debug, Clone, PartialEq)]
pub struct VortexParams {
    pub bodies: usize,           // N, including the central mass if any
    pub t_end: f64,              // time span (dimensionless)
    pub samples: usize,          // output samples over [0, t_end]
    pub softening: f64,          // ε
    pub mass_mean: f64,          // mass of every disk star (solar masses)
    pub disk_radius: f64,        // max initial radius
    pub velocity_factor: f64,    // scales the circular-orbit speed
    pub central_black_hole: bool, // body 0 becomes a 50x central mass
    pub seed: u64,               // disk sampling seed
}

impl VortexParams {
    pub fn validate(&self) -> SimResult<()> {
        if !(MIN_BODIES..=MAX_BODIES).contains(&self.bodies) {
            return Err(SimError::invalid(
                "bodies",
                self.bodies as f64,
                format!("an integer in [{MIN_BODIES}, {MAX_BODIES}]"),
            ));
        }
        check_range("t_end", self.t_end, 1.0, 50.0)?;
        check_samples(self.samples)?;
        check_range("softening", self.softening, 0.01, 0.5)?;
        check_range("mass_mean", self.mass_mean, 0.1, 10.0)?;
        check_range("disk_radius", self.disk_radius, 1.0, 10.0)?;
        check_range("velocity_factor", self.velocity_factor, 0.0, 2.5)?;
        Ok(())
    }
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            bodies: 20,
            t_end: 15.0,
            samples: 300,
            softening: 0.15,
            mass_mean: 1.0,
            disk_radius: 5.0,
            velocity_factor: 1.2,
            central_black_hole: true,
            seed: 42,
        }
    }
}

/// Restricted three-body (binary star + test planet) scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ThreeBodyParams {
    pub planet_x: f64,     // initial x of the planet on the +x axis
    pub planet_vy: f64,    // initial y velocity of the planet
    pub t_end: f64,        // observation time
    pub samples: usize,
    pub star_mass_1: f64,  // solar masses
    pub star_mass_2: f64,
    pub eccentricity: f64, // of the binary orbit
}

impl ThreeBodyParams {
    pub fn validate(&self) -> SimResult<()> {
        check_range("planet_x", self.planet_x, 1.0, 5.0)?;
        check_range("planet_vy", self.planet_vy, 0.05, 0.6)?;
        check_range("t_end", self.t_end, 5.0, 200.0)?;
        check_samples(self.samples)?;
        check_positive("star_mass_1", self.star_mass_1)?;
        check_positive("star_mass_2", self.star_mass_2)?;
        if !(self.eccentricity >= 0.0 && self.eccentricity < 1.0) {
            return Err(SimError::invalid("eccentricity", self.eccentricity, "a value in [0, 1)"));
        }
        Ok(())
    }
}

impl Default for ThreeBodyParams {
    // Alpha Centauri A/B
    fn default() -> Self {
        Self {
            planet_x: 2.5,
            planet_vy: 0.3,
            t_end: 50.0,
            samples: 500,
            star_mass_1: 1.1,
            star_mass_2: 0.907,
            eccentricity: 0.518,
        }
    }
}

fn check_samples(samples: usize) -> SimResult<()> {
    if !(1..=MAX_SAMPLES).contains(&samples) {
        return Err(SimError::invalid(
            "samples",
            samples as f64,
            format!("an integer in [1, {MAX_SAMPLES}]"),
        ));
    }
    Ok(())
}
