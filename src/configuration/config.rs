//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario:
//!
//! - [`ConstantsConfig`] – gravity strength and reference units
//! - [`SolverConfig`]    – tolerances and step ceiling for the adaptive solver
//! - [`ScenarioKind`]    – vortex disk or restricted three-body inputs
//! - [`ScenarioConfig`]  – top-level wrapper loaded from YAML
//!
//! # YAML format
//!
//! ```yaml
//! constants:
//!   gravity: newtonian      # weak | newtonian | strong | extreme
//!
//! solver:
//!   rtol: 1.0e-8
//!   atol: 1.0e-8
//!   max_steps: 500000
//!
//! scenario:
//!   kind: vortex
//!   bodies: 20
//!   t_end: 15.0
//!   softening: 0.15
//!   mass_mean: 1.0
//!   disk_radius: 5.0
//!   velocity_factor: 1.2
//!   central_black_hole: true
//!   seed: 42
//! ```
//!
//! Omitted fields fall back to their defaults. Values are range-checked when
//! the runtime [`Scenario`](crate::simulation::scenario::Scenario) is built,
//! not here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimResult;
use crate::simulation::integrator::SolverOptions;
use crate::simulation::params::{ThreeBodyParams, VortexParams};
use crate::simulation::units::{GravityStrength, PhysicalConstants, ReferenceUnits};

/// Renderer playback speed. Only changes the frame stride, never the physics
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    /// Number of trajectory samples the renderer advances per frame
    pub fn frame_stride(self) -> usize {
        match self {
            AnimationSpeed::Slow => 1,
            AnimationSpeed::Normal => 2,
            AnimationSpeed::Fast => 4,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ConstantsConfig {
    pub gravity: GravityStrength,
    pub reference: ReferenceUnits,
}

impl From<ConstantsConfig> for PhysicalConstants {
    fn from(c: ConstantsConfig) -> Self {
        PhysicalConstants {
            gravity: c.gravity,
            reference: c.reference,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SolverConfig {
    pub rtol: f64,            // relative error tolerance
    pub atol: f64,            // absolute error tolerance
    pub h0: Option<f64>,      // first step, estimated if absent
    pub h_max: Option<f64>,   // largest step allowed
    pub max_steps: usize,     // internal step ceiling for the whole run
}

impl Default for SolverConfig {
    fn default() -> Self {
        let o = SolverOptions::default();
        Self {
            rtol: o.rtol,
            atol: o.atol,
            h0: o.h0,
            h_max: o.h_max,
            max_steps: o.max_steps,
        }
    }
}

impl From<SolverConfig> for SolverOptions {
    fn from(c: SolverConfig) -> Self {
        SolverOptions {
            rtol: c.rtol,
            atol: c.atol,
            h0: c.h0,
            h_max: c.h_max,
            max_steps: c.max_steps,
        }
    }
}

/// Vortex disk inputs
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct VortexConfig {
    pub bodies: usize,            // number of stars, central mass included
    pub t_end: f64,               // time span
    pub samples: usize,           // output samples
    pub softening: f64,           // prevents explosions at close range
    pub mass_mean: f64,           // average star mass (solar masses)
    pub disk_radius: f64,         // initial disk radius
    pub velocity_factor: f64,     // orbital velocity factor
    pub central_black_hole: bool, // add a central supermassive body
    pub seed: u64,                // makes the disk reproducible
}

impl Default for VortexConfig {
    fn default() -> Self {
        VortexParams::default().into()
    }
}

impl From<VortexParams> for VortexConfig {
    fn from(p: VortexParams) -> Self {
        Self {
            bodies: p.bodies,
            t_end: p.t_end,
            samples: p.samples,
            softening: p.softening,
            mass_mean: p.mass_mean,
            disk_radius: p.disk_radius,
            velocity_factor: p.velocity_factor,
            central_black_hole: p.central_black_hole,
            seed: p.seed,
        }
    }
}

impl From<VortexConfig> for VortexParams {
    fn from(c: VortexConfig) -> Self {
        Self {
            bodies: c.bodies,
            t_end: c.t_end,
            samples: c.samples,
            softening: c.softening,
            mass_mean: c.mass_mean,
            disk_radius: c.disk_radius,
            velocity_factor: c.velocity_factor,
            central_black_hole: c.central_black_hole,
            seed: c.seed,
        }
    }
}

/// Restricted three-body inputs
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ThreeBodyConfig {
    pub planet_x: f64,     // initial planet x position
    pub planet_vy: f64,    // initial orbital y velocity
    pub t_end: f64,        // observation time
    pub samples: usize,
    pub star_mass_1: f64,
    pub star_mass_2: f64,
    pub eccentricity: f64,
    pub animation_speed: AnimationSpeed,
}

impl Default for ThreeBodyConfig {
    fn default() -> Self {
        let p = ThreeBodyParams::default();
        Self {
            planet_x: p.planet_x,
            planet_vy: p.planet_vy,
            t_end: p.t_end,
            samples: p.samples,
            star_mass_1: p.star_mass_1,
            star_mass_2: p.star_mass_2,
            eccentricity: p.eccentricity,
            animation_speed: AnimationSpeed::default(),
        }
    }
}

impl From<&ThreeBodyConfig> for ThreeBodyParams {
    fn from(c: &ThreeBodyConfig) -> Self {
        Self {
            planet_x: c.planet_x,
            planet_vy: c.planet_vy,
            t_end: c.t_end,
            samples: c.samples,
            star_mass_1: c.star_mass_1,
            star_mass_2: c.star_mass_2,
            eccentricity: c.eccentricity,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioKind {
    Vortex(VortexConfig),
    ThreeBody(ThreeBodyConfig),
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub constants: ConstantsConfig, // gravity strength + reference units
    #[serde(default)]
    pub solver: SolverConfig,       // adaptive solver settings
    pub scenario: ScenarioKind,     // what to simulate
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
