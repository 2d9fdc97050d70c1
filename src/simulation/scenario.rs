//! Build validated, runnable scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a [`Scenario`]:
//! - checked physical parameters for the chosen scenario kind
//! - normalization constants (`K1`, `K2`)
//! - solver options
//!
//! Nothing is generated or integrated here; that is the engine's job.

use log::debug;

use crate::configuration::config::{AnimationSpeed, ScenarioConfig, ScenarioKind};
use crate::error::{SimError, SimResult};
use crate::simulation::integrator::SolverOptions;
use crate::simulation::params::{ThreeBodyParams, VortexParams};
use crate::simulation::units::{Normalization, PhysicalConstants};

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioParams {
    Vortex(VortexParams),
    ThreeBody(ThreeBodyParams),
}

/// Fully validated simulation run description
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub params: ScenarioParams,
    pub units: Normalization,
    pub solver: SolverOptions,
    pub animation: AnimationSpeed,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> SimResult<Self> {
        let constants: PhysicalConstants = cfg.constants.into();
        let units = Normalization::new(&constants)?;

        let solver: SolverOptions = cfg.solver.into();
        solver.validate().map_err(SimError::Solver)?;

        let (params, animation) = match cfg.scenario {
            ScenarioKind::Vortex(v) => (ScenarioParams::Vortex(v.into()), AnimationSpeed::default()),
            ScenarioKind::ThreeBody(ref tb) => (ScenarioParams::ThreeBody(tb.into()), tb.animation_speed),
        };
        let scenario = Self::new(params, units, solver, animation)?;

        debug!(
            "built scenario: k1 = {:.6e}, k2 = {:.6e}, G = {:e}",
            units.k1,
            units.k2,
            constants.gravity.value()
        );
        Ok(scenario)
    }

    /// Assemble from already-typed parts, validating the parameters
    pub fn new(
        params: ScenarioParams,
        units: Normalization,
        solver: SolverOptions,
        animation: AnimationSpeed,
    ) -> SimResult<Self> {
        match &params {
            ScenarioParams::Vortex(p) => p.validate()?,
            ScenarioParams::ThreeBody(p) => p.validate()?,
        }
        Ok(Self {
            params,
            units,
            solver,
            animation,
        })
    }

    pub fn vortex(params: VortexParams, constants: &PhysicalConstants) -> SimResult<Self> {
        Self::new(
            ScenarioParams::Vortex(params),
            Normalization::new(constants)?,
            SolverOptions::default(),
            AnimationSpeed::default(),
        )
    }

    pub fn three_body(params: ThreeBodyParams, constants: &PhysicalConstants) -> SimResult<Self> {
        Self::new(
            ScenarioParams::ThreeBody(params),
            Normalization::new(constants)?,
            SolverOptions::default(),
            AnimationSpeed::default(),
        )
    }

    /// Replace the disk seed, if this is a vortex scenario
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let ScenarioParams::Vortex(p) = &mut self.params {
            p.seed = seed;
        }
        self
    }
}
