//! Runs a [`Scenario`] end to end
//!
//! generate initial conditions -> build equations of motion -> integrate
//! -> classify (three-body only). The output is everything a renderer or
//! report needs; the engine itself draws nothing.

use log::info;
use nalgebra::DMatrix;

use crate::error::SimResult;
use crate::simulation::classifier::{classify_trajectory, Classification};
use crate::simulation::equations::{NBodyEquations, RestrictedThreeBody};
use crate::simulation::initial::{
    generate_vortex, planet_initial_state, seeded_rng, three_body_metadata, vortex_metadata,
};
use crate::simulation::integrator::{integrate, sample_times, SolverStats};
use crate::simulation::kepler::BinaryOrbit;
use crate::simulation::params::{ThreeBodyParams, VortexParams};
use crate::simulation::scenario::{Scenario, ScenarioParams};
use crate::simulation::states::{pack_state, BodyMeta, Trajectory};

#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub trajectory: Trajectory,
    pub bodies: Vec<BodyMeta>,
    /// `[x1, y1, x2, y2]` per sample; three-body only
    pub star_tracks: Option<DMatrix<f64>>,
    /// three-body only
    pub classification: Option<Classification>,
    pub stats: SolverStats,
    /// renderer hint, samples per animation frame
    pub frame_stride: usize,
}

pub struct Engine;

impl Engine {
    pub fn run(scenario: &Scenario) -> SimResult<SimulationOutput> {
        let mut output = match &scenario.params {
            ScenarioParams::Vortex(p) => Self::run_vortex(p, scenario)?,
            ScenarioParams::ThreeBody(p) => Self::run_three_body(p, scenario)?,
        };
        output.frame_stride = scenario.animation.frame_stride();
        Ok(output)
    }

    fn run_vortex(p: &VortexParams, scenario: &Scenario) -> SimResult<SimulationOutput> {
        info!(
            "initializing vortex disk: {} bodies, radius {}, seed {}",
            p.bodies, p.disk_radius, p.seed
        );
        let mut rng = seeded_rng(p.seed);
        let bodies = generate_vortex(p, &mut rng);
        let metadata = vortex_metadata(p, &bodies);

        let masses = bodies.iter().map(|b| b.m).collect();
        let eom = NBodyEquations::new(masses, scenario.units, p.softening);
        let y0 = pack_state(&bodies);
        let times = sample_times(p.t_end, p.samples);

        info!("integrating {} samples over t = [0, {}]", times.len(), p.t_end);
        let (trajectory, stats) = integrate(&eom, &y0, &times, &scenario.solver)?;
        info!(
            "done: {} accepted / {} rejected steps",
            stats.accepted_steps, stats.rejected_steps
        );

        Ok(SimulationOutput {
            trajectory,
            bodies: metadata,
            star_tracks: None,
            classification: None,
            stats,
            frame_stride: 1,
        })
    }

    fn run_three_body(p: &ThreeBodyParams, scenario: &Scenario) -> SimResult<SimulationOutput> {
        let orbit = BinaryOrbit::new(p.star_mass_1, p.star_mass_2, p.eccentricity);
        let eom = RestrictedThreeBody::new(orbit, scenario.units);
        let y0 = planet_initial_state(p);
        let times = sample_times(p.t_end, p.samples);

        info!(
            "integrating planet from x = {}, vy = {} over t = [0, {}]",
            p.planet_x, p.planet_vy, p.t_end
        );
        let (trajectory, stats) = integrate(&eom, &y0, &times, &scenario.solver)?;

        let classification = classify_trajectory(&trajectory);
        info!("classification: {classification}");

        Ok(SimulationOutput {
            star_tracks: Some(star_tracks(&orbit, trajectory.times())),
            trajectory,
            bodies: three_body_metadata(p),
            classification: Some(classification),
            stats,
            frame_stride: 1,
        })
    }
}

/// Analytic star positions at each sample time, rows `[x1, y1, x2, y2]`
pub fn star_tracks(orbit: &BinaryOrbit, times: &[f64]) -> DMatrix<f64> {
    DMatrix::from_fn(times.len(), 4, |k, c| {
        let (r1, r2) = orbit.star_positions(times[k]);
        match c {
            0 => r1.x,
            1 => r1.y,
            2 => r2.x,
            _ => r2.y,
        }
    })
}

