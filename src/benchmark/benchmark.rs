use std::time::Instant;

use crate::simulation::equations::{EquationsOfMotion, NBodyEquations};
use crate::simulation::initial::{generate_vortex, seeded_rng};
use crate::simulation::integrator::{integrate, sample_times, SolverOptions};
use crate::simulation::params::VortexParams;
use crate::simulation::states::pack_state;
use crate::simulation::units::{Normalization, PhysicalConstants};

/// Helper to build a disk of size `n` with its equations of motion
fn make_disk(n: usize) -> (NBodyEquations, Vec<f64>) {
    let params = VortexParams {
        bodies: n,
        ..VortexParams::default()
    };
    let units = Normalization::new(&PhysicalConstants::default())
        .expect("default reference units are valid");

    let bodies = generate_vortex(&params, &mut seeded_rng(params.seed));
    let masses = bodies.iter().map(|b| b.m).collect();
    (NBodyEquations::new(masses, units, params.softening), pack_state(&bodies))
}

/// Cost of one derivative evaluation as N grows (the O(N²) pair sum)
pub fn bench_derivative() {
    println!("N,derivative_us");

    for n in [2, 5, 10, 20, 30, 40, 50, 60] {
        let (eom, y0) = make_disk(n);
        let mut out = vec![0.0; eom.dimension()];
        let evals = 2_000;

        // Warm up
        eom.evaluate(0.0, &y0, &mut out);

        let t0 = Instant::now();
        for k in 0..evals {
            eom.evaluate(k as f64 * 1e-3, &y0, &mut out);
        }
        let us = t0.elapsed().as_secs_f64() * 1e6 / evals as f64;

        println!("{n},{us:.3}");
    }
}

/// Full adaptive runs over a short span; reports wall time and solver effort
pub fn bench_integration() {
    println!("N,steps,fn_evals,ms");

    let opts = SolverOptions::default();
    let times = sample_times(5.0, 100);

    for n in [5, 10, 20, 40, 60] {
        let (eom, y0) = make_disk(n);

        let t0 = Instant::now();
        match integrate(&eom, &y0, &times, &opts) {
            Ok((_, stats)) => {
                let ms = t0.elapsed().as_secs_f64() * 1000.0;
                println!(
                    "{n},{},{},{ms:.3}",
                    stats.accepted_steps + stats.rejected_steps,
                    stats.fn_evals
                );
            }
            Err(e) => println!("{n},failed: {e}"),
        }
    }
}
