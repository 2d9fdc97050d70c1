//! Initial conditions
//!
//! The vortex generator draws from a caller-supplied RNG so a seed fully
//! determines the disk. The restricted three-body start is deterministic.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::simulation::params::{ThreeBodyParams, VortexParams};
use crate::simulation::states::{Body3, BodyMeta, BodyRole, NVec3};

/// Central mass relative to the disk star mass
pub const CENTRAL_MASS_FACTOR: f64 = 50.0;
/// Smallest sampled radius; keeps `sqrt(m / r)` bounded
pub const MIN_DISK_RADIUS: f64 = 0.5;
/// Half-thickness of the disk
pub const DISK_HALF_THICKNESS: f64 = 0.2;
/// Bound on the random out-of-plane velocity
pub const MAX_VERTICAL_SPEED: f64 = 0.02;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Masses of the disk, central body first when enabled
pub fn vortex_masses(p: &VortexParams) -> Vec<f64> {
    let mut masses = vec![p.mass_mean; p.bodies];
    if p.central_black_hole {
        masses[0] = CENTRAL_MASS_FACTOR * p.mass_mean;
    }
    masses
}

/// Place `p.bodies` bodies in a thin rotating disk.
///
/// Disk stars get a tangential, counter-clockwise speed of
/// `velocity_factor * sqrt(mean_mass / radius)` where `mean_mass` averages
/// every body including the central one. With `central_black_hole` body 0
/// sits exactly at rest at the origin and consumes no random draws.
pub fn generate_vortex<R: Rng + ?Sized>(p: &VortexParams, rng: &mut R) -> Vec<Body3> {
    let masses = vortex_masses(p);
    let mean_mass = masses.iter().sum::<f64>() / masses.len() as f64;

    masses
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            if i == 0 && p.central_black_hole {
                return Body3 {
                    x: NVec3::zeros(),
                    v: NVec3::zeros(),
                    m,
                };
            }

            let radius = rng.gen_range(MIN_DISK_RADIUS..=p.disk_radius);
            let angle = rng.gen_range(0.0..=TAU);
            let z = rng.gen_range(-DISK_HALF_THICKNESS..=DISK_HALF_THICKNESS);

            let (s, c) = angle.sin_cos();
            let v_mag = p.velocity_factor * (mean_mass / radius).sqrt();
            let vz = rng.gen_range(-MAX_VERTICAL_SPEED..=MAX_VERTICAL_SPEED);

            Body3 {
                x: NVec3::new(radius * c, radius * s, z),
                v: NVec3::new(-v_mag * s, v_mag * c, vz),
                m,
            }
        })
        .collect()
}

/// Renderer metadata for a generated disk
pub fn vortex_metadata(p: &VortexParams, bodies: &[Body3]) -> Vec<BodyMeta> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, b)| BodyMeta {
            mass: b.m,
            role: if i == 0 && p.central_black_hole {
                BodyRole::CentralMass
            } else {
                BodyRole::DiskStar
            },
        })
        .collect()
}

/// `[x0, 0, 0, vy0]`: planet on the +x axis moving in +y
pub fn planet_initial_state(p: &ThreeBodyParams) -> Vec<f64> {
    vec![p.planet_x, 0.0, 0.0, p.planet_vy]
}

/// Two stars followed by the massless planet
pub fn three_body_metadata(p: &ThreeBodyParams) -> Vec<BodyMeta> {
    vec![
        BodyMeta { mass: p.star_mass_1, role: BodyRole::Star },
        BodyMeta { mass: p.star_mass_2, role: BodyRole::Star },
        BodyMeta { mass: 0.0, role: BodyRole::Planet },
    ]
}
