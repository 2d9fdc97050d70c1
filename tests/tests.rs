use eventhorizon::simulation::classifier::{
    classify_distances, classify_trajectory, OrbitSummary, Verdict, HABITABLE_MAX, HABITABLE_MIN,
    MIN_STABLE_DISTANCE,
};
use eventhorizon::simulation::equations::{EquationsOfMotion, NBodyEquations, RestrictedThreeBody};
use eventhorizon::simulation::forces::{AccelSet, SoftenedGravity};
use eventhorizon::simulation::initial::{
    generate_vortex, planet_initial_state, seeded_rng, vortex_masses, CENTRAL_MASS_FACTOR,
    MIN_DISK_RADIUS,
};
use eventhorizon::simulation::integrator::{integrate, sample_times, SolverError, SolverOptions};
use eventhorizon::simulation::kepler::BinaryOrbit;
use eventhorizon::simulation::params::{ThreeBodyParams, VortexParams, MAX_SAMPLES};
use eventhorizon::simulation::states::{pack_state, unpack_state, Body3, BodyRole, NVec3};
use eventhorizon::simulation::units::{GravityStrength, Normalization, PhysicalConstants, ReferenceUnits};
use eventhorizon::{AnimationSpeed, Engine, Scenario, ScenarioConfig, ScenarioKind, SimError};

use proptest::prelude::*;

/// Build two bodies at rest separated along the x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> Vec<Body3> {
    vec![
        Body3 {
            x: [-dist / 2.0, 0.0, 0.0].into(),
            v: [0.0, 0.0, 0.0].into(),
            m: m1,
        },
        Body3 {
            x: [dist / 2.0, 0.0, 0.0].into(),
            v: [0.0, 0.0, 0.0].into(),
            m: m2,
        },
    ]
}

/// Equations for `bodies` with k1 = k2 = 1
pub fn unit_equations(bodies: &[Body3], softening: f64) -> NBodyEquations {
    let masses = bodies.iter().map(|b| b.m).collect();
    NBodyEquations::new(masses, Normalization::unit(), softening)
}

/// Velocity derivatives of body `i` from a packed derivative
fn accel_of(deriv: &[f64], n: usize, i: usize) -> NVec3 {
    let o = 3 * n + 3 * i;
    NVec3::new(deriv[o], deriv[o + 1], deriv[o + 2])
}

fn derivative(eom: &impl EquationsOfMotion, state: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; eom.dimension()];
    eom.evaluate(0.0, state, &mut out);
    out
}

fn tight() -> SolverOptions {
    SolverOptions {
        rtol: 1e-10,
        atol: 1e-10,
        ..SolverOptions::default()
    }
}

/// x'' = -x, state [x, v]
struct Oscillator;

impl EquationsOfMotion for Oscillator {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, _t: f64, state: &[f64], out: &mut [f64]) {
        out[0] = state[1];
        out[1] = -state[0];
    }
}

// ==================================================================================
// Units
// ==================================================================================

#[test]
fn normalization_formula() {
    let n = Normalization::from_raw(2.0, 5.0, 2.0, 5.0, 3.0);
    assert!((n.k1 - 1.5).abs() < 1e-12, "k1 = {}", n.k1);
    assert!((n.k2 - 7.5).abs() < 1e-12, "k2 = {}", n.k2);
}

#[test]
fn normalization_alpha_centauri_reference() {
    let n = Normalization::new(&PhysicalConstants::default()).unwrap();
    assert!(n.k1 > 0.19 && n.k1 < 0.21, "k1 = {}", n.k1);
    assert!(n.k2 > 7.2 && n.k2 < 7.3, "k2 = {}", n.k2);
}

#[test]
fn normalization_scales_linearly_with_gravity() {
    let weak = Normalization::new(&PhysicalConstants {
        gravity: GravityStrength::Weak,
        ..Default::default()
    })
    .unwrap();
    let extreme = Normalization::new(&PhysicalConstants {
        gravity: GravityStrength::Extreme,
        ..Default::default()
    })
    .unwrap();

    assert!((extreme.k1 / weak.k1 - 50.0).abs() < 1e-9);
    assert_eq!(extreme.k2, weak.k2);
}

#[test]
fn normalization_rejects_bad_reference() {
    let constants = PhysicalConstants {
        gravity: GravityStrength::Newtonian,
        reference: ReferenceUnits {
            length: 0.0,
            ..ReferenceUnits::default()
        },
    };
    assert!(matches!(
        Normalization::new(&constants),
        Err(SimError::InvalidParameter { name: "reference.length", .. })
    ));
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let bodies = vec![
        Body3 { x: [0.3, -1.2, 0.1].into(), v: NVec3::zeros(), m: 1.0 },
        Body3 { x: [2.0, 0.5, -0.4].into(), v: NVec3::zeros(), m: 1.0 },
        Body3 { x: [-1.1, 0.9, 0.0].into(), v: NVec3::zeros(), m: 1.0 },
        Body3 { x: [0.0, 0.0, 1.7].into(), v: NVec3::zeros(), m: 1.0 },
    ];
    let eom = unit_equations(&bodies, 0.05);
    let deriv = derivative(&eom, &pack_state(&bodies));

    let net: NVec3 = (0..bodies.len()).map(|i| accel_of(&deriv, bodies.len(), i)).sum();
    assert!(net.norm() < 1e-12, "Net momentum change not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let bodies = two_body_system(2.0, 1.0, 1.0);
    let eom = unit_equations(&bodies, 0.1);
    let deriv = derivative(&eom, &pack_state(&bodies));

    let dx = bodies[1].x - bodies[0].x;
    assert!(accel_of(&deriv, 2, 0).dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(accel_of(&deriv, 2, 1).dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_position_derivative_is_scaled_velocity() {
    let mut bodies = two_body_system(2.0, 1.0, 3.0);
    bodies[0].v = [0.5, -1.0, 2.0].into();
    let eom = NBodyEquations::new(vec![1.0, 3.0], Normalization { k1: 0.2, k2: 7.0 }, 0.1);
    let deriv = derivative(&eom, &pack_state(&bodies));

    assert_eq!(&deriv[0..3], &[3.5, -7.0, 14.0]);
    assert_eq!(&deriv[3..6], &[0.0, 0.0, 0.0]);
}

#[test]
fn gravity_inverse_square_law() {
    let near = two_body_system(1.0, 1.0, 1.0);
    let far = two_body_system(2.0, 1.0, 1.0);
    let eom = unit_equations(&near, 0.0);

    let a_near = accel_of(&derivative(&eom, &pack_state(&near)), 2, 0).norm();
    let a_far = accel_of(&derivative(&eom, &pack_state(&far)), 2, 0).norm();

    let ratio = a_near / a_far;
    assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
}

#[test]
fn softening_monotonically_lowers_peak_acceleration() {
    let bodies = two_body_system(0.05, 1.0, 1.0);
    let state = pack_state(&bodies);

    let peaks: Vec<f64> = [0.01, 0.02, 0.05, 0.1, 0.2, 0.5]
        .iter()
        .map(|&eps| accel_of(&derivative(&unit_equations(&bodies, eps), &state), 2, 0).norm())
        .collect();

    for w in peaks.windows(2) {
        assert!(w[1] < w[0], "softening did not reduce acceleration: {:?}", peaks);
    }
}

#[test]
fn softening_prevents_blowup() {
    let bodies = two_body_system(1e-9, 1.0, 1.0);
    let eom = unit_equations(&bodies, 0.01);
    let deriv = derivative(&eom, &pack_state(&bodies));

    assert!(deriv.iter().all(|d| d.is_finite()));
    assert!(accel_of(&deriv, 2, 0).norm() < 1e9, "Softening failed; acceleration too large");
}

#[test]
fn repeated_evaluations_do_not_leak_state() {
    let p = VortexParams { bodies: 8, ..VortexParams::default() };
    let first = pack_state(&generate_vortex(&p, &mut seeded_rng(1)));
    let second = pack_state(&generate_vortex(&p, &mut seeded_rng(2)));
    let masses = vortex_masses(&p);

    let reused = NBodyEquations::new(masses.clone(), Normalization::unit(), 0.1);
    let d_first = derivative(&reused, &first);
    let d_second = derivative(&reused, &second);
    let d_first_again = derivative(&reused, &first);

    let fresh = NBodyEquations::new(masses, Normalization::unit(), 0.1);
    assert_eq!(d_second, derivative(&fresh, &second));
    assert_eq!(d_first, d_first_again);
    assert_ne!(d_first, d_second);
}

#[test]
fn accel_set_sums_terms() {
    let positions = [NVec3::new(-1.0, 0.0, 0.0), NVec3::new(1.0, 0.0, 0.0)];
    let masses = [1.0, 2.0];
    let gravity = SoftenedGravity { k1: 1.0, softening: 0.1 };

    let single = AccelSet::new().with(gravity);
    let double = AccelSet::new().with(gravity).with(gravity);
    assert_eq!(double.len(), 2);

    let mut a1 = vec![NVec3::zeros(); 2];
    let mut a2 = vec![NVec3::new(9.0, 9.0, 9.0); 2];
    single.accumulate_accels(0.0, &positions, &masses, &mut a1);
    double.accumulate_accels(0.0, &positions, &masses, &mut a2);

    for i in 0..2 {
        assert!((a2[i] - 2.0 * a1[i]).norm() < 1e-12);
    }
}

#[test]
fn equal_masses_at_rest_fall_together() {
    let bodies = two_body_system(2.0, 1.0, 1.0);
    let eom = unit_equations(&bodies, 0.1);
    let times = sample_times(2.0, 201);

    let (traj, _) = integrate(&eom, &pack_state(&bodies), &times, &tight()).unwrap();

    // separation and its rate along x while the bodies are still apart
    let approach: Vec<(f64, f64)> = (0..traj.len())
        .map(|k| {
            let s = traj.state(k);
            (s[3] - s[0], s[9] - s[6])
        })
        .take_while(|&(sep, _)| sep > 0.3)
        .collect();

    assert!(approach.len() > 50, "bodies met too early: {}", approach.len());
    assert!(approach[1].1 < 0.0, "bodies are not approaching");
    for w in approach.windows(2) {
        assert!(w[1].1 < w[0].1, "separation rate not strictly decreasing: {:?}", w);
        assert!(w[1].0 < w[0].0, "separation not shrinking: {:?}", w);
    }
}

// ==================================================================================
// Restricted three-body
// ==================================================================================

#[test]
fn circular_binary_keeps_constant_radius() {
    let orbit = BinaryOrbit::new(1.1, 0.907, 0.0);
    for k in 0..400 {
        let t = k as f64 * 0.0137;
        let (r1, r2) = orbit.star_positions(t);
        assert!((r1.norm() - orbit.a1).abs() < 1e-12, "star 1 radius drifted at t = {t}");
        assert!((r2.norm() - orbit.a2).abs() < 1e-12, "star 2 radius drifted at t = {t}");
    }
}

#[test]
fn binary_barycenter_stays_at_origin() {
    let orbit = BinaryOrbit::new(1.1, 0.907, 0.518);
    assert!((orbit.a1 + orbit.a2 - 1.0).abs() < 1e-12);
    for k in 0..100 {
        let (r1, r2) = orbit.star_positions(k as f64 * 0.031);
        let com = orbit.m1 * r1 + orbit.m2 * r2;
        assert!(com.norm() < 1e-12);
    }
}

#[test]
fn planet_pulled_toward_stars() {
    let eom = RestrictedThreeBody::new(BinaryOrbit::new(1.0, 1.0, 0.0), Normalization::unit());
    let mut out = [0.0; 4];
    eom.evaluate(0.0, &[3.0, 0.0, 0.0, 0.5], &mut out);

    assert_eq!(out[0], 0.0);
    assert_eq!(out[1], 0.5);
    assert!(out[2] < 0.0, "planet not attracted inward");
    assert!(out[3].abs() < 1e-12);
}

#[test]
fn planet_on_star_propagates_non_finite() {
    let orbit = BinaryOrbit::new(1.0, 1.0, 0.5);
    let eom = RestrictedThreeBody::new(orbit, Normalization::unit());
    let (r1, _) = orbit.star_positions(0.0);
    let y0 = [r1.x, r1.y, 0.0, 0.0];

    let (traj, _) = integrate(&eom, &y0, &[0.0, 1.0, 2.0], &SolverOptions::default()).unwrap();

    assert_eq!(traj.state(0), y0.to_vec());
    assert!(traj.state(2).iter().any(|v| !v.is_finite()));
    assert_eq!(classify_trajectory(&traj).verdict, Verdict::Unstable);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn single_sample_returns_initial_state() {
    let bodies = two_body_system(1.0, 1.0, 2.0);
    let eom = unit_equations(&bodies, 0.1);
    let y0 = pack_state(&bodies);

    let (traj, stats) = integrate(&eom, &y0, &[0.0], &SolverOptions::default()).unwrap();
    assert_eq!(traj.len(), 1);
    assert_eq!(traj.state(0), y0);
    assert_eq!(stats.fn_evals, 0);

    let (traj, _) = integrate(&eom, &y0, &[4.0, 4.0, 4.0], &SolverOptions::default()).unwrap();
    assert_eq!(traj.state(2), y0);
}

#[test]
fn oscillator_matches_analytic_solution() {
    let times = sample_times(std::f64::consts::TAU, 64);
    let (traj, stats) = integrate(&Oscillator, &[1.0, 0.0], &times, &tight()).unwrap();

    for (k, &t) in times.iter().enumerate() {
        let s = traj.state(k);
        assert!((s[0] - t.cos()).abs() < 1e-7, "x({t}) = {}", s[0]);
        assert!((s[1] + t.sin()).abs() < 1e-7, "v({t}) = {}", s[1]);
    }
    assert_eq!(traj.times(), times.as_slice());
    assert!(stats.accepted_steps > 0);
}

#[test]
fn sample_times_are_evenly_spaced() {
    let t = sample_times(15.0, 300);
    assert_eq!(t.len(), 300);
    assert_eq!(t[0], 0.0);
    assert_eq!(t[299], 15.0);
    assert_eq!(sample_times(15.0, 1), vec![0.0]);
}

#[test]
fn step_budget_is_reported() {
    let opts = SolverOptions {
        max_steps: 3,
        ..tight()
    };
    let err = integrate(&Oscillator, &[1.0, 0.0], &[0.0, 100.0], &opts).unwrap_err();
    assert!(matches!(err, SolverError::StepBudgetExhausted { steps: 3, .. }));
}

#[test]
fn bad_inputs_are_rejected() {
    let opts = SolverOptions::default();
    assert!(matches!(
        integrate(&Oscillator, &[1.0, 0.0], &[1.0, 0.5], &opts),
        Err(SolverError::InvalidTimeGrid(_))
    ));
    assert!(matches!(
        integrate(&Oscillator, &[1.0, 0.0], &[], &opts),
        Err(SolverError::InvalidTimeGrid(_))
    ));
    assert!(matches!(
        integrate(&Oscillator, &[1.0], &[0.0, 1.0], &opts),
        Err(SolverError::DimensionMismatch { expected: 2, found: 1 })
    ));
    let negative = SolverOptions { rtol: -1.0, ..opts };
    assert!(matches!(
        integrate(&Oscillator, &[1.0, 0.0], &[0.0, 1.0], &negative),
        Err(SolverError::InvalidOptions(_))
    ));
}

// ==================================================================================
// Classifier tests
// ==================================================================================

#[test]
fn classifier_habitable() {
    let c = classify_distances(&[1.0, 1.5, 5.0, 2.5]);
    assert_eq!(c.verdict, Verdict::Habitable);
    assert_eq!(c.summary, OrbitSummary { max: 5.0, min: 1.0, mean: 2.5 });
}

#[test]
fn classifier_far_excursion_is_unstable() {
    assert_eq!(classify_distances(&[1.0, 9.0, 2.0]).verdict, Verdict::Unstable);
    assert_eq!(OrbitSummary { max: 9.0, min: 2.0, mean: 2.5 }.verdict(), Verdict::Unstable);
}

#[test]
fn classifier_stable_but_inhospitable() {
    assert_eq!(
        OrbitSummary { max: 5.0, min: 1.0, mean: 5.0 }.verdict(),
        Verdict::StableButInhospitable
    );
    assert_eq!(classify_distances(&[4.0, 4.5, 5.0]).verdict, Verdict::StableButInhospitable);
}

#[test]
fn classifier_boundaries() {
    let at = |min: f64, mean: f64| OrbitSummary { max: 5.0, min, mean }.verdict();
    assert_eq!(at(1.0, HABITABLE_MIN), Verdict::Habitable);
    assert_eq!(at(1.0, HABITABLE_MAX), Verdict::Habitable);
    assert_eq!(at(MIN_STABLE_DISTANCE, 2.0), Verdict::Unstable);
    assert_eq!(OrbitSummary { max: 8.0, min: 1.0, mean: 2.0 }.verdict(), Verdict::Unstable);
}

#[test]
fn classifier_non_finite_is_unstable() {
    assert_eq!(classify_distances(&[2.0, f64::INFINITY]).verdict, Verdict::Unstable);
    assert_eq!(classify_distances(&[2.0, f64::NAN, 2.5]).verdict, Verdict::Unstable);
    assert_eq!(classify_distances(&[]).verdict, Verdict::Unstable);
}

// ==================================================================================
// Initial conditions
// ==================================================================================

fn disk(bodies: usize, central_black_hole: bool) -> VortexParams {
    VortexParams {
        bodies,
        central_black_hole,
        ..VortexParams::default()
    }
}

#[test]
fn vortex_central_mass_is_fixed() {
    let p = disk(30, true);
    for seed in 0..50 {
        let bodies = generate_vortex(&p, &mut seeded_rng(seed));
        assert_eq!(bodies[0].x, NVec3::zeros());
        assert_eq!(bodies[0].v, NVec3::zeros());
        assert_eq!(bodies[0].m, CENTRAL_MASS_FACTOR * p.mass_mean);
    }
}

#[test]
fn vortex_is_deterministic_per_seed() {
    let p = disk(25, false);
    let a = generate_vortex(&p, &mut seeded_rng(7));
    let b = generate_vortex(&p, &mut seeded_rng(7));
    let c = generate_vortex(&p, &mut seeded_rng(8));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn vortex_disk_geometry() {
    let p = disk(60, true);
    let bodies = generate_vortex(&p, &mut seeded_rng(3));
    let masses = vortex_masses(&p);
    let mean_mass = masses.iter().sum::<f64>() / masses.len() as f64;

    assert_eq!(bodies.len(), 60);
    for b in &bodies[1..] {
        let radius = b.x.xy().norm();
        assert!(radius >= MIN_DISK_RADIUS - 1e-12 && radius <= p.disk_radius + 1e-12);
        assert!(b.x.z.abs() <= 0.2);
        assert!(b.v.z.abs() <= 0.02);
        assert_eq!(b.m, p.mass_mean);

        // tangential, counter-clockwise, circular-orbit-like speed
        assert!(b.x.xy().dot(&b.v.xy()).abs() < 1e-9);
        assert!(b.x.xy().perp(&b.v.xy()) > 0.0);
        let expected = p.velocity_factor * (mean_mass / radius).sqrt();
        assert!((b.v.xy().norm() - expected).abs() < 1e-9);
    }
}

#[test]
fn pack_unpack_preserves_bodies() {
    let p = disk(6, true);
    let bodies = generate_vortex(&p, &mut seeded_rng(11));
    let state = pack_state(&bodies);
    assert_eq!(state.len(), 36);
    assert_eq!(unpack_state(&state, &vortex_masses(&p)), bodies);
}

#[test]
fn planet_starts_on_x_axis() {
    let p = ThreeBodyParams::default();
    assert_eq!(planet_initial_state(&p), vec![p.planet_x, 0.0, 0.0, p.planet_vy]);
}

// ==================================================================================
// Validation
// ==================================================================================

#[test]
fn vortex_parameters_are_validated() {
    assert!(VortexParams::default().validate().is_ok());

    let cases = [
        VortexParams { bodies: 1, ..Default::default() },
        VortexParams { bodies: 61, ..Default::default() },
        VortexParams { t_end: 0.5, ..Default::default() },
        VortexParams { softening: 0.0, ..Default::default() },
        VortexParams { mass_mean: -1.0, ..Default::default() },
        VortexParams { disk_radius: f64::NAN, ..Default::default() },
        VortexParams { velocity_factor: 3.0, ..Default::default() },
        VortexParams { samples: 0, ..Default::default() },
        VortexParams { samples: MAX_SAMPLES + 1, ..Default::default() },
        VortexParams { samples: usize::MAX / 4, ..Default::default() },
    ];
    for p in cases {
        assert!(
            matches!(p.validate(), Err(SimError::InvalidParameter { .. })),
            "accepted {:?}",
            p
        );
    }
}

#[test]
fn three_body_parameters_are_validated() {
    assert!(ThreeBodyParams::default().validate().is_ok());

    let cases = [
        ThreeBodyParams { planet_x: 0.5, ..Default::default() },
        ThreeBodyParams { planet_vy: 0.7, ..Default::default() },
        ThreeBodyParams { t_end: 201.0, ..Default::default() },
        ThreeBodyParams { star_mass_1: 0.0, ..Default::default() },
        ThreeBodyParams { eccentricity: 1.0, ..Default::default() },
        ThreeBodyParams { samples: 0, ..Default::default() },
        ThreeBodyParams { samples: usize::MAX / 4, ..Default::default() },
    ];
    for p in cases {
        assert!(p.validate().is_err(), "accepted {:?}", p);
    }
}

#[test]
fn oversized_sample_count_is_rejected() {
    assert!(VortexParams { samples: MAX_SAMPLES, ..Default::default() }.validate().is_ok());

    let err = Scenario::vortex(
        VortexParams { samples: usize::MAX / 4, ..Default::default() },
        &PhysicalConstants::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "samples", .. }));

    let yaml = "scenario:\n  kind: three_body\n  samples: 1000000\n";
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        Scenario::build(cfg),
        Err(SimError::InvalidParameter { name: "samples", .. })
    ));
}

#[test]
fn invalid_scenario_is_rejected_before_running() {
    let err = Scenario::vortex(
        VortexParams { bodies: 1, ..Default::default() },
        &PhysicalConstants::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "bodies", .. }));
}

// ==================================================================================
// Configuration
// ==================================================================================

#[test]
fn config_parses_vortex() {
    let yaml = r#"
constants:
  gravity: strong
solver:
  rtol: 1.0e-7
scenario:
  kind: vortex
  bodies: 12
  softening: 0.2
  central_black_hole: false
"#;
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.constants.gravity, GravityStrength::Strong);
    assert_eq!(cfg.solver.rtol, 1.0e-7);
    match &cfg.scenario {
        ScenarioKind::Vortex(v) => {
            assert_eq!(v.bodies, 12);
            assert_eq!(v.softening, 0.2);
            assert!(!v.central_black_hole);
            assert_eq!(v.t_end, VortexParams::default().t_end);
        }
        other => panic!("unexpected scenario {:?}", other),
    }

    let scenario = Scenario::build(cfg).unwrap();
    assert_eq!(scenario.solver.rtol, 1.0e-7);
}

#[test]
fn config_parses_three_body_with_defaults() {
    let yaml = "scenario:\n  kind: three_body\n  planet_x: 3.0\n  animation_speed: fast\n";
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    let scenario = Scenario::build(cfg).unwrap();

    assert_eq!(scenario.animation, AnimationSpeed::Fast);
    match scenario.params {
        eventhorizon::ScenarioParams::ThreeBody(p) => {
            assert_eq!(p.planet_x, 3.0);
            assert_eq!(p.planet_vy, ThreeBodyParams::default().planet_vy);
        }
        other => panic!("unexpected params {:?}", other),
    }
}

#[test]
fn config_rejects_out_of_range_values() {
    let yaml = "scenario:\n  kind: vortex\n  softening: 0.9\n";
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    assert!(matches!(
        Scenario::build(cfg),
        Err(SimError::InvalidParameter { name: "softening", .. })
    ));
    assert!(matches!(
        ScenarioConfig::from_yaml_str("scenario:\n  kind: spiral\n"),
        Err(SimError::Config(_))
    ));
}

#[test]
fn bundled_scenarios_load() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["vortex.yaml", "three_body.yaml"] {
        let cfg = ScenarioConfig::from_path(dir.join(name)).unwrap();
        assert!(Scenario::build(cfg).is_ok(), "{name} failed to build");
    }
}

// ==================================================================================
// Engine
// ==================================================================================

#[test]
fn engine_runs_vortex() {
    let params = VortexParams {
        bodies: 5,
        t_end: 1.0,
        samples: 11,
        ..VortexParams::default()
    };
    let scenario = Scenario::vortex(params.clone(), &PhysicalConstants::default()).unwrap();
    let output = Engine::run(&scenario).unwrap();

    let expected_start = pack_state(&generate_vortex(&params, &mut seeded_rng(params.seed)));
    assert_eq!(output.trajectory.len(), 11);
    assert_eq!(output.trajectory.dimension(), 30);
    assert_eq!(output.trajectory.state(0), expected_start);
    assert_eq!(output.bodies[0].role, BodyRole::CentralMass);
    assert_eq!(output.trajectory.body_position(0, 3), NVec3::new(expected_start[9], expected_start[10], expected_start[11]));
    assert_eq!(output.trajectory.matrix().nrows(), 11);
    assert!(output.bodies[1..].iter().all(|b| b.role == BodyRole::DiskStar));
    assert!(output.classification.is_none());
    assert!(output.star_tracks.is_none());
}

#[test]
fn engine_runs_three_body() {
    let params = ThreeBodyParams::default();
    let scenario = Scenario::three_body(params.clone(), &PhysicalConstants::default()).unwrap();
    let output = Engine::run(&scenario).unwrap();

    let classification = output.classification.unwrap();
    assert_eq!(classification, classify_trajectory(&output.trajectory));
    // twice the circular speed: the planet escapes
    assert_eq!(classification.verdict, Verdict::Unstable);

    let tracks = output.star_tracks.unwrap();
    assert_eq!(tracks.nrows(), params.samples);
    assert_eq!(tracks.ncols(), 4);
    assert_eq!(output.trajectory.dimension(), 4);
    assert_eq!(output.frame_stride, AnimationSpeed::Normal.frame_stride());
    assert_eq!(output.bodies[2].role, BodyRole::Planet);
}

fn run_planet(planet_x: f64, planet_vy: f64) -> eventhorizon::SimulationOutput {
    let params = ThreeBodyParams {
        planet_x,
        planet_vy,
        t_end: 20.0,
        samples: 101,
        ..ThreeBodyParams::default()
    };
    let scenario = Scenario::three_body(params, &PhysicalConstants::default()).unwrap();
    Engine::run(&scenario).unwrap()
}

#[test]
fn engine_classifies_near_circular_orbit_as_habitable() {
    let output = run_planet(2.5, 0.15);
    let c = output.classification.unwrap();

    assert_eq!(c.verdict, Verdict::Habitable, "{c}");
    assert!(c.summary.mean > HABITABLE_MIN && c.summary.mean < HABITABLE_MAX);
    assert_eq!(c, classify_trajectory(&output.trajectory));
}

#[test]
fn engine_classifies_wide_orbit_as_inhospitable() {
    let output = run_planet(4.0, 0.118);
    let c = output.classification.unwrap();

    assert_eq!(c.verdict, Verdict::StableButInhospitable, "{c}");
    assert!(c.summary.mean > HABITABLE_MAX);
    assert!(c.summary.max < 8.0 && c.summary.min > MIN_STABLE_DISTANCE);
}

#[test]
fn animation_speed_leaves_physics_untouched() {
    let run = |speed: &str| {
        let yaml = format!(
            "scenario:\n  kind: three_body\n  planet_x: 2.5\n  planet_vy: 0.15\n  t_end: 10.0\n  samples: 51\n  animation_speed: {speed}\n"
        );
        let scenario = Scenario::build(ScenarioConfig::from_yaml_str(&yaml).unwrap()).unwrap();
        Engine::run(&scenario).unwrap()
    };
    let slow = run("slow");
    let fast = run("fast");

    assert_eq!(slow.trajectory, fast.trajectory);
    assert_eq!(slow.classification, fast.classification);
    assert_eq!(slow.stats, fast.stats);
    assert_eq!(slow.frame_stride, AnimationSpeed::Slow.frame_stride());
    assert_eq!(fast.frame_stride, AnimationSpeed::Fast.frame_stride());
}

// ==================================================================================
// Properties
// ==================================================================================

proptest! {
    #[test]
    fn prop_central_mass_at_origin_for_any_seed(seed in any::<u64>(), n in 2usize..=60) {
        let bodies = generate_vortex(&disk(n, true), &mut seeded_rng(seed));
        prop_assert_eq!(bodies.len(), n);
        prop_assert_eq!(bodies[0].x, NVec3::zeros());
        prop_assert_eq!(bodies[0].v, NVec3::zeros());
    }

    #[test]
    fn prop_equal_masses_conserve_momentum(seed in any::<u64>(), n in 2usize..=20, eps in 0.01f64..0.5) {
        let bodies = generate_vortex(&disk(n, false), &mut seeded_rng(seed));
        let eom = unit_equations(&bodies, eps);
        let deriv = derivative(&eom, &pack_state(&bodies));
        let net: NVec3 = (0..n).map(|i| accel_of(&deriv, n, i)).sum();
        prop_assert!(net.norm() < 1e-9);
    }
}
