//! Adaptive time integration
//!
//! Embedded Dormand–Prince 5(4) Runge–Kutta with error-controlled step size.
//! The solver steps freely between requested sample times and clips the last
//! step before each sample so the state is recorded exactly at that time.
//! The full trajectory is materialized before returning.
//!
//! Steps whose error estimate is not finite (the state already holds inf/NaN)
//! are accepted as-is so the values propagate instead of stalling the solver.

use log::{debug, warn};
use thiserror::Error;

use crate::simulation::equations::EquationsOfMotion;
use crate::simulation::states::Trajectory;

// Dormand–Prince 5(4) tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// 5th order minus embedded 4th order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Recoverable integration failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("step budget of {steps} steps exhausted at t = {t}")]
    StepBudgetExhausted { t: f64, steps: usize },

    #[error("step size {h:e} underflowed at t = {t}")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("state has length {found}, equations expect {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid solver options: {0}")]
    InvalidOptions(String),
}

/// Error tolerances and limits for one run
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub rtol: f64,            // relative error tolerance
    pub atol: f64,            // absolute error tolerance
    pub h0: Option<f64>,      // first step; estimated when `None`
    pub h_max: Option<f64>,   // upper bound on any step
    pub max_steps: usize,     // accepted + rejected steps allowed over the run
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            h0: None,
            h_max: None,
            max_steps: 500_000,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), SolverError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.rtol) || !positive(self.atol) {
            return Err(SolverError::InvalidOptions(format!(
                "tolerances must be finite and > 0 (rtol = {}, atol = {})",
                self.rtol, self.atol
            )));
        }
        if let Some(h) = self.h0.filter(|&h| !positive(h)) {
            return Err(SolverError::InvalidOptions(format!("h0 = {h} must be > 0")));
        }
        if let Some(h) = self.h_max.filter(|&h| !positive(h)) {
            return Err(SolverError::InvalidOptions(format!("h_max = {h} must be > 0")));
        }
        if self.max_steps == 0 {
            return Err(SolverError::InvalidOptions("max_steps must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub fn_evals: usize,
}

/// `samples` evenly spaced times over `[0, t_end]`; a single sample is `[0]`
pub fn sample_times(t_end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let dt = t_end / (samples - 1) as f64;
            let mut times: Vec<f64> = (0..samples).map(|k| k as f64 * dt).collect();
            times[samples - 1] = t_end;
            times
        }
    }
}

/// Scratch buffers for one Dormand–Prince step
struct Stages {
    k: [Vec<f64>; 7],
    tmp: Vec<f64>,
    y_new: Vec<f64>,
}

impl Stages {
    fn new(n: usize) -> Self {
        Self {
            k: std::array::from_fn(|_| vec![0.0; n]),
            tmp: vec![0.0; n],
            y_new: vec![0.0; n],
        }
    }

    /// Evaluate stages 2..7 from `k[0] = f(t, y)` and return the scaled error
    /// norm. The 5th order solution lands in `y_new`, `f(t + h, y_new)` in `k[6]`.
    fn step<E: EquationsOfMotion + ?Sized>(&mut self, eom: &E, t: f64, y: &[f64], h: f64, opts: &SolverOptions) -> f64 {
        let n = y.len();
        let [k1, k2, k3, k4, k5, k6, k7] = &mut self.k;
        let tmp = &mut self.tmp;

        for i in 0..n {
            tmp[i] = y[i] + h * A21 * k1[i];
        }
        eom.evaluate(t + C2 * h, tmp, k2);

        for i in 0..n {
            tmp[i] = y[i] + h * (A31 * k1[i] + A32 * k2[i]);
        }
        eom.evaluate(t + C3 * h, tmp, k3);

        for i in 0..n {
            tmp[i] = y[i] + h * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
        }
        eom.evaluate(t + C4 * h, tmp, k4);

        for i in 0..n {
            tmp[i] = y[i] + h * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
        }
        eom.evaluate(t + C5 * h, tmp, k5);

        for i in 0..n {
            tmp[i] = y[i] + h * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
        }
        eom.evaluate(t + h, tmp, k6);

        for i in 0..n {
            self.y_new[i] = y[i] + h * (A71 * k1[i] + A73 * k3[i] + A74 * k4[i] + A75 * k5[i] + A76 * k6[i]);
        }
        eom.evaluate(t + h, &self.y_new, k7);

        let mut acc = 0.0;
        for i in 0..n {
            let err = h * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            let scale = opts.atol + opts.rtol * y[i].abs().max(self.y_new[i].abs());
            acc += (err / scale).powi(2);
        }
        (acc / n.max(1) as f64).sqrt()
    }
}

fn scaled_norm(v: &[f64], y: &[f64], opts: &SolverOptions) -> f64 {
    let acc: f64 = v
        .iter()
        .zip(y)
        .map(|(vi, yi)| (vi / (opts.atol + opts.rtol * yi.abs())).powi(2))
        .sum();
    (acc / v.len().max(1) as f64).sqrt()
}

/// Starting step estimate from the size of the state and its derivatives
fn initial_step<E: EquationsOfMotion + ?Sized>(
    eom: &E,
    t0: f64,
    y0: &[f64],
    f0: &[f64],
    opts: &SolverOptions,
    stats: &mut SolverStats,
) -> f64 {
    let d0 = scaled_norm(y0, y0, opts);
    let d1 = scaled_norm(f0, y0, opts);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 || !d1.is_finite() {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1: Vec<f64> = y0.iter().zip(f0).map(|(y, f)| y + h0 * f).collect();
    let mut f1 = vec![0.0; y0.len()];
    eom.evaluate(t0 + h0, &y1, &mut f1);
    stats.fn_evals += 1;

    let diff: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
    let d2 = scaled_norm(&diff, y0, opts) / h0;

    let dmax = d1.max(d2);
    let h1 = if !dmax.is_finite() {
        h0
    } else if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(0.2)
    };
    (100.0 * h0).min(h1)
}

fn check_times(times: &[f64]) -> Result<(), SolverError> {
    if times.is_empty() {
        return Err(SolverError::InvalidTimeGrid("no sample times".into()));
    }
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(SolverError::InvalidTimeGrid(format!("non-finite time {t}")));
    }
    if let Some(w) = times.windows(2).find(|w| w[1] < w[0]) {
        return Err(SolverError::InvalidTimeGrid(format!(
            "times must be non-decreasing ({} follows {})",
            w[1], w[0]
        )));
    }
    Ok(())
}

/// Solve `dy/dt = eom(t, y)`, `y(times[0]) = y0`, returning the state at
/// every requested time.
///
/// Row 0 of the trajectory is exactly `y0`.
pub fn integrate<E: EquationsOfMotion + ?Sized>(
    eom: &E,
    y0: &[f64],
    times: &[f64],
    opts: &SolverOptions,
) -> Result<(Trajectory, SolverStats), SolverError> {
    opts.validate()?;
    check_times(times)?;
    let n = eom.dimension();
    if y0.len() != n {
        return Err(SolverError::DimensionMismatch { expected: n, found: y0.len() });
    }

    let mut stats = SolverStats::default();
    let mut data = Vec::with_capacity(times.len() * n);
    data.extend_from_slice(y0);

    let mut t = times[0];
    let mut y = y0.to_vec();
    let mut stages = Stages::new(n);

    let span = times[times.len() - 1] - t;
    if span > 0.0 {
        eom.evaluate(t, &y, &mut stages.k[0]);
        stats.fn_evals += 1;

        let mut h = match opts.h0 {
            Some(h0) => h0,
            None => initial_step(eom, t, &y, &stages.k[0], opts, &mut stats),
        };
        if let Some(h_max) = opts.h_max {
            h = h.min(h_max);
        }
        let mut diverged = false;

        for &t_out in &times[1..] {
            while t < t_out {
                let steps = stats.accepted_steps + stats.rejected_steps;
                if steps >= opts.max_steps {
                    return Err(SolverError::StepBudgetExhausted { t, steps });
                }

                let remaining = t_out - t;
                let mut h_try = if diverged { remaining } else { h.min(remaining) };
                if let Some(h_max) = opts.h_max {
                    h_try = h_try.min(h_max);
                }
                let last = h_try >= remaining;

                let err = stages.step(eom, t, &y, h_try, opts);
                stats.fn_evals += 6;

                if !err.is_finite() {
                    if !diverged {
                        warn!("non-finite state at t = {t:.6}; propagating without error control");
                        diverged = true;
                    }
                } else if err > 1.0 {
                    stats.rejected_steps += 1;
                    h = h_try * (SAFETY * err.powf(-0.2)).max(MIN_FACTOR);
                    let h_min = 16.0 * f64::EPSILON * t.abs().max(1.0);
                    if h < h_min {
                        return Err(SolverError::StepSizeUnderflow { t, h });
                    }
                    continue;
                }

                // accept
                stats.accepted_steps += 1;
                t = if last { t_out } else { t + h_try };
                std::mem::swap(&mut y, &mut stages.y_new);
                stages.k.swap(0, 6);

                if err.is_finite() {
                    let factor = if err == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    // a step clipped to hit a sample should not shrink the next one
                    h = if last { h.max(h_try * factor) } else { h_try * factor };
                    if let Some(h_max) = opts.h_max {
                        h = h.min(h_max);
                    }
                }
            }
            data.extend_from_slice(&y);
        }
    } else {
        // every sample sits at the initial time
        for _ in 1..times.len() {
            data.extend_from_slice(y0);
        }
    }

    debug!(
        "integrated {} samples: {} accepted, {} rejected, {} evaluations",
        times.len(),
        stats.accepted_steps,
        stats.rejected_steps,
        stats.fn_evals
    );

    Ok((Trajectory::from_rows(times.to_vec(), n, &data), stats))
}
