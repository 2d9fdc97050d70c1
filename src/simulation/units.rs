//! Unit normalization
//!
//! The integrator works in dimensionless units. Two coefficients carry the
//! physics across:
//! - `K1 = G·T·M / (R²·V)` scales gravitational acceleration
//! - `K2 = V·T / R` scales velocity into position change
//!
//! Reference units default to the Alpha Centauri binary.

use serde::Deserialize;

use crate::error::{check_positive, SimResult};

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Discrete gravitational-constant choices offered to the user (SI units)
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GravityStrength {
    Weak,
    #[default]
    Newtonian,
    Strong,
    Extreme,
}

impl GravityStrength {
    pub const ALL: [GravityStrength; 4] = [
        GravityStrength::Weak,
        GravityStrength::Newtonian,
        GravityStrength::Strong,
        GravityStrength::Extreme,
    ];

    /// G in m³ kg⁻¹ s⁻²
    pub fn value(self) -> f64 {
        match self {
            GravityStrength::Weak => 1.0e-11,
            GravityStrength::Newtonian => 6.67e-11,
            GravityStrength::Strong => 1.0e-10,
            GravityStrength::Extreme => 5.0e-10,
        }
    }
}

/// Reference scales used to make the equations dimensionless (SI units)
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ReferenceUnits {
    pub mass: f64,     // kg
    pub length: f64,   // m
    pub velocity: f64, // m/s
    pub time: f64,     // s
}

impl ReferenceUnits {
    /// Sun mass, binary length scale and orbital speed of Alpha Centauri,
    /// time scaled from its 79.91 year period
    pub fn alpha_centauri() -> Self {
        Self {
            mass: 1.989e30,
            length: 5.326e12,
            velocity: 30_000.0,
            time: 79.91 * SECONDS_PER_YEAR * 0.51,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        check_positive("reference.mass", self.mass)?;
        check_positive("reference.length", self.length)?;
        check_positive("reference.velocity", self.velocity)?;
        check_positive("reference.time", self.time)?;
        Ok(())
    }
}

impl Default for ReferenceUnits {
    fn default() -> Self {
        Self::alpha_centauri()
    }
}

/// Physical inputs to normalization
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalConstants {
    pub gravity: GravityStrength,
    pub reference: ReferenceUnits,
}

/// Dimensionless force (`k1`) and velocity (`k2`) coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub k1: f64,
    pub k2: f64,
}

impl Normalization {
    /// Raw formula; inputs are assumed validated
    pub fn from_raw(g: f64, mass: f64, length: f64, velocity: f64, time: f64) -> Self {
        Self {
            k1: g * time * mass / (length * length * velocity),
            k2: velocity * time / length,
        }
    }

    pub fn new(constants: &PhysicalConstants) -> SimResult<Self> {
        constants.reference.validate()?;
        let r = &constants.reference;
        Ok(Self::from_raw(
            constants.gravity.value(),
            r.mass,
            r.length,
            r.velocity,
            r.time,
        ))
    }

    /// Plain `k1 = k2 = 1`, handy for analytic checks
    pub fn unit() -> Self {
        Self { k1: 1.0, k2: 1.0 }
    }
}
