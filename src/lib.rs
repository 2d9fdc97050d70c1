pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body3, BodyMeta, BodyRole, NVec2, NVec3, Trajectory};
pub use simulation::units::{GravityStrength, Normalization, PhysicalConstants, ReferenceUnits};
pub use simulation::forces::{AccelSet, Acceleration, SoftenedGravity};
pub use simulation::kepler::BinaryOrbit;
pub use simulation::equations::{EquationsOfMotion, NBodyEquations, RestrictedThreeBody};
pub use simulation::initial::{generate_vortex, planet_initial_state, seeded_rng};
pub use simulation::integrator::{integrate, sample_times, SolverError, SolverOptions, SolverStats};
pub use simulation::classifier::{classify_distances, Classification, OrbitSummary, Verdict};
pub use simulation::params::{ThreeBodyParams, VortexParams};
pub use simulation::scenario::{Scenario, ScenarioParams};
pub use simulation::engine::{Engine, SimulationOutput};

pub use configuration::config::{AnimationSpeed, ScenarioConfig, ScenarioKind};

pub use benchmark::benchmark::{bench_derivative, bench_integration};
