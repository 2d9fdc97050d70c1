pub mod units;
pub mod states;
pub mod params;
pub mod forces;
pub mod kepler;
pub mod equations;
pub mod initial;
pub mod integrator;
pub mod classifier;
pub mod scenario;
pub mod engine;
