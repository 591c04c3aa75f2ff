//! Monte Carlo simulation of retirement spending paths

pub mod annuity;
mod engine;
mod path;
mod records;
mod state;

pub use engine::MonteCarloEngine;
pub use path::{PathOutput, PathSimulator};
pub use records::{PathRecord, SimulationResult, SimulationSummary, YearSample};
pub use state::{DerivedScalars, PathState};
