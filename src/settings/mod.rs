//! Simulation input settings: the immutable record describing one run

mod data;
pub mod loader;

pub use data::{CapPeriod, DisplayOptions, SimulationSettings, SpendingCap};
