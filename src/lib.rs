//! TPAW Engine - Monte Carlo retirement funding projections
//!
//! This library provides:
//! - Annuity purchase-cost and amortized-withdrawal math with path-dependent
//!   re-amortization
//! - Monte Carlo simulation of annual retirement spending with an optional
//!   total-spending cap and an LMP guaranteed-income floor
//! - Cross-path percentile aggregation for spending and legacy outcomes
//! - Real/nominal and annual/monthly display normalization
//! - CSV export of the per-path audit log

pub mod cache;
pub mod display;
pub mod error;
pub mod export;
pub mod rng;
pub mod settings;
pub mod simulation;
pub mod stats;

// Re-export commonly used types
pub use error::{EngineError, Warning};
pub use settings::SimulationSettings;
pub use simulation::{DerivedScalars, MonteCarloEngine, PathRecord, SimulationResult, YearSample};
pub use stats::Bands;
