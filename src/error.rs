//! Error and warning taxonomy for simulation runs
//!
//! Contract violations abort a run before any path is simulated. Warnings are
//! surfaced once per run and never interrupt it.

use std::fmt;
use thiserror::Error;

/// Fatal configuration errors. These indicate inputs that slipped past the
/// caller's defaulting layer and would make simulation output meaningless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("projection horizon must be at least 1 year")]
    InvalidHorizon,

    #[error("path count must be at least 1")]
    InvalidPathCount,

    #[error("invalid argument {name}: {value} ({constraint})")]
    InvalidArgument {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },
}

/// Non-fatal conditions surfaced to the caller. Computation proceeds.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Stock and bond allocation percentages do not sum to 100.
    AllocationMismatch { stock_pct: f64, bond_pct: f64 },

    /// The LMP purchase cost exceeds the starting balance, so the risk
    /// portfolio starts negative. Withdrawal math is still defined (it
    /// floors at zero) but the plan is not fundable as configured.
    NegativeRiskStart { risk_start: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AllocationMismatch { stock_pct, bond_pct } => write!(
                f,
                "stock {}% + bond {}% does not sum to 100%",
                stock_pct, bond_pct
            ),
            Warning::NegativeRiskStart { risk_start } => write!(
                f,
                "LMP cost exceeds the starting balance; risk portfolio starts at {:.2}",
                risk_start
            ),
        }
    }
}
