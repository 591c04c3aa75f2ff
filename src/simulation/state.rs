//! Run-level derived scalars and per-path mutable state

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::settings::SimulationSettings;

use super::annuity;

/// Scalars computed once per settings record, shared read-only by every path.
/// Recomputed whenever the settings change; never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedScalars {
    /// Present value of the LMP purchase.
    pub lmp_cost: f64,

    /// Risk-portfolio starting balance (start balance minus LMP cost).
    /// May be negative, which is a warning condition, not an error.
    pub risk_start: f64,

    /// Allocation-weighted expected real portfolio return, as a decimal.
    /// Used for every re-amortization in place of the stochastic draws.
    pub avg_portfolio_return: f64,

    /// Initial amortized withdrawal for year one.
    pub initial_withdrawal: f64,
}

impl DerivedScalars {
    /// Compute the run scalars from validated settings. The LMP funding
    /// duration is clamped to the horizon when pricing the purchase.
    pub fn from_settings(settings: &SimulationSettings) -> Result<Self, EngineError> {
        let funded_years = settings.lmp_years.min(settings.horizon_years) as i32;
        let lmp_cost = annuity::purchase_cost(
            settings.lmp_amount,
            settings.lmp_rate_pct / 100.0,
            funded_years,
        )?;
        let risk_start = settings.start_balance - lmp_cost;

        let avg_portfolio_return = settings.stock_pct / 100.0 * settings.stock_return_pct / 100.0
            + settings.bond_pct / 100.0 * settings.bond_return_pct / 100.0;

        let initial_withdrawal = annuity::amortized_withdrawal(
            risk_start,
            avg_portfolio_return,
            settings.horizon_years as i32,
            settings.legacy_target,
        );

        Ok(Self {
            lmp_cost,
            risk_start,
            avg_portfolio_return,
            initial_withdrawal,
        })
    }
}

/// Mutable state carried across the years of a single path. Created at path
/// start, advanced once per year, discarded after the terminal balance is
/// recorded as the path's legacy outcome.
#[derive(Debug, Clone)]
pub struct PathState {
    /// Current risk-portfolio balance in real dollars.
    pub balance: f64,

    /// The withdrawal target produced by the previous period's
    /// re-amortization (the initial withdrawal in year one).
    pub withdrawal_target: f64,
}

impl PathState {
    pub fn from_derived(derived: &DerivedScalars) -> Self {
        Self {
            balance: derived.risk_start,
            withdrawal_target: derived.initial_withdrawal,
        }
    }
}
