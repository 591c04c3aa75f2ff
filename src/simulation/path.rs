//! Single stochastic path simulation
//!
//! One iteration per year of the horizon: determine the withdrawal from the
//! previous period's amortization target, apply the spending cap and balance
//! clamp, draw sleeve returns, grow the balance, and re-amortize for the next
//! year. The terminal balance is the path's legacy outcome.

use crate::rng::ReturnSampler;
use crate::settings::SimulationSettings;

use super::annuity;
use super::records::{PathRecord, YearSample};
use super::state::{DerivedScalars, PathState};

/// Everything one path produces.
#[derive(Debug, Clone)]
pub struct PathOutput {
    /// One spending sample per year, indexed 0..horizon-1.
    pub samples: Vec<YearSample>,

    /// One audit row per year.
    pub records: Vec<PathRecord>,

    /// Terminal risk-portfolio balance, real dollars.
    pub legacy: f64,
}

/// Simulates single paths against shared read-only settings and scalars.
/// Holds no mutable state, so one instance serves every path of a run.
pub struct PathSimulator<'a> {
    settings: &'a SimulationSettings,
    derived: &'a DerivedScalars,

    /// Cap in day-one real dollars per year, when configured and positive.
    annual_cap: Option<f64>,

    /// Decimal annual inflation rate.
    inflation: f64,
}

impl<'a> PathSimulator<'a> {
    pub fn new(settings: &'a SimulationSettings, derived: &'a DerivedScalars) -> Self {
        let annual_cap = settings
            .max_total_spending
            .as_ref()
            .filter(|cap| cap.is_active())
            .map(|cap| cap.annualized());

        Self {
            settings,
            derived,
            annual_cap,
            inflation: settings.expected_inflation_pct / 100.0,
        }
    }

    /// Run one path. `sim_index` is 1-based and only used for record rows.
    pub fn simulate<R: ReturnSampler>(&self, sim_index: u32, rng: &mut R) -> PathOutput {
        let horizon = self.settings.horizon_years;
        let mut state = PathState::from_derived(self.derived);
        let mut samples = Vec::with_capacity(horizon as usize);
        let mut records = Vec::with_capacity(horizon as usize);

        for t in 0..horizon {
            let cumulative_inflation = (1.0 + self.inflation).powi(t as i32);
            let start_balance = state.balance;

            // Withdrawal target from the previous re-amortization, zeroed
            // when the portfolio is depleted and never more than is there.
            let mut uncapped = state.withdrawal_target;
            if state.balance <= 0.0 {
                uncapped = 0.0;
            }
            uncapped = uncapped.min(state.balance.max(0.0));

            // The LMP payment is contractually fixed while funded.
            let lmp_payment = if t < self.settings.lmp_years {
                self.settings.lmp_amount
            } else {
                0.0
            };

            // Total-spending cap in day-one real dollars. Only the risk
            // component gives way; the LMP payment is never reduced.
            let mut risk_withdrawal = uncapped;
            if let Some(cap) = self.annual_cap {
                let total_uncapped = lmp_payment + uncapped;
                if total_uncapped > cap {
                    risk_withdrawal = (uncapped - (total_uncapped - cap)).max(0.0);
                }
            }
            risk_withdrawal = risk_withdrawal.min(state.balance).max(0.0);

            let after_withdrawal = state.balance - risk_withdrawal;

            // Independent sleeve draws, allocation-weighted.
            let stock_return = rng.sample_normal(
                self.settings.stock_return_pct / 100.0,
                self.settings.stock_sigma_pct / 100.0,
            );
            let bond_return = rng.sample_normal(
                self.settings.bond_return_pct / 100.0,
                self.settings.bond_sigma_pct / 100.0,
            );
            let portfolio_return = self.settings.stock_pct / 100.0 * stock_return
                + self.settings.bond_pct / 100.0 * bond_return;

            // Grow, flooring at zero: depletion, never debt.
            state.balance = (after_withdrawal * (1.0 + portfolio_return)).max(0.0);

            // Re-amortize the remainder of the horizon at the long-run
            // average return, not the just-drawn stochastic one.
            let remaining_years = horizon - (t + 1);
            state.withdrawal_target = annuity::amortized_withdrawal(
                state.balance,
                self.derived.avg_portfolio_return,
                remaining_years as i32,
                self.settings.legacy_target,
            )
            .max(0.0);

            samples.push(YearSample {
                lmp: lmp_payment,
                risk: risk_withdrawal,
            });
            records.push(PathRecord {
                year: t + 1,
                sim: sim_index,
                start_balance,
                lmp_payment,
                risk_withdrawal,
                total_spending: lmp_payment + risk_withdrawal,
                end_balance: state.balance,
                cumulative_inflation,
            });
        }

        PathOutput {
            samples,
            records,
            legacy: state.balance,
        }
    }
}
