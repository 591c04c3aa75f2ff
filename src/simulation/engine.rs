//! Monte Carlo orchestration across independent paths
//!
//! Paths share nothing mutable: each one sees the same read-only derived
//! scalars and consumes its own random draws. The engine aggregates per-year
//! sample sets for percentile charting and a flat path-major record log for
//! export.

use log::warn;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{EngineError, Warning};
use crate::rng::SeededSampler;
use crate::settings::SimulationSettings;

use super::path::{PathOutput, PathSimulator};
use super::records::SimulationResult;
use super::state::DerivedScalars;

/// Runs `n_sims` independent path simulations from one settings record.
/// Holds no state between runs; each invocation is pure given a seed.
pub struct MonteCarloEngine {
    settings: SimulationSettings,
    derived: DerivedScalars,
}

impl MonteCarloEngine {
    /// Validate the settings and compute the run scalars. Contract
    /// violations abort here, before any path is simulated.
    pub fn new(settings: SimulationSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        let derived = DerivedScalars::from_settings(&settings)?;
        Ok(Self { settings, derived })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn derived(&self) -> &DerivedScalars {
        &self.derived
    }

    /// Sequential reference run. A single stream feeds the paths in order,
    /// producing the canonical path-major record layout.
    pub fn run(&self, seed: u64) -> SimulationResult {
        let simulator = PathSimulator::new(&self.settings, &self.derived);
        let mut rng = SeededSampler::from_seed(seed);
        let mut result = self.empty_result();

        for i in 0..self.settings.n_sims {
            let path = simulator.simulate(i + 1, &mut rng);
            merge_path(&mut result, path);
        }
        result
    }

    /// Map-then-reduce parallel run on the rayon pool. Each path derives its
    /// own stream from the base seed, so no RNG state is shared; the ordered
    /// collect keeps the record log path-major exactly as the sequential run
    /// lays it out.
    pub fn run_parallel(&self, seed: u64) -> SimulationResult {
        let simulator = PathSimulator::new(&self.settings, &self.derived);

        let outputs: Vec<PathOutput> = (0..self.settings.n_sims)
            .into_par_iter()
            .map(|i| {
                let mut rng = SeededSampler::for_path(seed, i);
                simulator.simulate(i + 1, &mut rng)
            })
            .collect();

        let mut result = self.empty_result();
        for path in outputs {
            merge_path(&mut result, path);
        }
        result
    }

    /// Sequential run with best-effort early termination. The stop flag is
    /// checked between paths only, so completed paths are returned intact
    /// and no partially simulated path leaks into the result.
    pub fn run_with_cancel(&self, seed: u64, stop: &AtomicBool) -> SimulationResult {
        let simulator = PathSimulator::new(&self.settings, &self.derived);
        let mut rng = SeededSampler::from_seed(seed);
        let mut result = self.empty_result();

        for i in 0..self.settings.n_sims {
            if stop.load(Ordering::Relaxed) {
                warn!(
                    "run cancelled after {} of {} paths",
                    i, self.settings.n_sims
                );
                break;
            }
            let path = simulator.simulate(i + 1, &mut rng);
            merge_path(&mut result, path);
        }
        result
    }

    fn empty_result(&self) -> SimulationResult {
        let mut result =
            SimulationResult::new(self.derived, self.settings.horizon_years as usize);

        result.warnings = self.settings.warnings();
        if self.derived.risk_start < 0.0 {
            result.warnings.push(Warning::NegativeRiskStart {
                risk_start: self.derived.risk_start,
            });
        }
        for warning in &result.warnings {
            warn!("{}", warning);
        }
        result
    }
}

fn merge_path(result: &mut SimulationResult, path: PathOutput) {
    for (t, sample) in path.samples.into_iter().enumerate() {
        result.samples_by_year[t].push(sample);
    }
    result.records.extend(path.records);
    result.legacy_outcomes.push(path.legacy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::annuity;
    use approx::assert_relative_eq;

    fn all_stock_settings() -> SimulationSettings {
        SimulationSettings {
            lmp_amount: 0.0,
            lmp_years: 0,
            start_balance: 1_000_000.0,
            horizon_years: 30,
            stock_pct: 100.0,
            bond_pct: 0.0,
            stock_return_pct: 7.0,
            stock_sigma_pct: 0.0,
            bond_return_pct: 0.0,
            bond_sigma_pct: 0.0,
            legacy_target: 0.0,
            n_sims: 1,
            max_total_spending: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_volatility_run_is_deterministic() {
        // 100% stock at 7% with zero sigma: the initial withdrawal is the
        // standard 30-year level amortization of 1,000,000 at 7%, and the
        // year-1 end balance is (1,000,000 - W0) * 1.07 exactly.
        let engine = MonteCarloEngine::new(all_stock_settings()).unwrap();
        let result = engine.run(42);

        let w0 = annuity::amortized_withdrawal(1_000_000.0, 0.07, 30, 0.0);
        assert_relative_eq!(engine.derived().initial_withdrawal, w0);
        assert_relative_eq!(result.records[0].risk_withdrawal, w0);
        assert_relative_eq!(
            result.records[0].end_balance,
            (1_000_000.0 - w0) * 1.07,
            max_relative = 1e-12
        );

        // Identical seeds (in fact any seed, with zero sigma) reproduce the run
        let again = engine.run(7);
        assert_eq!(result.records, again.records);
    }

    #[test]
    fn test_record_log_is_path_major() {
        let settings = SimulationSettings {
            n_sims: 4,
            horizon_years: 5,
            start_balance: 500_000.0,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();
        let result = engine.run(1);

        assert_eq!(result.records.len(), 4 * 5);
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.sim, (i / 5) as u32 + 1);
            assert_eq!(record.year, (i % 5) as u32 + 1);
        }
        assert_eq!(result.samples_by_year.len(), 5);
        for year in &result.samples_by_year {
            assert_eq!(year.len(), 4);
        }
        assert_eq!(result.legacy_outcomes.len(), 4);
    }

    #[test]
    fn test_balances_never_negative() {
        // Statistical non-negativity invariant across a large stochastic run
        let settings = SimulationSettings {
            n_sims: 10_000,
            horizon_years: 30,
            start_balance: 800_000.0,
            stock_pct: 60.0,
            bond_pct: 40.0,
            stock_sigma_pct: 15.0,
            bond_return_pct: 2.5,
            bond_sigma_pct: 5.0,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();
        let result = engine.run(2024);

        for record in &result.records {
            assert!(record.end_balance >= 0.0);
            assert!(record.risk_withdrawal >= 0.0);
        }
        for &legacy in &result.legacy_outcomes {
            assert!(legacy >= 0.0);
        }
    }

    #[test]
    fn test_parallel_run_matches_layout() {
        let settings = SimulationSettings {
            n_sims: 8,
            horizon_years: 10,
            start_balance: 600_000.0,
            stock_sigma_pct: 15.0,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();
        let result = engine.run_parallel(99);

        assert_eq!(result.records.len(), 8 * 10);
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.sim, (i / 10) as u32 + 1);
        }

        // Same seed reproduces the parallel run draw-for-draw
        let again = engine.run_parallel(99);
        assert_eq!(result.records, again.records);
    }

    #[test]
    fn test_negative_risk_start_warns_but_runs() {
        let settings = SimulationSettings {
            lmp_amount: 40_000.0,
            lmp_years: 30,
            horizon_years: 30,
            start_balance: 1_000_000.0, // LMP cost 1,200,000 at 0%
            n_sims: 10,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();
        assert!(engine.derived().risk_start < 0.0);

        let result = engine.run(5);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::NegativeRiskStart { .. })));
        assert_eq!(result.paths(), 10);
    }

    #[test]
    fn test_cancel_between_paths() {
        let settings = SimulationSettings {
            n_sims: 50,
            horizon_years: 5,
            start_balance: 100_000.0,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();

        // Flag raised before the run starts: nothing is simulated,
        // and the result structure is still well formed.
        let stop = AtomicBool::new(true);
        let result = engine.run_with_cancel(3, &stop);
        assert_eq!(result.paths(), 0);
        assert_eq!(result.samples_by_year.len(), 5);

        // Flag never raised: full run
        let stop = AtomicBool::new(false);
        let result = engine.run_with_cancel(3, &stop);
        assert_eq!(result.paths(), 50);
    }

    #[test]
    fn test_invalid_settings_abort_before_simulation() {
        let settings = SimulationSettings {
            horizon_years: 0,
            ..all_stock_settings()
        };
        assert!(MonteCarloEngine::new(settings).is_err());
    }

    #[test]
    fn test_summary_reports_derived_scalars() {
        let settings = SimulationSettings {
            lmp_amount: 20_000.0,
            lmp_years: 20,
            lmp_rate_pct: 0.0,
            n_sims: 100,
            ..all_stock_settings()
        };
        let engine = MonteCarloEngine::new(settings).unwrap();
        let result = engine.run(11);
        let summary = result.summary();

        assert_eq!(summary.lmp_cost, 400_000.0);
        assert_eq!(summary.risk_start, 600_000.0);
        assert_eq!(summary.paths, 100);
        assert_eq!(summary.horizon_years, 30);
    }
}
