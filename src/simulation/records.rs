//! Output records for a Monte Carlo run

use serde::{Deserialize, Serialize};

use crate::error::Warning;
use crate::stats::Bands;

use super::state::DerivedScalars;

/// One (path, year) spending observation, in day-one real dollars.
///
/// Accumulated into a per-year unordered sample set for cross-path
/// percentile computation; insertion order is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSample {
    /// Guaranteed-income contribution.
    pub lmp: f64,

    /// Realized risk-portfolio withdrawal.
    pub risk: f64,
}

impl YearSample {
    pub fn total(&self) -> f64 {
        self.lmp + self.risk
    }
}

/// One audit-log row per (path, year). Dollar fields are real dollars; the
/// export layer converts to nominal by multiplying by `cumulative_inflation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Projection year, 1-based.
    pub year: u32,

    /// Path index, 1-based.
    pub sim: u32,

    pub start_balance: f64,
    pub lmp_payment: f64,
    pub risk_withdrawal: f64,
    pub total_spending: f64,
    pub end_balance: f64,

    /// Inflation factor from day one to this year.
    pub cumulative_inflation: f64,
}

/// Complete result of one Monte Carlo run. Owned by the caller; replaced
/// wholesale on the next run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Scalars the run was derived from, for summary display.
    pub derived: DerivedScalars,

    /// Per-year unordered sample sets, indexed 0..horizon-1.
    pub samples_by_year: Vec<Vec<YearSample>>,

    /// Flat audit log, ordered path-major: all years of path 1, then path 2.
    pub records: Vec<PathRecord>,

    /// Terminal risk-portfolio balance per path, real dollars.
    pub legacy_outcomes: Vec<f64>,

    /// Non-fatal conditions observed for this run.
    pub warnings: Vec<Warning>,
}

impl SimulationResult {
    pub fn new(derived: DerivedScalars, horizon_years: usize) -> Self {
        Self {
            derived,
            samples_by_year: vec![Vec::new(); horizon_years],
            records: Vec::new(),
            legacy_outcomes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn horizon_years(&self) -> usize {
        self.samples_by_year.len()
    }

    /// Number of completed paths in this result.
    pub fn paths(&self) -> usize {
        self.legacy_outcomes.len()
    }

    /// Summary statistics for display, in real dollars.
    pub fn summary(&self) -> SimulationSummary {
        let depleted_paths = self
            .legacy_outcomes
            .iter()
            .filter(|&&legacy| legacy <= 0.0)
            .count();

        SimulationSummary {
            paths: self.paths(),
            horizon_years: self.horizon_years(),
            lmp_cost: self.derived.lmp_cost,
            risk_start: self.derived.risk_start,
            initial_withdrawal: self.derived.initial_withdrawal,
            legacy: Bands::from_samples(&self.legacy_outcomes),
            depleted_paths,
        }
    }
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub paths: usize,
    pub horizon_years: usize,
    pub lmp_cost: f64,
    pub risk_start: f64,
    pub initial_withdrawal: f64,

    /// Legacy-outcome bands in real dollars.
    pub legacy: Bands,

    /// Paths ending with a fully depleted risk portfolio.
    pub depleted_paths: usize,
}
