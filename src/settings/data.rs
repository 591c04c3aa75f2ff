//! Settings data structures for one simulation run
//!
//! Percent-valued fields are stored as percentages (7.0 means 7%), matching
//! the planning-form convention. `DerivedScalars` owns the single conversion
//! to decimal rates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Warning};

/// Period unit for the optional total-spending cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapPeriod {
    Annual,
    Monthly,
}

/// Maximum total annual spending, expressed in day-one real dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendingCap {
    pub value: f64,
    pub period: CapPeriod,
}

impl SpendingCap {
    /// The cap as day-one real dollars per year.
    pub fn annualized(&self) -> f64 {
        match self.period {
            CapPeriod::Annual => self.value,
            CapPeriod::Monthly => self.value * 12.0,
        }
    }

    /// A non-positive cap value means "no cap configured".
    pub fn is_active(&self) -> bool {
        self.value > 0.0
    }
}

/// Presentation flags. These never affect the simulation itself, only how
/// results are converted for display and export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Show the LMP and risk components separately instead of total spending.
    #[serde(default)]
    pub show_sources: bool,

    /// Divide annual amounts by 12 for display.
    #[serde(default)]
    pub monthly: bool,

    /// Inflate real dollars to nominal dollars for display.
    #[serde(default)]
    pub nominal: bool,
}

/// Immutable input record for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Retiree birth date, used only for age labeling.
    pub birth_date: NaiveDate,

    /// Expected annual inflation (%).
    pub expected_inflation_pct: f64,

    /// Annual LMP payment in real dollars.
    pub lmp_amount: f64,

    /// Discount rate for the LMP purchase (%).
    pub lmp_rate_pct: f64,

    /// Number of years the LMP payment is funded.
    pub lmp_years: u32,

    /// Total starting portfolio balance.
    pub start_balance: f64,

    /// Projection horizon in years.
    pub horizon_years: u32,

    /// Stock allocation of the risk portfolio (%).
    pub stock_pct: f64,

    /// Bond allocation of the risk portfolio (%).
    pub bond_pct: f64,

    /// Mean annual real stock return (%).
    pub stock_return_pct: f64,

    /// Annual stock volatility (%).
    pub stock_sigma_pct: f64,

    /// Mean annual real bond return (%).
    pub bond_return_pct: f64,

    /// Annual bond volatility (%).
    pub bond_sigma_pct: f64,

    /// Bequest target in real dollars, left standing at the end of the horizon.
    pub legacy_target: f64,

    /// Number of Monte Carlo paths.
    pub n_sims: u32,

    /// Optional maximum total annual spending.
    pub max_total_spending: Option<SpendingCap>,

    /// Display flags (excluded from the financial identity of a run).
    pub display: DisplayOptions,
}

fn default_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1960, 1, 1).expect("valid literal date")
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            birth_date: default_birth_date(),
            expected_inflation_pct: 2.5,
            lmp_amount: 0.0,
            lmp_rate_pct: 0.0,
            lmp_years: 30,
            start_balance: 0.0,
            horizon_years: 30,
            stock_pct: 60.0,
            bond_pct: 40.0,
            stock_return_pct: 7.0,
            stock_sigma_pct: 15.0,
            bond_return_pct: 2.5,
            bond_sigma_pct: 5.0,
            legacy_target: 0.0,
            n_sims: 1000,
            max_total_spending: None,
            display: DisplayOptions::default(),
        }
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidArgument {
            name,
            value,
            constraint: "must be a finite number",
        })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), EngineError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidArgument {
            name,
            value,
            constraint: "must be non-negative",
        })
    }
}

impl SimulationSettings {
    /// Check programming-contract invariants. Called by the engine before any
    /// path is simulated; a settings record that fails here must not be run.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.horizon_years == 0 {
            return Err(EngineError::InvalidHorizon);
        }
        if self.n_sims == 0 {
            return Err(EngineError::InvalidPathCount);
        }

        require_finite("expected_inflation_pct", self.expected_inflation_pct)?;
        require_finite("lmp_amount", self.lmp_amount)?;
        require_finite("lmp_rate_pct", self.lmp_rate_pct)?;
        require_finite("start_balance", self.start_balance)?;
        require_non_negative("stock_pct", self.stock_pct)?;
        require_non_negative("bond_pct", self.bond_pct)?;
        require_finite("stock_return_pct", self.stock_return_pct)?;
        require_non_negative("stock_sigma_pct", self.stock_sigma_pct)?;
        require_finite("bond_return_pct", self.bond_return_pct)?;
        require_non_negative("bond_sigma_pct", self.bond_sigma_pct)?;
        require_finite("legacy_target", self.legacy_target)?;
        if let Some(cap) = &self.max_total_spending {
            require_finite("max_total_spending.value", cap.value)?;
        }

        Ok(())
    }

    /// Non-fatal configuration warnings visible from the settings alone.
    /// The negative-risk-start warning needs the derived scalars and is
    /// raised by the engine.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if (self.stock_pct + self.bond_pct - 100.0).abs() > 0.1 {
            warnings.push(Warning::AllocationMismatch {
                stock_pct: self.stock_pct,
                bond_pct: self.bond_pct,
            });
        }
        warnings
    }

    /// Retiree age at the start of the projection, by calendar-year difference.
    pub fn start_age_on(&self, as_of: NaiveDate) -> i32 {
        as_of.year() - self.birth_date.year()
    }

    /// Whether two settings records describe the same simulation, ignoring
    /// display flags. Used to decide when a cached result can be reused.
    pub fn same_financials(&self, other: &Self) -> bool {
        let a = Self {
            display: DisplayOptions::default(),
            ..self.clone()
        };
        let b = Self {
            display: DisplayOptions::default(),
            ..other.clone()
        };
        a == b
    }
}
