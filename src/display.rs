//! Real-dollar to display-dollar conversion
//!
//! The simulation works entirely in day-one real dollars. This module owns
//! the presentation transform: inflate to nominal when requested, divide to
//! monthly when requested. The same factor is applied to every component of
//! a year so that component sums remain additive after conversion.

use chrono::NaiveDate;
use serde::Serialize;

use crate::settings::{DisplayOptions, SimulationSettings};
use crate::simulation::{SimulationResult, YearSample};
use crate::stats::Bands;

/// Uniform conversion from real annual dollars into the configured display
/// unit. With both flags off this is the identity transform.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConversion {
    /// Decimal annual inflation rate.
    inflation: f64,
    nominal: bool,
    monthly: bool,
}

impl DisplayConversion {
    pub fn new(expected_inflation_pct: f64, options: DisplayOptions) -> Self {
        Self {
            inflation: expected_inflation_pct / 100.0,
            nominal: options.nominal,
            monthly: options.monthly,
        }
    }

    pub fn from_settings(settings: &SimulationSettings) -> Self {
        Self::new(settings.expected_inflation_pct, settings.display)
    }

    /// Multiplier applied to a real amount observed in year `t` (0-based).
    pub fn factor(&self, year_index: u32) -> f64 {
        let inflation = if self.nominal {
            (1.0 + self.inflation).powi(year_index as i32)
        } else {
            1.0
        };
        let divisor = if self.monthly { 12.0 } else { 1.0 };
        inflation / divisor
    }

    pub fn convert(&self, amount_real: f64, year_index: u32) -> f64 {
        amount_real * self.factor(year_index)
    }

    pub fn convert_sample(&self, sample: &YearSample, year_index: u32) -> YearSample {
        YearSample {
            lmp: self.convert(sample.lmp, year_index),
            risk: self.convert(sample.risk, year_index),
        }
    }

    /// Legacy outcomes are valued at the end of the horizon, so the nominal
    /// factor uses the full horizon. They are balances, not flows, so the
    /// monthly divisor does not apply; display values are floored at zero.
    pub fn convert_legacy(&self, legacy_real: f64, horizon_years: u32) -> f64 {
        let factor = if self.nominal {
            (1.0 + self.inflation).powi(horizon_years as i32)
        } else {
            1.0
        };
        (legacy_real * factor).max(0.0)
    }
}

/// Per-year total-spending bands in display units, with age labels.
#[derive(Debug, Clone, Serialize)]
pub struct SpendingSeries {
    pub labels: Vec<String>,
    pub total: Vec<Bands>,
}

/// Component view: the flat LMP series plus bands over the risk component.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSeries {
    pub labels: Vec<String>,
    pub lmp: Vec<f64>,
    pub risk: Vec<Bands>,
}

fn age_labels(result: &SimulationResult, settings: &SimulationSettings, as_of: NaiveDate) -> Vec<String> {
    let start_age = settings.start_age_on(as_of);
    (0..result.horizon_years())
        .map(|t| format!("Age {}", start_age + t as i32))
        .collect()
}

/// Total spending per year, converted and summarized for charting.
pub fn spending_series(
    result: &SimulationResult,
    settings: &SimulationSettings,
    as_of: NaiveDate,
) -> SpendingSeries {
    let conversion = DisplayConversion::from_settings(settings);
    let total = result
        .samples_by_year
        .iter()
        .enumerate()
        .map(|(t, samples)| {
            let values: Vec<f64> = samples
                .iter()
                .map(|s| conversion.convert(s.total(), t as u32))
                .collect();
            Bands::from_samples(&values)
        })
        .collect();

    SpendingSeries {
        labels: age_labels(result, settings, as_of),
        total,
    }
}

/// Funding-source view per year: the LMP payment is identical across paths,
/// so a single converted value per year suffices; bands apply to the risk
/// component only.
pub fn source_series(
    result: &SimulationResult,
    settings: &SimulationSettings,
    as_of: NaiveDate,
) -> SourceSeries {
    let conversion = DisplayConversion::from_settings(settings);
    let mut lmp = Vec::with_capacity(result.horizon_years());
    let mut risk = Vec::with_capacity(result.horizon_years());

    for (t, samples) in result.samples_by_year.iter().enumerate() {
        lmp.push(
            samples
                .first()
                .map(|s| conversion.convert(s.lmp, t as u32))
                .unwrap_or(0.0),
        );
        let values: Vec<f64> = samples
            .iter()
            .map(|s| conversion.convert(s.risk, t as u32))
            .collect();
        risk.push(Bands::from_samples(&values));
    }

    SourceSeries {
        labels: age_labels(result, settings, as_of),
        lmp,
        risk,
    }
}

/// Legacy-outcome bands in display dollars.
pub fn legacy_bands(result: &SimulationResult, settings: &SimulationSettings) -> Bands {
    let conversion = DisplayConversion::from_settings(settings);
    let horizon = result.horizon_years() as u32;
    let values: Vec<f64> = result
        .legacy_outcomes
        .iter()
        .map(|&legacy| conversion.convert_legacy(legacy, horizon))
        .collect();
    Bands::from_samples(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn options(nominal: bool, monthly: bool) -> DisplayOptions {
        DisplayOptions {
            show_sources: false,
            monthly,
            nominal,
        }
    }

    #[test]
    fn test_real_annual_is_identity() {
        let conversion = DisplayConversion::new(2.5, options(false, false));
        for t in 0..40 {
            assert_eq!(conversion.factor(t), 1.0);
        }
        assert_eq!(conversion.convert(42_000.0, 17), 42_000.0);
    }

    #[test]
    fn test_nominal_factor_compounds() {
        let conversion = DisplayConversion::new(3.0, options(true, false));
        assert_relative_eq!(conversion.factor(0), 1.0);
        assert_relative_eq!(conversion.factor(1), 1.03);
        assert_relative_eq!(conversion.factor(10), 1.03_f64.powi(10));
    }

    #[test]
    fn test_monthly_divides_by_twelve() {
        let conversion = DisplayConversion::new(2.5, options(false, true));
        assert_relative_eq!(conversion.convert(24_000.0, 5), 2_000.0);
    }

    #[test]
    fn test_component_sums_stay_additive() {
        let conversion = DisplayConversion::new(3.0, options(true, true));
        let sample = YearSample {
            lmp: 20_000.0,
            risk: 35_000.0,
        };
        let converted = conversion.convert_sample(&sample, 7);
        assert_relative_eq!(
            converted.lmp + converted.risk,
            conversion.convert(sample.total(), 7),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_legacy_uses_horizon_end_factor() {
        let conversion = DisplayConversion::new(2.0, options(true, false));
        assert_relative_eq!(
            conversion.convert_legacy(100_000.0, 30),
            100_000.0 * 1.02_f64.powi(30)
        );
        // Monthly display never divides a terminal balance
        let monthly = DisplayConversion::new(2.0, options(false, true));
        assert_eq!(monthly.convert_legacy(100_000.0, 30), 100_000.0);
    }

    #[test]
    fn test_legacy_floored_at_zero() {
        let conversion = DisplayConversion::new(2.0, options(false, false));
        assert_eq!(conversion.convert_legacy(-5_000.0, 30), 0.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let conversion = DisplayConversion::new(3.5, options(true, true));
        let original = 12_345.678;
        let converted = conversion.convert(original, 12);
        let back = converted / conversion.factor(12);
        assert_relative_eq!(back, original, max_relative = 1e-12);
    }
}
