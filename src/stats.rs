//! Order-statistic summaries over unordered sample sets
//!
//! Nearest-rank percentiles without interpolation: for fraction `p` over `n`
//! sorted samples, the value at index `floor(p * (n - 1))` clamped into
//! range. Empty input resolves every statistic to 0 by policy, because
//! display code must render something when a year has no samples.

use serde::{Deserialize, Serialize};

/// Result of a percentile query. `values[i]` corresponds to `fractions[i]`
/// as passed to [`percentiles`].
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileSummary {
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

/// Compute nearest-rank percentiles for the requested fractions.
pub fn percentiles(samples: &[f64], fractions: &[f64]) -> PercentileSummary {
    if samples.is_empty() {
        return PercentileSummary {
            values: vec![0.0; fractions.len()],
            min: 0.0,
            max: 0.0,
        };
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = sorted.len() - 1;

    let values = fractions
        .iter()
        .map(|&p| {
            let index = ((p * last as f64).floor() as isize).clamp(0, last as isize) as usize;
            sorted[index]
        })
        .collect();

    PercentileSummary {
        values,
        min: sorted[0],
        max: sorted[last],
    }
}

/// The standard display fractions: 5th, 50th, 95th.
pub const BAND_FRACTIONS: [f64; 3] = [0.05, 0.5, 0.95];

/// 5th/50th/95th percentile bands plus extremes, the shape consumed by
/// spending charts and the legacy summary boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub p5: f64,
    pub median: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

impl Bands {
    pub fn from_samples(samples: &[f64]) -> Self {
        let summary = percentiles(samples, &BAND_FRACTIONS);
        Self {
            p5: summary.values[0],
            median: summary.values[1],
            p95: summary.values[2],
            min: summary.min,
            max: summary.max,
        }
    }
}
