//! Annuity present value and level-payment amortization
//!
//! Pure financial math used once per run (LMP purchase cost, initial
//! withdrawal) and once per (path, year) for re-amortization.

use crate::error::EngineError;

/// Present value of a level annuity of `amount` per year for `years` periods
/// at `rate`.
///
/// A zero rate degenerates to `amount * years`. A negative term is a contract
/// violation: callers clamp the term to zero or more upstream, and silently
/// returning 0 here has historically masked configuration errors.
pub fn purchase_cost(amount: f64, rate: f64, years: i32) -> Result<f64, EngineError> {
    if years < 0 {
        return Err(EngineError::InvalidArgument {
            name: "years",
            value: years as f64,
            constraint: "annuity term must be non-negative",
        });
    }
    if rate == 0.0 {
        return Ok(amount * years as f64);
    }
    Ok(amount * (1.0 - (1.0 + rate).powi(-years)) / rate)
}

/// The level annual withdrawal that depletes `balance` to exactly
/// `legacy_target` after `years` periods compounding at `rate`.
///
/// Policy for degenerate inputs, all defined rather than raised:
/// - `years <= 0` → 0
/// - `balance <= 0` → 0, regardless of the legacy target's sign
/// - discounted legacy target consumes the whole balance → 0
pub fn amortized_withdrawal(balance: f64, rate: f64, years: i32, legacy_target: f64) -> f64 {
    if years <= 0 {
        return 0.0;
    }
    if balance <= 0.0 {
        return 0.0;
    }

    let adjusted = balance - legacy_target / (1.0 + rate).powi(years);
    if adjusted <= 0.0 {
        return 0.0;
    }

    if rate == 0.0 {
        return adjusted / years as f64;
    }

    let growth = (1.0 + rate).powi(years);
    let denominator = growth - 1.0;
    if denominator == 0.0 {
        return adjusted / years as f64;
    }
    adjusted * rate * growth / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_purchase_cost_zero_rate() {
        for years in 0..=40 {
            let cost = purchase_cost(20_000.0, 0.0, years).unwrap();
            assert_relative_eq!(cost, 20_000.0 * years as f64);
        }
    }

    #[test]
    fn test_purchase_cost_twenty_year_lmp() {
        // 20,000/yr for 20 years at 0% discount costs exactly 400,000
        let cost = purchase_cost(20_000.0, 0.0, 20).unwrap();
        assert_eq!(cost, 400_000.0);
    }

    #[test]
    fn test_purchase_cost_positive_rate() {
        // PV of 10,000/yr for 10 years at 5%: 10000 * (1 - 1.05^-10) / 0.05
        let cost = purchase_cost(10_000.0, 0.05, 10).unwrap();
        assert_relative_eq!(cost, 77_217.34928, epsilon = 1e-4);
    }

    #[test]
    fn test_purchase_cost_negative_term_fails_fast() {
        assert!(matches!(
            purchase_cost(10_000.0, 0.05, -1),
            Err(EngineError::InvalidArgument { name: "years", .. })
        ));
    }

    #[test]
    fn test_withdrawal_zero_for_nonpositive_balance() {
        for &balance in &[0.0, -1.0, -1_000_000.0] {
            assert_eq!(amortized_withdrawal(balance, 0.05, 30, 0.0), 0.0);
            assert_eq!(amortized_withdrawal(balance, 0.05, 30, 100_000.0), 0.0);
            assert_eq!(amortized_withdrawal(balance, 0.05, 30, -100_000.0), 0.0);
        }
    }

    #[test]
    fn test_withdrawal_zero_for_nonpositive_term() {
        assert_eq!(amortized_withdrawal(1_000_000.0, 0.05, 0, 0.0), 0.0);
        assert_eq!(amortized_withdrawal(1_000_000.0, 0.05, -3, 0.0), 0.0);
    }

    #[test]
    fn test_withdrawal_zero_when_legacy_consumes_balance() {
        // Legacy of 1,000,000 discounted 10 years at 0% dwarfs a 500,000 balance
        assert_eq!(amortized_withdrawal(500_000.0, 0.0, 10, 1_000_000.0), 0.0);
    }

    #[test]
    fn test_withdrawal_zero_rate() {
        // With no growth, a 300,000 balance over 30 years pays 10,000/yr
        assert_relative_eq!(amortized_withdrawal(300_000.0, 0.0, 30, 0.0), 10_000.0);
        // Holding back a 60,000 legacy reduces the amortized base
        assert_relative_eq!(amortized_withdrawal(300_000.0, 0.0, 30, 60_000.0), 8_000.0);
    }

    /// Hand-amortize forward: after `years` of withdrawing the computed level
    /// amount with growth at `rate`, the balance should land on the legacy
    /// target within floating tolerance.
    fn assert_amortizes_to_legacy(balance: f64, rate: f64, years: i32, legacy: f64) {
        let withdrawal = amortized_withdrawal(balance, rate, years, legacy);
        assert!(withdrawal > 0.0, "scenario should produce a withdrawal");

        // End-of-period payment convention, matching the PMT formula
        let mut remaining = balance;
        for _ in 0..years {
            remaining = remaining * (1.0 + rate) - withdrawal;
        }
        assert_relative_eq!(remaining, legacy, epsilon = 1e-4, max_relative = 1e-9);
    }

    #[test]
    fn test_forward_amortization_consistency() {
        assert_amortizes_to_legacy(1_000_000.0, 0.07, 30, 0.0);
        assert_amortizes_to_legacy(1_000_000.0, 0.07, 30, 250_000.0);
        assert_amortizes_to_legacy(500_000.0, 0.03, 15, 100_000.0);
        assert_amortizes_to_legacy(750_000.0, 0.0, 25, 50_000.0);
    }
}
