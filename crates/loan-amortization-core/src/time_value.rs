use crate::error::AmortizationError;
use crate::types::{Money, Rate};
use crate::LoanResult;

/// Below this rate `(1 + r)^n - 1` loses most significant digits.
const SMALL_RATE: Rate = 1e-6;

/// Compounding factor (1 + rate)^nper
pub fn compound_factor(rate: Rate, nper: u32) -> f64 {
    (1.0 + rate).powi(nper as i32)
}

/// Level payment that fully amortizes `present_value` over `nper` periods.
///
/// Returned as a positive amount (the sign convention of a borrower's
/// outflow is left to the caller).
pub fn pmt(rate: Rate, nper: u32, present_value: Money) -> LoanResult<Money> {
    if nper == 0 {
        return Err(AmortizationError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate == 0.0 {
        return Ok(present_value / f64::from(nper));
    }

    let factor = compound_factor(rate, nper);
    let denominator = growth(rate, nper, factor);

    // Rate too small to register against 1.0: no interest accrues.
    if denominator == 0.0 {
        return Ok(present_value / f64::from(nper));
    }

    if !denominator.is_finite() {
        return Err(AmortizationError::InvalidInput {
            field: "periodic_rate".into(),
            reason: format!("Compounding factor overflows at rate {rate} over {nper} periods"),
        });
    }

    Ok(present_value * rate * factor / denominator)
}

/// Present value of `nper` level payments
pub fn pv(rate: Rate, nper: u32, payment: Money) -> LoanResult<Money> {
    if rate <= -1.0 {
        return Err(AmortizationError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    if rate == 0.0 {
        return Ok(payment * f64::from(nper));
    }

    let annuity_factor = -(-f64::from(nper) * rate.ln_1p()).exp_m1() / rate;
    Ok(payment * annuity_factor)
}

/// (1 + rate)^nper - 1 without cancellation for very small rates.
fn growth(rate: Rate, nper: u32, factor: f64) -> f64 {
    if rate < SMALL_RATE {
        (f64::from(nper) * rate.ln_1p()).exp_m1()
    } else {
        factor - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_factor() {
        assert!((compound_factor(0.10, 2) - 1.21).abs() < 1e-12);
        assert_eq!(compound_factor(0.05, 0), 1.0);
    }

    #[test]
    fn test_pmt_basic() {
        let result = pmt(0.10, 2, 1000.0).unwrap();
        // 1000 * 0.1 * 1.21 / 0.21 = 576.190476...
        assert!((result - 576.190_476).abs() < 1e-6);
    }

    #[test]
    fn test_pmt_zero_rate() {
        let result = pmt(0.0, 4, 1000.0).unwrap();
        assert_eq!(result, 250.0);
    }

    #[test]
    fn test_pmt_zero_periods() {
        assert!(pmt(0.05, 0, 1000.0).is_err());
    }

    #[test]
    fn test_pmt_vanishing_rate_matches_zero_rate() {
        for rate in [1e-9, 1e-15, 1e-17] {
            let result = pmt(rate, 3, 1000.0).unwrap();
            assert!((result - 1000.0 / 3.0).abs() < 1e-6, "rate {rate}: {result}");
        }
    }

    #[test]
    fn test_pmt_small_rate_path_agrees_with_closed_form() {
        // 1e-6 sits on the switch between the two growth computations
        let below = pmt(0.999_999e-6, 12, 10_000.0).unwrap();
        let above = pmt(1.000_001e-6, 12, 10_000.0).unwrap();
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_pv_of_pmt_recovers_principal() {
        let payment = pmt(0.02, 24, 15_000.0).unwrap();
        let present = pv(0.02, 24, payment).unwrap();
        assert!((present - 15_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pv_rejects_rate_below_minus_one() {
        assert!(pv(-1.0, 3, 100.0).is_err());
    }
}
