//! Currency rounding for binary doubles.
//!
//! Values such as 2.675 or 10.005 are stored slightly below their decimal
//! literal, so scaling by 100 and rounding lands on the lower cent. The
//! scaled value is nudged away from zero by a relative epsilon first; the
//! nudge is many orders of magnitude below half a cent for any amount this
//! crate handles, so it only moves values that sit on a representation edge.

use crate::types::Money;

/// Relative nudge applied to the scaled value before rounding.
const ROUNDING_EPSILON: f64 = 1e-12;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: Money) -> Money {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 100.0 * (1.0 + ROUNDING_EPSILON);
    let rounded = scaled.round() / 100.0;
    // -0.0 serializes as "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round2_representation_edges() {
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(1.005), 1.01);
        assert_eq!(round2(8.345), 8.35);
    }

    #[test]
    fn test_round2_ordinary_values() {
        assert_eq!(round2(333.333_333), 333.33);
        assert_eq!(round2(576.190_476_190_476), 576.19);
        assert_eq!(round2(52.381), 52.38);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_round2_half_away_from_zero_for_negatives() {
        assert_eq!(round2(-2.675), -2.68);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn test_round2_passes_through_non_finite() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }
}
