//! Three-decimal rounding policy for derived scores.
//!
//! Every derived quantity (totals, averages) is rounded once, as the last
//! step, to three decimal places. Intermediate sums are never rounded, so
//! accumulated float noise cannot leak into a published score.

/// Round to three decimal places, half away from zero.
///
/// Implemented as `round(x * 1000) / 1000`; `f64::round` rounds half-way
/// cases away from zero, which is the regulation behaviour for scores.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fixed three-decimal rendering for scoreboards: `9.233`, `11.900`.
pub fn format_score3(value: f64) -> String {
    format!("{:.3}", round3(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_decimal_fixtures() {
        // 0.1 + 0.2 is 0.30000000000000004 in binary; round3 must recover 0.3.
        assert_eq!(round3(0.1 + 0.2), 0.3);
        assert_eq!(round3(11.899999999999999), 11.9);
        assert_eq!(round3(9.233333333333333), 9.233);
    }

    #[test]
    fn already_rounded_values_pass_through() {
        assert_eq!(round3(0.0), 0.0);
        assert_eq!(round3(4.0), 4.0);
        assert_eq!(round3(9.233), 9.233);
    }

    #[test]
    fn rounds_to_the_nearest_thousandth() {
        // Halfway fixtures like 1.0005 are not exact in binary, so only
        // clearly-above/clearly-below values are asserted here.
        assert_eq!(round3(1.00051), 1.001);
        assert_eq!(round3(1.00049), 1.0);
        assert_eq!(round3(9.2336), 9.234);
        assert_eq!(round3(9.2334), 9.233);
    }

    #[test]
    fn formatting_pads_to_three_decimals() {
        assert_eq!(format_score3(11.9), "11.900");
        assert_eq!(format_score3(9.2333333), "9.233");
        assert_eq!(format_score3(0.0), "0.000");
    }
}
