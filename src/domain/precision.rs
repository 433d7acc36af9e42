//! Decimal-place precision shared by securities and the market index.

use log::warn;

pub const DEFAULT_PRECISION: u32 = 2;

/// Beyond this many places an f64 carries no further decimal information.
const MAX_MEANINGFUL_PLACES: u32 = 15;

/// 2^52: at or above this magnitude every f64 is already an integer.
const INTEGRAL_THRESHOLD: f64 = 4_503_599_627_370_496.0;

/// Number of decimal places computed results are rounded to. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    pub fn new(places: u32) -> Self {
        Precision(places)
    }

    /// Build from a possibly negative request, clamping to zero.
    pub fn clamped(places: i64) -> Self {
        if places < 0 {
            warn!("Minimum precision amount is 0.");
            Precision(0)
        } else {
            Precision(u32::try_from(places).unwrap_or(u32::MAX))
        }
    }

    pub fn places(&self) -> u32 {
        self.0
    }

    /// Round half away from zero to this many decimal places.
    pub fn round(&self, value: f64) -> f64 {
        if !value.is_finite() || self.0 > MAX_MEANINGFUL_PLACES {
            return value;
        }
        let factor = 10f64.powi(self.0 as i32);
        let scaled = value * factor;
        if !scaled.is_finite() || scaled.abs() >= INTEGRAL_THRESHOLD {
            return value;
        }
        scaled.round() / factor
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision(DEFAULT_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_two_places() {
        assert_eq!(Precision::default().places(), 2);
    }

    #[test]
    fn negative_request_clamps_to_zero() {
        assert_eq!(Precision::clamped(-3).places(), 0);
        assert_eq!(Precision::clamped(4).places(), 4);
    }

    #[test]
    fn rounds_to_places() {
        let p = Precision::new(2);
        assert_eq!(p.round(10.0 / 23.0), 0.43);
        assert_eq!(p.round(10.0 / 13.0), 0.77);
        assert_eq!(p.round(1.25), 1.25);
    }

    #[test]
    fn zero_places_rounds_to_integer() {
        assert_eq!(Precision::new(0).round(2.6), 3.0);
        assert_eq!(Precision::new(0).round(2.4), 2.0);
    }

    #[test]
    fn non_finite_values_pass_through() {
        assert!(Precision::new(2).round(f64::NAN).is_nan());
        assert_eq!(Precision::new(2).round(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn huge_values_pass_through() {
        assert_eq!(Precision::new(10).round(1e300), 1e300);
        assert_eq!(Precision::new(2).round(-1e300), -1e300);
        assert_eq!(Precision::new(2).round(1e17), 1e17);
    }

    #[test]
    fn huge_precision_leaves_value_unchanged() {
        let v = 1.0 / 3.0;
        assert_eq!(Precision::new(400).round(v), v);
    }

    proptest! {
        #[test]
        fn rounded_output_has_at_most_requested_places(
            value in 0.0f64..10_000.0,
            places in 0u32..5,
        ) {
            let rounded = Precision::new(places).round(value);
            let scaled = rounded * 10f64.powi(places as i32);
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }

        #[test]
        fn rounding_is_idempotent(value in -1_000.0f64..1_000.0, places in 0u32..8) {
            let p = Precision::new(places);
            let once = p.round(value);
            prop_assert_eq!(p.round(once), once);
        }
    }
}
