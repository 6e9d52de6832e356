//! Process-wide decimal precision.
//!
//! All coordinates, dimensions and weights are exact decimals quantized to a
//! configurable number of fractional digits. The support test compares resting
//! surfaces by strict equality of Y levels, which only works when every stored
//! value went through the same quantization.

use std::sync::atomic::{AtomicU32, Ordering};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::space::Vector3;

/// Default number of fractional digits kept on store.
pub const DEFAULT_DECIMAL_PRECISION: u32 = 3;

static DECIMAL_PRECISION: AtomicU32 = AtomicU32::new(DEFAULT_DECIMAL_PRECISION);

/// Sets the number of fractional digits used by [`quantize`].
///
/// Called once at the start of every pack run; mid-run changes would break the
/// exact-equality guarantees of the support test.
pub fn set_decimal_precision(digits: u32) {
    DECIMAL_PRECISION.store(digits, Ordering::Relaxed);
}

/// Returns the number of fractional digits currently in effect.
pub fn decimal_precision() -> u32 {
    DECIMAL_PRECISION.load(Ordering::Relaxed)
}

/// Rounds `value` to the configured precision using banker's rounding.
pub fn quantize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(decimal_precision(), RoundingStrategy::MidpointNearestEven)
}

/// Quantizes every component of a vector.
pub fn quantize_vector(v: &Vector3) -> Vector3 {
    Vector3::new(quantize(v.x), quantize(v.y), quantize(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantize_rounds_to_default_precision() {
        assert_eq!(quantize(dec!(1.23456)), dec!(1.235));
        assert_eq!(quantize(dec!(1.2)), dec!(1.2));
    }

    #[test]
    fn test_quantize_uses_bankers_rounding() {
        // Midpoints round to the even neighbour.
        assert_eq!(quantize(dec!(0.1235)), dec!(0.124));
        assert_eq!(quantize(dec!(0.1245)), dec!(0.124));
        assert_eq!(quantize(dec!(0.1255)), dec!(0.126));
    }

    #[test]
    fn test_quantize_vector() {
        let v = Vector3::new(dec!(0.12349), dec!(2), dec!(3.0004));
        let q = quantize_vector(&v);
        assert_eq!(q.x, dec!(0.123));
        assert_eq!(q.y, dec!(2));
        assert_eq!(q.z, dec!(3.000));
    }
}
