//! Exact conversion from human decimal amounts to integer base units.
//!
//! Money never touches a float here: the human string is parsed into a
//! fixed-point decimal, scaled by the asset's precision and floored. The
//! same input yields the same integer on every run.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{ClientError, Result};

/// Scale a human decimal amount to integer base units: floor(amount * 10^decimals).
///
/// # Errors
///
/// `Misconfigured` for unparseable, negative or overflowing input.
///
/// # Examples
///
/// ```
/// use zephyr_client::amount::to_base_units;
///
/// assert_eq!(to_base_units("0.01", 6).unwrap(), 10_000);
/// assert_eq!(to_base_units("1", 9).unwrap(), 1_000_000_000);
/// // Sub-precision digits are floored, not rounded.
/// assert_eq!(to_base_units("0.0000015", 6).unwrap(), 1);
/// ```
pub fn to_base_units(human: &str, decimals: u8) -> Result<u64> {
    let value = Decimal::from_str(human.trim())
        .map_err(|e| ClientError::misconfigured("amount", format!("{human:?}: {e}")))?;

    if value.is_sign_negative() {
        return Err(ClientError::misconfigured("amount", "must not be negative"));
    }

    let scale = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| ClientError::misconfigured("decimals", format!("{decimals} is out of range")))?;

    let scaled = value
        .checked_mul(Decimal::from(scale))
        .ok_or_else(|| ClientError::misconfigured("amount", "overflows the asset precision"))?
        .floor();

    scaled
        .to_u64()
        .ok_or_else(|| ClientError::misconfigured("amount", "exceeds the representable range"))
}

/// Render base units back into a human decimal string, trimming trailing
/// zeros. Display helper only; never fed back into arithmetic.
///
/// # Examples
///
/// ```
/// use zephyr_client::amount::format_base_units;
///
/// assert_eq!(format_base_units(10_000, 6), "0.01");
/// assert_eq!(format_base_units(1_500_000_000, 9), "1.5");
/// assert_eq!(format_base_units(42, 0), "42");
/// ```
pub fn format_base_units(amount: u64, decimals: u8) -> String {
    let Some(scale) = 10u64.checked_pow(u32::from(decimals)) else {
        return amount.to_string();
    };
    if decimals == 0 {
        return amount.to_string();
    }
    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = usize::from(decimals));
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_scaling() {
        assert_eq!(to_base_units("0.01", 6).unwrap(), 10_000);
        assert_eq!(to_base_units("100000", 0).unwrap(), 100_000);
        assert_eq!(to_base_units("0.000001", 6).unwrap(), 1);
        assert_eq!(to_base_units("1.5", 9).unwrap(), 1_500_000_000);
    }

    #[test]
    fn test_stable_across_repetitions() {
        // The classic float trap: 0.01 * 10^6 must be 10000 every time,
        // never 9999.
        for _ in 0..100 {
            assert_eq!(to_base_units("0.01", 6).unwrap(), 10_000);
        }
        for _ in 0..100 {
            assert_eq!(to_base_units("0.29", 2).unwrap(), 29);
        }
    }

    #[test]
    fn test_floors_sub_precision_digits() {
        assert_eq!(to_base_units("0.0199999", 2).unwrap(), 1);
        assert_eq!(to_base_units("0.009", 2).unwrap(), 0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(to_base_units("abc", 6).is_err());
        assert!(to_base_units("", 6).is_err());
        assert!(to_base_units("-0.01", 6).is_err());
        assert!(to_base_units("1", 20).is_err());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(to_base_units(" 0.01 ", 6).unwrap(), 10_000);
    }

    #[test]
    fn test_format_round_trip_display() {
        assert_eq!(format_base_units(10_000, 6), "0.01");
        assert_eq!(format_base_units(0, 6), "0");
        assert_eq!(format_base_units(1_000_000, 6), "1");
        assert_eq!(format_base_units(1_234_567, 6), "1.234567");
        assert_eq!(format_base_units(100_000, 0), "100000");
    }
}
