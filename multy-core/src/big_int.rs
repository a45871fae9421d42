//! Arbitrary-precision integer for monetary amounts
//!
//! [`BigInt`] wraps `num_bigint::BigInt` and bounds its magnitude to
//! `2^256 - 1`, the widest native amount of any supported chain (an Ethereum
//! `uint256`). Every arithmetic operation is checked against that bound and
//! returns a new value; nothing wraps, saturates or truncates.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ethers_core::types::U256;
use num_bigint::{BigInt as Inner, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Number of bits a [`BigInt`] magnitude may occupy.
pub const MAX_BITS: u64 = 256;

static MAX_MAGNITUDE: LazyLock<Inner> = LazyLock::new(|| (Inner::from(1u8) << MAX_BITS) - 1u8);

/// Signed, overflow-checked integer used for all amounts
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigInt(Inner);

impl BigInt {
    /// The value zero
    pub fn zero() -> Self {
        Self(Inner::zero())
    }

    /// The largest representable value, `2^256 - 1`
    pub fn max_value() -> Self {
        Self(MAX_MAGNITUDE.clone())
    }

    fn bounded(value: Inner, operation: &'static str) -> Result<Self> {
        if value.abs() > *MAX_MAGNITUDE {
            return Err(Error::ArithmeticOverflow { operation });
        }
        Ok(Self(value))
    }

    /// Scale a non-negative decimal `value` by `multiplier`
    ///
    /// The value is converted through its shortest round-trip decimal form, so
    /// `0.1 * 100_000_000` is exactly `10_000_000`. The result must be a whole
    /// number within `0..=u64::MAX`, otherwise [`Error::OutOfRange`] is returned.
    pub fn from_scaled(value: f64, multiplier: u64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::out_of_range(value, "value is not a finite number"));
        }
        if value < 0.0 {
            return Err(Error::out_of_range(value, "value is too low"));
        }

        let text = value.to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let numerator = Inner::from_str(&format!("{}{}", int_part, frac_part))
            .map_err(|e| Error::InvalidAmount(format!("{}: {}", text, e)))?;
        let denominator = Inner::from(10u8).pow(frac_part.len() as u32);

        let scaled = numerator * multiplier;
        if !(&scaled % &denominator).is_zero() {
            return Err(Error::out_of_range(
                value,
                "value is more precise than the smallest unit",
            ));
        }

        let result = scaled / denominator;
        if result > Inner::from(u64::MAX) {
            return Err(Error::out_of_range(value, "value is too high"));
        }

        Ok(Self(result))
    }

    /// Parse a fixed-point decimal string into an integer count of `10^-decimals` units
    ///
    /// Fractional digits beyond `decimals` are accepted only when they are zeros.
    pub fn from_decimal_str(text: &str, decimals: u32) -> Result<Self> {
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !is_digits(int_part) || !is_digits(frac_part) {
            return Err(Error::InvalidAmount(format!("Not a decimal number: {:?}", text)));
        }

        let decimals = decimals as usize;
        let frac_part = if frac_part.len() > decimals {
            let (kept, excess) = frac_part.split_at(decimals);
            if excess.bytes().any(|b| b != b'0') {
                return Err(Error::out_of_range(
                    text,
                    format!("more than {} decimal places", decimals),
                ));
            }
            kept
        } else {
            frac_part
        };

        let digits = format!("{}{:0<width$}", int_part, frac_part, width = decimals);
        let magnitude = if digits.is_empty() {
            Inner::zero()
        } else {
            Inner::from_str(&digits).map_err(|e| Error::InvalidAmount(format!("{}: {}", text, e)))?
        };

        Self::bounded(if negative { -magnitude } else { magnitude }, "decimal parsing")
    }

    /// Render as a fixed-point decimal string with trailing zeros removed
    pub fn to_decimal_string(&self, decimals: u32) -> String {
        let decimals = decimals as usize;
        let padded = format!("{:0>width$}", self.0.magnitude().to_string(), width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');

        let sign = if self.is_negative() { "-" } else { "" };
        if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Self::bounded(&self.0 + &other.0, "addition")
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Self::bounded(&self.0 - &other.0, "subtraction")
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        Self::bounded(&self.0 * &other.0, "multiplication")
    }

    /// Division truncating toward zero
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Self::bounded(&self.0 / &other.0, "division")
    }

    /// Remainder with the sign of the dividend
    pub fn checked_rem(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Self::bounded(&self.0 % &other.0, "remainder")
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Convert to `u64`, failing for negative or too large values
    pub fn to_u64(&self) -> Result<u64> {
        self.0
            .to_u64()
            .ok_or_else(|| Error::out_of_range(self, "does not fit into an unsigned 64-bit integer"))
    }

    /// Convert to an Ethereum `U256`
    pub fn to_u256(&self) -> Result<U256> {
        if self.is_negative() {
            return Err(Error::out_of_range(self, "negative values have no uint256 form"));
        }
        Ok(U256::from_big_endian(&self.0.magnitude().to_bytes_be()))
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigInt {
                fn from(value: $t) -> Self {
                    Self(Inner::from(value))
                }
            }
        )*
    };
}

impl_from_primitive!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<U256> for BigInt {
    fn from(value: U256) -> Self {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        Self(Inner::from_bytes_be(Sign::Plus, &bytes))
    }
}

impl FromStr for BigInt {
    type Err = Error;

    /// Parse a base-10 integer with an optional leading `-`
    fn from_str(s: &str) -> Result<Self> {
        if s.contains('.') {
            return Err(Error::InvalidAmount(format!("Not an integer: {:?}", s)));
        }
        Self::from_decimal_str(s, 0)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({})", self.0)
    }
}

impl Serialize for BigInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BigInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_integer() {
        assert_eq!(BigInt::from(0u64), BigInt::zero());
        assert_eq!(BigInt::from(-5i32).to_string(), "-5");
        assert_eq!(BigInt::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_from_scaled() {
        assert_eq!(BigInt::from_scaled(1.0, 100_000_000).unwrap(), BigInt::from(100_000_000u64));
        assert_eq!(BigInt::from_scaled(0.1, 100_000_000).unwrap(), BigInt::from(10_000_000u64));
        assert_eq!(BigInt::from_scaled(0.29, 100_000_000).unwrap(), BigInt::from(29_000_000u64));
        assert_eq!(BigInt::from_scaled(-0.0, 10).unwrap(), BigInt::zero());
    }

    #[test]
    fn test_from_scaled_rejects_out_of_range() {
        let low = BigInt::from_scaled(-1.0, 100_000_000).unwrap_err();
        assert_eq!(
            low,
            Error::OutOfRange { value: "-1".to_string(), reason: "value is too low".to_string() }
        );

        let high = BigInt::from_scaled(20.0, 1_000_000_000_000_000_000).unwrap_err();
        assert!(matches!(high, Error::OutOfRange { ref reason, .. } if reason == "value is too high"));

        assert!(matches!(BigInt::from_scaled(f64::NAN, 1), Err(Error::OutOfRange { .. })));
        assert!(matches!(BigInt::from_scaled(f64::INFINITY, 1), Err(Error::OutOfRange { .. })));
        assert!(matches!(BigInt::from_scaled(0.5, 1), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = BigInt::from(7u32);
        let b = BigInt::from(3u32);
        assert_eq!(a.checked_add(&b).unwrap(), BigInt::from(10u32));
        assert_eq!(b.checked_sub(&a).unwrap(), BigInt::from(-4i32));
        assert_eq!(a.checked_mul(&b).unwrap(), BigInt::from(21u32));
        assert_eq!(a.checked_div(&b).unwrap(), BigInt::from(2u32));
        assert_eq!(a.checked_rem(&b).unwrap(), BigInt::from(1u32));
        assert!(b < a);
    }

    #[test]
    fn test_beyond_u64_is_exact() {
        let max = BigInt::from(u64::MAX);
        let sum = max.checked_add(&BigInt::from(1u8)).unwrap();
        assert_eq!(sum.to_string(), "18446744073709551616");
        assert!(sum.to_u64().is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let max = BigInt::max_value();
        assert_eq!(
            max.checked_add(&BigInt::from(1u8)).unwrap_err(),
            Error::ArithmeticOverflow { operation: "addition" }
        );
        assert!(max.checked_mul(&BigInt::from(2u8)).is_err());
        let min = BigInt::zero().checked_sub(&max).unwrap();
        assert!(min.checked_sub(&BigInt::from(1u8)).is_err());
    }

    #[test]
    fn test_division_by_zero() {
        let a = BigInt::from(1u8);
        assert_eq!(a.checked_div(&BigInt::zero()).unwrap_err(), Error::DivisionByZero);
        assert_eq!(a.checked_rem(&BigInt::zero()).unwrap_err(), Error::DivisionByZero);
    }

    #[test]
    fn test_decimal_strings() {
        let value = BigInt::from_decimal_str("1.5", 8).unwrap();
        assert_eq!(value, BigInt::from(150_000_000u64));
        assert_eq!(value.to_decimal_string(8), "1.5");
        assert_eq!(BigInt::from_decimal_str(".25", 2).unwrap(), BigInt::from(25u8));
        assert_eq!(BigInt::from_decimal_str("2.500", 2).unwrap(), BigInt::from(250u32));
        assert_eq!(BigInt::from(-1i8).to_decimal_string(3), "-0.001");
        assert_eq!(BigInt::zero().to_decimal_string(18), "0");
    }

    #[test]
    fn test_decimal_strings_reject_garbage() {
        assert!(matches!(BigInt::from_decimal_str("", 8), Err(Error::InvalidAmount(_))));
        assert!(matches!(BigInt::from_decimal_str(".", 8), Err(Error::InvalidAmount(_))));
        assert!(matches!(BigInt::from_decimal_str("1e5", 8), Err(Error::InvalidAmount(_))));
        assert!(matches!(BigInt::from_decimal_str("1.2.3", 8), Err(Error::InvalidAmount(_))));
        assert!(matches!(BigInt::from_decimal_str("0.001", 2), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("-42".parse::<BigInt>().unwrap(), BigInt::from(-42i64));
        assert!("4.2".parse::<BigInt>().is_err());
        let too_big = format!("1{}", "0".repeat(80));
        assert!(matches!(too_big.parse::<BigInt>(), Err(Error::ArithmeticOverflow { .. })));
    }

    #[test]
    fn test_u256_conversion() {
        let wei = BigInt::from(1_000_000_000_000_000_000u64);
        let converted = wei.to_u256().unwrap();
        assert_eq!(converted, U256::exp10(18));
        assert_eq!(BigInt::from(converted), wei);
        assert_eq!(BigInt::max_value().to_u256().unwrap(), U256::MAX);
        assert!(BigInt::from(-1i8).to_u256().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let value = BigInt::from(12345u32);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"12345\"");
        let back: BigInt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
