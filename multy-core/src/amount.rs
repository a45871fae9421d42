//! Currency units and amount conversion
//!
//! Amounts are always held as a [`BigInt`] count of a chain's smallest unit
//! (satoshi, wei). The constructors here convert display amounts into that
//! representation and refuse anything that cannot be represented exactly.

use serde::{Deserialize, Serialize};

use crate::big_int::BigInt;
use crate::error::Result;

pub const SATOSHIS_IN_BTC: u64 = 100_000_000;
pub const WEIS_IN_ETH: u64 = 1_000_000_000_000_000_000;
pub const WEIS_IN_GWEI: u64 = 1_000_000_000;

/// A named currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Btc,
    Satoshi,
    Eth,
    Gwei,
    Wei,
}

impl Unit {
    /// Number of decimal places between this unit and the chain's smallest unit
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Btc => 8,
            Self::Eth => 18,
            Self::Gwei => 9,
            Self::Satoshi | Self::Wei => 0,
        }
    }

    /// How many smallest units make up one of this unit
    pub fn multiplier(&self) -> u64 {
        10u64.pow(self.decimals())
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Satoshi => "SATOSHI",
            Self::Eth => "ETH",
            Self::Gwei => "GWEI",
            Self::Wei => "WEI",
        }
    }
}

/// Satoshi corresponding to a fractional amount of BTC
pub fn amount_from_btc(btc: f64) -> Result<BigInt> {
    BigInt::from_scaled(btc, SATOSHIS_IN_BTC)
}

pub fn amount_from_satoshi(satoshi: u64) -> BigInt {
    BigInt::from(satoshi)
}

/// Wei corresponding to a fractional amount of ETH
pub fn amount_from_eth(eth: f64) -> Result<BigInt> {
    BigInt::from_scaled(eth, WEIS_IN_ETH)
}

/// Wei corresponding to a fractional amount of GWEI
pub fn amount_from_gwei(gwei: f64) -> Result<BigInt> {
    BigInt::from_scaled(gwei, WEIS_IN_GWEI)
}

pub fn amount_from_wei(wei: u64) -> BigInt {
    BigInt::from(wei)
}

/// Parse an exact decimal amount expressed in `unit` into smallest units
///
/// Negative amounts fail with [`crate::Error::OutOfRange`].
pub fn parse_amount(text: &str, unit: Unit) -> Result<BigInt> {
    parse_amount_with_decimals(text, unit.decimals())
}

/// Parse a non-negative decimal amount with `decimals` fractional places
pub fn parse_amount_with_decimals(text: &str, decimals: u32) -> Result<BigInt> {
    let amount = BigInt::from_decimal_str(text, decimals)?;
    if amount.is_negative() {
        return Err(crate::Error::out_of_range(text, "value is too low"));
    }
    Ok(amount)
}

/// Render an amount of smallest units in `unit`
pub fn format_amount(amount: &BigInt, unit: Unit) -> String {
    amount.to_decimal_string(unit.decimals())
}
