//! Error types for the multy-core library

use thiserror::Error;

/// Custom error type for multy-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An amount could not be represented in the requested unit
    #[error("Value {value} is out of range: {reason}")]
    OutOfRange { value: String, reason: String },

    /// A checked big integer operation left the representable range
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The chain needs data beyond local key material to produce an address
    #[error("Address unavailable: {0}")]
    AddressUnavailable(String),

    #[error("Entropy error: {0}")]
    Entropy(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Unknown blockchain id: {0}")]
    UnknownBlockchain(u32),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn out_of_range(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for multy-core operations
pub type Result<T> = std::result::Result<T, Error>;
