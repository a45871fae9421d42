//! Key derivation and management
//!
//! This module provides BIP-32 extended keys and the blockchain-specific
//! private and public keys derived from them.

pub mod bitcoin;
pub mod ethereum;
#[cfg(any(feature = "golos", feature = "eos"))]
pub mod graphene;
mod derivation;
mod extended;
mod path;

pub use derivation::*;
pub use extended::*;
pub use path::*;
