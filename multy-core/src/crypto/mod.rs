//! Cryptographic primitives and operations
//!
//! This module provides mnemonic generation, BIP-32 key derivation and the
//! blockchain-specific key formats built on top of secp256k1.

use std::sync::LazyLock;

use secp256k1::{All, Secp256k1};

pub mod mnemonic;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;

/// Shared secp256k1 context for signing, verification and tweaking
pub(crate) static SECP: LazyLock<Secp256k1<All>> = LazyLock::new(Secp256k1::new);
