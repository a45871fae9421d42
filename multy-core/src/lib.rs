//! Multy Core - multi-blockchain key derivation and accounts
//!
//! This library derives BIP-32 hierarchical keys from a BIP-39 mnemonic, turns
//! them into blockchain-specific keys and accounts (Bitcoin, Ethereum, and
//! Golos/EOS behind cargo features), signs messages and converts amounts
//! between display units and each chain's smallest unit.
//!
//! Bitcoin and Ethereum are always built. The `golos` and `eos` features add
//! the Graphene chains and `full` enables both; their tests only run with
//! `cargo test --features full`.

pub mod error;
pub mod codec;
pub mod big_int;
pub mod amount;
pub mod entropy;
pub mod blockchain;
pub mod crypto;
pub mod account;
pub mod config;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use big_int::BigInt;
pub use blockchain::{can_derive_address_from_private_key, Blockchain, BlockchainType, NetType};
pub use crypto::keys::{DerivationPath, ExtendedKey, KeyPair, PrivateKey, PublicKey};
pub use crypto::mnemonic::MnemonicStrength;
pub use entropy::{DeterministicEntropy, EntropySource, FnEntropy, OsEntropy};
pub use account::{Account, AddressType, HdAccount, Wallet};
pub use config::WalletConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
