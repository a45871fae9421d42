//! Account management functionality
//!
//! An [`HdAccount`] is the BIP-44 account node `m/44'/coin'/index'` of one
//! blockchain. Its leaves are [`Account`]s: a key pair plus, where the chain
//! allows it, an address derived from the public key.

mod hd;
mod leaf;
mod wallet;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::ChildNumber;

pub use hd::*;
pub use leaf::*;
pub use wallet::*;

/// The BIP-44 `change` level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum AddressType {
    /// Receiving addresses
    #[default]
    External = 0,
    /// Change addresses
    Change = 1,
}

impl AddressType {
    pub(crate) fn child_number(self) -> ChildNumber {
        ChildNumber::Normal(self as u32)
    }
}
