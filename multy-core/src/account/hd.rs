//! BIP-44 account nodes

use std::fmt;

use tracing::debug;

use crate::blockchain::{self, BlockchainType};
use crate::crypto::keys::{ChildNumber, DerivationPath, ExtendedKey, KeyPair, PublicKey};
use crate::error::{Error, Result};
use super::{Account, AddressType};

/// The account node `m/44'/coin'/index'` of one blockchain
#[derive(Clone, PartialEq, Eq)]
pub struct HdAccount {
    blockchain_type: BlockchainType,
    index: u32,
    path: DerivationPath,
    key: ExtendedKey,
}

impl HdAccount {
    /// Derive account `index` for `blockchain_type` from a private master key
    pub fn new(master: &ExtendedKey, blockchain_type: BlockchainType, index: u32) -> Result<Self> {
        if !master.is_private() || master.depth() != 0 {
            return Err(Error::InvalidKey("HD accounts derive from a private master key".to_string()));
        }
        if master.net_type() != blockchain_type.net_type {
            return Err(Error::InvalidKey(format!(
                "Master key is for {:?}, account is for {:?}",
                master.net_type(),
                blockchain_type.net_type
            )));
        }

        let coin_type = blockchain::support(blockchain_type.blockchain).coin_type(blockchain_type.net_type);
        let requested = DerivationPath::bip44_account(coin_type, index)?;
        let (key, path) = derive_recording_path(master, DerivationPath::master(), requested.as_slice())?;

        debug!(blockchain = %blockchain_type.blockchain, index, path = %path, "created HD account");

        Ok(Self {
            blockchain_type,
            index,
            path,
            key,
        })
    }

    pub fn blockchain_type(&self) -> BlockchainType {
        self.blockchain_type
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Path of the account node, as actually derived
    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Account-level `xpub`, enough to derive every leaf public key
    pub fn extended_public_key(&self) -> ExtendedKey {
        self.key.public()
    }

    /// Derive the leaf account at `.../change/index`
    pub fn leaf(&self, address_type: AddressType, index: u32) -> Result<Account> {
        let segments = [address_type.child_number(), ChildNumber::normal(index)?];
        let (key, path) = derive_recording_path(&self.key, self.path.clone(), &segments)?;

        let key_pair = KeyPair::from(key.private_key(self.blockchain_type)?);
        Account::from_key_pair(key_pair, Some(path))
    }
}

impl fmt::Debug for HdAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdAccount")
            .field("blockchain_type", &self.blockchain_type)
            .field("index", &self.index)
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}

/// Walk `segments` from `key`, appending the child numbers actually used to `path`
fn derive_recording_path(
    key: &ExtendedKey,
    mut path: DerivationPath,
    segments: &[ChildNumber],
) -> Result<(ExtendedKey, DerivationPath)> {
    let mut key = key.clone();
    for child in segments {
        key = key.derive_child(*child)?;
        path = path.child(key.child_number());
    }
    Ok((key, path))
}

/// Derive a leaf public key from an account-level extended key without any
/// private material
pub fn derive_watch_only_public_key(
    account_key: &ExtendedKey,
    blockchain_type: BlockchainType,
    address_type: AddressType,
    index: u32,
) -> Result<PublicKey> {
    let leaf = account_key
        .public()
        .derive_child(address_type.child_number())?
        .derive_child(ChildNumber::normal(index)?)?;
    Ok(leaf.public_key(blockchain_type))
}
