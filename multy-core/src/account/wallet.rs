//! Wallet implementation

use std::fmt;

use tracing::debug;

use crate::blockchain::Blockchain;
use crate::config::WalletConfig;
use crate::crypto::keys::ExtendedKey;
use crate::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, validate_mnemonic};
use crate::entropy::EntropySource;
use crate::error::Result;
use super::{Account, AddressType, HdAccount};

/// A mnemonic and the accounts derived from it
#[derive(Clone)]
pub struct Wallet {
    /// The wallet's name
    name: String,
    config: WalletConfig,
    mnemonic: String,
}

impl Wallet {
    /// Create a new wallet with a mnemonic generated from `entropy`
    pub fn generate(name: impl Into<String>, config: WalletConfig, entropy: &mut dyn EntropySource) -> Result<Self> {
        config.validate()?;
        let mnemonic = generate_mnemonic(config.mnemonic_strength, entropy)?;
        let wallet = Self {
            name: name.into(),
            config,
            mnemonic,
        };
        debug!(name = %wallet.name, "generated wallet");
        Ok(wallet)
    }

    /// Create a wallet from an existing mnemonic
    pub fn from_mnemonic(name: impl Into<String>, config: WalletConfig, mnemonic: &str) -> Result<Self> {
        config.validate()?;
        validate_mnemonic(mnemonic)?;
        Ok(Self {
            name: name.into(),
            config,
            mnemonic: mnemonic.split_whitespace().collect::<Vec<_>>().join(" "),
        })
    }

    /// Get the wallet's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the wallet's name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// The mnemonic phrase, for backup
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the wallet's seed
    pub fn seed(&self, passphrase: Option<&str>) -> Result<Vec<u8>> {
        mnemonic_to_seed(&self.mnemonic, passphrase)
    }

    /// The BIP-32 master key on the configured network
    pub fn master_key(&self, passphrase: Option<&str>) -> Result<ExtendedKey> {
        ExtendedKey::from_seed(&self.seed(passphrase)?, self.config.net_type)
    }

    /// The BIP-44 account `index` of `blockchain`
    pub fn hd_account(&self, blockchain: Blockchain, index: u32, passphrase: Option<&str>) -> Result<HdAccount> {
        let blockchain_type = self.config.blockchain_type(blockchain)?;
        HdAccount::new(&self.master_key(passphrase)?, blockchain_type, index)
    }

    /// The receiving account at `m/44'/coin'/index'/0/address_index`
    pub fn account(
        &self,
        blockchain: Blockchain,
        index: u32,
        address_index: u32,
        passphrase: Option<&str>,
    ) -> Result<Account> {
        self.hd_account(blockchain, index, passphrase)?
            .leaf(AddressType::External, address_index)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
