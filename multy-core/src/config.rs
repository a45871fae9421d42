//! Wallet configuration

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blockchain::{self, Blockchain, BlockchainType, NetType};
use crate::crypto::mnemonic::MnemonicStrength;
use crate::error::{Error, Result};

/// Network selected through the environment (`mainnet` or `testnet`)
pub const ENV_NET_TYPE: &str = "MULTY_NET_TYPE";
/// Mnemonic word count selected through the environment (12 or 24)
pub const ENV_MNEMONIC_WORDS: &str = "MULTY_MNEMONIC_WORDS";
/// Comma-separated chain names selected through the environment
pub const ENV_CHAINS: &str = "MULTY_CHAINS";

/// Settings shared by every account of a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network used for every chain
    pub net_type: NetType,
    /// Strength of newly generated mnemonics
    pub mnemonic_strength: MnemonicStrength,
    /// Chains the wallet exposes accounts for
    pub chains: Vec<Blockchain>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            net_type: NetType::Mainnet,
            mnemonic_strength: MnemonicStrength::Words12,
            chains: blockchain::supported_blockchains(),
        }
    }
}

impl WalletConfig {
    /// Create configuration for testnet
    pub fn testnet() -> Self {
        Self {
            net_type: NetType::Testnet,
            ..Self::default()
        }
    }

    /// Load and validate configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid wallet configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from any key-value source; unset keys take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(net_type) = lookup(ENV_NET_TYPE) {
            config.net_type = net_type.parse()?;
        }

        if let Some(words) = lookup(ENV_MNEMONIC_WORDS) {
            let words = words
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", ENV_MNEMONIC_WORDS, words)))?;
            config.mnemonic_strength = MnemonicStrength::from_word_count(words)
                .map_err(|e| Error::Config(e.to_string()))?;
        }

        if let Some(chains) = lookup(ENV_CHAINS) {
            config.chains = chains
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| name.parse::<Blockchain>())
                .collect::<Result<Vec<_>>>()?;
        }

        config.validate()?;
        debug!(net_type = ?config.net_type, chains = ?config.chains, "loaded wallet configuration");
        Ok(config)
    }

    /// Check that every configured chain is compiled into this build
    pub fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(Error::Config("At least one blockchain must be enabled".to_string()));
        }
        for blockchain in &self.chains {
            if !blockchain::is_supported(*blockchain) {
                return Err(Error::Config(format!(
                    "Blockchain {} is not compiled into this build",
                    blockchain
                )));
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, blockchain: Blockchain) -> bool {
        self.chains.contains(&blockchain)
    }

    /// The blockchain type for `blockchain` on the configured network
    pub fn blockchain_type(&self, blockchain: Blockchain) -> Result<BlockchainType> {
        if !self.is_enabled(blockchain) {
            return Err(Error::Config(format!("Blockchain {} is not enabled for this wallet", blockchain)));
        }
        Ok(BlockchainType::new(blockchain, self.net_type))
    }
}
