//! Blockchain identifiers and per-chain capabilities
//!
//! [`Blockchain`] ids are part of the external interface and never change
//! between versions. What a chain can do is looked up in the capability table
//! in [`registry`], which only lists the chains compiled into this build.

mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use registry::*;

/// Supported blockchains, with stable ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Blockchain {
    Bitcoin = 0,
    Ethereum = 1,
    /// Available with the `golos` feature
    Golos = 2,
    /// Available with the `eos` feature
    Eos = 3,
}

impl Blockchain {
    pub const ALL: [Blockchain; 4] = [Self::Bitcoin, Self::Ethereum, Self::Golos, Self::Eos];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
            Self::Golos => "golos",
            Self::Eos => "eos",
        }
    }
}

impl TryFrom<u32> for Blockchain {
    type Error = Error;

    fn try_from(id: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|blockchain| blockchain.id() == id)
            .ok_or(Error::UnknownBlockchain(id))
    }
}

impl FromStr for Blockchain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" => Ok(Self::Bitcoin),
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "golos" => Ok(Self::Golos),
            "eos" => Ok(Self::Eos),
            other => Err(Error::Config(format!("Unknown blockchain name: {:?}", other))),
        }
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Network a key or address belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum NetType {
    #[default]
    Mainnet = 0,
    Testnet = 1,
}

impl FromStr for NetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            other => Err(Error::Config(format!("Unknown net type: {:?}", other))),
        }
    }
}

/// A blockchain together with the network used on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockchainType {
    pub blockchain: Blockchain,
    pub net_type: NetType,
}

impl BlockchainType {
    pub fn new(blockchain: Blockchain, net_type: NetType) -> Self {
        Self { blockchain, net_type }
    }

    pub fn mainnet(blockchain: Blockchain) -> Self {
        Self::new(blockchain, NetType::Mainnet)
    }

    pub fn testnet(blockchain: Blockchain) -> Self {
        Self::new(blockchain, NetType::Testnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_ids() {
        assert_eq!(Blockchain::Bitcoin.id(), 0);
        assert_eq!(Blockchain::Ethereum.id(), 1);
        assert_eq!(Blockchain::Golos.id(), 2);
        assert_eq!(Blockchain::Eos.id(), 3);
        assert_eq!(NetType::Testnet as u32, 1);
    }

    #[test]
    fn test_try_from_id() {
        for blockchain in Blockchain::ALL {
            assert_eq!(Blockchain::try_from(blockchain.id()).unwrap(), blockchain);
        }
        assert_eq!(Blockchain::try_from(42).unwrap_err(), Error::UnknownBlockchain(42));
    }

    #[test]
    fn test_names() {
        assert_eq!("BTC".parse::<Blockchain>().unwrap(), Blockchain::Bitcoin);
        assert_eq!("Ethereum".parse::<Blockchain>().unwrap(), Blockchain::Ethereum);
        assert!("dogecoin".parse::<Blockchain>().is_err());
        assert_eq!(" testnet ".parse::<NetType>().unwrap(), NetType::Testnet);
        assert_eq!(serde_json::to_string(&Blockchain::Eos).unwrap(), "\"eos\"");
    }
}
