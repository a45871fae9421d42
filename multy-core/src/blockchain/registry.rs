//! Capability table keyed by blockchain
//!
//! Each chain module contributes one [`ChainSupport`] entry describing its key
//! formats, signature scheme and address rules. Adding a chain means adding
//! an entry here, not a new type hierarchy.

use std::sync::LazyLock;

use secp256k1::{PublicKey as Secp256k1PublicKey, SecretKey};
use tracing::debug;

use super::{Blockchain, BlockchainType, NetType};
use crate::crypto::keys::PublicKey;
use crate::error::Result;

/// Everything the core needs to know to work with one blockchain
pub struct ChainSupport {
    pub(crate) blockchain: Blockchain,
    pub(crate) coin_type: fn(NetType) -> u32,
    pub(crate) decimals: u32,
    pub(crate) unit: &'static str,
    pub(crate) derive_address: Option<fn(&PublicKey) -> Result<String>>,
    pub(crate) validate_address: fn(&str, NetType) -> Result<()>,
    pub(crate) private_key_to_string: fn(&SecretKey, NetType) -> String,
    pub(crate) private_key_from_string: fn(&str, NetType) -> Result<SecretKey>,
    pub(crate) public_key_to_string: fn(&Secp256k1PublicKey) -> String,
    pub(crate) public_key_content: fn(&Secp256k1PublicKey) -> Vec<u8>,
    pub(crate) sign: fn(&SecretKey, &[u8]) -> Result<Vec<u8>>,
    pub(crate) verify: fn(&Secp256k1PublicKey, &[u8], &[u8]) -> bool,
}

impl ChainSupport {
    pub fn blockchain(&self) -> Blockchain {
        self.blockchain
    }

    /// SLIP-44 coin type used in BIP-44 account paths
    pub fn coin_type(&self, net_type: NetType) -> u32 {
        (self.coin_type)(net_type)
    }

    /// Decimal places between the display unit and the smallest unit
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Whether local key material alone is enough to produce an address
    pub fn can_derive_address_from_private_key(&self) -> bool {
        self.derive_address.is_some()
    }
}

static CHAINS: LazyLock<Vec<&'static ChainSupport>> = LazyLock::new(|| {
    #[allow(unused_mut)]
    let mut chains: Vec<&'static ChainSupport> = vec![
        &crate::crypto::keys::bitcoin::SUPPORT,
        &crate::crypto::keys::ethereum::SUPPORT,
    ];

    #[cfg(feature = "golos")]
    chains.push(&crate::crypto::keys::graphene::GOLOS);

    #[cfg(feature = "eos")]
    chains.push(&crate::crypto::keys::graphene::EOS);

    debug!(
        chains = ?chains.iter().map(|c| c.blockchain).collect::<Vec<_>>(),
        "built blockchain capability table"
    );
    chains
});

/// The capability entry for `blockchain`, if it is compiled in
pub fn try_support(blockchain: Blockchain) -> Option<&'static ChainSupport> {
    CHAINS.iter().copied().find(|c| c.blockchain == blockchain)
}

/// The capability entry for `blockchain`
///
/// # Panics
///
/// Panics if the chain is not compiled into this build. Callers holding a
/// [`Blockchain`] from an untrusted source check [`is_supported`] first.
pub fn support(blockchain: Blockchain) -> &'static ChainSupport {
    match try_support(blockchain) {
        Some(support) => support,
        None => panic!("Unsupported blockchain type: {} is not compiled into this build", blockchain),
    }
}

pub fn is_supported(blockchain: Blockchain) -> bool {
    try_support(blockchain).is_some()
}

/// Chains compiled into this build, in id order
pub fn supported_blockchains() -> Vec<Blockchain> {
    let mut blockchains: Vec<_> = CHAINS.iter().map(|c| c.blockchain).collect();
    blockchains.sort();
    blockchains
}

/// Whether an address can be derived from a private key alone
///
/// Bitcoin and Ethereum addresses are functions of the public key. Golos and
/// EOS addresses are account names registered on chain.
///
/// # Panics
///
/// Panics if the chain is not compiled into this build.
pub fn can_derive_address_from_private_key(blockchain: Blockchain) -> bool {
    support(blockchain).can_derive_address_from_private_key()
}

/// Check that `address` is well formed for the given chain and network
pub fn validate_address(blockchain_type: BlockchainType, address: &str) -> Result<()> {
    (support(blockchain_type.blockchain).validate_address)(address, blockchain_type.net_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitcoin_and_ethereum_derive_addresses() {
        assert!(can_derive_address_from_private_key(Blockchain::Bitcoin));
        assert!(can_derive_address_from_private_key(Blockchain::Ethereum));
    }

    #[test]
    fn test_supported_blockchains() {
        let supported = supported_blockchains();
        assert_eq!(&supported[..2], &[Blockchain::Bitcoin, Blockchain::Ethereum]);
        assert_eq!(is_supported(Blockchain::Golos), cfg!(feature = "golos"));
        assert_eq!(is_supported(Blockchain::Eos), cfg!(feature = "eos"));
    }

    #[test]
    fn test_chain_units() {
        let bitcoin = support(Blockchain::Bitcoin);
        assert_eq!(bitcoin.decimals(), 8);
        assert_eq!(bitcoin.unit(), "BTC");
        assert_eq!(bitcoin.coin_type(NetType::Mainnet), 0);
        assert_eq!(bitcoin.coin_type(NetType::Testnet), 1);

        let ethereum = support(Blockchain::Ethereum);
        assert_eq!(ethereum.decimals(), 18);
        assert_eq!(ethereum.coin_type(NetType::Testnet), 60);
    }

    #[cfg(not(feature = "eos"))]
    #[test]
    #[should_panic(expected = "Unsupported blockchain type")]
    fn test_unbuilt_chain_is_a_programming_error() {
        can_derive_address_from_private_key(Blockchain::Eos);
    }

    #[cfg(feature = "golos")]
    #[test]
    fn test_golos_cannot_derive_address() {
        assert!(!can_derive_address_from_private_key(Blockchain::Golos));
    }

    #[cfg(feature = "eos")]
    #[test]
    fn test_eos_cannot_derive_address() {
        assert!(!can_derive_address_from_private_key(Blockchain::Eos));
    }
}
