//! Bitcoin keys, addresses and signatures

use ::bitcoin::address::NetworkUnchecked;
use ::bitcoin::{Address, Network};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey as Secp256k1PublicKey, SecretKey};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Blockchain, ChainSupport, NetType};
use crate::codec;
use crate::crypto::SECP;
use crate::error::{Error, Result};
use super::PublicKey;

pub(crate) static SUPPORT: ChainSupport = ChainSupport {
    blockchain: Blockchain::Bitcoin,
    coin_type,
    decimals: 8,
    unit: "BTC",
    derive_address: Some(derive_address),
    validate_address,
    private_key_to_string,
    private_key_from_string,
    public_key_to_string,
    public_key_content,
    sign,
    verify,
};

/// Address kinds that can be derived from a public key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitcoinAddressType {
    /// Legacy pay-to-pubkey-hash
    #[default]
    P2pkh,
    /// Native segwit pay-to-witness-pubkey-hash
    P2wpkh,
}

/// The `bitcoin` crate network for a net type
pub fn network(net_type: NetType) -> Network {
    match net_type {
        NetType::Mainnet => Network::Bitcoin,
        NetType::Testnet => Network::Testnet,
    }
}

fn coin_type(net_type: NetType) -> u32 {
    match net_type {
        NetType::Mainnet => 0,
        NetType::Testnet => 1,
    }
}

/// Get the Bitcoin address of a public key
pub fn public_key_to_address(public_key: &PublicKey, address_type: BitcoinAddressType) -> Result<String> {
    let blockchain_type = public_key.blockchain_type();
    if blockchain_type.blockchain != Blockchain::Bitcoin {
        return Err(Error::InvalidKey(format!(
            "Not a Bitcoin public key: {}",
            blockchain_type.blockchain
        )));
    }

    let key = ::bitcoin::PublicKey::new(*public_key.inner());
    let network = network(blockchain_type.net_type);

    let address = match address_type {
        BitcoinAddressType::P2pkh => Address::p2pkh(&key, network),
        BitcoinAddressType::P2wpkh => Address::p2wpkh(&key, network)
            .map_err(|e| Error::InvalidKey(format!("Cannot build segwit address: {}", e)))?,
    };

    Ok(address.to_string())
}

fn derive_address(public_key: &PublicKey) -> Result<String> {
    public_key_to_address(public_key, BitcoinAddressType::default())
}

fn validate_address(address: &str, net_type: NetType) -> Result<()> {
    address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?
        .require_network(network(net_type))
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?;
    Ok(())
}

/// Compressed WIF
fn private_key_to_string(secret: &SecretKey, net_type: NetType) -> String {
    ::bitcoin::PrivateKey::new(*secret, network(net_type)).to_wif()
}

fn private_key_from_string(wif: &str, net_type: NetType) -> Result<SecretKey> {
    let key = ::bitcoin::PrivateKey::from_wif(wif)
        .map_err(|e| Error::InvalidKey(format!("Invalid WIF: {}", e)))?;

    let expected = network(net_type);
    if key.network != expected {
        return Err(Error::InvalidKey(format!(
            "WIF is for {}, expected {}",
            key.network, expected
        )));
    }
    // Keys are always re-encoded and addressed compressed
    if !key.compressed {
        return Err(Error::InvalidKey("uncompressed WIF is not supported".to_string()));
    }

    Ok(key.inner)
}

fn public_key_to_string(key: &Secp256k1PublicKey) -> String {
    codec::to_hex(&key.serialize())
}

fn public_key_content(key: &Secp256k1PublicKey) -> Vec<u8> {
    key.serialize().to_vec()
}

/// DER-encoded ECDSA over the double SHA-256 of `message`
fn sign(secret: &SecretKey, message: &[u8]) -> Result<Vec<u8>> {
    let digest = Message::from_digest_slice(&codec::sha256d(message))
        .map_err(|e| Error::Signing(e.to_string()))?;
    Ok(SECP.sign_ecdsa(&digest, secret).serialize_der().to_vec())
}

fn verify(key: &Secp256k1PublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(digest) = Message::from_digest_slice(&codec::sha256d(message)) else {
        return false;
    };
    let Ok(mut signature) = Signature::from_der(signature) else {
        return false;
    };
    signature.normalize_s();
    SECP.verify_ecdsa(&digest, &signature, key).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainType;
    use crate::crypto::keys::PrivateKey;

    // Private key 1, the generator point
    const ONE_WIF: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
    const ONE_ADDRESS: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
    const ONE_SEGWIT: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";

    fn one(net_type: NetType) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        PrivateKey::from_bytes(BlockchainType::new(Blockchain::Bitcoin, net_type), &bytes).unwrap()
    }

    #[test]
    fn test_wif_round_trip() {
        let key = one(NetType::Mainnet);
        assert_eq!(key.to_string(), ONE_WIF);

        let imported = PrivateKey::from_string(BlockchainType::mainnet(Blockchain::Bitcoin), ONE_WIF).unwrap();
        assert_eq!(imported, key);
        assert!(one(NetType::Testnet).to_string().starts_with('c'));
    }

    #[test]
    fn test_wif_network_mismatch() {
        let testnet = one(NetType::Testnet).to_string();
        assert!(matches!(
            PrivateKey::from_string(BlockchainType::mainnet(Blockchain::Bitcoin), &testnet),
            Err(Error::InvalidKey(_))
        ));
        assert!(PrivateKey::from_string(BlockchainType::mainnet(Blockchain::Bitcoin), "not a wif").is_err());
    }

    #[test]
    fn test_uncompressed_wif_is_rejected() {
        // Same secret as ONE_WIF, uncompressed encoding
        assert!(matches!(
            PrivateKey::from_string(
                BlockchainType::mainnet(Blockchain::Bitcoin),
                "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
            ),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_key_string() {
        assert_eq!(
            one(NetType::Mainnet).public_key().to_string(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_addresses() {
        let public_key = one(NetType::Mainnet).public_key();
        assert_eq!(public_key_to_address(&public_key, BitcoinAddressType::P2pkh).unwrap(), ONE_ADDRESS);
        assert_eq!(public_key_to_address(&public_key, BitcoinAddressType::P2wpkh).unwrap(), ONE_SEGWIT);

        let testnet = public_key_to_address(&one(NetType::Testnet).public_key(), BitcoinAddressType::P2pkh).unwrap();
        assert!(testnet.starts_with('m') || testnet.starts_with('n'));
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(ONE_ADDRESS, NetType::Mainnet).is_ok());
        assert!(validate_address(ONE_SEGWIT, NetType::Mainnet).is_ok());
        assert!(matches!(validate_address(ONE_ADDRESS, NetType::Testnet), Err(Error::InvalidAddress(_))));
        assert!(matches!(
            validate_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMI", NetType::Mainnet),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_signature_is_der() {
        let signature = one(NetType::Mainnet).sign(b"hello").unwrap();
        assert_eq!(signature[0], 0x30);
        assert!(Signature::from_der(&signature).is_ok());
    }
}
