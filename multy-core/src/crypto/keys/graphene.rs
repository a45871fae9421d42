//! Graphene-family chains (Golos, EOS)
//!
//! Both chains use secp256k1 keys with an uncompressed-form WIF private key,
//! a prefixed Base58 public key with a RIPEMD-160 checksum, and compact
//! recoverable signatures over SHA-256. Addresses are account names registered
//! on chain, so none can be derived from a key.

use ::bitcoin::hashes::{ripemd160, Hash};
use ::bitcoin::Network;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey as Secp256k1PublicKey, SecretKey};
use sha2::{Digest, Sha256};

use crate::blockchain::{Blockchain, BlockchainType, ChainSupport, NetType};
use crate::crypto::SECP;
use crate::error::{Error, Result};
use super::PublicKey;

#[cfg(feature = "golos")]
pub(crate) static GOLOS: ChainSupport = ChainSupport {
    blockchain: Blockchain::Golos,
    coin_type: golos_coin_type,
    decimals: 3,
    unit: "GOLOS",
    derive_address: None,
    validate_address: validate_golos_account,
    private_key_to_string,
    private_key_from_string,
    public_key_to_string: golos_public_key_to_string,
    public_key_content,
    sign,
    verify,
};

#[cfg(feature = "eos")]
pub(crate) static EOS: ChainSupport = ChainSupport {
    blockchain: Blockchain::Eos,
    coin_type: eos_coin_type,
    decimals: 4,
    unit: "EOS",
    derive_address: None,
    validate_address: validate_eos_account,
    private_key_to_string,
    private_key_from_string,
    public_key_to_string: eos_public_key_to_string,
    public_key_content,
    sign,
    verify,
};

/// Added to the recovery id in the signature header byte (compressed key)
const COMPRESSED_HEADER: u8 = 31;
/// Header base used by signers that flag the key as uncompressed
const UNCOMPRESSED_HEADER: u8 = 27;

const SIGNATURE_LEN: usize = 65;
const CHECKSUM_LEN: usize = 4;

/// Public key string prefix of a Graphene chain
pub fn public_key_prefix(blockchain: Blockchain) -> Result<&'static str> {
    match blockchain {
        Blockchain::Golos => Ok("GLS"),
        Blockchain::Eos => Ok("EOS"),
        other => Err(Error::InvalidKey(format!("{} is not a Graphene chain", other))),
    }
}

fn encode_public_key(prefix: &str, key: &Secp256k1PublicKey) -> String {
    let compressed = key.serialize();
    let checksum = ripemd160::Hash::hash(&compressed).to_byte_array();

    let mut data = Vec::with_capacity(compressed.len() + CHECKSUM_LEN);
    data.extend_from_slice(&compressed);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    format!("{}{}", prefix, bs58::encode(data).into_string())
}

/// Parse a prefixed public key string such as `GLS6…` or `EOS6…`
pub fn parse_public_key(blockchain_type: BlockchainType, text: &str) -> Result<PublicKey> {
    let prefix = public_key_prefix(blockchain_type.blockchain)?;
    let encoded = text
        .strip_prefix(prefix)
        .ok_or_else(|| Error::InvalidKey(format!("Public key must start with {}", prefix)))?;

    let data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::InvalidEncoding(format!("Invalid base58: {}", e)))?;
    if data.len() != 33 + CHECKSUM_LEN {
        return Err(Error::InvalidKey(format!("Public key data must be 37 bytes, got {}", data.len())));
    }

    let (key, checksum) = data.split_at(33);
    if ripemd160::Hash::hash(key).to_byte_array()[..CHECKSUM_LEN] != *checksum {
        return Err(Error::InvalidEncoding("Public key checksum mismatch".to_string()));
    }

    PublicKey::from_bytes(blockchain_type, key)
}

#[cfg(feature = "golos")]
fn golos_coin_type(_: NetType) -> u32 {
    135
}

#[cfg(feature = "eos")]
fn eos_coin_type(_: NetType) -> u32 {
    194
}

#[cfg(feature = "golos")]
fn golos_public_key_to_string(key: &Secp256k1PublicKey) -> String {
    encode_public_key("GLS", key)
}

#[cfg(feature = "eos")]
fn eos_public_key_to_string(key: &Secp256k1PublicKey) -> String {
    encode_public_key("EOS", key)
}

/// Golos account names: dot-separated segments of at least three characters,
/// each starting with a letter and ending with a letter or digit
#[cfg(feature = "golos")]
fn validate_golos_account(name: &str, _: NetType) -> Result<()> {
    let invalid = |reason: &str| Err(Error::InvalidAddress(format!("{:?}: {}", name, reason)));

    if !(3..=16).contains(&name.len()) {
        return invalid("account name must be 3 to 16 characters");
    }

    for segment in name.split('.') {
        let bytes = segment.as_bytes();
        if bytes.len() < 3 {
            return invalid("each segment must be at least 3 characters");
        }
        if !bytes[0].is_ascii_lowercase() {
            return invalid("each segment must start with a letter");
        }
        if !bytes.iter().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-') {
            return invalid("only a-z, 0-9, '-' and '.' are allowed");
        }
        if segment.contains("--") {
            return invalid("consecutive dashes are not allowed");
        }
        if bytes[bytes.len() - 1] == b'-' {
            return invalid("segments cannot end with a dash");
        }
    }

    Ok(())
}

/// EOS account names: 1 to 12 characters from `a-z`, `1-5` and `.`
#[cfg(feature = "eos")]
fn validate_eos_account(name: &str, _: NetType) -> Result<()> {
    if name.is_empty() || name.len() > 12 {
        return Err(Error::InvalidAddress(format!("{:?}: account name must be 1 to 12 characters", name)));
    }
    if !name.bytes().all(|b| b.is_ascii_lowercase() || (b'1'..=b'5').contains(&b) || b == b'.') {
        return Err(Error::InvalidAddress(format!("{:?}: only a-z, 1-5 and '.' are allowed", name)));
    }
    if name.ends_with('.') {
        return Err(Error::InvalidAddress(format!("{:?}: account name cannot end with '.'", name)));
    }
    Ok(())
}

/// Uncompressed-form WIF with the 0x80 prefix on every network
fn private_key_to_string(secret: &SecretKey, _: NetType) -> String {
    ::bitcoin::PrivateKey::new_uncompressed(*secret, Network::Bitcoin).to_wif()
}

fn private_key_from_string(wif: &str, _: NetType) -> Result<SecretKey> {
    let key = ::bitcoin::PrivateKey::from_wif(wif)
        .map_err(|e| Error::InvalidKey(format!("Invalid WIF: {}", e)))?;
    if key.network != Network::Bitcoin {
        return Err(Error::InvalidKey("WIF must use the 0x80 prefix".to_string()));
    }
    Ok(key.inner)
}

fn public_key_content(key: &Secp256k1PublicKey) -> Vec<u8> {
    key.serialize().to_vec()
}

fn digest(message: &[u8]) -> Result<Message> {
    let hash: [u8; 32] = Sha256::digest(message).into();
    Message::from_digest_slice(&hash).map_err(|e| Error::Signing(e.to_string()))
}

/// Compact recoverable ECDSA over SHA-256, as `header ‖ r ‖ s`
fn sign(secret: &SecretKey, message: &[u8]) -> Result<Vec<u8>> {
    let (recovery_id, compact) = SECP
        .sign_ecdsa_recoverable(&digest(message)?, secret)
        .serialize_compact();

    let mut signature = Vec::with_capacity(SIGNATURE_LEN);
    signature.push(COMPRESSED_HEADER + recovery_id.to_i32() as u8);
    signature.extend_from_slice(&compact);
    Ok(signature)
}

fn verify(key: &Secp256k1PublicKey, message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != SIGNATURE_LEN {
        return false;
    }

    let header = signature[0];
    let recovery_id = match header {
        h if (COMPRESSED_HEADER..COMPRESSED_HEADER + 4).contains(&h) => h - COMPRESSED_HEADER,
        h if (UNCOMPRESSED_HEADER..COMPRESSED_HEADER).contains(&h) => h - UNCOMPRESSED_HEADER,
        _ => return false,
    };
    let Ok(recovery_id) = RecoveryId::from_i32(i32::from(recovery_id)) else {
        return false;
    };
    let Ok(signature) = RecoverableSignature::from_compact(&signature[1..], recovery_id) else {
        return false;
    };
    let Ok(digest) = digest(message) else {
        return false;
    };

    SECP.recover_ecdsa(&digest, &signature)
        .map(|recovered| recovered == *key)
        .unwrap_or(false)
}
