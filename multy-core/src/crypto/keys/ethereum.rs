//! Ethereum keys, addresses and signatures

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey as Secp256k1PublicKey, SecretKey};
use sha3::{Digest, Keccak256};

use crate::blockchain::{Blockchain, ChainSupport, NetType};
use crate::codec;
use crate::crypto::SECP;
use crate::error::{Error, Result};
use super::PublicKey;

pub(crate) static SUPPORT: ChainSupport = ChainSupport {
    blockchain: Blockchain::Ethereum,
    coin_type,
    decimals: 18,
    unit: "ETH",
    derive_address: Some(public_key_to_address),
    validate_address,
    private_key_to_string,
    private_key_from_string,
    public_key_to_string,
    public_key_content,
    sign,
    verify,
};

/// Offset added to the recovery id in the last signature byte
const RECOVERY_ID_OFFSET: u8 = 27;

const SIGNATURE_LEN: usize = 65;

fn coin_type(_: NetType) -> u32 {
    60
}

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Get the EIP-55 checksummed address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Result<String> {
    let blockchain = public_key.blockchain_type().blockchain;
    if blockchain != Blockchain::Ethereum {
        return Err(Error::InvalidKey(format!("Not an Ethereum public key: {}", blockchain)));
    }

    // Skip the 0x04 prefix and take the last 20 bytes of the hash
    let key_hash = keccak256(&public_key.inner().serialize_uncompressed()[1..]);
    let address = Address::from_slice(&key_hash[12..]);

    Ok(to_checksum(&address, None))
}

fn validate_address(address: &str, _: NetType) -> Result<()> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| Error::InvalidAddress(format!("{}: missing 0x prefix", address)))?;

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(format!("{}: expected 40 hex digits", address)));
    }

    let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase())
        && digits.bytes().any(|b| b.is_ascii_uppercase());
    if mixed_case {
        let bytes = codec::from_hex(digits)?;
        if to_checksum(&Address::from_slice(&bytes), None) != address {
            return Err(Error::InvalidAddress(format!("{}: bad EIP-55 checksum", address)));
        }
    }

    Ok(())
}

fn private_key_to_string(secret: &SecretKey, _: NetType) -> String {
    codec::to_hex(&secret.secret_bytes())
}

fn private_key_from_string(serialized: &str, _: NetType) -> Result<SecretKey> {
    let digits = serialized.strip_prefix("0x").unwrap_or(serialized);
    let bytes = codec::from_hex(digits)?;
    SecretKey::from_slice(&bytes).map_err(|e| Error::InvalidKey(format!("Invalid secret key: {}", e)))
}

fn public_key_to_string(key: &Secp256k1PublicKey) -> String {
    codec::to_hex(&public_key_content(key))
}

/// Uncompressed key without the 0x04 prefix
fn public_key_content(key: &Secp256k1PublicKey) -> Vec<u8> {
    key.serialize_uncompressed()[1..].to_vec()
}

/// Recoverable ECDSA over the Keccak-256 of `message`, as `r ‖ s ‖ v`
fn sign(secret: &SecretKey, message: &[u8]) -> Result<Vec<u8>> {
    let digest = Message::from_digest_slice(&keccak256(message))
        .map_err(|e| Error::Signing(e.to_string()))?;
    let (recovery_id, compact) = SECP
        .sign_ecdsa_recoverable(&digest, secret)
        .serialize_compact();

    let mut signature = Vec::with_capacity(SIGNATURE_LEN);
    signature.extend_from_slice(&compact);
    signature.push(RECOVERY_ID_OFFSET + recovery_id.to_i32() as u8);
    Ok(signature)
}

fn verify(key: &Secp256k1PublicKey, message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != SIGNATURE_LEN {
        return false;
    }

    let v = signature[64];
    let recovery_id = if v >= RECOVERY_ID_OFFSET { v - RECOVERY_ID_OFFSET } else { v };
    let Ok(recovery_id) = RecoveryId::from_i32(i32::from(recovery_id)) else {
        return false;
    };
    let Ok(signature) = RecoverableSignature::from_compact(&signature[..64], recovery_id) else {
        return false;
    };
    let Ok(digest) = Message::from_digest_slice(&keccak256(message)) else {
        return false;
    };

    SECP.recover_ecdsa(&digest, &signature)
        .map(|recovered| recovered == *key)
        .unwrap_or(false)
}
