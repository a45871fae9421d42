//! Binary encodings used at the API boundary
//!
//! Keys, signatures and fingerprints cross the boundary either as lowercase
//! hex or as Base58Check strings (WIF, extended keys, Bitcoin addresses).

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Length of the Base58Check checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Encode bytes as a lowercase hex string
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string into bytes
///
/// Upper-case digits are accepted. Odd-length input or any non-hex character
/// fails with [`Error::InvalidEncoding`].
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| Error::InvalidEncoding(format!("{}: {:?}", e, hex_str)))
}

/// SHA-256 applied twice
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Base58 encode `payload` with a 4-byte double-SHA256 checksum appended
pub fn to_base58check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&sha256d(payload)[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

/// Decode a Base58Check string and verify its checksum
pub fn from_base58check(encoded: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::InvalidEncoding(format!("Invalid base58: {}", e)))?;

    if data.len() < CHECKSUM_LEN {
        return Err(Error::InvalidEncoding("Base58Check data too short".to_string()));
    }

    let checksum = data.split_off(data.len() - CHECKSUM_LEN);
    if sha256d(&data)[..CHECKSUM_LEN] != checksum[..] {
        return Err(Error::InvalidEncoding("Base58Check checksum mismatch".to_string()));
    }

    Ok(data)
}
