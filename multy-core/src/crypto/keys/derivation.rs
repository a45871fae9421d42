//! Blockchain-specific private and public keys

use std::fmt;

use secp256k1::{PublicKey as Secp256k1PublicKey, SecretKey};
use subtle::ConstantTimeEq;

use crate::blockchain::{self, BlockchainType};
use crate::crypto::SECP;
use crate::error::{Error, Result};
use super::ExtendedKey;

/// A private key for a specific blockchain
///
/// Two private keys are equal when their canonical strings are equal; the
/// comparison runs in constant time.
#[derive(Clone)]
pub struct PrivateKey {
    secret: SecretKey,
    blockchain_type: BlockchainType,
}

impl PrivateKey {
    /// Panics if `blockchain_type` is not compiled into this build
    pub(crate) fn new(secret: SecretKey, blockchain_type: BlockchainType) -> Self {
        blockchain::support(blockchain_type.blockchain);
        Self { secret, blockchain_type }
    }

    /// Import a private key from its canonical string (WIF or hex, per chain)
    pub fn from_string(blockchain_type: BlockchainType, serialized: &str) -> Result<Self> {
        let support = blockchain::support(blockchain_type.blockchain);
        let secret = (support.private_key_from_string)(serialized.trim(), blockchain_type.net_type)?;
        Ok(Self::new(secret, blockchain_type))
    }

    /// Import a private key from 32 raw bytes
    pub fn from_bytes(blockchain_type: BlockchainType, bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| Error::InvalidKey(format!("Invalid secret key: {}", e)))?;
        Ok(Self::new(secret, blockchain_type))
    }

    /// Get the raw private key bytes
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    pub fn blockchain_type(&self) -> BlockchainType {
        self.blockchain_type
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(Secp256k1PublicKey::from_secret_key(&SECP, &self.secret), self.blockchain_type)
    }

    /// Sign `message` with the chain's signature scheme
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        (blockchain::support(self.blockchain_type.blockchain).sign)(&self.secret, message)
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let support = blockchain::support(self.blockchain_type.blockchain);
        f.write_str(&(support.private_key_to_string)(&self.secret, self.blockchain_type.net_type))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("blockchain_type", &self.blockchain_type)
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().as_bytes().ct_eq(other.to_string().as_bytes()).into()
    }
}

impl Eq for PrivateKey {}

/// A public key for a specific blockchain
///
/// Two public keys are equal when their canonical content is equal, whatever
/// encoding they were built from.
#[derive(Clone)]
pub struct PublicKey {
    key: Secp256k1PublicKey,
    blockchain_type: BlockchainType,
}

impl PublicKey {
    /// Panics if `blockchain_type` is not compiled into this build
    pub(crate) fn new(key: Secp256k1PublicKey, blockchain_type: BlockchainType) -> Self {
        blockchain::support(blockchain_type.blockchain);
        Self { key, blockchain_type }
    }

    /// Build a public key from SEC1 bytes, compressed (33) or uncompressed (65)
    pub fn from_bytes(blockchain_type: BlockchainType, bytes: &[u8]) -> Result<Self> {
        let key = Secp256k1PublicKey::from_slice(bytes)
            .map_err(|e| Error::InvalidKey(format!("Invalid public key: {}", e)))?;
        Ok(Self::new(key, blockchain_type))
    }

    pub(crate) fn inner(&self) -> &Secp256k1PublicKey {
        &self.key
    }

    pub fn blockchain_type(&self) -> BlockchainType {
        self.blockchain_type
    }

    /// Canonical bytes of the key in the chain's preferred encoding
    pub fn content(&self) -> Vec<u8> {
        (blockchain::support(self.blockchain_type.blockchain).public_key_content)(&self.key)
    }

    /// Check `signature` over `message`; malformed signatures do not verify
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        (blockchain::support(self.blockchain_type.blockchain).verify)(&self.key, message, signature)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let support = blockchain::support(self.blockchain_type.blockchain);
        f.write_str(&(support.public_key_to_string)(&self.key))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("blockchain_type", &self.blockchain_type)
            .field("key", &self.to_string())
            .finish()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.content() == other.content()
    }
}

impl Eq for PublicKey {}

/// A key pair for a specific blockchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        if private_key.blockchain_type() != public_key.blockchain_type() {
            return Err(Error::InvalidKey("Key type mismatch".to_string()));
        }
        if private_key.public_key() != public_key {
            return Err(Error::InvalidKey("Public key does not belong to the private key".to_string()));
        }
        Ok(Self { private_key, public_key })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn blockchain_type(&self) -> BlockchainType {
        self.private_key.blockchain_type()
    }
}

impl From<PrivateKey> for KeyPair {
    fn from(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self { private_key, public_key }
    }
}

/// Derive a key pair from a seed for a specific blockchain
pub fn derive_key_pair(seed: &[u8], blockchain_type: BlockchainType, path: &str) -> Result<KeyPair> {
    let key = ExtendedKey::from_seed(seed, blockchain_type.net_type)?.derive_path_str(path)?;
    Ok(KeyPair::from(key.private_key(blockchain_type)?))
}
