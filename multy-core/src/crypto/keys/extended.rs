//! BIP-32 hierarchical deterministic keys

use std::fmt;
use std::str::FromStr;

use ::bitcoin::hashes::{hash160, Hash};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Scalar, SecretKey};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use tracing::{debug, trace};

use crate::blockchain::{BlockchainType, NetType};
use crate::codec;
use crate::crypto::SECP;
use crate::error::{Error, Result};
use super::{ChildNumber, DerivationPath, PrivateKey, PublicKey};

/// HMAC key used to derive the master node from a seed
const MASTER_KEY_SALT: &[u8] = b"Bitcoin seed";

const VERSION_XPRV: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
const VERSION_XPUB: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
const VERSION_TPRV: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const VERSION_TPUB: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];

/// Length of a serialized extended key before Base58Check
const SERIALIZED_LEN: usize = 78;

const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

#[derive(Clone, Copy)]
enum KeyMaterial {
    Private(SecretKey),
    Public(Secp256k1PublicKey),
}

/// A node of a BIP-32 key tree
#[derive(Clone)]
pub struct ExtendedKey {
    material: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    child_number: ChildNumber,
    parent_fingerprint: [u8; 4],
    net_type: NetType,
}

impl ExtendedKey {
    /// Derive the master key from a seed
    pub fn from_seed(seed: &[u8], net_type: NetType) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(Error::DerivationFailed(format!(
                "Seed must be {} to {} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            )));
        }

        let (secret_key, chain_code) = hmac_sha512(MASTER_KEY_SALT, seed)?;
        let secret_key = SecretKey::from_slice(&secret_key)
            .map_err(|e| Error::DerivationFailed(format!("Invalid master key: {}", e)))?;

        Ok(Self {
            material: KeyMaterial::Private(secret_key),
            chain_code,
            depth: 0,
            child_number: ChildNumber::Normal(0),
            parent_fingerprint: [0; 4],
            net_type,
        })
    }

    pub fn is_private(&self) -> bool {
        matches!(self.material, KeyMaterial::Private(_))
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn net_type(&self) -> NetType {
        self.net_type
    }

    fn secp_public_key(&self) -> Secp256k1PublicKey {
        match &self.material {
            KeyMaterial::Private(secret) => Secp256k1PublicKey::from_secret_key(&SECP, secret),
            KeyMaterial::Public(public) => *public,
        }
    }

    /// First four bytes of hash160 of the compressed public key
    pub fn fingerprint(&self) -> [u8; 4] {
        let hash = hash160::Hash::hash(&self.secp_public_key().serialize()).to_byte_array();
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// The public-only counterpart of this node
    pub fn public(&self) -> Self {
        Self {
            material: KeyMaterial::Public(self.secp_public_key()),
            ..self.clone()
        }
    }

    /// Derive the child at `child`
    ///
    /// If the child at that index is invalid (probability below 2^-127), the
    /// next index of the same kind is used instead, as BIP-32 prescribes. The
    /// index actually used is reported by [`ExtendedKey::child_number`].
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        if self.depth == u8::MAX {
            return Err(Error::DerivationFailed("Maximum derivation depth reached".to_string()));
        }
        if child.is_hardened() && !self.is_private() {
            return Err(Error::DerivationFailed(format!(
                "Hardened child {} cannot be derived from a public key",
                child
            )));
        }

        self.derive_child_with(child, |candidate| self.child_hmac(candidate))
    }

    /// Try `child` and the following indices of the same kind until `hmac`
    /// yields a valid tweak
    fn derive_child_with(
        &self,
        child: ChildNumber,
        mut hmac: impl FnMut(ChildNumber) -> Result<([u8; 32], [u8; 32])>,
    ) -> Result<Self> {
        let mut candidate = child;
        loop {
            let (tweak, chain_code) = hmac(candidate)?;
            if let Some(key) = self.child_from_tweak(candidate, tweak, chain_code) {
                return Ok(key);
            }
            debug!(index = %candidate, "derived child key is invalid, moving to next index");
            candidate = candidate.next().ok_or_else(|| {
                Error::DerivationFailed(format!("No valid child key at or after index {}", child))
            })?;
        }
    }

    /// `HMAC-SHA512(chain_code, data || index)` split into IL and IR
    fn child_hmac(&self, child: ChildNumber) -> Result<([u8; 32], [u8; 32])> {
        let mut data = Vec::with_capacity(37);

        match (&self.material, child.is_hardened()) {
            (KeyMaterial::Private(secret), true) => {
                // Hardened derivation
                data.push(0);
                data.extend_from_slice(&secret.secret_bytes());
            }
            _ => {
                // Normal derivation
                data.extend_from_slice(&self.secp_public_key().serialize());
            }
        }

        data.extend_from_slice(&child.to_u32().to_be_bytes());

        hmac_sha512(&self.chain_code, &data)
    }

    /// Apply IL to this key; `None` when IL is not below the curve order or
    /// the resulting key is zero or infinity
    fn child_from_tweak(&self, child: ChildNumber, tweak: [u8; 32], chain_code: [u8; 32]) -> Option<Self> {
        let tweak = Scalar::from_be_bytes(tweak).ok()?;

        let material = match self.material {
            KeyMaterial::Private(secret) => KeyMaterial::Private(secret.add_tweak(&tweak).ok()?),
            KeyMaterial::Public(public) => KeyMaterial::Public(public.add_exp_tweak(&SECP, &tweak).ok()?),
        };

        trace!(depth = self.depth + 1, index = %child, "derived child key");

        Some(Self {
            material,
            chain_code,
            depth: self.depth + 1,
            child_number: child,
            parent_fingerprint: self.fingerprint(),
            net_type: self.net_type,
        })
    }

    /// Walk every segment of `path` starting from this node
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut key = self.clone();
        for child in path.iter() {
            key = key.derive_child(*child)?;
        }
        debug!(path = %path, depth = key.depth, private = key.is_private(), "derived extended key");
        Ok(key)
    }

    /// Parse `path` and walk it starting from this node
    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        self.derive_path(&path.parse()?)
    }

    /// The blockchain private key held by this node
    pub fn private_key(&self, blockchain_type: BlockchainType) -> Result<PrivateKey> {
        match self.material {
            KeyMaterial::Private(secret) => Ok(PrivateKey::new(secret, blockchain_type)),
            KeyMaterial::Public(_) => Err(Error::InvalidKey(
                "Extended public key holds no private key".to_string(),
            )),
        }
    }

    /// The blockchain public key of this node
    pub fn public_key(&self, blockchain_type: BlockchainType) -> PublicKey {
        PublicKey::new(self.secp_public_key(), blockchain_type)
    }

    fn version(&self) -> [u8; 4] {
        match (self.net_type, self.is_private()) {
            (NetType::Mainnet, true) => VERSION_XPRV,
            (NetType::Mainnet, false) => VERSION_XPUB,
            (NetType::Testnet, true) => VERSION_TPRV,
            (NetType::Testnet, false) => VERSION_TPUB,
        }
    }

    fn serialize(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(SERIALIZED_LEN);
        data.extend_from_slice(&self.version());
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_number.to_u32().to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        match &self.material {
            KeyMaterial::Private(secret) => {
                data.push(0);
                data.extend_from_slice(&secret.secret_bytes());
            }
            KeyMaterial::Public(public) => data.extend_from_slice(&public.serialize()),
        }
        data
    }
}

/// Calculate HMAC-SHA512 and split the output into halves
fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::DerivationFailed("HMAC error".to_string()))?;

    hmac.update(data);
    let result = hmac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];

    left.copy_from_slice(&result[0..32]);
    right.copy_from_slice(&result[32..64]);

    Ok((left, right))
}

impl fmt::Display for ExtendedKey {
    /// Base58Check `xprv`/`xpub` (or `tprv`/`tpub`) serialization
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::to_base58check(&self.serialize()))
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("private", &self.is_private())
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("fingerprint", &codec::to_hex(&self.fingerprint()))
            .field("net_type", &self.net_type)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize().ct_eq(&other.serialize()).into()
    }
}

impl Eq for ExtendedKey {}

impl FromStr for ExtendedKey {
    type Err = Error;

    fn from_str(encoded: &str) -> Result<Self> {
        let data = codec::from_base58check(encoded)?;
        if data.len() != SERIALIZED_LEN {
            return Err(Error::InvalidKey(format!(
                "Extended key must be {} bytes, got {}",
                SERIALIZED_LEN,
                data.len()
            )));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&data[0..4]);
        let (net_type, private) = match version {
            VERSION_XPRV => (NetType::Mainnet, true),
            VERSION_XPUB => (NetType::Mainnet, false),
            VERSION_TPRV => (NetType::Testnet, true),
            VERSION_TPUB => (NetType::Testnet, false),
            _ => {
                return Err(Error::InvalidKey(format!(
                    "Unknown extended key version {}",
                    codec::to_hex(&version)
                )))
            }
        };

        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut child_bytes = [0u8; 4];
        child_bytes.copy_from_slice(&data[9..13]);
        let child_number = ChildNumber::from_u32(u32::from_be_bytes(child_bytes));
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        if depth == 0 && (parent_fingerprint != [0; 4] || child_number.to_u32() != 0) {
            return Err(Error::InvalidKey(
                "Master key with non-zero parent fingerprint or index".to_string(),
            ));
        }

        let key_data = &data[45..78];
        let material = if private {
            if key_data[0] != 0 {
                return Err(Error::InvalidKey("Private key data must start with 0x00".to_string()));
            }
            let secret = SecretKey::from_slice(&key_data[1..])
                .map_err(|e| Error::InvalidKey(format!("Invalid secret key: {}", e)))?;
            KeyMaterial::Private(secret)
        } else {
            let public = Secp256k1PublicKey::from_slice(key_data)
                .map_err(|e| Error::InvalidKey(format!("Invalid public key: {}", e)))?;
            KeyMaterial::Public(public)
        };

        Ok(Self {
            material,
            chain_code,
            depth,
            child_number,
            parent_fingerprint,
            net_type,
        })
    }
}
