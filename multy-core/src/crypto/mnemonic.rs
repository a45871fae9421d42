//! Mnemonic phrase generation and handling

use bip39::Mnemonic;
use serde::{Deserialize, Serialize};

use crate::entropy::{read_entropy, EntropySource};
use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    #[default]
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    pub fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16, // 128 bits = 16 bytes
            Self::Words24 => 32, // 256 bits = 32 bytes
        }
    }

    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }

    pub fn from_word_count(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            24 => Ok(Self::Words24),
            other => Err(Error::Mnemonic(format!(
                "Unsupported word count {}, expected 12 or 24",
                other
            ))),
        }
    }
}

/// Generate a new mnemonic phrase with the specified strength
///
/// Fails with [`Error::Entropy`] if `entropy` cannot supply the full amount.
pub fn generate_mnemonic(strength: MnemonicStrength, entropy: &mut dyn EntropySource) -> Result<String> {
    let entropy = read_entropy(entropy, strength.entropy_bytes())?;

    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| Error::Mnemonic(e.to_string()))?;

    Ok(mnemonic.to_string())
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse_normalized(phrase)
        .map(|_| ())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Vec<u8>> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| Error::Mnemonic(e.to_string()))?;

    let seed = mnemonic.to_seed(passphrase.unwrap_or(""));
    Ok(seed.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{DeterministicEntropy, FnEntropy, OsEntropy};

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        let mnemonic = generate_mnemonic(MnemonicStrength::Words12, &mut OsEntropy).unwrap();
        assert!(validate_mnemonic(&mnemonic).is_ok());

        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        assert_eq!(words.len(), 12);
    }

    #[test]
    fn test_generate_24_words() {
        let mnemonic = generate_mnemonic(MnemonicStrength::Words24, &mut OsEntropy).unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 24);
    }

    #[test]
    fn test_generate_from_deterministic_entropy() {
        let mnemonic = generate_mnemonic(MnemonicStrength::Words12, &mut DeterministicEntropy::new()).unwrap();
        assert_eq!(mnemonic, ABANDON_ABOUT);
    }

    #[test]
    fn test_generate_fails_without_entropy() {
        let mut empty = FnEntropy(|_: &mut [u8]| 0);
        assert!(matches!(
            generate_mnemonic(MnemonicStrength::Words12, &mut empty),
            Err(Error::Entropy(_))
        ));
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(ABANDON_ABOUT).is_ok());
        assert!(matches!(validate_mnemonic(invalid), Err(Error::Mnemonic(_))));
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = mnemonic_to_seed(ABANDON_ABOUT, None).unwrap();

        assert_eq!(seed.len(), 64); // BIP39 seeds are 512 bits (64 bytes)
        assert_eq!(hex::encode(&seed[..8]), "5eb00bbddcf06908");
        assert_ne!(seed, mnemonic_to_seed(ABANDON_ABOUT, Some("TREZOR")).unwrap());
    }

    #[test]
    fn test_strength_word_counts() {
        assert_eq!(MnemonicStrength::from_word_count(24).unwrap(), MnemonicStrength::Words24);
        assert!(MnemonicStrength::from_word_count(15).is_err());
        assert_eq!(MnemonicStrength::default().word_count(), 12);
    }
}
