//! Tests for key derivation

use multy_core::crypto::keys::{bitcoin, derive_key_pair, ethereum, ExtendedKey, PrivateKey};
use multy_core::crypto::mnemonic::*;
use multy_core::{Blockchain, BlockchainType, Error, NetType};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn seed() -> Vec<u8> {
    mnemonic_to_seed(MNEMONIC, None).unwrap()
}

#[test]
fn test_ethereum_key_derivation() {
    let ethereum_type = BlockchainType::mainnet(Blockchain::Ethereum);
    let key_pair = derive_key_pair(&seed(), ethereum_type, "m/44'/60'/0'/0/0").unwrap();

    assert_eq!(key_pair.blockchain_type(), ethereum_type);

    let address = ethereum::public_key_to_address(key_pair.public_key()).unwrap();
    assert_eq!(address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
}

#[test]
fn test_bitcoin_key_derivation() {
    let bitcoin_type = BlockchainType::mainnet(Blockchain::Bitcoin);
    let key_pair = derive_key_pair(&seed(), bitcoin_type, "m/44'/0'/0'/0/0").unwrap();

    assert_eq!(key_pair.blockchain_type(), bitcoin_type);

    let address = bitcoin::public_key_to_address(key_pair.public_key(), bitcoin::BitcoinAddressType::P2pkh).unwrap();
    assert_eq!(address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
}

#[test]
fn test_bitcoin_segwit_key_derivation() {
    let key_pair = derive_key_pair(&seed(), BlockchainType::mainnet(Blockchain::Bitcoin), "m/84'/0'/0'/0/0").unwrap();

    let address = bitcoin::public_key_to_address(key_pair.public_key(), bitcoin::BitcoinAddressType::P2wpkh).unwrap();
    assert_eq!(address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
}

#[test]
fn test_derivation_is_deterministic() {
    let bitcoin_type = BlockchainType::mainnet(Blockchain::Bitcoin);
    let first = derive_key_pair(&seed(), bitcoin_type, "m/44'/0'/0'/0/3").unwrap();
    let second = derive_key_pair(&seed(), bitcoin_type, "m/44h/0h/0h/0/3").unwrap();
    assert_eq!(first, second);

    let other = derive_key_pair(&seed(), bitcoin_type, "m/44'/0'/0'/0/4").unwrap();
    assert_ne!(first.public_key(), other.public_key());
}

#[test]
fn test_exported_key_round_trip() {
    for blockchain_type in [
        BlockchainType::mainnet(Blockchain::Bitcoin),
        BlockchainType::testnet(Blockchain::Bitcoin),
        BlockchainType::mainnet(Blockchain::Ethereum),
    ] {
        let key_pair = derive_key_pair(&seed(), blockchain_type, "m/44'/1'/0'/0/0").unwrap();
        let exported = key_pair.private_key().to_string();

        let imported = PrivateKey::from_string(blockchain_type, &exported).unwrap();
        assert_eq!(&imported, key_pair.private_key());
        assert_eq!(&imported.public_key(), key_pair.public_key());
    }
}

#[test]
fn test_extended_key_serialization_round_trip() {
    let master = ExtendedKey::from_seed(&seed(), NetType::Mainnet).unwrap();
    let account = master.derive_path_str("m/44'/0'/0'").unwrap();

    let xprv: ExtendedKey = account.to_string().parse().unwrap();
    let xpub: ExtendedKey = account.public().to_string().parse().unwrap();
    assert_eq!(xprv, account);
    assert_eq!(xpub.depth(), 3);
    assert_eq!(xpub.parent_fingerprint(), master.derive_path_str("m/44'/0'").unwrap().fingerprint());
}

#[test]
fn test_invalid_derivation_paths() {
    let ethereum_type = BlockchainType::mainnet(Blockchain::Ethereum);
    for path in ["", "44'/60'", "m/", "m//0", "m/abc", "m/2147483648", "m/0'x"] {
        assert!(
            matches!(derive_key_pair(&seed(), ethereum_type, path), Err(Error::InvalidDerivationPath(_))),
            "path {:?} should be rejected",
            path
        );
    }
}
