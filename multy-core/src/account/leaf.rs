//! Leaf accounts

use tracing::debug;

use crate::amount;
use crate::big_int::BigInt;
use crate::blockchain::{self, BlockchainType};
use crate::crypto::keys::{DerivationPath, KeyPair, PrivateKey, PublicKey};
use crate::error::{Error, Result};

/// A key pair of one blockchain, with its address once known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    key_pair: KeyPair,
    path: Option<DerivationPath>,
    address: Option<String>,
}

impl Account {
    /// Create an account from a key pair; `path` is `None` for imported keys
    pub fn from_key_pair(key_pair: KeyPair, path: Option<DerivationPath>) -> Result<Self> {
        let support = blockchain::support(key_pair.blockchain_type().blockchain);
        let address = match support.derive_address {
            Some(derive) => Some(derive(key_pair.public_key())?),
            None => None,
        };

        debug!(
            blockchain = %key_pair.blockchain_type().blockchain,
            path = ?path.as_ref().map(ToString::to_string),
            has_address = address.is_some(),
            "created account"
        );

        Ok(Self {
            key_pair,
            path,
            address,
        })
    }

    /// Import an account from a serialized private key
    pub fn from_private_key(blockchain_type: BlockchainType, serialized: &str) -> Result<Self> {
        let private_key = PrivateKey::from_string(blockchain_type, serialized)?;
        Self::from_key_pair(KeyPair::from(private_key), None)
    }

    pub fn blockchain_type(&self) -> BlockchainType {
        self.key_pair.blockchain_type()
    }

    /// Derivation path of the leaf, or `None` for an imported key
    pub fn path(&self) -> Option<&DerivationPath> {
        self.path.as_ref()
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.key_pair.private_key()
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// The account address
    ///
    /// Chains whose addresses are registered account names report
    /// [`Error::AddressUnavailable`] until [`Account::set_address`] is called.
    pub fn address(&self) -> Result<&str> {
        self.address.as_deref().ok_or_else(|| {
            Error::AddressUnavailable(format!(
                "{} addresses are registered on chain and must be assigned",
                self.blockchain_type().blockchain
            ))
        })
    }

    /// Assign a registered account name to an account of a chain that cannot
    /// derive addresses from keys
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        let blockchain_type = self.blockchain_type();
        if blockchain::can_derive_address_from_private_key(blockchain_type.blockchain) {
            return Err(Error::InvalidAddress(format!(
                "{} addresses are derived from the key and cannot be assigned",
                blockchain_type.blockchain
            )));
        }

        blockchain::validate_address(blockchain_type, address)?;
        self.address = Some(address.to_string());
        Ok(())
    }

    /// Parse an amount in the chain's display unit into its smallest unit
    pub fn parse_amount(&self, text: &str) -> Result<BigInt> {
        amount::parse_amount_with_decimals(text, self.decimals())
    }

    /// Render an amount of the chain's smallest unit in its display unit
    pub fn format_amount(&self, amount: &BigInt) -> String {
        format!("{} {}", amount.to_decimal_string(self.decimals()), self.unit())
    }

    /// Display unit of the chain, such as `BTC`
    pub fn unit(&self) -> &'static str {
        blockchain::support(self.blockchain_type().blockchain).unit()
    }

    fn decimals(&self) -> u32 {
        blockchain::support(self.blockchain_type().blockchain).decimals()
    }

    /// Sign `message` with the account's private key
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.private_key().sign(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Blockchain;

    const ETH_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn ethereum() -> Account {
        Account::from_private_key(BlockchainType::mainnet(Blockchain::Ethereum), ETH_KEY).unwrap()
    }

    #[test]
    fn test_imported_account() {
        let account = ethereum();
        assert!(account.path().is_none());
        assert_eq!(account.address().unwrap(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(account.private_key().to_string(), ETH_KEY);
    }

    #[test]
    fn test_address_cannot_be_assigned_to_derivable_chain() {
        let mut account = ethereum();
        assert!(matches!(
            account.set_address("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_amounts() {
        let account = ethereum();
        let amount = account.parse_amount("1.5").unwrap();
        assert_eq!(amount, BigInt::from(1_500_000_000_000_000_000u64));
        assert_eq!(account.format_amount(&amount), "1.5 ETH");
        assert!(account.parse_amount("-1").is_err());
        assert!(account.parse_amount("0.0000000000000000001").is_err());

        let bitcoin = Account::from_private_key(
            BlockchainType::mainnet(Blockchain::Bitcoin),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn",
        )
        .unwrap();
        assert_eq!(bitcoin.parse_amount("0.00000001").unwrap(), BigInt::from(1u32));
        assert_eq!(bitcoin.format_amount(&BigInt::from(250_000_000u64)), "2.5 BTC");
    }

    #[test]
    fn test_sign() {
        let account = ethereum();
        let signature = account.sign(b"message").unwrap();
        assert!(account.public_key().verify(b"message", &signature));
    }

    #[cfg(feature = "eos")]
    #[test]
    fn test_eos_address_must_be_assigned() {
        let eos = BlockchainType::mainnet(Blockchain::Eos);
        let mut account =
            Account::from_private_key(eos, "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf").unwrap();

        assert!(matches!(account.address(), Err(Error::AddressUnavailable(_))));
        assert!(matches!(account.set_address("Not Valid"), Err(Error::InvalidAddress(_))));
        account.set_address("multyio").unwrap();
        assert_eq!(account.address().unwrap(), "multyio");
        assert_eq!(account.format_amount(&BigInt::from(12345u32)), "1.2345 EOS");
    }
}
