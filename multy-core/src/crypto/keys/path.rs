//! BIP-32 derivation paths

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One segment of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChildNumber {
    /// Index in `0..2^31`, derivable from a public parent
    Normal(u32),
    /// Index in `0..2^31`, serialized with the hardened bit set
    Hardened(u32),
}

impl ChildNumber {
    pub const HARDENED_BIT: u32 = 0x8000_0000;

    pub fn normal(index: u32) -> Result<Self> {
        if index & Self::HARDENED_BIT != 0 {
            return Err(Error::InvalidDerivationPath(format!("Index {} is out of range", index)));
        }
        Ok(Self::Normal(index))
    }

    pub fn hardened(index: u32) -> Result<Self> {
        if index & Self::HARDENED_BIT != 0 {
            return Err(Error::InvalidDerivationPath(format!("Index {}' is out of range", index)));
        }
        Ok(Self::Hardened(index))
    }

    /// Interpret a raw 32-bit child number, hardened when the top bit is set
    pub fn from_u32(raw: u32) -> Self {
        if raw & Self::HARDENED_BIT != 0 {
            Self::Hardened(raw ^ Self::HARDENED_BIT)
        } else {
            Self::Normal(raw)
        }
    }

    /// The raw 32-bit child number used in serialization and HMAC input
    pub fn to_u32(self) -> u32 {
        match self {
            Self::Normal(index) => index,
            Self::Hardened(index) => index | Self::HARDENED_BIT,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::Normal(index) | Self::Hardened(index) => index,
        }
    }

    pub fn is_hardened(self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// The following child number of the same kind, if any
    pub(crate) fn next(self) -> Option<Self> {
        let index = self.index().checked_add(1).filter(|i| i & Self::HARDENED_BIT == 0)?;
        Some(match self {
            Self::Normal(_) => Self::Normal(index),
            Self::Hardened(_) => Self::Hardened(index),
        })
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(index) => write!(f, "{}", index),
            Self::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(segment: &str) -> Result<Self> {
        let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDerivationPath(format!(
                "Invalid derivation path component: {:?}",
                segment
            )));
        }

        let index = digits.parse::<u32>().map_err(|_| {
            Error::InvalidDerivationPath(format!("Index {} is out of range", digits))
        })?;

        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

/// A path from the master node, such as `m/44'/60'/0'/0/0`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path `m`
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// BIP-44 account node `m/44'/coin_type'/account'`
    pub fn bip44_account(coin_type: u32, account: u32) -> Result<Self> {
        Ok(Self(vec![
            ChildNumber::hardened(44)?,
            ChildNumber::hardened(coin_type)?,
            ChildNumber::hardened(account)?,
        ]))
    }

    /// This path extended by one segment
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut segments = self.0.clone();
        segments.push(child);
        Self(segments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildNumber> {
        self.0.iter()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(segments: Vec<ChildNumber>) -> Self {
        Self(segments)
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(Error::InvalidDerivationPath(format!(
                "Derivation path must start with \"m\": {:?}",
                path
            )));
        }

        segments
            .map(|segment| {
                segment.parse::<ChildNumber>().map_err(|e| match e {
                    Error::InvalidDerivationPath(reason) => {
                        Error::InvalidDerivationPath(format!("{} in {:?}", reason, path))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}
