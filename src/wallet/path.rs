//! BIP-44 account paths
//!
//! Every account lives on the external chain of the first Ethereum account:
//! `m/44'/60'/0'/0/{index}`. The first three levels are hardened, the final
//! index level is not, so the index must fit a non-hardened child number.

use crate::{Error, Result};
use std::fmt;

/// BIP-44 purpose level
pub const PURPOSE: u32 = 44;
/// SLIP-44 coin type shared by EVM chains
pub const COIN_TYPE: u32 = 60;
pub const ACCOUNT: u32 = 0;
/// External (receiving) chain
pub const CHANGE: u32 = 0;

/// Largest index accepted at the non-hardened final level (2^31 - 1)
pub const MAX_INDEX: i64 = 0x7FFF_FFFF;

/// Canonical derivation path for one indexed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountPath {
    index: u32,
}

impl AccountPath {
    /// Build the path for `index`.
    ///
    /// Index 0 is a valid account. Negative indices and indices past
    /// [`MAX_INDEX`] cannot be encoded as a non-hardened component.
    pub fn new(index: i64) -> Result<Self> {
        if !(0..=MAX_INDEX).contains(&index) {
            return Err(Error::DerivationFailure(format!(
                "index {} outside non-hardened range 0..={}",
                index, MAX_INDEX
            )));
        }
        Ok(Self {
            index: index as u32,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Parse into the `bip32` representation used for path walking
    pub fn to_bip32(&self) -> Result<bip32::DerivationPath> {
        let path = self.to_string();
        path.parse()
            .map_err(|e| Error::DerivationFailure(format!("invalid path '{}': {}", path, e)))
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}/{}",
            PURPOSE, COIN_TYPE, ACCOUNT, CHANGE, self.index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bip32::ChildNumber;

    #[test]
    fn test_canonical_path_string() {
        assert_eq!(AccountPath::new(0).unwrap().to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(AccountPath::new(7).unwrap().to_string(), "m/44'/60'/0'/0/7");
        assert_eq!(
            AccountPath::new(MAX_INDEX).unwrap().to_string(),
            "m/44'/60'/0'/0/2147483647"
        );
    }

    #[test]
    fn test_same_index_same_path() {
        assert_eq!(AccountPath::new(42).unwrap(), AccountPath::new(42).unwrap());
        assert_ne!(AccountPath::new(42).unwrap(), AccountPath::new(43).unwrap());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            AccountPath::new(-1),
            Err(Error::DerivationFailure(_))
        ));
        assert!(matches!(
            AccountPath::new(MAX_INDEX + 1),
            Err(Error::DerivationFailure(_))
        ));
        assert!(AccountPath::new(i64::MIN).is_err());
    }

    #[test]
    fn test_hardening_split() {
        let path = AccountPath::new(5).unwrap().to_bip32().unwrap();
        let levels: Vec<ChildNumber> = path.into_iter().collect();
        assert_eq!(levels.len(), 5);
        assert!(levels[..3].iter().all(|c| c.is_hardened()));
        assert!(levels[3..].iter().all(|c| !c.is_hardened()));
        assert_eq!(levels[4].index(), 5);
    }
}
