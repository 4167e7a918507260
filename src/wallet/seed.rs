//! Seed phrase handling
//!
//! SECURITY: the phrase is the root of every account this service can sign for.
//! - Held in a `SecretString`, only exposed while expanding it into a seed
//! - The expanded 64-byte seed is zeroized as soon as the caller drops it
//! - Never serialized, never logged

use crate::config::{MNEMONIC_ENV, MNEMONIC_PASSPHRASE_ENV};
use crate::{Error, Result};
use bip39::{Language, Mnemonic};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// BIP-39 mnemonic plus optional passphrase, injected once at startup
pub struct SeedPhrase {
    phrase: SecretString,
    passphrase: Option<SecretString>,
}

impl SeedPhrase {
    /// Wrap a mnemonic phrase. Validation is deferred to [`validate`](Self::validate)
    /// or the first derivation.
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: SecretString::from(phrase.into()),
            passphrase: None,
        }
    }

    /// Attach a BIP-39 passphrase (the "25th word").
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        let passphrase = passphrase.into();
        self.passphrase = if passphrase.is_empty() {
            None
        } else {
            Some(SecretString::from(passphrase))
        };
        self
    }

    /// Load the phrase from `MNEMONIC` and the optional passphrase from
    /// `MNEMONIC_PASSPHRASE`.
    pub fn from_env() -> Result<Self> {
        let phrase = std::env::var(MNEMONIC_ENV).map_err(|_| {
            Error::Config(format!(
                "Environment variable {} not set. Required for key derivation.",
                MNEMONIC_ENV
            ))
        })?;

        let seed = Self::new(phrase);
        Ok(match std::env::var(MNEMONIC_PASSPHRASE_ENV) {
            Ok(passphrase) => seed.with_passphrase(passphrase),
            Err(_) => seed,
        })
    }

    pub fn has_passphrase(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Check word list membership, word count and checksum.
    pub fn validate(&self) -> Result<()> {
        self.parse().map(|_| ())
    }

    /// Expand into the 64-byte BIP-39 seed (PBKDF2-HMAC-SHA512).
    pub(crate) fn to_seed(&self) -> Result<Zeroizing<[u8; 64]>> {
        let mnemonic = self.parse()?;
        let passphrase = self
            .passphrase
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or("");
        Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
    }

    fn parse(&self) -> Result<Mnemonic> {
        Mnemonic::parse_in(Language::English, self.phrase.expose_secret())
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))
    }
}

// Implement Debug manually to avoid exposing the phrase
impl std::fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedPhrase")
            .field("phrase", &"[REDACTED]")
            .field("has_passphrase", &self.has_passphrase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_valid_phrase() {
        let seed = SeedPhrase::new(TEST_MNEMONIC);
        assert!(seed.validate().is_ok());
        assert_eq!(seed.to_seed().unwrap().len(), 64);
    }

    #[test]
    fn test_bip39_seed_vector() {
        // BIP-39 reference vector for the all-"abandon" phrase with passphrase "TREZOR"
        let seed = SeedPhrase::new(TEST_MNEMONIC).with_passphrase("TREZOR");
        assert_eq!(
            alloy::primitives::hex::encode(&seed.to_seed().unwrap()[..]),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let plain = SeedPhrase::new(TEST_MNEMONIC).to_seed().unwrap();
        let salted = SeedPhrase::new(TEST_MNEMONIC)
            .with_passphrase("TREZOR")
            .to_seed()
            .unwrap();
        assert_ne!(&*plain, &*salted);
    }

    #[test]
    fn test_empty_passphrase_is_none() {
        let seed = SeedPhrase::new(TEST_MNEMONIC).with_passphrase("");
        assert!(!seed.has_passphrase());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let seed = SeedPhrase::new(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
        );
        assert!(matches!(seed.validate(), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_unknown_word_rejected() {
        let seed = SeedPhrase::new(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon notaword",
        );
        assert!(matches!(seed.to_seed(), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_wrong_word_count_rejected() {
        let seed = SeedPhrase::new("abandon abandon abandon");
        assert!(matches!(seed.validate(), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_error_does_not_echo_phrase() {
        let err = SeedPhrase::new("zebra zebra zebra").validate().unwrap_err();
        assert!(!err.to_string().contains("zebra"));
    }

    #[test]
    fn test_debug_redacts_phrase() {
        let seed = SeedPhrase::new(TEST_MNEMONIC).with_passphrase("TREZOR");
        let debug_str = format!("{:?}", seed);
        assert!(!debug_str.contains("abandon"));
        assert!(!debug_str.contains("TREZOR"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
