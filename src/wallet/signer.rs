//! Digest signing
//!
//! Signs caller-supplied 32-byte digests with the key of an indexed account.
//! The digest is signed exactly as given, with no prefixing or re-hashing.

use super::deriver::derive;
use super::seed::SeedPhrase;
use crate::{Error, Result};
use alloy::primitives::{hex, Address, Signature, B256, U256};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Smallest index the signing entry point accepts.
///
/// Account 0 is derivable, but is not exposed for signing.
pub const MIN_SIGNING_INDEX: i64 = 1;

/// A pre-hashed 32-byte message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex digest with an optional `0x` prefix.
    pub fn from_hex(input: &str) -> Result<Self> {
        let trimmed = input.strip_prefix("0x").unwrap_or(input);
        if let Some(pos) = trimmed.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(Error::InvalidDigestEncoding(format!(
                "non-hex character at position {}",
                pos
            )));
        }

        let bytes =
            hex::decode(trimmed).map_err(|e| Error::InvalidDigestEncoding(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidDigestLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// 65-byte `r || s || v` signature, `v` being the raw recovery parity (0 or 1)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    pub(crate) fn from_alloy(signature: &Signature) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
        bytes[64] = signature.v() as u8;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Recover the signer's address from `(digest, signature)` alone.
    pub fn recover_address(&self, digest: &Digest) -> Result<Address> {
        self.to_alloy()
            .recover_address_from_prehash(&B256::from(*digest.as_bytes()))
            .map_err(|e| Error::Signing(format!("recovery failed: {}", e)))
    }

    /// True if this signature over `digest` was produced by `address`.
    pub fn verify(&self, digest: &Digest, address: Address) -> bool {
        self.recover_address(digest)
            .map(|recovered| recovered == address)
            .unwrap_or(false)
    }

    fn to_alloy(&self) -> Signature {
        Signature::new(
            U256::from_be_slice(&self.0[..32]),
            U256::from_be_slice(&self.0[32..64]),
            self.0[64] == 1,
        )
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

/// Sign a hex digest for account `index`.
///
/// Checks run before any key material is derived: the index must be at
/// least [`MIN_SIGNING_INDEX`], then the digest must be valid hex decoding
/// to exactly 32 bytes.
pub fn sign(seed: &SeedPhrase, index: i64, digest_hex: &str) -> Result<RecoverableSignature> {
    check_signing_index(index)?;
    let digest = Digest::from_hex(digest_hex)?;
    sign_digest(seed, index, &digest)
}

/// Sign an already-decoded digest for account `index`.
pub fn sign_digest(seed: &SeedPhrase, index: i64, digest: &Digest) -> Result<RecoverableSignature> {
    check_signing_index(index)?;

    let key_pair = derive(seed, index)?;
    let signature = key_pair.sign_digest(digest)?;
    debug!(index, address = %key_pair.address(), "Signed digest");
    Ok(signature)
}

fn check_signing_index(index: i64) -> Result<()> {
    if index < MIN_SIGNING_INDEX {
        return Err(Error::InvalidIndex(index));
    }
    Ok(())
}
