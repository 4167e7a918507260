//! Key derivation engine
//!
//! SECURITY: this is the ONLY place where private keys come into existence.
//! - Keys are recomputed from the seed on every call, never cached
//! - Intermediate seed and scalar bytes are zeroized on every exit path
//! - The resulting `KeyPair` has no Serialize impl and a redacted Debug

use super::path::AccountPath;
use super::seed::SeedPhrase;
use super::signer::{Digest, RecoverableSignature};
use crate::{Error, Result};
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use bip32::XPrv;
use tracing::debug;
use zeroize::Zeroizing;

/// Derive the key-pair for `index` from `seed`.
///
/// Walks `m/44'/60'/0'/0/{index}` from the BIP-32 master key. The same
/// `(seed, index)` always yields the same key-pair and address.
pub fn derive(seed: &SeedPhrase, index: i64) -> Result<KeyPair> {
    let path = AccountPath::new(index)?;
    let bip32_path = path.to_bip32()?;

    let seed_bytes = seed.to_seed()?;
    let xprv = XPrv::derive_from_path(&seed_bytes[..], &bip32_path).map_err(|e| {
        Error::DerivationFailure(format!("child derivation failed at {}: {}", path, e))
    })?;
    drop(seed_bytes);

    let key_bytes: Zeroizing<[u8; 32]> = Zeroizing::new(xprv.private_key().to_bytes().into());
    drop(xprv);

    let signer = PrivateKeySigner::from_slice(&key_bytes[..])
        .map_err(|e| Error::DerivationFailure(format!("invalid derived scalar: {}", e)))?;

    let key_pair = KeyPair { signer, path };
    debug!(index, address = %key_pair.address(), "Derived account");
    Ok(key_pair)
}

/// A derived account: private key plus its public address.
///
/// Owned by the call that derived it. The signing key inside zeroizes
/// itself on drop.
pub struct KeyPair {
    signer: PrivateKeySigner,
    path: AccountPath,
}

impl KeyPair {
    /// Public address (safe to share)
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// EIP-55 checksummed address string
    pub fn address_string(&self) -> String {
        self.address().to_checksum(None)
    }

    pub fn path(&self) -> &AccountPath {
        &self.path
    }

    /// Raw private scalar, wiped when the returned buffer is dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signer.to_bytes().0)
    }

    /// Sign a 32-byte digest as given (no further hashing), RFC 6979 nonce.
    pub fn sign_digest(&self, digest: &Digest) -> Result<RecoverableSignature> {
        let signature = self
            .signer
            .sign_hash_sync(&B256::from(*digest.as_bytes()))
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(RecoverableSignature::from_alloy(&signature))
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("path", &self.path.to_string())
            .field("address", &self.address())
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
