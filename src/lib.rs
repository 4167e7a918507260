//! HD Signing Service
//!
//! Derives indexed Ethereum accounts from a single seed phrase and signs
//! caller-supplied 32-byte digests with them:
//! - `derive(seed, index)` walks `m/44'/60'/0'/0/{index}` and returns the key-pair
//! - `sign(seed, index, digest)` signs the digest as given, with a recovery byte
//!
//! # Security Model
//!
//! - The seed phrase is injected once and shared read-only
//! - Keys are recomputed per call and never cached, serialized or logged
//! - Every failure is a returned error; a bad request never takes the process down

pub mod config;
pub mod service;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use service::{RequestContext, SignerService};
pub use wallet::{derive, sign, AccountPath, Digest, KeyPair, RecoverableSignature, SeedPhrase};
