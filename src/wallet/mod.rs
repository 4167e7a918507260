//! HD account derivation and digest signing
//!
//! This module turns one seed phrase into many indexed signing accounts.
//! Private keys are derived per call, used, and dropped; nothing is cached.

mod deriver;
mod path;
mod seed;
mod signer;

pub use deriver::{derive, KeyPair};
pub use path::{AccountPath, ACCOUNT, CHANGE, COIN_TYPE, MAX_INDEX, PURPOSE};
pub use seed::SeedPhrase;
pub use signer::{sign, sign_digest, Digest, RecoverableSignature, MIN_SIGNING_INDEX};
