//! Error types for the signing service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Derivation failed: {0}")]
    DerivationFailure(String),

    #[error("Invalid index {0}: must be at least 1")]
    InvalidIndex(i64),

    #[error("Invalid digest length: expected 32 bytes, got {0}")]
    InvalidDigestLength(usize),

    #[error("Invalid digest encoding: {0}")]
    InvalidDigestEncoding(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP-style status a transport should answer with for this error.
    ///
    /// Caller input problems map to 4xx; anything that points at the
    /// deployment (bad seed phrase, broken derivation) maps to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidIndex(_)
            | Error::InvalidDigestLength(_)
            | Error::InvalidDigestEncoding(_)
            | Error::Json(_) => 400,
            Error::Forbidden(_) => 403,
            Error::InvalidMnemonic(_)
            | Error::DerivationFailure(_)
            | Error::Signing(_)
            | Error::Config(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
