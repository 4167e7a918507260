//! Request-facing signing service
//!
//! The two operations a transport exposes: address lookup and digest
//! signing. The seed phrase is injected once and shared read-only; every
//! request derives its key from scratch and drops it before returning.
//!
//! Request and response bodies match the JSON layout clients already use:
//! `{"address", "index"}`, `{"index", "digestHash"}`, `{"signature"}` and
//! `{"error"}` on failure.

mod access;

pub use access::{
    policy_from_config, AccessDecision, AccessPolicy, AllowAll, IpAllowList, RequestContext,
};

use crate::config::Config;
use crate::wallet::{self, SeedPhrase};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: String,
    pub index: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub index: i64,
    /// Hex digest, optional `0x` prefix
    pub digest_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    pub signature: String,
}

/// Body of every failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code plus JSON body, ready for any transport to write out
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Response {
    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(&Error::Json(e)),
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "error": err.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Address lookup and digest signing over one injected seed phrase
pub struct SignerService {
    seed: Arc<SeedPhrase>,
    access: Box<dyn AccessPolicy>,
}

impl SignerService {
    /// Service open to every caller
    pub fn new(seed: Arc<SeedPhrase>) -> Self {
        Self {
            seed,
            access: Box::new(AllowAll),
        }
    }

    /// Service guarded by the allow-list in `config`
    pub fn from_config(seed: Arc<SeedPhrase>, config: &Config) -> Self {
        info!(
            allowed_ips = config.allowed_ips.len(),
            passphrase = seed.has_passphrase(),
            "Initializing signer service"
        );
        Self::new(seed).with_access_policy(policy_from_config(config))
    }

    pub fn with_access_policy(mut self, access: Box<dyn AccessPolicy>) -> Self {
        self.access = access;
        self
    }

    /// Address of account `index`. Index 0 is a valid account here.
    pub fn get_address(&self, context: &RequestContext, index: i64) -> Result<AddressResponse> {
        self.authorize(context)?;
        let key_pair = wallet::derive(&self.seed, index)?;
        Ok(AddressResponse {
            address: key_pair.address_string(),
            index,
        })
    }

    /// Sign `request.digest_hash` with account `request.index` (must be >= 1).
    pub fn sign(&self, context: &RequestContext, request: &SignRequest) -> Result<SignResponse> {
        self.authorize(context)?;
        let signature = wallet::sign(&self.seed, request.index, &request.digest_hash)?;
        Ok(SignResponse {
            signature: signature.to_hex(),
        })
    }

    /// Run [`get_address`](Self::get_address) and render the outcome.
    pub fn handle_get_address(&self, context: &RequestContext, index: i64) -> Response {
        match self.get_address(context, index) {
            Ok(body) => Response::ok(&body),
            Err(e) => {
                warn!(index, status = e.status_code(), error = %e, "Address request failed");
                Response::error(&e)
            }
        }
    }

    /// Parse a JSON sign request body, run [`sign`](Self::sign) and render
    /// the outcome.
    pub fn handle_sign(&self, context: &RequestContext, body: &str) -> Response {
        let result = serde_json::from_str::<SignRequest>(body)
            .map_err(Error::from)
            .and_then(|request| self.sign(context, &request));

        match result {
            Ok(body) => Response::ok(&body),
            Err(e) => {
                warn!(status = e.status_code(), error = %e, "Sign request failed");
                Response::error(&e)
            }
        }
    }

    fn authorize(&self, context: &RequestContext) -> Result<()> {
        match self.access.check(context) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(reason) => Err(Error::Forbidden(reason)),
        }
    }
}

impl std::fmt::Debug for SignerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerService")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
