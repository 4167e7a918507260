//! Deployment configuration
//!
//! Two sources, loaded once at startup:
//! - `config.json` for the transport layer (root path, port, IP allow-list)
//! - Environment variables for the seed phrase (see [`SeedPhrase::from_env`])
//!
//! [`SeedPhrase::from_env`]: crate::wallet::SeedPhrase::from_env

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

/// Seed phrase environment variable name
pub const MNEMONIC_ENV: &str = "MNEMONIC";
/// Optional BIP-39 passphrase environment variable name
pub const MNEMONIC_PASSPHRASE_ENV: &str = "MNEMONIC_PASSPHRASE";

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Address lookup endpoint name
pub const ADDRESS_ENDPOINT: &str = "address";
/// Digest signing endpoint name
pub const SIGN_ENDPOINT: &str = "sign";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix all endpoints are mounted under
    #[serde(default = "default_root_path")]
    pub rootpath: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Clients allowed to call the service. Empty disables the check.
    #[serde(default)]
    pub allowed_ips: Vec<IpAddr>,
}

fn default_root_path() -> String {
    "/".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rootpath: default_root_path(),
            port: default_port(),
            allowed_ips: Vec::new(),
        }
    }
}

impl Config {
    /// Read and parse a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Full route of `endpoint` under the configured root path
    pub fn route(&self, endpoint: &str) -> String {
        let root = self.rootpath.trim_matches('/');
        if root.is_empty() {
            format!("/{}", endpoint)
        } else {
            format!("/{}/{}", root, endpoint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_deserialize_reference_layout() {
        let value = serde_json::json!({
            "rootpath": "/signer",
            "port": 9000,
            "allowed_ips": ["127.0.0.1", "10.0.0.7"]
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.rootpath, "/signer");
        assert_eq!(parsed.port, 9000);
        assert_eq!(parsed.allowed_ips.len(), 2);
        assert_eq!(parsed.allowed_ips[1], "10.0.0.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn config_deserialize_defaults() {
        let parsed: Config = serde_json::from_value(serde_json::json!({})).expect("parse config");
        assert_eq!(parsed, Config::default());
        assert!(parsed.allowed_ips.is_empty());
    }

    #[test]
    fn config_rejects_bad_ip() {
        let value = serde_json::json!({ "allowed_ips": ["not-an-ip"] });
        assert!(serde_json::from_value::<Config>(value).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rootpath": "/api", "port": 3000, "allowed_ips": []}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.rootpath, "/api");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn load_errors_are_recoverable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        assert!(matches!(Config::load(&missing), Err(Error::Config(_))));
        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn routes_join_root_path() {
        let mut config = Config::default();
        assert_eq!(config.route(ADDRESS_ENDPOINT), "/address");

        config.rootpath = "/api/v1/".to_string();
        assert_eq!(config.route(SIGN_ENDPOINT), "/api/v1/sign");

        config.rootpath = "api".to_string();
        assert_eq!(config.route(ADDRESS_ENDPOINT), "/api/address");
    }
}
