//! Caller access policy
//!
//! A predicate over the request context, consulted before any request
//! touches the seed phrase.

use crate::config::Config;
use std::collections::HashSet;
use std::net::IpAddr;
use tracing::warn;

/// What the transport knows about the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub client_ip: Option<IpAddr>,
}

impl RequestContext {
    pub fn from_ip(ip: IpAddr) -> Self {
        Self {
            client_ip: Some(ip),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(String),
}

pub trait AccessPolicy: Send + Sync {
    fn check(&self, context: &RequestContext) -> AccessDecision;
}

/// Accepts every caller
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn check(&self, _context: &RequestContext) -> AccessDecision {
        AccessDecision::Allow
    }
}

/// Accepts only callers whose address is listed
#[derive(Debug, Clone)]
pub struct IpAllowList {
    allowed: HashSet<IpAddr>,
}

impl IpAllowList {
    pub fn new(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            allowed: ips.into_iter().map(|ip| ip.to_canonical()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl AccessPolicy for IpAllowList {
    fn check(&self, context: &RequestContext) -> AccessDecision {
        match context.client_ip {
            Some(ip) if self.allowed.contains(&ip.to_canonical()) => AccessDecision::Allow,
            Some(ip) => {
                warn!(client_ip = %ip, "Client not in allow-list");
                AccessDecision::Deny(format!("client {} not allowed", ip))
            }
            None => {
                warn!("Client address unknown, denying");
                AccessDecision::Deny("client address unknown".to_string())
            }
        }
    }
}

/// Build the policy described by `config`: an empty `allowed_ips` list
/// leaves the service open.
pub fn policy_from_config(config: &Config) -> Box<dyn AccessPolicy> {
    if config.allowed_ips.is_empty() {
        Box::new(AllowAll)
    } else {
        Box::new(IpAllowList::new(config.allowed_ips.iter().copied()))
    }
}
