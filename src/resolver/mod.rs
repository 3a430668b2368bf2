use std::{io, net::SocketAddr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::PBF;

mod dns_resolver;

pub use dns_resolver::*;

#[cfg(test)]
mod tests;

pub type ResolveResult = Result<Vec<SocketAddr>, ResolveError>;

/// Turns a configured host/port into an ordered list of endpoints.
pub trait Resolve: Send + Sync + 'static {
    /// Resolve within `timeout`. A successful result is never empty.
    fn resolve(&self, timeout: Duration) -> PBF<'_, ResolveResult>;
}

/// Version of IP protocol to resolve into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    Ipv4,
    Ipv6,
    #[default]
    Any,
}

impl IpFamily {
    pub fn admits(&self, addr: &SocketAddr) -> bool {
        match self {
            IpFamily::Ipv4 => addr.is_ipv4(),
            IpFamily::Ipv6 => addr.is_ipv6(),
            IpFamily::Any => true,
        }
    }
}

/// Flags that determine how name resolution is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveFlags {
    /// The host must be an IP literal, no lookup is performed.
    pub numeric_host: bool,
    /// When IPv6 is requested and only IPv4 results exist, return them as IPv4-mapped IPv6.
    pub v4_mapped: bool,
    /// Only return families the local host has configured.
    pub address_configured: bool,
}

impl Default for ResolveFlags {
    fn default() -> Self {
        Self {
            numeric_host: false,
            v4_mapped: false,
            address_configured: true,
        }
    }
}

impl ResolveFlags {
    pub fn none() -> Self {
        Self {
            numeric_host: false,
            v4_mapped: false,
            address_configured: false,
        }
    }

    pub fn numeric_host(mut self, on: bool) -> Self {
        self.numeric_host = on;
        self
    }

    pub fn v4_mapped(mut self, on: bool) -> Self {
        self.v4_mapped = on;
        self
    }

    pub fn address_configured(mut self, on: bool) -> Self {
        self.address_configured = on;
        self
    }
}

/// A failed resolution. Cheap to clone so the last one can be kept and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("resolving {0} timed out")]
    Timeout(String),

    #[error("resolving {target} failed: {message}")]
    Lookup {
        target: String,
        kind: io::ErrorKind,
        message: String,
    },

    #[error("{0} resolved to no usable endpoints")]
    NoEndpoints(String),

    #[error("invalid port {0:?}")]
    InvalidPort(String),

    #[error("{0:?} is not a numeric host")]
    NotNumericHost(String),
}

impl ResolveError {
    pub fn lookup(target: impl Into<String>, err: &io::Error) -> Self {
        ResolveError::Lookup {
            target: target.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
