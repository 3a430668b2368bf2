use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolver::{IpFamily, ResolveFlags};

/// Durations are written as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

fn default_resolve_timeout() -> Duration {
    Duration::from_millis(5000)
}

fn default_connect_timeout() -> Duration {
    Duration::from_millis(1000)
}

fn default_operation_timeout() -> Duration {
    Duration::from_millis(500)
}

fn default_retry_interval() -> Duration {
    Duration::from_millis(100)
}

/// Everything a connector needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: String,

    /// Budget of one background resolution.
    #[serde(
        rename = "resolve_timeout_ms",
        with = "millis",
        default = "default_resolve_timeout"
    )]
    pub resolve_timeout: Duration,

    /// Default budget of `acquire_default`.
    #[serde(
        rename = "connect_timeout_ms",
        with = "millis",
        default = "default_connect_timeout"
    )]
    pub connect_timeout: Duration,

    /// Budget of each I/O call on handed out sessions.
    #[serde(
        rename = "operation_timeout_ms",
        with = "millis",
        default = "default_operation_timeout"
    )]
    pub operation_timeout: Duration,

    /// Pause after a failed resolution before the next attempt.
    #[serde(
        rename = "retry_interval_ms",
        with = "millis",
        default = "default_retry_interval"
    )]
    pub retry_interval: Duration,

    #[serde(default)]
    pub ip_family: IpFamily,

    #[serde(default)]
    pub resolve_flags: ResolveFlags,

    /// Name checked against the peer certificate, the host by default.
    #[serde(default)]
    pub tls_domain: Option<String>,

    /// Skip certificate verification. Only meant for testing.
    #[serde(default)]
    pub tls_insecure: bool,
}

impl ConnectorConfig {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        resolve_timeout: Duration,
        connect_timeout: Duration,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            resolve_timeout,
            connect_timeout,
            operation_timeout,
            retry_interval: default_retry_interval(),
            ip_family: IpFamily::default(),
            resolve_flags: ResolveFlags::default(),
            tls_domain: None,
            tls_insecure: false,
        }
    }

    /// Config with default timeouts.
    pub fn with_target(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(
            host,
            port,
            default_resolve_timeout(),
            default_connect_timeout(),
            default_operation_timeout(),
        )
    }

    pub fn ip_family(mut self, ip_family: IpFamily) -> Self {
        self.ip_family = ip_family;
        self
    }

    pub fn resolve_flags(mut self, resolve_flags: ResolveFlags) -> Self {
        self.resolve_flags = resolve_flags;
        self
    }

    pub fn retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    pub fn tls_domain(&self) -> &str {
        self.tls_domain.as_deref().unwrap_or(&self.host)
    }

    pub fn with_tls_domain(mut self, domain: Option<String>) -> Self {
        self.tls_domain = domain;
        self
    }

    pub fn with_tls_insecure(mut self, insecure: bool) -> Self {
        self.tls_insecure = insecure;
        self
    }

    /// Get the target in the format of host:port.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
