mod stream_session_test;
mod udp_session_test;

use std::time::Duration;

use crate::connector::ConnectorConfig;

/// Loopback config with short timeouts.
pub fn local_config(port: u16) -> ConnectorConfig {
    ConnectorConfig::new(
        "127.0.0.1",
        port.to_string(),
        Duration::from_secs(1),
        Duration::from_secs(1),
        Duration::from_millis(500),
    )
}
