//! Connectors that keep a target's endpoints resolved in the background and
//! hand out fresh sessions (TCP, UDP, TLS, HTTP, HTTPS) before a deadline.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use stream_connector::{
//!     connector::{ConnectorConfig, HttpsConnector},
//!     http::{HttpCommon, HttpRequest},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // Construction only starts resolving, it never blocks.
//! let connector = HttpsConnector::from_config(ConnectorConfig::new(
//!     "example.com",
//!     "443",
//!     Duration::from_secs(5),
//!     Duration::from_secs(1),
//!     Duration::from_millis(500),
//! ))?;
//!
//! let mut session = connector.acquire_default().await?;
//! let request = HttpRequest::new("GET", "/", "HTTP/1.1").add_header_kv("Host", "example.com");
//! let response = session.perform(&request).await?;
//! println!("{}", response.get_status());
//! # Ok(())
//! # }
//! ```

pub mod connector;
pub mod http;
pub mod resolver;
pub mod session;
pub mod utils;

pub use connector::{
    Connector, ConnectorConfig, HttpConnector, HttpsConnector, TcpConnector, TlsConnector,
    UdpConnector,
};
pub use utils::{Deadline, Error};
