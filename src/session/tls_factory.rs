use std::{io, net::SocketAddr, time::Duration};

use tokio_native_tls::TlsStream;

use crate::{connector::ConnectorConfig, utils::Deadline};

use super::{tcp_factory::connect_tcp, FromConfig, SessionFactory, SessionResult, StreamSession};

/// TLS sessions over TCP. The peer certificate is verified against `domain`.
pub struct TlsFactory {
    domain: String,
    connector: tokio_native_tls::TlsConnector,
    operation_timeout: Duration,
}

impl TlsFactory {
    pub fn new(domain: impl Into<String>, operation_timeout: Duration) -> io::Result<Self> {
        let connector = native_tls::TlsConnector::new().map_err(io::Error::other)?;
        Ok(Self::with_connector(domain, connector, operation_timeout))
    }

    /// Use a preconfigured native-tls connector (custom roots, client identity, ...).
    pub fn with_connector(
        domain: impl Into<String>,
        connector: native_tls::TlsConnector,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            domain: domain.into(),
            connector: connector.into(),
            operation_timeout,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// TCP connect followed by the TLS handshake, both within the deadline.
    pub(crate) async fn handshake(
        &self,
        endpoint: SocketAddr,
        deadline: Deadline,
    ) -> io::Result<TlsStream<tokio::net::TcpStream>> {
        let tcp_stream = connect_tcp(endpoint, deadline).await?;
        deadline
            .run_io(async {
                self.connector
                    .connect(&self.domain, tcp_stream)
                    .await
                    .map_err(io::Error::other)
            })
            .await
    }
}

impl FromConfig for TlsFactory {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(config.tls_insecure)
            .build()
            .map_err(io::Error::other)?;
        let domain = config.tls_domain();
        let factory = Self::with_connector(domain, connector, config.operation_timeout);
        Ok(factory)
    }
}

impl SessionFactory for TlsFactory {
    type Session = StreamSession;

    fn connect(
        &self,
        endpoint: SocketAddr,
        deadline: Deadline,
    ) -> SessionResult<'_, StreamSession> {
        Box::pin(async move {
            let tls_stream = self.handshake(endpoint, deadline).await?;
            StreamSession::new(tls_stream, self.operation_timeout)
        })
    }
}
