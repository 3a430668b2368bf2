use std::{io, net::SocketAddr, time::Duration};

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

use crate::{connector::ConnectorConfig, utils::Deadline};

use super::{FromConfig, SessionFactory, SessionResult, StreamSession};

/// Turn on TCP keepalive so half-dead peers are noticed on long-lived sessions.
pub(crate) fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(60))
        .with_interval(Duration::from_secs(10));
    let socket = SockRef::from(stream);
    socket.set_tcp_keepalive(&keepalive)?;
    socket.set_nodelay(true)
}

/// Establish a plain TCP connection within the deadline.
pub(crate) async fn connect_tcp(endpoint: SocketAddr, deadline: Deadline) -> io::Result<TcpStream> {
    let stream = deadline.run_io(TcpStream::connect(endpoint)).await?;
    enable_keepalive(&stream)?;
    Ok(stream)
}

/// Plain TCP sessions.
#[derive(Debug, Clone)]
pub struct TcpFactory {
    operation_timeout: Duration,
}

impl TcpFactory {
    pub fn new(operation_timeout: Duration) -> Self {
        Self { operation_timeout }
    }
}

impl FromConfig for TcpFactory {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self> {
        Ok(Self::new(config.operation_timeout))
    }
}

impl SessionFactory for TcpFactory {
    type Session = StreamSession;

    fn connect(
        &self,
        endpoint: SocketAddr,
        deadline: Deadline,
    ) -> SessionResult<'_, StreamSession> {
        Box::pin(async move {
            let stream = connect_tcp(endpoint, deadline).await?;
            StreamSession::new(stream, self.operation_timeout)
        })
    }
}
