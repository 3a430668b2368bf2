use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use tokio::net::UdpSocket;

use crate::{connector::ConnectorConfig, utils::Deadline};

use super::{FromConfig, SessionFactory, SessionResult};

/// A UDP socket connected to one endpoint.
pub struct UdpSession {
    socket: UdpSocket,
    peer_addr: SocketAddr,
    local_addr: SocketAddr,
    operation_timeout: Duration,
}

impl UdpSession {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    pub fn set_operation_timeout(&mut self, timeout: Duration) -> Duration {
        std::mem::replace(&mut self.operation_timeout, timeout)
    }

    pub fn get_ref(&self) -> &UdpSocket {
        &self.socket
    }

    /// Send one datagram.
    pub async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        Deadline::after(self.operation_timeout)
            .run_io(self.socket.send(buf))
            .await
    }

    /// Receive one datagram, truncated to the buffer size.
    pub async fn receive(&self, buf: &mut [u8]) -> io::Result<usize> {
        Deadline::after(self.operation_timeout)
            .run_io(self.socket.recv(buf))
            .await
    }
}

/// UDP sessions. "Connecting" binds an ephemeral port and fixes the peer address.
#[derive(Debug, Clone)]
pub struct UdpFactory {
    operation_timeout: Duration,
}

impl UdpFactory {
    pub fn new(operation_timeout: Duration) -> Self {
        Self { operation_timeout }
    }
}

impl FromConfig for UdpFactory {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self> {
        Ok(Self::new(config.operation_timeout))
    }
}

impl SessionFactory for UdpFactory {
    type Session = UdpSession;

    fn connect(&self, endpoint: SocketAddr, deadline: Deadline) -> SessionResult<'_, UdpSession> {
        Box::pin(async move {
            let bind_addr: SocketAddr = if endpoint.is_ipv4() {
                (Ipv4Addr::UNSPECIFIED, 0).into()
            } else {
                (Ipv6Addr::UNSPECIFIED, 0).into()
            };
            let socket = deadline
                .run_io(async {
                    let socket = UdpSocket::bind(bind_addr).await?;
                    socket.connect(endpoint).await?;
                    Ok(socket)
                })
                .await?;
            Ok(UdpSession {
                peer_addr: socket.peer_addr()?,
                local_addr: socket.local_addr()?,
                socket,
                operation_timeout: self.operation_timeout,
            })
        })
    }
}
