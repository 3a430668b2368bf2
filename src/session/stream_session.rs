use std::{io, net::SocketAddr, time::Duration};

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

use crate::utils::Deadline;

use super::SupportedStream;

/// A connected TCP or TLS stream whose I/O calls are bounded by an operation timeout.
pub struct StreamSession {
    io: BufReader<SupportedStream>,
    peer_addr: SocketAddr,
    local_addr: SocketAddr,
    operation_timeout: Duration,
}

impl StreamSession {
    pub fn new(
        stream: impl Into<SupportedStream>,
        operation_timeout: Duration,
    ) -> io::Result<Self> {
        let stream = stream.into();
        let peer_addr = stream.get_tcp_stream_ref().peer_addr()?;
        let local_addr = stream.get_tcp_stream_ref().local_addr()?;
        Ok(Self {
            io: BufReader::with_capacity(10240, stream),
            peer_addr,
            local_addr,
            operation_timeout,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_tls(&self) -> bool {
        self.io.get_ref().is_tls()
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    pub fn set_operation_timeout(&mut self, timeout: Duration) -> Duration {
        std::mem::replace(&mut self.operation_timeout, timeout)
    }

    /// Deadline for a single operation started now.
    pub(crate) fn operation_deadline(&self) -> Deadline {
        Deadline::after(self.operation_timeout)
    }

    /// Buffered access for protocol layers such as HTTP.
    pub(crate) fn io_mut(&mut self) -> &mut BufReader<SupportedStream> {
        &mut self.io
    }

    /// Write the whole buffer and flush it.
    pub async fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stream = self.io.get_mut();
        Deadline::after(self.operation_timeout)
            .run_io(async {
                stream.write_all(buf).await?;
                stream.flush().await?;
                Ok(buf.len())
            })
            .await
    }

    /// Read whatever is available, zero bytes means the peer closed the stream.
    pub async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let io = &mut self.io;
        Deadline::after(self.operation_timeout)
            .run_io(io.read(buf))
            .await
    }

    /// Fill the whole buffer.
    pub async fn receive_exact(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let io = &mut self.io;
        Deadline::after(self.operation_timeout)
            .run_io(io.read_exact(buf))
            .await
    }

    /// Shut the write side down. TLS sessions send their close notify.
    pub async fn close(&mut self) -> io::Result<()> {
        let stream = self.io.get_mut();
        Deadline::after(self.operation_timeout)
            .run_io(stream.shutdown())
            .await
    }
}
