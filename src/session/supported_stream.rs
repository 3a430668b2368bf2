use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::TcpStream,
};
use tokio_native_tls::TlsStream;

/// Byte streams a [`StreamSession`](super::StreamSession) can run over.
pub enum SupportedStream {
    Tls(TlsStream<TcpStream>),
    Tcp(TcpStream),
}

impl SupportedStream {
    pub fn get_tcp_stream_ref(&self) -> &TcpStream {
        match self {
            SupportedStream::Tls(s) => s.get_ref().get_ref().get_ref(),
            SupportedStream::Tcp(s) => s,
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, SupportedStream::Tls(_))
    }
}

impl From<TcpStream> for SupportedStream {
    fn from(stream: TcpStream) -> Self {
        SupportedStream::Tcp(stream)
    }
}

impl From<TlsStream<TcpStream>> for SupportedStream {
    fn from(stream: TlsStream<TcpStream>) -> Self {
        SupportedStream::Tls(stream)
    }
}

impl AsyncRead for SupportedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            SupportedStream::Tls(s) => Pin::new(s).poll_read(cx, buf),
            SupportedStream::Tcp(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for SupportedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            SupportedStream::Tls(s) => Pin::new(s).poll_write(cx, buf),
            SupportedStream::Tcp(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            SupportedStream::Tls(s) => Pin::new(s).poll_flush(cx),
            SupportedStream::Tcp(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            SupportedStream::Tls(s) => Pin::new(s).poll_shutdown(cx),
            SupportedStream::Tcp(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}
