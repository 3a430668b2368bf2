use std::{io, net::SocketAddr, time::Duration};

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{
    connector::ConnectorConfig,
    http::{HttpError, HttpRequest, HttpResponse, HttpResult},
    utils::Deadline,
};

use super::{
    tcp_factory::connect_tcp, FromConfig, SessionFactory, SessionResult, StreamSession,
    TlsFactory,
};

/// An HTTP/1.x session over a TCP or TLS stream.
pub struct HttpSession {
    stream: StreamSession,
}

impl HttpSession {
    pub fn new(stream: StreamSession) -> Self {
        Self { stream }
    }

    pub fn stream(&self) -> &StreamSession {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut StreamSession {
        &mut self.stream
    }

    pub fn into_stream(self) -> StreamSession {
        self.stream
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.stream.peer_addr()
    }

    /// Send `request` and read the complete response within one operation timeout.
    pub async fn perform(&mut self, request: &HttpRequest) -> HttpResult<HttpResponse> {
        let deadline = self.stream.operation_deadline();
        let io = self.stream.io_mut();
        let exchange = async {
            {
                let mut w = BufWriter::with_capacity(1480, io.get_mut());
                request.write_to(&mut w).await?;
                w.flush().await?;
            }
            HttpResponse::read_reply_from(io, request.get_method()).await
        };
        match deadline.run(exchange).await {
            Ok(result) => result,
            Err(_) => {
                let timed_out = io::Error::new(io::ErrorKind::TimedOut, "HTTP exchange timed out");
                Err(HttpError::Io(timed_out))
            }
        }
    }

    pub async fn close(&mut self) -> io::Result<()> {
        self.stream.close().await
    }
}

/// HTTP over plain TCP.
#[derive(Debug, Clone)]
pub struct HttpFactory {
    operation_timeout: Duration,
}

impl HttpFactory {
    pub fn new(operation_timeout: Duration) -> Self {
        Self { operation_timeout }
    }
}

impl FromConfig for HttpFactory {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self> {
        Ok(Self::new(config.operation_timeout))
    }
}

impl SessionFactory for HttpFactory {
    type Session = HttpSession;

    fn connect(&self, endpoint: SocketAddr, deadline: Deadline) -> SessionResult<'_, HttpSession> {
        Box::pin(async move {
            let tcp_stream = connect_tcp(endpoint, deadline).await?;
            let stream = StreamSession::new(tcp_stream, self.operation_timeout)?;
            Ok(HttpSession::new(stream))
        })
    }
}

/// HTTP over TLS.
pub struct HttpsFactory {
    tls: TlsFactory,
    operation_timeout: Duration,
}

impl HttpsFactory {
    pub fn new(tls: TlsFactory, operation_timeout: Duration) -> Self {
        Self {
            tls,
            operation_timeout,
        }
    }
}

impl FromConfig for HttpsFactory {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self> {
        let tls = TlsFactory::from_config(config)?;
        Ok(Self::new(tls, config.operation_timeout))
    }
}

impl SessionFactory for HttpsFactory {
    type Session = HttpSession;

    fn connect(&self, endpoint: SocketAddr, deadline: Deadline) -> SessionResult<'_, HttpSession> {
        Box::pin(async move {
            let tls_stream = self.tls.handshake(endpoint, deadline).await?;
            let stream = StreamSession::new(tls_stream, self.operation_timeout)?;
            Ok(HttpSession::new(stream))
        })
    }
}
