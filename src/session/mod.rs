use std::{io, net::SocketAddr};

use crate::{
    connector::ConnectorConfig,
    utils::{Deadline, PBF},
};

mod http_session;
mod stream_session;
mod supported_stream;
mod tcp_factory;
mod tls_factory;
mod udp_session;

pub use http_session::*;
pub use stream_session::*;
pub use supported_stream::*;
pub use tcp_factory::*;
pub use tls_factory::*;
pub use udp_session::*;

#[cfg(test)]
mod tests;

pub type SessionResult<'a, S> = PBF<'a, io::Result<S>>;

/// Builds one connected session of a specific transport kind.
pub trait SessionFactory: Send + Sync + 'static {
    type Session: Send + 'static;

    /// Connect to `endpoint` before `deadline`.
    ///
    /// Must fail with [`io::ErrorKind::TimedOut`] instead of blocking once the
    /// deadline has passed.
    fn connect(&self, endpoint: SocketAddr, deadline: Deadline) -> SessionResult<'_, Self::Session>;
}

/// Factories that can be built from connector settings alone.
pub trait FromConfig: Sized {
    fn from_config(config: &ConnectorConfig) -> io::Result<Self>;
}
