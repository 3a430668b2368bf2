use std::{io, net::SocketAddr};

use thiserror::Error;

use crate::resolver::ResolveError;

/// Reasons why a connector could not hand out a session.
#[derive(Debug, Error)]
pub enum Error {
    /// The resolver failed and nothing better explains the failure.
    #[error("resolve failed: {0}")]
    Resolve(#[from] ResolveError),

    /// The deadline elapsed before any resolution had completed.
    #[error("deadline elapsed while waiting for endpoints")]
    Timeout,

    /// The last endpoint tried refused the session.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Resolution succeeded earlier but no endpoint is known now.
    #[error("no endpoints available")]
    NoEndpoints,
}

impl Error {
    /// Timeout error, replaced by the last resolve error when there is one.
    pub(crate) fn timeout_or(resolve_error: Option<ResolveError>) -> Self {
        resolve_error.map_or(Error::Timeout, Error::Resolve)
    }

    /// Whether the failure came from the deadline rather than from a peer.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout | Error::Resolve(ResolveError::Timeout(_)) => true,
            Error::Connect { source, .. } => source.kind() == io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}
