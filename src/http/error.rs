use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("connection closed by peer")]
    ClosedByPeer,

    #[error("malformed first line {0:?}")]
    MalformedFirstLine(String),

    #[error("invalid Content-Length {0:?}")]
    InvalidContentLength(String),

    #[error("invalid chunk size {0:?}")]
    InvalidChunk(String),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Io(e) if e.kind() == io::ErrorKind::TimedOut)
    }
}

pub type HttpResult<T> = Result<T, HttpError>;
