use std::{future::Future, pin::Pin};

mod deadline;
mod error;

pub use deadline::*;
pub use error::*;

/// PBF = Pin Box Future
pub type PBF<'a, O> = Pin<Box<dyn Future<Output = O> + Send + 'a>>;

pub type ConnectResult<T> = Result<T, Error>;
