mod error;
mod first_line;
mod headers;
mod protocol;
mod request;
mod response;

#[cfg(test)]
mod tests;

pub use error::*;
pub use first_line::*;
pub use headers::*;
pub use protocol::*;
pub use request::*;
pub use response::*;
