mod request;
mod target_url;

#[cfg(test)]
mod tests;

pub use request::*;
pub use target_url::*;

use std::{error::Error, fs, path::Path};

use stream_connector::connector::ConnectorConfig;

pub type BoxedError = Box<dyn Error + Send + Sync>;

pub type CliResult<T> = Result<T, BoxedError>;

/// Load connector settings from a JSON file.
pub fn load_config(path: &Path) -> CliResult<ConnectorConfig> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
