use std::path::PathBuf;

use blog_frontend::ConnectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not load {what}: {message}")]
    Load { what: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
