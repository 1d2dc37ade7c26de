use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlyweightError {
    #[error("Invalid flyweight key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Failed to read pool config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pool config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid log directive: {0}")]
    Logging(String),

    #[error("Failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl FlyweightError {
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlyweightError>;
