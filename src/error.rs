use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfsearchError {
    #[error("Config file path must not be empty")]
    EmptyFilePath,

    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("No loader registered for {path}")]
    NoLoader { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transform failed: {0}")]
    Transform(String),
}
