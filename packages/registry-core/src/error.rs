use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read photo {path}")]
    PhotoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported photo format: {path} (expected an image file)")]
    UnsupportedPhoto { path: PathBuf },

    #[error("Photo {path} is empty")]
    EmptyPhoto { path: PathBuf },

    #[error("No active session; log in first")]
    NotSignedIn,

    #[error("Activity log error: {0}")]
    ActivityLog(#[from] std::io::Error),

    #[error("Failed to serialize activity event")]
    Serialize(#[from] serde_json::Error),
}
