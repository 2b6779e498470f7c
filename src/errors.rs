use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortError {
    #[error("Error getting an available port from system: {0}")]
    PortProbe(#[source] std::io::Error),

    #[error("Failed to write properties to '{}': {source}", .path.display())]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid port name: {0}")]
    InvalidPortName(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortError {
    pub(crate) fn sink_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PortError::SinkWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortError>;
