//! Error types for Kshetra
//!
//! The simulation core is total and never fails; errors only arise at the
//! edges (configuration, sockets, serialization).

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Kshetra error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error (config file, socket bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unparsable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP server failure
    #[error("Server error: {0}")]
    Server(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
