//! Error type shared by the probe layer and the domain getters.
//!
//! Probes return typed errors; the getter façade collapses them into its
//! binary success/failure contract and logs the underlying cause.

/// Error type for statline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("metric not available: {0}")]
    NotAvailable(String),

    #[error("system call failed: {0}")]
    System(String),
}

impl Error {
    pub(crate) fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    pub(crate) fn not_available<S: Into<String>>(msg: S) -> Self {
        Error::NotAvailable(msg.into())
    }

    pub(crate) fn system<S: Into<String>>(msg: S) -> Self {
        Error::System(msg.into())
    }
}

/// Result type for statline operations.
pub type Result<T> = std::result::Result<T, Error>;
