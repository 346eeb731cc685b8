//! Errors at the fallible edges: input resolution, sessions, configuration

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ReasonCode;

#[derive(Debug, Error)]
pub enum DialError {
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("input locked ({0})")]
    InputLocked(ReasonCode),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl DialError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DialError::UnknownSymbol(_) => "unknown_symbol",
            DialError::SessionNotFound(_) => "not_found",
            DialError::InputLocked(_) => "input_locked",
            DialError::InvalidConfig(_) => "invalid_config",
            DialError::ConfigRead { .. } | DialError::ConfigParse { .. } => "config_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, DialError>;
