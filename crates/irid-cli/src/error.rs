//! CLI error types

use irid_abi::AbiError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Encoding or decoding failed
    #[error("{0}")]
    Abi(#[from] AbiError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
