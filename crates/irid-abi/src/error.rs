//! ABI error types

use thiserror::Error;

/// ABI transcoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Calldata is not `0x`-prefixed, even-length hex
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// ABI document is malformed or has no function entries
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),

    /// Type string, descriptor or value does not match the ABI grammar
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Function signature is not of the form `name(type,...)`
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Wrong number of parameter values
    #[error("expected {expected} parameter values, got {got}")]
    Arity {
        /// Number of inputs declared by the signature
        expected: usize,
        /// Number of values supplied
        got: usize,
    },

    /// Value outside the domain of its type
    #[error("value out of range: {0}")]
    Range(String),

    /// Bool word holding something other than 0 or 1
    #[error("invalid bool word: 0x{0}")]
    InvalidBool(String),

    /// An offset or length points past the end of the data
    #[error("truncated data: need {needed} bytes, have {available}")]
    TruncatedData {
        /// End position the read required
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// No ABI entry matches the calldata selector
    #[error("no function in the ABI matches selector {0}")]
    SelectorMismatch(String),

    /// Failure while handling one top-level parameter
    #[error("parameter {index} ({name}): {source}")]
    Parameter {
        /// 0-based position in the parameter list
        index: usize,
        /// Declared parameter name, or its type when unnamed
        name: String,
        /// Underlying error
        source: Box<AbiError>,
    },
}

impl AbiError {
    /// Innermost error, with any parameter context removed
    pub fn root(&self) -> &AbiError {
        match self {
            AbiError::Parameter { source, .. } => source.root(),
            other => other,
        }
    }

    /// Attach a parameter position and label
    pub(crate) fn at_parameter(self, index: usize, name: impl Into<String>) -> Self {
        AbiError::Parameter {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::InvalidAbi(e.to_string())
    }
}
