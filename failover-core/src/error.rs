//! Error types for failover operations

use thiserror::Error;

/// Core error type for failover operations
#[derive(Error, Debug)]
pub enum FailoverError {
    /// No usable credentials could be loaded
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ambiguous or incomplete command-line flags
    #[error("Usage error: {0}")]
    Usage(String),

    /// Netmask reported by the API is not a valid address
    #[error("Invalid netmask: {0:?}")]
    InvalidNetmask(String),

    /// The Robot API answered with a non-success status
    #[error("API error {}{}: {}", .status, code_suffix(.code), .message)]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a response (connect failure, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

/// Result type alias for failover operations
pub type Result<T> = std::result::Result<T, FailoverError>;

impl FailoverError {
    /// Whether the error means the remote state could not be determined.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FailoverError::Api { .. } | FailoverError::Transport(_) | FailoverError::Decode(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FailoverError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FailoverError {
    fn from(err: serde_json::Error) -> Self {
        FailoverError::Decode(err.to_string())
    }
}
