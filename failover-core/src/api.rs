//! Wire models for the Robot failover endpoints
//!
//! The Robot API wraps every record in a `{"failover": {...}}` object and
//! reports failures as `{"error": {...}}`. Both helpers here accept the bare
//! shape as well so that simpler stub services decode the same way.

use crate::error::{FailoverError, Result};
use crate::types::FailoverRecord;
use serde::{Deserialize, Serialize};

/// Form field carrying the new active server on `POST /failover/{ip}`
pub const ACTIVE_SERVER_FIELD: &str = "active_server_ip";

/// A failover record, wrapped or bare
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailoverEnvelope {
    Wrapped { failover: FailoverRecord },
    Bare(FailoverRecord),
}

impl FailoverEnvelope {
    /// Wrap a record the way the Robot API does
    pub fn wrap(record: FailoverRecord) -> Self {
        Self::Wrapped { failover: record }
    }

    /// Unwrap into the record
    pub fn into_record(self) -> FailoverRecord {
        match self {
            Self::Wrapped { failover } => failover,
            Self::Bare(record) => record,
        }
    }
}

/// Error details reported by the Robot API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// Top-level error body: `{"error": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

impl ApiErrorBody {
    /// Create an error body
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                status,
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Decode a single record from a response body.
pub fn decode_record(body: &str) -> Result<FailoverRecord> {
    let envelope: FailoverEnvelope = serde_json::from_str(body)
        .map_err(|e| FailoverError::Decode(format!("failover record: {}", e)))?;
    Ok(envelope.into_record())
}

/// Decode a list of records from a response body.
pub fn decode_records(body: &str) -> Result<Vec<FailoverRecord>> {
    let envelopes: Vec<FailoverEnvelope> = serde_json::from_str(body)
        .map_err(|e| FailoverError::Decode(format!("failover list: {}", e)))?;
    Ok(envelopes
        .into_iter()
        .map(FailoverEnvelope::into_record)
        .collect())
}

/// Build the error for a non-success response.
///
/// Uses the provider's error body when the response carries one, otherwise
/// falls back to the raw text.
pub fn error_from_response(status: u16, body: &str) -> FailoverError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => FailoverError::Api {
            status,
            code: Some(parsed.error.code),
            message: parsed.error.message,
        },
        Err(_) => FailoverError::Api {
            status,
            code: None,
            message: body.trim().to_string(),
        },
    }
}
