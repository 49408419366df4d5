//! Shared API request/response types
//!
//! Every ClipFlow endpoint answers with the same envelope:
//! `{ok: bool, data?, error?, code?, details?}`. Success responses carry
//! `data`; failures carry a human-readable `error`, a stable machine `code`,
//! and optional structured `details`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope used by all ClipFlow endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Human-readable error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Stable machine-readable error code (e.g. "ALREADY_CLAIMED")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Additional error context (e.g. {"claimed_by": "..."} )
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiResponse {
    /// Success envelope with payload
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            code: None,
            details: None,
        }
    }

    /// Success envelope with no payload
    pub fn ok_empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
            code: None,
            details: None,
        }
    }

    /// Error envelope
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.into()),
            details: None,
        }
    }

    /// Error envelope with structured details
    pub fn error_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.into()),
            details: Some(details),
        }
    }
}
