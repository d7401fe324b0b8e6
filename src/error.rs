//! API error taxonomy and display-message mapping.
//!
//! DESIGN
//! ======
//! The backend reports failures as `{ "detail": <string | [{ msg, loc, type }]> }`.
//! `ApiError` keeps the parsed detail next to the status so callers can choose
//! between the verbatim server message, the joined validation messages, or a
//! generic fallback when the transport itself failed.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR DETAIL
// =============================================================================

/// One entry of a 422 validation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The `detail` member of a backend error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Business or not-found error, shown verbatim.
    Message(String),
    /// Field validation errors.
    Validation(Vec<ValidationIssue>),
}

impl ErrorDetail {
    /// Parse the `detail` member from a raw response body.
    /// Returns `None` when the body is not the backend's error envelope.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct Envelope {
            detail: ErrorDetail,
        }
        serde_json::from_str::<Envelope>(body).ok().map(|e| e.detail)
    }

    /// Human-readable message: the string detail, or validation messages joined with `", "`.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Message(msg) => msg.clone(),
            Self::Validation(issues) => issues
                .iter()
                .map(|issue| issue.msg.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout, client build).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered 401 or 403. The stored token has already been cleared.
    #[error("not authorized (status {status})")]
    Unauthorized { status: u16, detail: Option<ErrorDetail> },

    /// Any other non-success status.
    #[error("request rejected with status {status}")]
    Status { status: u16, detail: Option<ErrorDetail> },

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// A success body could not be deserialized.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response by status and parse its error body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = ErrorDetail::parse(body);
        match status {
            401 | 403 => Self::Unauthorized { status, detail },
            _ => Self::Status { status, detail },
        }
    }

    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Encode(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Unauthorized { detail, .. } | Self::Status { detail, .. } => detail.as_ref(),
            Self::Transport(_) | Self::Encode(_) | Self::Decode(_) => None,
        }
    }

    /// The server-supplied message, if any and non-empty.
    #[must_use]
    pub fn detail_message(&self) -> Option<String> {
        self.detail()
            .map(ErrorDetail::message)
            .filter(|msg| !msg.is_empty())
    }

    /// Message suitable for showing next to the triggering form or action.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        self.detail_message().unwrap_or_else(|| fallback.to_owned())
    }

    /// Stable machine-readable code, used by the CLI's error output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Status { status: 404, .. } => "E_NOT_FOUND",
            Self::Status { status: 422, .. } => "E_VALIDATION",
            Self::Status { .. } => "E_STATUS",
            Self::Encode(_) => "E_ENCODE",
            Self::Decode(_) => "E_DECODE",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
