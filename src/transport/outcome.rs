//! Normalized transport outcome
//!
//! Every transport call produces exactly one `TestOutcome`, whatever went
//! wrong underneath.

use serde_json::Value;
use thiserror::Error;

/// Why a transport call did not yield a usable payload
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransportError {
    #[error("{stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("empty response")]
    EmptyResponse,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("timeout")]
    Timeout,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result of one transport call
///
/// A failed outcome never carries a payload; read it through
/// [`TestOutcome::payload`] after checking [`TestOutcome::is_success`].
#[derive(Clone, Debug, PartialEq)]
pub struct TestOutcome {
    payload: Option<Value>,
    raw_text: String,
    error: Option<TransportError>,
}

impl TestOutcome {
    pub fn success(payload: Value, raw_text: impl Into<String>) -> Self {
        Self {
            payload: Some(payload),
            raw_text: raw_text.into(),
            error: None,
        }
    }

    pub fn failure(error: TransportError, raw_text: impl Into<String>) -> Self {
        Self {
            payload: None,
            raw_text: raw_text.into(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    #[cfg(test)]
    pub fn into_payload(self) -> Option<Value> {
        self.payload
    }

    /// Captured standard output, kept even when it failed to parse
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    /// Error text, empty on success
    pub fn error_message(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// Case-insensitive substring match over the error text and raw output
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.error_message().to_lowercase().contains(&needle)
            || self.raw_text.to_lowercase().contains(&needle)
    }
}
