//! Response navigator
//!
//! Drills into `<operation>Response` envelopes and records one check per
//! navigation step. Every helper returns `None` (or `false`) after recording
//! a FAIL; callers stop reading further fields when that happens.

mod schema;

pub use schema::Schema;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::recorder::{is_blank, Recorder};
use crate::transport::TestOutcome;

/// Confirm the call succeeded and return the object under `wrapper`
pub fn envelope<'a>(
    recorder: &mut Recorder,
    outcome: &'a TestOutcome,
    wrapper: &str,
    label: &str,
) -> Option<&'a Value> {
    let Some(payload) = outcome.payload() else {
        recorder.fail(
            format!("{label}: request succeeded"),
            outcome.error_message(),
        );
        return None;
    };

    match payload.get(wrapper) {
        Some(inner) => {
            recorder.pass(format!("{label}: response has {wrapper}"));
            Some(inner)
        }
        None => {
            recorder.fail(
                format!("{label}: response has {wrapper}"),
                format!("missing {wrapper} in {}", outcome.raw_text().trim()),
            );
            None
        }
    }
}

/// Return the non-empty object stored under `key`
pub fn object<'a>(
    recorder: &mut Recorder,
    inner: &'a Value,
    key: &str,
    label: &str,
) -> Option<&'a Value> {
    match inner.get(key) {
        Some(value) if value.is_object() && !is_blank(value) => {
            recorder.pass(format!("{label}: has {key}"));
            Some(value)
        }
        Some(value) => {
            recorder.fail(format!("{label}: has {key}"), format!("{key} is empty: {value}"));
            None
        }
        None => {
            recorder.fail(format!("{label}: has {key}"), format!("{key} is missing"));
            None
        }
    }
}

/// Return the non-empty array stored under `key`
pub fn collection<'a>(
    recorder: &mut Recorder,
    inner: &'a Value,
    key: &str,
    label: &str,
) -> Option<&'a Vec<Value>> {
    match inner.get(key).and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            recorder.pass(format!("{label}: {key} not empty"));
            Some(items)
        }
        Some(_) => {
            recorder.fail(format!("{label}: {key} not empty"), format!("{key} is empty"));
            None
        }
        None => {
            recorder.fail(
                format!("{label}: {key} not empty"),
                format!("{key} is missing or not an array"),
            );
            None
        }
    }
}

/// Decode a typed view of `value`
pub fn decode<T: DeserializeOwned>(recorder: &mut Recorder, value: &Value, label: &str) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => {
            recorder.pass(format!("{label}: decodes"));
            Some(decoded)
        }
        Err(e) => {
            recorder.fail(format!("{label}: decodes"), e.to_string());
            None
        }
    }
}

/// A business-rule rejection is expected: PASS when the failure mentions
/// `needle`, FAIL on success or on any other error
pub fn expect_error(
    recorder: &mut Recorder,
    outcome: &TestOutcome,
    needle: &str,
    label: &str,
) -> bool {
    if outcome.is_success() {
        return recorder.fail(
            format!("{label}: rejected"),
            format!("expected an error containing '{needle}', got success"),
        );
    }
    let detail = match outcome.raw_text().trim() {
        "" => outcome.error_message(),
        raw => format!("{} ({raw})", outcome.error_message()),
    };
    recorder.check(
        outcome.mentions(needle),
        format!("{label}: rejected with '{needle}'"),
        format!("unexpected error: {detail}"),
    )
}

/// Read a count that may arrive as a number or a decimal string
pub fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String view of a scalar field, numbers included
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
