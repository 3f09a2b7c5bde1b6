//! Request envelope: client checks and batch extraction.

use serde::Serialize;
use serde_json::Value;

use docgate_core::paths;
use docgate_executor::{Command, Error};

/// The sealed response body, `{"code": <encoded outcome>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sealed {
    /// The encoded outcome payload.
    pub code: String,
}

/// Request-level acceptance checks, evaluated on the decoded document
/// before the batch is even constructed. Failures are deliberately
/// opaque to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientChecks {
    /// Allowed clock skew in milliseconds for `_checkTime`.
    pub time_window_ms: Option<i64>,
    /// Shared secret the document's `_checkKey` must equal.
    pub check_key: Option<String>,
}

impl ClientChecks {
    /// No checks.
    pub fn none() -> Self {
        Self::default()
    }

    /// Require `_checkTime` within `window_ms` of now.
    pub fn time_window(mut self, window_ms: i64) -> Self {
        self.time_window_ms = Some(window_ms);
        self
    }

    /// Require `_checkKey` to equal `key`.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.check_key = Some(key.into());
        self
    }

    /// Verify the decoded document against `now_ms`.
    ///
    /// A missing or non-numeric `_checkTime` passes even when the window
    /// is configured; only a present numeric stamp is range-checked. A
    /// configured key with a missing or different `_checkKey` always
    /// fails.
    pub fn verify(&self, document: &Value, now_ms: i64) -> Result<(), Error> {
        if let Some(window) = self.time_window_ms {
            if let Some(stamp) = document.get("_checkTime").and_then(Value::as_i64) {
                if stamp < now_ms - window || stamp > now_ms + window {
                    return Err(Error::validation("client undefined error"));
                }
            }
        }
        if let Some(expected) = &self.check_key {
            if document.get("_checkKey").and_then(Value::as_str) != Some(expected.as_str()) {
                return Err(Error::validation("client undefined error"));
            }
        }
        Ok(())
    }
}

/// Split the decoded document into a batch of commands.
///
/// A truthy `events` field is the batch (an empty array is allowed; the
/// runner reports it); otherwise the whole document is a single command.
pub fn extract_batch(document: Value) -> Result<Vec<Command>, Error> {
    let has_events = document
        .get("events")
        .map_or(false, paths::is_truthy);
    if has_events {
        let events = match document {
            Value::Object(mut map) => map.remove("events").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        serde_json::from_value(events)
            .map_err(|err| Error::validation(format!("events: {err}")))
    } else {
        serde_json::from_value::<Command>(document)
            .map(|command| vec![command])
            .map_err(|err| Error::validation(format!("invalid request body: {err}")))
    }
}
