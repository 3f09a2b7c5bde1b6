//! Response shaping: block assertions and redaction.
//!
//! This is the terminal stage for a command. Its output becomes either
//! the discarded intermediate result of a non-final command, or the
//! batch outcome. Redaction only touches the outward payload; the stored
//! document is never mutated here.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use docgate_core::paths;

use crate::command::Operation;
use crate::error::Error;

/// Shaped result of one command.
///
/// Each command maps to exactly one variant: `find` produces `List`, a
/// null store result produces `Empty`, everything else `Document`.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Redacted result object of a non-find operation.
    Document(Value),
    /// Materialized, redacted result set of a `find`.
    List(Vec<Value>),
    /// The store returned nothing.
    Empty,
}

impl Output {
    /// The outward JSON for this output.
    pub fn into_value(self) -> Value {
        match self {
            Output::Document(doc) => doc,
            Output::List(items) => json!({ "list": items }),
            Output::Empty => json!({ "msg": "data is empty", "empty": true }),
        }
    }
}

/// Evaluate block assertions and build the redacted payload.
///
/// Assertion order is fixed: empty result, zero-length find, zero
/// mutation count, then per-path value checks.
pub(crate) fn shape(
    result: Value,
    op: Operation,
    block: Option<&Map<String, Value>>,
    remove: Option<&[String]>,
    trim: &[String],
) -> Result<Output, Error> {
    if let Some(block) = block {
        if result.is_null() {
            return Err(Error::BlockEmpty);
        }
        if op.is_find() && result.as_array().map_or(false, |items| items.is_empty()) {
            return Err(Error::BlockNotFind);
        }
        if let Some(meta) = result.get("result") {
            let count = meta.get("n").unwrap_or(&Value::Null);
            if !paths::is_truthy(count) {
                // the partial payload redacts only the command's own
                // remove set, never the collection trim
                let partial = redact(result.clone(), remove.unwrap_or(&[]), &[]);
                return Err(Error::BlockNoMatch { partial });
            }
        }
        for (path, expected) in block {
            if paths::get(&result, path) != Some(expected) {
                return Err(Error::BlockMismatch {
                    path: path.clone(),
                    expected: expected.clone(),
                });
            }
        }
    }

    if result.is_null() {
        return Ok(Output::Empty);
    }

    let redacted = redact(result, remove.unwrap_or(&[]), trim);
    if op.is_find() {
        if let Value::Array(items) = redacted {
            return Ok(Output::List(items));
        }
    }
    Ok(Output::Document(redacted))
}

/// Strip the transport-only fields, then every path in the union of the
/// command's `remove` set and the collection's `trim` set. Removed paths
/// become absent, not null.
fn redact(mut value: Value, remove: &[String], trim: &[String]) -> Value {
    if let Value::Object(map) = &mut value {
        map.remove("connection");
        map.remove("message");
    }
    let union: BTreeSet<&str> = remove
        .iter()
        .chain(trim)
        .map(String::as_str)
        .collect();
    for path in union {
        paths::remove(&mut value, path);
    }
    value
}
