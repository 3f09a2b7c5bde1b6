//! Error types for the command pipeline.
//!
//! Every stage fails fast with one of these variants; the runner never
//! continues past a failure and nothing is retried. Errors are structured
//! data: the transport layer turns them into wire bodies via
//! [`Error::to_body`] and picks a status class via
//! [`Error::classification`]. Display strings are wire-observable and
//! kept stable.

use serde_json::{json, Value};
use std::fmt;

/// Which permission set rejected the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The database allowlist.
    Db,
    /// The collection allowlist.
    Col,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Scope::Db => "db",
            Scope::Col => "col",
        })
    }
}

/// Coarse status class for the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller error; maps to a 4xx response.
    BadRequest,
    /// Store failure or internal invariant violation; maps to a 5xx.
    Internal,
}

/// Pipeline execution errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Malformed or absent request body, or a failed client check.
    #[error("{reason}")]
    Validation {
        /// What was wrong with the request.
        reason: String,
    },

    /// The database or collection is not in the configured open set.
    #[error("permission[{scope}]: {name} is private")]
    Permission {
        /// Which allowlist rejected the name.
        scope: Scope,
        /// The rejected database or collection name.
        name: String,
    },

    /// The method is not on the operation whitelist.
    #[error("can not use \"{method}\" method")]
    MethodNotAllowed {
        /// The rejected method string.
        method: String,
    },

    /// A transform path list had the wrong shape, or an identifier could
    /// not be constructed.
    #[error("{reason}")]
    ArgsShape {
        /// What was wrong with the transform input.
        reason: String,
    },

    /// No locker filter predicate was satisfied for a mutating operation.
    #[error("locker: master filter use {filter}")]
    Locker {
        /// JSON rendering of the unmet filter specs.
        filter: String,
    },

    /// A reducer hook explicitly rejected the command.
    #[error("reducer rejected the command")]
    Reducer {
        /// The hook's error value, forwarded verbatim.
        detail: Value,
    },

    /// The store raised while executing the operation.
    #[error("database method error")]
    Store {
        /// The dispatched operation name.
        method: String,
        /// Target database.
        db: String,
        /// Target collection.
        col: String,
        /// The store's failure message.
        message: String,
    },

    /// Block assertion: the store returned nothing.
    #[error("data is empty")]
    BlockEmpty,

    /// Block assertion: a `find` returned zero documents.
    #[error("block: not find")]
    BlockNotFind,

    /// Block assertion: the mutation matched nothing.
    #[error("block: data result.n is 0")]
    BlockNoMatch {
        /// Partial redacted payload for diagnosis.
        partial: Value,
    },

    /// Block assertion: a response value differed from the expectation.
    #[error("block: {path} is not {expected}")]
    BlockMismatch {
        /// The asserted response path.
        path: String,
        /// The expected value.
        expected: Value,
    },

    /// The batch index ran past the batch. Reachable only for an empty
    /// batch or a driver bug.
    #[error("event is out")]
    Overflow {
        /// The out-of-range index.
        index: usize,
        /// The batch length.
        len: usize,
    },
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation {
            reason: reason.into(),
        }
    }

    /// Status class for the transport layer.
    pub fn classification(&self) -> ErrorClass {
        match self {
            Error::Store { .. } | Error::Overflow { .. } => ErrorClass::Internal,
            _ => ErrorClass::BadRequest,
        }
    }

    /// The structured wire body for this error.
    ///
    /// Always carries `error`; some variants add their diagnostic fields.
    /// `Store` exposes operation and target names but never argument
    /// values.
    pub fn to_body(&self) -> Value {
        match self {
            Error::Reducer { detail } => json!({
                "error": detail,
                "isReducer": true,
            }),
            Error::Store {
                method,
                db,
                col,
                message,
            } => json!({
                "error": self.to_string(),
                "msg": message,
                "info": { "dbName": db, "colName": col, "method": method },
            }),
            Error::BlockEmpty => json!({
                "error": self.to_string(),
                "empty": true,
            }),
            Error::BlockNoMatch { partial } => json!({
                "error": self.to_string(),
                "res": partial,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}
