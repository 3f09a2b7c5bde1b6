//! The document store capability.
//!
//! The pipeline never talks to a database driver directly; it dispatches
//! whitelisted operations through [`Store`]. The shipped
//! [`MemoryStore`] backs tests and embedded use.

use std::fmt;

use serde_json::Value;

use crate::command::Operation;

mod memory;

pub use memory::MemoryStore;

/// Failure raised by a store capability.
///
/// Deliberately opaque: the pipeline wraps it with operation and target
/// context, and nothing from the arguments leaks into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFailure(String);

impl StoreFailure {
    /// A failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        StoreFailure(message.into())
    }
}

impl fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StoreFailure {}

/// Executes one whitelisted operation against a named database and
/// collection.
///
/// Contract:
/// - `find` returns a fully materialized JSON array; no cursor crosses
///   this boundary.
/// - `findOne` returns the document, or `Null` when nothing matched.
/// - Mutations return a result object exposing the legacy count shape
///   `{"result": {"n": …, "ok": 1}, …}`.
pub trait Store: Send + Sync {
    /// Run `op` with `args` against `db`/`col`.
    fn execute(
        &self,
        db: &str,
        col: &str,
        op: Operation,
        args: &[Value],
    ) -> Result<Value, StoreFailure>;
}
