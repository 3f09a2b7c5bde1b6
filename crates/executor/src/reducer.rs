//! Reducer hooks: per-target pre-execution interceptors.
//!
//! A hook sees the command after argument transforms and before the
//! locker and dispatch. It can short-circuit the whole batch with an
//! error, or rewrite parts of the command before execution continues.
//!
//! Resolution precedence for db `D`, col `C` is fixed:
//! `"D:*"` first, then `"*:C"`, then exact `"D:C"`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::command::{Command, Operation};
use crate::store::{Store, StoreFailure};

/// Partial command override returned by a hook.
///
/// Present fields replace the command's; absent fields are kept.
/// `remove` is intentionally not overridable. The patched transform-path
/// lists are carried on the command but not re-applied, since transforms
/// have already run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandPatch {
    /// Replacement database name.
    pub db: Option<String>,
    /// Replacement collection name.
    pub col: Option<String>,
    /// Replacement block assertions.
    pub block: Option<Map<String, Value>>,
    /// Replacement operation; already typed, so a hook cannot smuggle an
    /// unlisted method past the whitelist.
    pub method: Option<Operation>,
    /// Replacement arguments.
    pub args: Option<Vec<Value>>,
    /// Replacement digest path list.
    pub args_sha256: Option<Value>,
    /// Replacement identifier path list.
    pub args_object_id: Option<Value>,
}

/// What a hook decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReducerResult {
    /// When set, the batch stops with this error value.
    pub error: Option<Value>,
    /// When set, the named command fields are replaced before continuing.
    pub next_data: Option<CommandPatch>,
}

impl ReducerResult {
    /// Let the command through unchanged.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Reject the command; `detail` is forwarded to the caller verbatim.
    pub fn reject(detail: impl Into<Value>) -> Self {
        Self {
            error: Some(detail.into()),
            next_data: None,
        }
    }

    /// Rewrite parts of the command before it executes.
    pub fn rewrite(patch: CommandPatch) -> Self {
        Self {
            error: None,
            next_data: Some(patch),
        }
    }
}

/// Handle to the command's target collection, bound to the names in
/// effect when the hook runs. Lets a hook consult the store before
/// deciding.
pub struct CollectionHandle<'a> {
    store: &'a dyn Store,
    db: &'a str,
    col: &'a str,
}

impl<'a> CollectionHandle<'a> {
    pub(crate) fn new(store: &'a dyn Store, db: &'a str, col: &'a str) -> Self {
        Self { store, db, col }
    }

    /// The bound database name.
    pub fn db(&self) -> &str {
        self.db
    }

    /// The bound collection name.
    pub fn col(&self) -> &str {
        self.col
    }

    /// Run an operation against the bound collection.
    pub fn execute(&self, op: Operation, args: &[Value]) -> Result<Value, StoreFailure> {
        self.store.execute(self.db, self.col, op, args)
    }
}

/// A registered hook.
pub type ReducerFn =
    Arc<dyn Fn(&Command, &CollectionHandle<'_>) -> ReducerResult + Send + Sync>;

/// Hook registry keyed by `"db:col"`, with `*` as a wildcard on either
/// side.
#[derive(Clone, Default)]
pub struct ReducerRegistry {
    hooks: HashMap<String, ReducerFn>,
}

impl ReducerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under a `"db:col"` key; `"db:*"` and `"*:col"`
    /// wildcard forms are accepted.
    pub fn register<F>(&mut self, key: impl Into<String>, hook: F)
    where
        F: Fn(&Command, &CollectionHandle<'_>) -> ReducerResult + Send + Sync + 'static,
    {
        self.hooks.insert(key.into(), Arc::new(hook));
    }

    /// Resolve the hook for a target.
    ///
    /// The db-level wildcard wins over the collection-level wildcard,
    /// which wins over the exact key. This precedence is part of the
    /// wire contract.
    pub fn resolve(&self, db: &str, col: &str) -> Option<&ReducerFn> {
        self.hooks
            .get(&format!("{db}:*"))
            .or_else(|| self.hooks.get(&format!("*:{col}")))
            .or_else(|| self.hooks.get(&format!("{db}:{col}")))
    }

    /// Whether any hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for ReducerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducerRegistry")
            .field("keys", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}
