//! Shared fixtures for the pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::command::{Command, Operation};
use crate::config::PipelineConfig;
use crate::runner::Runner;
use crate::store::{MemoryStore, Store, StoreFailure};

/// Store wrapper that counts dispatches, for never-reached assertions.
pub(crate) struct CountingStore {
    pub inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Store for CountingStore {
    fn execute(
        &self,
        db: &str,
        col: &str,
        op: Operation,
        args: &[Value],
    ) -> Result<Value, StoreFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(db, col, op, args)
    }
}

/// Store that always fails, for dispatch-error tests.
pub(crate) struct FailingStore;

impl Store for FailingStore {
    fn execute(
        &self,
        _db: &str,
        _col: &str,
        _op: Operation,
        _args: &[Value],
    ) -> Result<Value, StoreFailure> {
        Err(StoreFailure::new("connection reset"))
    }
}

/// A runner over an empty memory store with a permissive config.
pub(crate) fn plain_runner() -> (Arc<MemoryStore>, Runner) {
    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(store.clone(), Arc::new(PipelineConfig::new()));
    (store, runner)
}

/// A command with just a collection, method and args.
pub(crate) fn command(col: &str, method: &str, args: Vec<Value>) -> Command {
    Command {
        col: Some(col.to_string()),
        method: method.to_string(),
        args,
        ..Default::default()
    }
}

/// Seed `test/orders` with two documents and return their ids.
pub(crate) fn seed_orders(store: &MemoryStore) -> (Value, Value) {
    let mug = json!({"$oid": "507f1f77bcf86cd799439011"});
    let pen = json!({"$oid": "507f1f77bcf86cd799439012"});
    store.seed(
        "test",
        "orders",
        vec![
            json!({"_id": mug.clone(), "item": "mug", "qty": 2, "paid": false}),
            json!({"_id": pen.clone(), "item": "pen", "qty": 5, "paid": false}),
        ],
    );
    (mug, pen)
}
