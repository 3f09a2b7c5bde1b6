//! The sequential batch runner.
//!
//! One runner drives one batch: an explicit state machine over the batch
//! index replaces the original recursive driver so large batches cannot
//! grow the call stack. Commands execute strictly in order; the first
//! failure is terminal for the batch and later commands never start.
//! Only the last command's shaped output survives as the outcome.

use std::sync::Arc;

use tracing::{debug, error};

use crate::command::{Command, Operation};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::output::{shape, Output};
use crate::reducer::{CollectionHandle, ReducerRegistry};
use crate::store::Store;
use crate::{locker, transform};

/// Drives batches of commands through the pipeline.
///
/// A runner is cheap to construct and holds only shared, read-only
/// collaborators: concurrent requests each run their own batch on their
/// own runner (or share one; it carries no per-request state).
pub struct Runner {
    store: Arc<dyn Store>,
    config: Arc<PipelineConfig>,
    reducers: Arc<ReducerRegistry>,
}

enum State {
    Running(usize),
    Succeeded(Output),
    Failed(Error),
}

impl Runner {
    /// A runner over `store` with `config` and no reducer hooks.
    pub fn new(store: Arc<dyn Store>, config: Arc<PipelineConfig>) -> Self {
        Self {
            store,
            config,
            reducers: Arc::new(ReducerRegistry::new()),
        }
    }

    /// Install reducer hooks.
    pub fn with_reducers(mut self, reducers: Arc<ReducerRegistry>) -> Self {
        self.reducers = reducers;
        self
    }

    /// The underlying store capability. Escape hatch for callers that
    /// need direct access, such as tests re-reading documents.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The injected configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute a batch and produce its single outcome.
    ///
    /// The outcome is the last command's shaped output, or the error of
    /// the first command that failed. An empty batch reports the
    /// overflow error immediately.
    pub fn run(&self, batch: Vec<Command>) -> Result<Output, Error> {
        let mut state = State::Running(0);
        loop {
            state = match state {
                State::Running(index) => {
                    if index >= batch.len() {
                        State::Failed(Error::Overflow {
                            index,
                            len: batch.len(),
                        })
                    } else {
                        let is_last = index + 1 == batch.len();
                        match self.run_command(batch[index].clone()) {
                            Ok(output) if is_last => State::Succeeded(output),
                            Ok(_) => State::Running(index + 1),
                            Err(err) => State::Failed(err),
                        }
                    }
                }
                State::Succeeded(output) => return Ok(output),
                State::Failed(err) => return Err(err),
            };
        }
    }

    /// Run one command through every pipeline stage.
    fn run_command(&self, mut cmd: Command) -> Result<Output, Error> {
        let mut db = cmd
            .db
            .take()
            .unwrap_or_else(|| self.config.default_db.clone())
            .trim()
            .to_string();
        let mut col = cmd
            .col
            .take()
            .unwrap_or_else(|| self.config.default_col.clone())
            .trim()
            .to_string();

        self.config.check_access(&db, &col)?;

        let mut op = Operation::parse(&cmd.method).ok_or_else(|| Error::MethodNotAllowed {
            method: cmd.method.clone(),
        })?;

        debug!(target: "docgate::runner", db = %db, col = %col, method = %op, "running command");

        transform::apply_sha256(&mut cmd.args, cmd.args_sha256.as_ref())?;
        transform::apply_object_id(&mut cmd.args, cmd.args_object_id.as_ref())?;

        // hooks see the normalized identity of what will execute
        cmd.db = Some(db.clone());
        cmd.col = Some(col.clone());
        cmd.method = op.as_str().to_string();

        if let Some(hook) = self.reducers.resolve(&db, &col).cloned() {
            let back = {
                let handle = CollectionHandle::new(self.store.as_ref(), &db, &col);
                hook(&cmd, &handle)
            };
            if let Some(detail) = back.error {
                return Err(Error::Reducer { detail });
            }
            if let Some(patch) = back.next_data {
                if let Some(next) = patch.db {
                    db = next;
                    cmd.db = Some(db.clone());
                }
                if let Some(next) = patch.col {
                    col = next;
                    cmd.col = Some(col.clone());
                }
                if let Some(next) = patch.block {
                    cmd.block = Some(next);
                }
                if let Some(next) = patch.method {
                    op = next;
                    cmd.method = op.as_str().to_string();
                }
                if let Some(next) = patch.args {
                    cmd.args = next;
                }
                if let Some(next) = patch.args_sha256 {
                    cmd.args_sha256 = Some(next);
                }
                if let Some(next) = patch.args_object_id {
                    cmd.args_object_id = Some(next);
                }
            }
        }

        if op.is_mutating() {
            if let Some(rule) = self.config.locker_for(&col) {
                locker::check(rule, cmd.args.first())?;
            }
        }

        let result = self
            .store
            .execute(&db, &col, op, &cmd.args)
            .map_err(|failure| {
                error!(
                    target: "docgate::store",
                    db = %db,
                    col = %col,
                    method = %op,
                    error = %failure,
                    "store dispatch failed"
                );
                Error::Store {
                    method: op.as_str().to_string(),
                    db: db.clone(),
                    col: col.clone(),
                    message: failure.to_string(),
                }
            })?;

        let trim = self
            .config
            .locker_for(&col)
            .map(|rule| rule.trim.as_slice())
            .unwrap_or(&[]);
        shape(result, op, cmd.block.as_ref(), cmd.remove.as_deref(), trim)
    }
}
