//! In-memory document store.
//!
//! Documents live per `(db, col)` behind a `parking_lot` lock. Filters
//! match by structural-path equality on every filter key; update
//! documents apply `$set` / `$unset` / `$inc` (dotted paths), or replace
//! the whole document when no operator keys are present. Query operators
//! beyond path equality are not supported.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{json, Value};

use docgate_core::{paths, DocumentId};

use crate::command::Operation;

use super::{Store, StoreFailure};

/// In-memory [`Store`] implementation, for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<(String, String), Vec<Value>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection's documents.
    pub fn documents(&self, db: &str, col: &str) -> Vec<Value> {
        self.collections
            .read()
            .get(&(db.to_string(), col.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a collection's contents, for test seeding.
    pub fn seed(&self, db: &str, col: &str, docs: Vec<Value>) {
        self.collections
            .write()
            .insert((db.to_string(), col.to_string()), docs);
    }
}

impl Store for MemoryStore {
    fn execute(
        &self,
        db: &str,
        col: &str,
        op: Operation,
        args: &[Value],
    ) -> Result<Value, StoreFailure> {
        match op {
            Operation::Insert => match args.first() {
                Some(Value::Array(docs)) => self.insert_many(db, col, docs),
                Some(doc) => self.insert_one(db, col, doc),
                None => Err(StoreFailure::new("insert requires a document")),
            },
            Operation::InsertOne => match args.first() {
                Some(doc) => self.insert_one(db, col, doc),
                None => Err(StoreFailure::new("insertOne requires a document")),
            },
            Operation::InsertMany => match args.first() {
                Some(Value::Array(docs)) => self.insert_many(db, col, docs),
                _ => Err(StoreFailure::new("insertMany requires an array of documents")),
            },
            Operation::Find => {
                let filter = args.first().cloned().unwrap_or(Value::Null);
                let items: Vec<Value> = self
                    .documents(db, col)
                    .into_iter()
                    .filter(|doc| matches(doc, &filter))
                    .collect();
                Ok(Value::Array(items))
            }
            Operation::FindOne => {
                let filter = args.first().cloned().unwrap_or(Value::Null);
                Ok(self
                    .documents(db, col)
                    .into_iter()
                    .find(|doc| matches(doc, &filter))
                    .unwrap_or(Value::Null))
            }
            Operation::DeleteOne => {
                let filter = args.first().cloned().unwrap_or(Value::Null);
                let mut collections = self.collections.write();
                let docs = collections
                    .entry((db.to_string(), col.to_string()))
                    .or_default();
                let removed = match docs.iter().position(|doc| matches(doc, &filter)) {
                    Some(at) => {
                        docs.remove(at);
                        1
                    }
                    None => 0,
                };
                Ok(json!({
                    "deletedCount": removed,
                    "result": { "n": removed, "ok": 1 },
                }))
            }
            Operation::Update | Operation::UpdateOne => self.update(db, col, args, false),
            Operation::UpdateMany => self.update(db, col, args, true),
            Operation::ReplaceOne => {
                let filter = args.first().cloned().unwrap_or(Value::Null);
                let replacement = match args.get(1) {
                    Some(Value::Object(_)) => args[1].clone(),
                    _ => {
                        return Err(StoreFailure::new(
                            "replaceOne requires a replacement document",
                        ))
                    }
                };
                let mut collections = self.collections.write();
                let docs = collections
                    .entry((db.to_string(), col.to_string()))
                    .or_default();
                let mut matched = 0u64;
                if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) {
                    replace_document(doc, replacement);
                    matched = 1;
                }
                Ok(mutation_result(matched))
            }
        }
    }
}

impl MemoryStore {
    fn insert_one(&self, db: &str, col: &str, doc: &Value) -> Result<Value, StoreFailure> {
        let stored = prepare_insert(doc)?;
        let id = stored
            .get("_id")
            .cloned()
            .unwrap_or(Value::Null);
        self.collections
            .write()
            .entry((db.to_string(), col.to_string()))
            .or_default()
            .push(stored.clone());
        Ok(json!({
            "insertedCount": 1,
            "insertedId": id,
            "ops": [stored],
            "result": { "n": 1, "ok": 1 },
        }))
    }

    fn insert_many(&self, db: &str, col: &str, docs: &[Value]) -> Result<Value, StoreFailure> {
        let mut stored = Vec::with_capacity(docs.len());
        for doc in docs {
            stored.push(prepare_insert(doc)?);
        }
        let ids: Vec<Value> = stored
            .iter()
            .map(|doc| doc.get("_id").cloned().unwrap_or(Value::Null))
            .collect();
        self.collections
            .write()
            .entry((db.to_string(), col.to_string()))
            .or_default()
            .extend(stored.iter().cloned());
        Ok(json!({
            "insertedCount": stored.len(),
            "insertedIds": ids,
            "ops": stored,
            "result": { "n": stored.len(), "ok": 1 },
        }))
    }

    fn update(
        &self,
        db: &str,
        col: &str,
        args: &[Value],
        many: bool,
    ) -> Result<Value, StoreFailure> {
        let filter = args.first().cloned().unwrap_or(Value::Null);
        let update = match args.get(1) {
            Some(Value::Object(_)) => args[1].clone(),
            _ => return Err(StoreFailure::new("update requires an update document")),
        };
        let mut collections = self.collections.write();
        let docs = collections
            .entry((db.to_string(), col.to_string()))
            .or_default();
        let mut matched = 0u64;
        for doc in docs.iter_mut() {
            if !matches(doc, &filter) {
                continue;
            }
            apply_update(doc, &update)?;
            matched += 1;
            if !many {
                break;
            }
        }
        Ok(mutation_result(matched))
    }
}

fn mutation_result(matched: u64) -> Value {
    json!({
        "matchedCount": matched,
        "modifiedCount": matched,
        "result": { "n": matched, "nModified": matched, "ok": 1 },
    })
}

fn prepare_insert(doc: &Value) -> Result<Value, StoreFailure> {
    let mut stored = match doc {
        Value::Object(_) => doc.clone(),
        _ => return Err(StoreFailure::new("documents must be objects")),
    };
    if stored.get("_id").is_none() {
        paths::set(&mut stored, "_id", DocumentId::generate().as_value());
    }
    Ok(stored)
}

/// Path-equality match on every filter key. An absent, null or empty
/// filter matches everything; a non-object filter matches nothing.
fn matches(doc: &Value, filter: &Value) -> bool {
    match filter {
        Value::Null => true,
        Value::Object(map) => map
            .iter()
            .all(|(path, expected)| paths::get(doc, path) == Some(expected)),
        _ => false,
    }
}

fn apply_update(doc: &mut Value, update: &Value) -> Result<(), StoreFailure> {
    let map = match update {
        Value::Object(map) => map,
        _ => return Err(StoreFailure::new("update requires an update document")),
    };
    let has_operators = map.keys().any(|key| key.starts_with('$'));
    if !has_operators {
        replace_document(doc, update.clone());
        return Ok(());
    }
    for (operator, fields) in map {
        let fields = match fields {
            Value::Object(fields) => fields,
            _ => {
                return Err(StoreFailure::new(format!(
                    "malformed {operator} clause"
                )))
            }
        };
        match operator.as_str() {
            "$set" => {
                for (path, value) in fields {
                    paths::set(doc, path, value.clone());
                }
            }
            "$unset" => {
                for path in fields.keys() {
                    paths::remove(doc, path);
                }
            }
            "$inc" => {
                for (path, delta) in fields {
                    increment(doc, path, delta)?;
                }
            }
            other => {
                return Err(StoreFailure::new(format!(
                    "unsupported update operator {other}"
                )))
            }
        }
    }
    Ok(())
}

fn increment(doc: &mut Value, path: &str, delta: &Value) -> Result<(), StoreFailure> {
    let current = paths::get(doc, path).cloned().unwrap_or(json!(0));
    let next = match (current.as_i64(), delta.as_i64()) {
        (Some(current), Some(delta)) => json!(current + delta),
        _ => match (current.as_f64(), delta.as_f64()) {
            (Some(current), Some(delta)) => json!(current + delta),
            _ => {
                return Err(StoreFailure::new(format!(
                    "$inc requires numeric values at {path}"
                )))
            }
        },
    };
    paths::set(doc, path, next);
    Ok(())
}

/// Full-document replacement keeps the original `_id` when the new
/// document does not carry one.
fn replace_document(doc: &mut Value, mut replacement: Value) {
    if replacement.get("_id").is_none() {
        if let Some(id) = doc.get("_id").cloned() {
            paths::set(&mut replacement, "_id", id);
        }
    }
    *doc = replacement;
}
