//! Command data model and the operation whitelist.
//!
//! Commands are the wire-facing "instruction set" of the gateway. They
//! are:
//! - **Self-contained**: everything needed for execution is on the value
//! - **Serializable**: decoded straight from the decrypted request body
//! - **Loosely typed at the edges**: the transform-path lists stay as raw
//!   JSON so shape validation can fail with the dedicated error instead
//!   of a decode error

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One database operation request with optional transform, assertion and
/// redaction metadata.
///
/// `db` and `col` default to `"test"` when absent and are trimmed of
/// surrounding whitespace before use. Unknown fields are tolerated: a
/// single-command request shares its object with request-level fields
/// like `_checkTime`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Target database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,

    /// Target collection name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<String>,

    /// Requested operation name; validated against [`Operation`] before
    /// anything touches the store.
    pub method: String,

    /// Positional operation arguments.
    #[serde(default)]
    pub args: Vec<Value>,

    /// Post-execution assertions: path -> expected value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Map<String, Value>>,

    /// Response paths to strip from the outward payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<String>>,

    /// Argument paths whose values are rewritten to their digest.
    /// Kept as raw JSON; the transformer validates the shape.
    #[serde(
        default,
        rename = "argsSha256",
        skip_serializing_if = "Option::is_none"
    )]
    pub args_sha256: Option<Value>,

    /// Argument paths whose values are rewritten to document identifiers.
    /// Kept as raw JSON; the transformer validates the shape.
    #[serde(
        default,
        rename = "argsObjectId",
        skip_serializing_if = "Option::is_none"
    )]
    pub args_object_id: Option<Value>,
}

/// The ten permitted operations.
///
/// Dispatch is always over this enum; a raw method string is parsed
/// exactly once, by the whitelist check, and never resolved into a
/// callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Legacy insert; accepts one document or an array of documents.
    Insert,
    /// Insert several documents.
    InsertMany,
    /// Insert a single document.
    InsertOne,
    /// Delete the first matching document.
    DeleteOne,
    /// Legacy update; single-document semantics.
    Update,
    /// Update every matching document.
    UpdateMany,
    /// Update the first matching document.
    UpdateOne,
    /// Replace the first matching document.
    ReplaceOne,
    /// Query for all matching documents; always materialized.
    Find,
    /// Query for the first matching document.
    FindOne,
}

impl Operation {
    /// Parse a wire method name; `None` for anything off the whitelist.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "insert" => Some(Operation::Insert),
            "insertMany" => Some(Operation::InsertMany),
            "insertOne" => Some(Operation::InsertOne),
            "deleteOne" => Some(Operation::DeleteOne),
            "update" => Some(Operation::Update),
            "updateMany" => Some(Operation::UpdateMany),
            "updateOne" => Some(Operation::UpdateOne),
            "replaceOne" => Some(Operation::ReplaceOne),
            "find" => Some(Operation::Find),
            "findOne" => Some(Operation::FindOne),
            _ => None,
        }
    }

    /// The wire method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::InsertMany => "insertMany",
            Operation::InsertOne => "insertOne",
            Operation::DeleteOne => "deleteOne",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::UpdateOne => "updateOne",
            Operation::ReplaceOne => "replaceOne",
            Operation::Find => "find",
            Operation::FindOne => "findOne",
        }
    }

    /// The locker guard applies to operations whose name contains
    /// "update" or "delete". `replaceOne` and the inserts are exempt.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::DeleteOne
                | Operation::Update
                | Operation::UpdateMany
                | Operation::UpdateOne
        )
    }

    /// Whether this is the list-producing query operation.
    pub fn is_find(&self) -> bool {
        matches!(self, Operation::Find)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
