//! Argument transforms: digest and identifier rewrites.
//!
//! Both transforms address into the positional argument list with
//! structural paths ("0._id" means `args[0]._id`). Values are rewritten
//! in place only when present and truthy; falsy values are deliberately
//! left untouched. The path lists arrive as raw JSON and are
//! shape-validated here, before any transform is applied.

use serde_json::Value;

use docgate_core::{digest, paths, DocumentId};

use crate::error::Error;

/// Apply the digest transform for every path in `spec`.
pub fn apply_sha256(args: &mut [Value], spec: Option<&Value>) -> Result<(), Error> {
    let list = match spec {
        Some(spec) => path_list(spec, "argsSha256")?,
        None => return Ok(()),
    };
    for path in &list {
        let current = match arg_get(args, path) {
            Some(value) => value.clone(),
            None => continue,
        };
        if paths::is_truthy(&current) {
            let hashed = digest(&digest_input(&current), None);
            arg_set(args, path, Value::String(hashed));
        }
    }
    Ok(())
}

/// Apply the identifier transform for every path in `spec`.
///
/// Unlike the digest transform, a truthy value that cannot form a valid
/// identifier is an error, not a skip.
pub fn apply_object_id(args: &mut [Value], spec: Option<&Value>) -> Result<(), Error> {
    let list = match spec {
        Some(spec) => path_list(spec, "argsObjectId")?,
        None => return Ok(()),
    };
    for path in &list {
        let current = match arg_get(args, path) {
            Some(value) => value.clone(),
            None => continue,
        };
        if paths::is_truthy(&current) {
            let id = DocumentId::from_value(&current).map_err(|err| Error::ArgsShape {
                reason: format!("argsObjectId path \"{path}\": {err}"),
            })?;
            arg_set(args, path, id.as_value());
        }
    }
    Ok(())
}

/// Strings hash their text; everything else hashes its compact JSON
/// serialization.
fn digest_input(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn path_list(spec: &Value, field: &str) -> Result<Vec<String>, Error> {
    let items = match spec {
        Value::Array(items) => items,
        _ => {
            return Err(Error::ArgsShape {
                reason: format!("{field} is not an array"),
            })
        }
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(path) => Ok(path.clone()),
            _ => Err(Error::ArgsShape {
                reason: format!("{field} contains a non-string path"),
            }),
        })
        .collect()
}

fn arg_get<'a>(args: &'a [Value], path: &str) -> Option<&'a Value> {
    let (head, rest) = split_head(path);
    let root = args.get(head.parse::<usize>().ok()?)?;
    match rest {
        Some(rest) => paths::get(root, rest),
        None => Some(root),
    }
}

fn arg_set(args: &mut [Value], path: &str, value: Value) {
    let (head, rest) = split_head(path);
    let index = match head.parse::<usize>() {
        Ok(index) => index,
        Err(_) => return,
    };
    let root = match args.get_mut(index) {
        Some(root) => root,
        None => return,
    };
    match rest {
        Some(rest) => paths::set(root, rest, value),
        None => *root = value,
    }
}

fn split_head(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}
