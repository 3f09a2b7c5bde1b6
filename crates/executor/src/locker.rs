//! Mutation locker evaluation.
//!
//! Lockers only see `args[0]` of the command, which for every guarded
//! operation is the filter document. A rule passes when any one of its
//! specs is satisfied; evaluation stops at the first satisfied spec.

use serde_json::Value;

use docgate_core::paths;

use crate::config::{FilterSpec, LockerRule};
use crate::error::Error;

/// Check a rule against the first argument of a mutating command.
///
/// A rule with no filter specs never locks. An unsatisfied rule fails
/// with the JSON rendering of its specs, so the caller can see which
/// predicates were required.
pub fn check(rule: &LockerRule, first_arg: Option<&Value>) -> Result<(), Error> {
    if rule.filter.is_empty() {
        return Ok(());
    }
    if rule.filter.iter().any(|spec| satisfied(spec, first_arg)) {
        return Ok(());
    }
    Err(Error::Locker {
        filter: serde_json::to_string(&rule.filter).unwrap_or_default(),
    })
}

fn satisfied(spec: &FilterSpec, first_arg: Option<&Value>) -> bool {
    match spec {
        FilterSpec::Path(path) => truthy_at(first_arg, path),
        // all() on an empty group is vacuously true
        FilterSpec::All(group) => group.iter().all(|path| truthy_at(first_arg, path)),
    }
}

fn truthy_at(first_arg: Option<&Value>, path: &str) -> bool {
    first_arg
        .and_then(|root| paths::get(root, path))
        .map_or(false, paths::is_truthy)
}
