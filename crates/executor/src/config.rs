//! Pipeline configuration: defaults, permission sets and locker rules.
//!
//! The configuration is an immutable value injected into the runner at
//! construction and shared read-only across requests. Serde derives let
//! deployments load it from a config file alongside the store settings.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Scope};

/// One locker filter predicate.
///
/// Serialized untagged, so a config file writes either a bare path or a
/// list of paths, exactly like the wire form of the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// Satisfied when the value at this path in `args[0]` is truthy.
    Path(String),
    /// AND-group: satisfied only when every path's value is truthy.
    All(Vec<String>),
}

/// Per-collection mutation-safety rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockerRule {
    /// Filter predicates; any satisfied spec unlocks the mutation.
    #[serde(default)]
    pub filter: Vec<FilterSpec>,

    /// Response paths stripped from every payload for this collection.
    #[serde(default)]
    pub trim: Vec<String>,
}

impl LockerRule {
    /// An empty rule; add specs with the builder methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-path filter spec.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.filter.push(FilterSpec::Path(path.into()));
        self
    }

    /// Add an AND-group filter spec.
    pub fn all<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter
            .push(FilterSpec::All(paths.into_iter().map(Into::into).collect()));
        self
    }

    /// Add response paths to strip for this collection.
    pub fn trim<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trim.extend(paths.into_iter().map(Into::into));
        self
    }
}

/// Process-wide pipeline configuration, read-only after start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Database used when a command omits `db`.
    #[serde(default = "default_name")]
    pub default_db: String,

    /// Collection used when a command omits `col`.
    #[serde(default = "default_name")]
    pub default_col: String,

    /// When set, only these database names are reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_db: Option<HashSet<String>>,

    /// When set, only these collection names are reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_col: Option<HashSet<String>>,

    /// Mutation-safety rules keyed by collection name.
    #[serde(default)]
    pub lockers: HashMap<String, LockerRule>,
}

fn default_name() -> String {
    "test".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_db: default_name(),
            default_col: default_name(),
            open_db: None,
            open_col: None,
            lockers: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    /// A permissive configuration: no allowlists, no lockers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict reachable databases to `names`.
    pub fn open_db<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_db = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict reachable collections to `names`.
    pub fn open_col<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_col = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Install a locker rule for a collection.
    pub fn locker(mut self, col: impl Into<String>, rule: LockerRule) -> Self {
        self.lockers.insert(col.into(), rule);
        self
    }

    /// Permission gate. Runs before any transform or dispatch; no side
    /// effects.
    pub fn check_access(&self, db: &str, col: &str) -> Result<(), Error> {
        if let Some(open) = &self.open_db {
            if !open.contains(db) {
                return Err(Error::Permission {
                    scope: Scope::Db,
                    name: db.to_string(),
                });
            }
        }
        if let Some(open) = &self.open_col {
            if !open.contains(col) {
                return Err(Error::Permission {
                    scope: Scope::Col,
                    name: col.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The locker rule configured for a collection, if any.
    pub fn locker_for(&self, col: &str) -> Option<&LockerRule> {
        self.lockers.get(col)
    }
}
