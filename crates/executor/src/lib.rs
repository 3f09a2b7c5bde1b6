//! # Docgate Executor
//!
//! The event-batch execution engine: validates each command, applies
//! argument transforms, enforces per-collection mutation lockers,
//! dispatches to the store capability, evaluates block assertions, and
//! shapes the outward payload. One batch in, exactly one outcome out.
//!
//! ## Quick Start
//!
//! ```text
//! use docgate_executor::{Command, MemoryStore, PipelineConfig, Runner};
//!
//! let store = Arc::new(MemoryStore::new());
//! let runner = Runner::new(store, Arc::new(PipelineConfig::new()));
//!
//! let outcome = runner.run(vec![Command {
//!     col: Some("orders".into()),
//!     method: "findOne".into(),
//!     args: vec![serde_json::json!({"item": "mug"})],
//!     ..Default::default()
//! }])?;
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Failure |
//! |-------|---------|
//! | Permission gate | `Permission` |
//! | Whitelist | `MethodNotAllowed` |
//! | Argument transforms | `ArgsShape` |
//! | Reducer hook | `Reducer` |
//! | Mutation locker | `Locker` |
//! | Store dispatch | `Store` |
//! | Response shaping | `Block*` |

#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod locker;
mod output;
mod reducer;
mod runner;
mod store;
mod transform;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use command::{Command, Operation};
pub use config::{FilterSpec, LockerRule, PipelineConfig};
pub use error::{Error, ErrorClass, Scope};
pub use output::Output;
pub use reducer::{CollectionHandle, CommandPatch, ReducerFn, ReducerRegistry, ReducerResult};
pub use runner::Runner;
pub use store::{MemoryStore, Store, StoreFailure};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
