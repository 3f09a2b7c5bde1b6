//! docgate - an encrypted batch gateway for document stores.
//!
//! One network payload carries one batch of database commands. Each
//! command runs through permission, whitelist, transform, reducer,
//! locker, dispatch and shaping stages, strictly in order; the batch
//! produces exactly one outcome, which is sealed back into an encrypted
//! payload.
//!
//! # Quick Start
//!
//! ```text
//! use docgate::{Gateway, MemoryStore, PipelineConfig, Plaintext, Runner};
//!
//! let store = Arc::new(MemoryStore::new());
//! let runner = Runner::new(store, Arc::new(PipelineConfig::new()));
//! let gateway = Gateway::new(runner, Arc::new(Plaintext));
//!
//! let sealed = gateway.handle(Some(r#"{"col":"orders","method":"find"}"#))?;
//! ```
//!
//! # Architecture
//!
//! The executor crate owns the pipeline and the runner; the wire crate
//! owns the envelope around it. Transport routing and real asymmetric
//! key handling stay outside, behind the `PayloadCodec` seam.

// Re-export the public API from the member crates
pub use docgate_core::{digest, paths, Base64, CodecError, DocumentId, IdError, PayloadCodec, Plaintext};
pub use docgate_executor::*;
pub use docgate_wire::{discover, extract_batch, ClientChecks, Gateway, Sealed};
