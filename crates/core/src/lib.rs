//! Leaf building blocks shared by the docgate pipeline crates.
//!
//! This crate knows nothing about commands or batches. It provides:
//! - [`paths`] - structural path addressing over `serde_json::Value`
//! - [`DocumentId`] - the store-native 12-byte document identifier
//! - [`crypto`] - the digest primitive and the payload codec seam

#![warn(missing_docs)]

pub mod crypto;
pub mod id;
pub mod paths;

pub use crypto::{digest, Base64, CodecError, PayloadCodec, Plaintext};
pub use id::{DocumentId, IdError};
