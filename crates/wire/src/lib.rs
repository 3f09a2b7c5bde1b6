//! # Docgate Wire
//!
//! The boundary around the execution engine: payload envelope handling
//! (decode, client checks, batch extraction, outcome sealing) and the
//! controller-discovery walk. HTTP routing itself stays outside; the
//! transport hands [`Gateway::handle`] the request's `code` field and
//! maps the returned error's [`classification`] to a status code.
//!
//! [`classification`]: docgate_executor::Error::classification

#![warn(missing_docs)]

mod discover;
mod envelope;
mod gateway;

pub use discover::discover;
pub use envelope::{extract_batch, ClientChecks, Sealed};
pub use gateway::Gateway;
