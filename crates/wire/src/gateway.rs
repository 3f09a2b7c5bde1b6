//! The gateway: decode, check, run, seal.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use docgate_core::PayloadCodec;
use docgate_executor::{Error, Runner};

use crate::envelope::{extract_batch, ClientChecks, Sealed};

/// One inbound payload in, one sealed outcome or one structured error
/// out. The transport layer owns routing and status codes; it hands this
/// type the request's `code` field and serializes
/// [`Error::to_body`] / [`Sealed`] back onto the wire.
pub struct Gateway {
    codec: Arc<dyn PayloadCodec>,
    runner: Runner,
    checks: ClientChecks,
}

impl Gateway {
    /// A gateway over `runner`, decoding payloads with `codec` and
    /// performing no client checks.
    pub fn new(runner: Runner, codec: Arc<dyn PayloadCodec>) -> Self {
        Self {
            codec,
            runner,
            checks: ClientChecks::none(),
        }
    }

    /// Install request-level client checks.
    pub fn with_checks(mut self, checks: ClientChecks) -> Self {
        self.checks = checks;
        self
    }

    /// The wrapped runner.
    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    /// Handle one request using the wall clock for the time check.
    pub fn handle(&self, code: Option<&str>) -> Result<Sealed, Error> {
        self.handle_at(code, Utc::now().timestamp_millis())
    }

    /// Handle one request with an explicit `now`, the deterministic
    /// entry point `handle` delegates to.
    pub fn handle_at(&self, code: Option<&str>, now_ms: i64) -> Result<Sealed, Error> {
        let code = match code {
            Some(code) if !code.is_empty() => code,
            _ => return Err(Error::validation("body or body.code is empty")),
        };

        let plain = self
            .codec
            .decode(code)
            .map_err(|err| Error::validation(err.to_string()))?;
        let document: Value = serde_json::from_str(&plain)
            .map_err(|err| Error::validation(format!("invalid request body: {err}")))?;

        self.checks.verify(&document, now_ms)?;

        let batch = extract_batch(document)?;
        debug!(target: "docgate::gateway", commands = batch.len(), "dispatching batch");

        let outcome = self.runner.run(batch)?;

        let body = outcome.into_value().to_string();
        let code = self
            .codec
            .encode(&body)
            .map_err(|err| Error::validation(err.to_string()))?;
        Ok(Sealed { code })
    }
}
