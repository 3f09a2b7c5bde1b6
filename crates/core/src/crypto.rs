//! Digest primitive and the payload codec seam.
//!
//! The codec contract keeps the wire's key pairing: `decode` is performed
//! with the public key, `encode` with the matching private key. That is
//! the reverse of conventional asymmetric use and is intentional; real
//! keypair codecs live outside this crate behind [`PayloadCodec`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest as _, Sha256};
use std::fmt::Write as _;
use thiserror::Error;

/// SHA-256 of `value + salt`, rendered as lowercase hex.
///
/// Stable and deterministic: the same input and salt always produce the
/// same digest.
pub fn digest(value: &str, salt: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    if let Some(salt) = salt {
        hasher.update(salt.as_bytes());
    }
    let bytes = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in bytes {
        // infallible on String
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Errors from a payload codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The inbound payload could not be decoded.
    #[error("payload decode failed: {0}")]
    Decode(String),

    /// The outbound payload could not be encoded.
    #[error("payload encode failed: {0}")]
    Encode(String),
}

/// Asymmetric payload encode/decode capability.
///
/// `decode` opens an inbound payload with the public key; `encode` seals
/// an outbound payload with the private key.
pub trait PayloadCodec: Send + Sync {
    /// Open an inbound payload into its plaintext form.
    fn decode(&self, payload: &str) -> Result<String, CodecError>;

    /// Seal an outbound plaintext into its payload form.
    fn encode(&self, plaintext: &str) -> Result<String, CodecError>;
}

/// Pass-through codec, the behavior when no keypair is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl PayloadCodec for Plaintext {
    fn decode(&self, payload: &str) -> Result<String, CodecError> {
        Ok(payload.to_string())
    }

    fn encode(&self, plaintext: &str) -> Result<String, CodecError> {
        Ok(plaintext.to_string())
    }
}

/// Standard-alphabet base64 armor, the reference non-trivial codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

impl PayloadCodec for Base64 {
    fn decode(&self, payload: &str) -> Result<String, CodecError> {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|err| CodecError::Decode(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }

    fn encode(&self, plaintext: &str) -> Result<String, CodecError> {
        Ok(STANDARD.encode(plaintext.as_bytes()))
    }
}
