//! Store-native document identifiers.
//!
//! A [`DocumentId`] is 12 raw bytes. Its text form is exactly 24 lowercase
//! hex characters; its JSON value form is the extended `{"$oid": "<hex>"}`
//! object, which survives the `serde_json::Value` pipeline and compares
//! equal by structure.

use std::fmt::{self, Write as _};

use serde_json::{json, Value};
use thiserror::Error;

/// Errors from constructing a [`DocumentId`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The source text is not 24 characters long.
    #[error("identifier must be 24 hex characters, got {0}")]
    Length(usize),

    /// The source text contains a non-hex character.
    #[error("identifier contains a non-hex character")]
    NonHex,

    /// The source value is not a hex string or an `$oid` object.
    #[error("identifier source is not a string")]
    NotString,
}

/// A 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId([u8; 12]);

impl DocumentId {
    /// Parse the 24-hex-character text form.
    pub fn parse(text: &str) -> Result<Self, IdError> {
        if text.len() != 24 {
            return Err(IdError::Length(text.len()));
        }
        let mut bytes = [0u8; 12];
        for (slot, pair) in bytes.iter_mut().zip(text.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).map_err(|_| IdError::NonHex)?;
            *slot = u8::from_str_radix(pair, 16).map_err(|_| IdError::NonHex)?;
        }
        Ok(DocumentId(bytes))
    }

    /// A fresh random identifier, for inserts that carry no `_id`.
    pub fn generate() -> Self {
        DocumentId(rand::random())
    }

    /// The 24-character lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(24);
        for byte in &self.0 {
            // infallible on String
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// The extended JSON value form, `{"$oid": "<hex>"}`.
    pub fn as_value(&self) -> Value {
        json!({ "$oid": self.to_hex() })
    }

    /// Accepts the hex string form or the `{"$oid": …}` value form.
    pub fn from_value(value: &Value) -> Result<Self, IdError> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Object(map) => match map.get("$oid") {
                Some(Value::String(text)) => Self::parse(text),
                _ => Err(IdError::NotString),
            },
            _ => Err(IdError::NotString),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_round_trips() {
        let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
        assert_eq!(id.as_value(), json!({"$oid": "507f1f77bcf86cd799439011"}));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(DocumentId::parse("abc"), Err(IdError::Length(3)));
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            DocumentId::parse("zzzzzzzzzzzzzzzzzzzzzzzz"),
            Err(IdError::NonHex)
        );
    }

    #[test]
    fn from_value_accepts_both_forms() {
        let hex = "507f1f77bcf86cd799439011";
        let from_text = DocumentId::from_value(&json!(hex)).unwrap();
        let from_oid = DocumentId::from_value(&json!({ "$oid": hex })).unwrap();
        assert_eq!(from_text, from_oid);
        assert_eq!(
            DocumentId::from_value(&json!(42)),
            Err(IdError::NotString)
        );
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }
}
