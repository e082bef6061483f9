// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Structured responses from the generation backend.
//!
//! A raw backend reply is normalized and parsed as a JSON object. A
//! reply that fails to parse degrades to a sentinel error object
//! instead of raising, so callers can distinguish "got text, could not
//! parse it" from "never got a response" and offer a retry without
//! losing session state. Reading fields out of the sentinel always
//! fails.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Field carried by error-shaped responses, including the parse
/// sentinel.
pub const ERROR_FIELD: &str = "error";

const PARSE_FAILED: &str = "parse_failed";

/// A backend reply interpreted as a set of named fields.
///
/// Field order is the backend's field order; batch consumers rely on
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResponse {
    fields: Map<String, Value>,
}

impl StructuredResponse {
    /// Parse a raw backend reply.
    ///
    /// Known problematic punctuation substitutions are normalized
    /// first. Anything that still is not a JSON object becomes the
    /// `{"error": "parse_failed"}` sentinel.
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        match serde_json::from_str::<Value>(&normalized) {
            Ok(Value::Object(fields)) => Self { fields },
            _ => Self::parse_failed(),
        }
    }

    /// The parse-failure sentinel.
    pub fn parse_failed() -> Self {
        let mut fields = Map::new();
        fields.insert(
            ERROR_FIELD.to_string(),
            Value::String(PARSE_FAILED.to_string()),
        );
        Self { fields }
    }

    /// Whether this response is error-shaped (the parse sentinel, or an
    /// error object reported by the backend itself).
    pub fn is_error(&self) -> bool {
        self.fields.contains_key(ERROR_FIELD)
    }

    /// Read a text field.
    ///
    /// Fails with `ParseFailed` on an error-shaped response and with
    /// `MissingField` when the field is absent or not text.
    pub fn text_field(&self, field: &str) -> Result<&str> {
        if self.is_error() {
            return Err(Error::ParseFailed);
        }
        match self.fields.get(field) {
            Some(Value::String(text)) => Ok(text),
            _ => Err(Error::MissingField(field.to_string())),
        }
    }

    /// All text values in field order.
    pub fn text_values(&self) -> Result<Vec<String>> {
        if self.is_error() {
            return Err(Error::ParseFailed);
        }
        Ok(self
            .fields
            .values()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect())
    }
}

/// Normalize punctuation the backend is known to substitute: curly
/// quotes become plain apostrophes, ellipses (including the
/// mis-decoded UTF-8 form) become three dots.
fn normalize(raw: &str) -> String {
    raw.replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201c}', "'")
        .replace('\u{201d}', "'")
        .replace('\u{2026}', "...")
        .replace("\u{e2}\u{20ac}\u{a6}", "...")
}
