// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely-typed set of canonical field values.
///
/// Used for create and partial-update payloads, where callers supply only
/// the fields they care about.
pub type Fields = serde_json::Map<String, Value>;

/// Identifier of a record in the backend.
///
/// Deployments disagree on identifier types: some tables use client-generated
/// integers (`building_id`, `user_id`), others use UUID strings. Both shapes
/// are carried without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// An integer key.
    Int(i64),
    /// A textual key, typically a UUID.
    Text(String),
}

impl RecordId {
    /// Parses a raw identifier, preferring the integer form.
    ///
    /// Numeric-looking input (after trimming) becomes `Int`; anything else is
    /// kept verbatim as `Text`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Int)
    }

    /// Extracts an identifier from a JSON value.
    ///
    /// Returns `None` for null, empty strings, and non-scalar values.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .map_or_else(|| Self::Text(n.to_string()), Self::Int),
            ),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Returns this identifier with numeric-looking text coerced to an integer.
    ///
    /// UUIDs and other non-numeric text are returned unchanged.
    #[must_use]
    pub fn coerced(&self) -> Self {
        match self {
            Self::Int(n) => Self::Int(*n),
            Self::Text(s) => Self::parse(s),
        }
    }

    /// Converts this identifier into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Validates that this identifier is usable as a lookup key.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is blank text.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Text(s) if s.trim().is_empty() => Err(DomainError::InvalidIdentifier(
                String::from("Identifier cannot be empty"),
            )),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
