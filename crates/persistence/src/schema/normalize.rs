// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::aliases::{FieldAlias, FieldKind};
use crate::backend::{Row, scalar_text};
use crate::error::PersistenceError;
use serde::de::DeserializeOwned;
use serde_json::Value;

impl FieldKind {
    /// Coerces a raw value to this kind.
    ///
    /// Returns `None` for null, blank text, and values that cannot represent
    /// the kind; the caller then moves on to the next candidate. Coercing an
    /// already-coerced value returns it unchanged.
    #[must_use]
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => None,
            (Self::Json, other) => Some(other.clone()),
            (Self::Text, Value::String(s)) | (Self::Timestamp, Value::String(s)) => {
                (!s.trim().is_empty()).then(|| Value::String(s.clone()))
            }
            (Self::Text, Value::Number(_) | Value::Bool(_)) => {
                Some(Value::String(scalar_text(value)))
            }
            (Self::Integer, Value::Number(n)) => integer_from_number(n).map(Value::from),
            (Self::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
            (Self::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
            (Self::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(0) => Some(Value::Bool(false)),
                Some(1) => Some(Value::Bool(true)),
                _ => None,
            },
            (Self::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "1" => Some(Value::Bool(true)),
                "false" | "f" | "no" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            (Self::Identifier, Value::Number(n)) => Some(
                n.as_i64()
                    .map_or_else(|| Value::String(n.to_string()), Value::from),
            ),
            (Self::Identifier, Value::String(s)) => {
                (!s.trim().is_empty()).then(|| Value::String(s.clone()))
            }
            (Self::TextList, Value::Array(items)) => Some(Value::Array(
                items
                    .iter()
                    .filter(|item| !item.is_null() && !item.is_array() && !item.is_object())
                    .map(|item| Value::String(scalar_text(item)))
                    .collect(),
            )),
            (Self::TextList, Value::String(s)) => Some(Value::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| Value::String(tag.to_string()))
                    .collect(),
            )),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integer_from_number(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| f as i64)
}

impl FieldAlias {
    /// Resolves this field from a raw row.
    ///
    /// The first candidate whose value coerces wins; otherwise the default.
    #[must_use]
    pub fn resolve(&self, raw: &Row) -> Value {
        self.candidates
            .iter()
            .filter_map(|candidate| raw.get(*candidate))
            .find_map(|value| self.kind.coerce(value))
            .unwrap_or_else(|| self.default.to_value())
    }
}

/// Maps a raw row onto the canonical field set described by `aliases`.
///
/// Every canonical field is present in the result. Pure and idempotent.
#[must_use]
pub fn normalize(raw: &Row, aliases: &[FieldAlias]) -> Row {
    aliases
        .iter()
        .map(|alias| (alias.field.to_string(), alias.resolve(raw)))
        .collect()
}

/// Normalizes a raw row and decodes it into a canonical record.
///
/// # Errors
///
/// Returns `PersistenceError::Serialization` if the normalized row does not
/// fit the record type.
pub fn decode<T: DeserializeOwned>(
    raw: &Row,
    aliases: &[FieldAlias],
) -> Result<T, PersistenceError> {
    let normalized: Row = normalize(raw, aliases);
    Ok(serde_json::from_value::<T>(Value::Object(normalized))?)
}
