// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::schema::LogicalTable;
use itouru_domain::DomainError;
use std::time::Duration;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// No backend URL and key are configured.
    NotConfigured,
    /// The backend configuration is unusable (bad URL, client build failure).
    InvalidConfiguration(String),
    /// No candidate physical table exists and there is no default.
    TableUnresolvable(LogicalTable),
    /// The backend answered with an error.
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// The request never produced a backend answer.
    Transport(String),
    /// The call did not finish within the request timeout.
    Timeout(Duration),
    /// The row addressed by an operation does not exist.
    NotFound {
        table: String,
        column: String,
        value: String,
    },
    /// No usable identifier could be extracted or discovered.
    MissingIdentifier(String),
    /// A row could not be encoded or decoded.
    Serialization(String),
    /// The caller supplied invalid input.
    Validation(DomainError),
}

impl PersistenceError {
    /// Builds a backend error from its parts.
    #[must_use]
    pub fn backend(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            code: code.map(String::from),
            message: message.into(),
        }
    }

    /// Returns the backend error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns whether this error reports that `column` does not exist.
    ///
    /// Matches the Postgres message text as well as the Postgres and
    /// `PostgREST` error codes for unknown columns.
    #[must_use]
    pub fn is_missing_column(&self, column: &str) -> bool {
        let Self::Backend { code, message, .. } = self else {
            return false;
        };

        if message.contains(&format!("{column} does not exist")) {
            return true;
        }

        matches!(code.as_deref(), Some("42703" | "PGRST204")) && message.contains(column)
    }

    /// Returns whether this error is a foreign-key or not-null violation.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        let Self::Backend { code, message, .. } = self else {
            return false;
        };

        message.contains("violates not-null constraint")
            || message.contains("foreign key")
            || matches!(code.as_deref(), Some("23503" | "23502"))
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Backend is not configured"),
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::TableUnresolvable(table) => {
                write!(f, "No table could be resolved for '{table}'")
            }
            Self::Backend {
                status,
                code,
                message,
            } => match code {
                Some(code) => write!(f, "Backend error {status} ({code}): {message}"),
                None => write!(f, "Backend error {status}: {message}"),
            },
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Timeout(duration) => {
                write!(f, "Request timed out after {}ms", duration.as_millis())
            }
            Self::NotFound {
                table,
                column,
                value,
            } => write!(f, "No row in {table} where {column} = {value}"),
            Self::MissingIdentifier(msg) => write!(f, "Missing identifier: {msg}"),
            Self::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Serialization(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}
