// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::export::ExportError;
use itouru_domain::DomainError;
use itouru_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The backend is not configured or did not answer in time.
    Unavailable {
        /// A description of why the backend is unavailable.
        message: String,
    },
    /// The backend rejected the request.
    Backend {
        /// HTTP status reported by the backend.
        status: u16,
        /// The backend's error message.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Unavailable { message } => write!(f, "Backend unavailable: {message}"),
            Self::Backend { status, message } => {
                write!(f, "Backend rejected the request ({status}): {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingRequiredField { entity, field } => Self::InvalidInput {
                message: format!("{field} is required for {entity}"),
                field,
            },
            DomainError::DuplicateEmail(_) => Self::DomainRuleViolation {
                rule: String::from("unique_email"),
                message: err.to_string(),
            },
            DomainError::DuplicateName { .. } => Self::DomainRuleViolation {
                rule: String::from("unique_name"),
                message: err.to_string(),
            },
            DomainError::InvalidIdentifier(msg) => Self::InvalidInput {
                field: String::from("id"),
                message: msg,
            },
            DomainError::InvalidTimestamp(msg) => Self::InvalidInput {
                field: String::from("created_at"),
                message: msg,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Validation(domain) => Self::from(domain),
            PersistenceError::NotFound {
                table,
                column,
                value,
            } => Self::ResourceNotFound {
                resource_type: table,
                message: format!("no row with {column} = {value}"),
            },
            PersistenceError::TableUnresolvable(logical) => Self::ResourceNotFound {
                resource_type: String::from("Table"),
                message: format!("no physical table for {logical}"),
            },
            PersistenceError::MissingIdentifier(msg) => Self::InvalidInput {
                field: String::from("id"),
                message: msg,
            },
            PersistenceError::Backend {
                status, message, ..
            } => Self::Backend { status, message },
            PersistenceError::NotConfigured
            | PersistenceError::Transport(_)
            | PersistenceError::Timeout(_) => Self::Unavailable {
                message: err.to_string(),
            },
            PersistenceError::InvalidConfiguration(_) | PersistenceError::Serialization(_) => {
                Self::Internal {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
