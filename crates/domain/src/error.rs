// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field required to create a record is missing or blank.
    MissingRequiredField {
        /// The entity being created (e.g. "user").
        entity: &'static str,
        /// The canonical name of the missing field.
        field: String,
    },
    /// The email address is already registered to another user.
    ///
    /// Comparison is case-insensitive.
    DuplicateEmail(String),
    /// A user with the same first and last name already exists.
    DuplicateName {
        /// The first name that collided.
        first_name: String,
        /// The last name that collided.
        last_name: String,
    },
    /// A record identifier is missing or cannot be used.
    InvalidIdentifier(String),
    /// A timestamp could not be parsed.
    InvalidTimestamp(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField { entity, field } => {
                write!(f, "Missing required field '{field}' for {entity}")
            }
            Self::DuplicateEmail(email) => {
                write!(
                    f,
                    "Email '{email}' is already associated with an existing account"
                )
            }
            Self::DuplicateName {
                first_name,
                last_name,
            } => {
                write!(
                    f,
                    "A user named '{first_name} {last_name}' is already registered"
                )
            }
            Self::InvalidIdentifier(msg) => write!(f, "Invalid identifier: {msg}"),
            Self::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
