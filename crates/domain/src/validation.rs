// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::records::User;
use crate::types::Fields;
use serde_json::Value;

/// Validates that every required field is present and non-blank.
///
/// A field counts as missing when it is absent, `null`, or a string that is
/// empty after trimming. Fields are checked in the order given, and the
/// first missing one is reported.
///
/// # Arguments
///
/// * `entity` - The entity name used in the error
/// * `fields` - The canonical field values supplied by the caller
/// * `required` - The canonical names of required fields
///
/// # Errors
///
/// Returns `DomainError::MissingRequiredField` for the first missing field.
pub fn validate_required_fields(
    entity: &'static str,
    fields: &Fields,
    required: &[&str],
) -> Result<(), DomainError> {
    for field in required {
        let present: bool = match fields.get(*field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };

        if !present {
            return Err(DomainError::MissingRequiredField {
                entity,
                field: (*field).to_string(),
            });
        }
    }

    Ok(())
}

/// Validates that an email address is not already registered.
///
/// This is a pure check over the users the caller has already loaded; it
/// cannot see rows created concurrently by other clients.
///
/// # Errors
///
/// Returns `DomainError::DuplicateEmail` if any existing user's email
/// matches case-insensitively. Surrounding whitespace is significant.
pub fn validate_email_unique(email: &str, existing_users: &[User]) -> Result<(), DomainError> {
    let candidate: String = email.to_lowercase();

    // Rule: email addresses are unique regardless of case
    if existing_users
        .iter()
        .any(|user| user.email.to_lowercase() == candidate)
    {
        return Err(DomainError::DuplicateEmail(email.to_string()));
    }

    Ok(())
}

/// Validates that no existing user has the same first and last name.
///
/// The middle name is not part of the comparison.
///
/// # Errors
///
/// Returns `DomainError::DuplicateName` if any existing user matches both
/// names case-insensitively.
pub fn validate_name_unique(
    first_name: &str,
    last_name: &str,
    existing_users: &[User],
) -> Result<(), DomainError> {
    let first: String = first_name.to_lowercase();
    let last: String = last_name.to_lowercase();

    if existing_users.iter().any(|user| {
        user.first_name.to_lowercase() == first && user.last_name.to_lowercase() == last
    }) {
        return Err(DomainError::DuplicateName {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        });
    }

    Ok(())
}
