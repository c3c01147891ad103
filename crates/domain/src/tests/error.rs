// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::MissingRequiredField {
        entity: "user",
        field: String::from("email"),
    };
    assert_eq!(format!("{err}"), "Missing required field 'email' for user");

    let err: DomainError = DomainError::DuplicateEmail(String::from("a@b.com"));
    assert_eq!(
        format!("{err}"),
        "Email 'a@b.com' is already associated with an existing account"
    );

    let err: DomainError = DomainError::DuplicateName {
        first_name: String::from("Maria"),
        last_name: String::from("Santos"),
    };
    assert_eq!(
        format!("{err}"),
        "A user named 'Maria Santos' is already registered"
    );

    let err: DomainError = DomainError::InvalidIdentifier(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid identifier: test");
}
