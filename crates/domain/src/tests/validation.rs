// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_user;
use crate::{
    DomainError, Fields, User, validate_email_unique, validate_name_unique,
    validate_required_fields,
};
use serde_json::{Value, json};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => panic!("test fields must be an object"),
    }
}

#[test]
fn test_validate_required_fields_accepts_complete_payload() {
    let payload: Fields = fields(json!({
        "email": "a@b.com",
        "first_name": "Ana",
        "last_name": "Cruz"
    }));

    let result: Result<(), DomainError> =
        validate_required_fields("user", &payload, &["email", "first_name", "last_name"]);
    assert!(result.is_ok());
}

#[test]
fn test_validate_required_fields_rejects_blank_string() {
    let payload: Fields = fields(json!({
        "email": "a@b.com",
        "first_name": "   ",
        "last_name": "Cruz"
    }));

    let result: Result<(), DomainError> =
        validate_required_fields("user", &payload, &["email", "first_name", "last_name"]);
    assert_eq!(
        result,
        Err(DomainError::MissingRequiredField {
            entity: "user",
            field: String::from("first_name"),
        })
    );
}

#[test]
fn test_validate_required_fields_rejects_null_and_absent() {
    let payload: Fields = fields(json!({ "name": null }));

    let result: Result<(), DomainError> =
        validate_required_fields("building", &payload, &["name", "address"]);
    assert!(matches!(
        result,
        Err(DomainError::MissingRequiredField { field, .. }) if field == "name"
    ));
}

#[test]
fn test_validate_required_fields_accepts_numbers() {
    let payload: Fields = fields(json!({ "building_id": 101, "name": "Lab", "room_number": "2" }));

    let result: Result<(), DomainError> =
        validate_required_fields("room", &payload, &["building_id", "name", "room_number"]);
    assert!(result.is_ok());
}

#[test]
fn test_validate_email_unique_is_case_insensitive() {
    let existing: Vec<User> = vec![create_test_user("A@B.COM", "Ana", "Cruz")];

    let result: Result<(), DomainError> = validate_email_unique("a@b.com", &existing);
    assert_eq!(result, Err(DomainError::DuplicateEmail(String::from("a@b.com"))));
}

#[test]
fn test_validate_email_unique_accepts_new_email() {
    let existing: Vec<User> = vec![create_test_user("A@B.COM", "Ana", "Cruz")];

    let result: Result<(), DomainError> = validate_email_unique("c@d.com", &existing);
    assert!(result.is_ok());
}

#[test]
fn test_validate_name_unique_ignores_middle_name_and_case() {
    let mut existing_user: User = create_test_user("x@y.com", "Maria", "Santos");
    existing_user.middle_name = String::from("Luisa");
    let existing: Vec<User> = vec![existing_user];

    let result: Result<(), DomainError> = validate_name_unique("MARIA", "santos", &existing);
    assert!(matches!(result, Err(DomainError::DuplicateName { .. })));
}

#[test]
fn test_validate_name_unique_requires_both_names_to_match() {
    let existing: Vec<User> = vec![create_test_user("x@y.com", "Maria", "Santos")];

    let result: Result<(), DomainError> = validate_name_unique("Maria", "Reyes", &existing);
    assert!(result.is_ok());
}

#[test]
fn test_validate_email_unique_treats_surrounding_whitespace_as_distinct() {
    let existing: Vec<User> = vec![create_test_user("a@b.com", "Ana", "Cruz")];

    let result: Result<(), DomainError> = validate_email_unique(" a@b.com ", &existing);
    assert!(result.is_ok());
}

#[test]
fn test_validate_name_unique_treats_surrounding_whitespace_as_distinct() {
    let existing: Vec<User> = vec![create_test_user("x@y.com", "Maria", "Santos")];

    let result: Result<(), DomainError> = validate_name_unique("Maria ", " Santos", &existing);
    assert!(result.is_ok());
}
