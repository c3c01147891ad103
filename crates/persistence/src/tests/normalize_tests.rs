// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::row;
use crate::aliases::{BUILDING_ALIASES, CONTENT_ALIASES, TOUR_ALIASES, USER_ALIASES};
use crate::{Entity, FieldKind, LogicalTable, Row, aliases_for, decode, normalize};
use itouru_domain::{
    Building, ContentItem, QrCode, RecordId, Room, Tour, TourStop, User,
};
use serde_json::{Value, json};
use std::fmt::Debug;

#[test]
fn test_every_canonical_field_accepts_its_own_name() {
    for logical in LogicalTable::ALL {
        for alias in aliases_for(logical) {
            assert!(
                alias.candidates.contains(&alias.field),
                "{logical}.{} is missing from its own candidates",
                alias.field
            );
        }
    }
}

#[test]
fn test_normalize_mixed_case_user_row() {
    let raw: Row = row(json!({
        "ID": 12,
        "Email": "lea@example.edu",
        "First_Name": "Lea",
        "Last_Name": "Tan",
        "role": "Faculty",
    }));

    let user: User = decode::<User>(&raw, USER_ALIASES).unwrap();

    assert_eq!(user.id, Some(RecordId::Int(12)));
    assert_eq!(user.user_id, Some(RecordId::Int(12)));
    assert_eq!(user.email, "lea@example.edu");
    assert_eq!(user.first_name, "Lea");
    assert_eq!(user.last_name, "Tan");
    assert_eq!(user.user_type, "Faculty");
    assert_eq!(user.status, "Active");
    assert_eq!(user.middle_name, "");
    assert_eq!(user.created_at, None);
}

#[test]
fn test_normalize_applies_user_defaults() {
    let user: User = decode::<User>(&row(json!({ "user_id": 3 })), USER_ALIASES).unwrap();

    assert_eq!(user.user_type, "visitor");
    assert_eq!(user.status, "Active");
    assert_eq!(user.profile_image, None);
}

#[test]
fn test_normalize_prefers_earlier_candidates() {
    let raw: Row = row(json!({
        "first_name": "Primary",
        "First_Name": "Secondary",
    }));

    let normalized: Row = normalize(&raw, USER_ALIASES);

    assert_eq!(normalized.get("first_name"), Some(&json!("Primary")));
}

#[test]
fn test_normalize_skips_blank_candidates() {
    let raw: Row = row(json!({
        "building_name": "  ",
        "Name": "Gymnasium",
    }));

    let normalized: Row = normalize(&raw, BUILDING_ALIASES);

    assert_eq!(normalized.get("name"), Some(&json!("Gymnasium")));
}

#[test]
fn test_normalize_fills_every_canonical_field() {
    let normalized: Row = normalize(&Row::new(), BUILDING_ALIASES);

    assert_eq!(normalized.len(), BUILDING_ALIASES.len());
    assert_eq!(normalized.get("id"), Some(&Value::Null));
    assert_eq!(normalized.get("address"), Some(&json!("")));
}

#[test]
fn test_normalize_is_idempotent() {
    let raw: Row = row(json!({
        "tour_name": "Heritage Walk",
        "duration": "45",
        "active": "false",
        "Tour_ID": "b2c1e7d0-0000-4000-8000-000000000001",
    }));

    let once: Row = normalize(&raw, TOUR_ALIASES);
    let twice: Row = normalize(&once, TOUR_ALIASES);

    assert_eq!(once, twice);
    assert_eq!(once.get("estimated_duration"), Some(&json!(45)));
    assert_eq!(once.get("is_active"), Some(&json!(false)));
    assert_eq!(
        once.get("id"),
        Some(&json!("b2c1e7d0-0000-4000-8000-000000000001"))
    );
}

#[test]
fn test_normalize_content_tags_and_size() {
    let raw: Row = row(json!({
        "name": "campus-map.pdf",
        "size": 2048.0,
        "tags": "map, campus, ",
    }));

    let content: ContentItem = decode::<ContentItem>(&raw, CONTENT_ALIASES).unwrap();

    assert_eq!(content.title, "campus-map.pdf");
    assert_eq!(content.file_size, 2048);
    assert_eq!(content.tags, vec![String::from("map"), String::from("campus")]);
}

#[test]
fn test_coerce_integer() {
    assert_eq!(FieldKind::Integer.coerce(&json!("2")), Some(json!(2)));
    assert_eq!(FieldKind::Integer.coerce(&json!(3)), Some(json!(3)));
    assert_eq!(FieldKind::Integer.coerce(&json!("two")), None);
    assert_eq!(FieldKind::Integer.coerce(&json!(2.5)), None);
    assert_eq!(FieldKind::Integer.coerce(&Value::Null), None);
}

#[test]
fn test_coerce_boolean() {
    assert_eq!(FieldKind::Boolean.coerce(&json!("TRUE")), Some(json!(true)));
    assert_eq!(FieldKind::Boolean.coerce(&json!(0)), Some(json!(false)));
    assert_eq!(FieldKind::Boolean.coerce(&json!("maybe")), None);
}

#[test]
fn test_coerce_text_and_identifier() {
    assert_eq!(FieldKind::Text.coerce(&json!(204)), Some(json!("204")));
    assert_eq!(FieldKind::Text.coerce(&json!("")), None);
    assert_eq!(FieldKind::Identifier.coerce(&json!(9)), Some(json!(9)));
    assert_eq!(FieldKind::Identifier.coerce(&json!("  ")), None);
    assert_eq!(FieldKind::Json.coerce(&json!({"a": 1})), Some(json!({"a": 1})));
}

fn assert_mock_round_trip<T: Entity + PartialEq + Debug>() {
    for record in T::mock_dataset() {
        let serialized: Row = match serde_json::to_value(&record).unwrap() {
            Value::Object(map) => map,
            other => panic!("record serialized to {other}"),
        };

        let decoded: T = decode::<T>(&serialized, T::config().aliases).unwrap();

        assert_eq!(decoded, record);
    }
}

#[test]
fn test_mock_datasets_survive_normalization() {
    assert_mock_round_trip::<User>();
    assert_mock_round_trip::<Building>();
    assert_mock_round_trip::<Room>();
    assert_mock_round_trip::<ContentItem>();
    assert_mock_round_trip::<Tour>();
    assert_mock_round_trip::<TourStop>();
    assert_mock_round_trip::<QrCode>();
}
