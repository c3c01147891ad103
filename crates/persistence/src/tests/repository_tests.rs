// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{BUILDING_COLUMNS, ROOM_COLUMNS, TEST_URL, campus_backend, connect, row};
use crate::{
    BackendConfig, LogicalTable, MemoryBackend, Persistence, PersistenceError, Row, SchemaMap,
};
use itouru_domain::{Activity, Building, DomainError, Fields, RecordId, Room, User};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn fields(value: serde_json::Value) -> Fields {
    row(value)
}

#[tokio::test]
async fn test_list_without_ordering_column_retries_unordered() {
    let (backend, persistence) = connect(campus_backend()).await;
    let before: usize = backend.calls().await.len();

    let buildings: Vec<Building> = persistence.repository::<Building>().list().await.unwrap();

    assert_eq!(buildings.len(), 2);
    assert_eq!(buildings[0].name, "Main Library");
    assert_eq!(buildings[0].nickname, "Library");
    assert_eq!(buildings[0].college_id, Some(RecordId::Int(7)));
    let calls: Vec<String> = backend.calls().await.split_off(before);
    assert_eq!(
        calls,
        vec![String::from("select Building "), String::from("select Building ")]
    );
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let (_, persistence) = connect(campus_backend()).await;

    let users: Vec<User> = persistence.repository::<User>().list().await.unwrap();

    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["jose@example.edu", "maria@example.edu"]);
    assert_eq!(users[0].user_id, Some(RecordId::Int(2)));
    assert_eq!(users[0].user_type, "visitor");
}

#[tokio::test]
async fn test_list_where_filters_by_canonical_field() {
    let (backend, persistence) = connect(campus_backend()).await;

    let rooms: Vec<Room> = persistence
        .repository::<Room>()
        .list_where("building_id", 101)
        .await
        .unwrap();

    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Reading Hall");
    assert_eq!(rooms[0].id, Some(RecordId::Int(5001)));
    assert!(
        backend
            .calls()
            .await
            .contains(&String::from("select Room building_id=101"))
    );
}

#[tokio::test]
async fn test_list_limited_truncates() {
    let (_, persistence) = connect(campus_backend()).await;

    let users: Vec<User> = persistence
        .repository::<User>()
        .list_limited(1)
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_create_rejects_missing_required_fields_before_any_call() {
    let (backend, persistence) = connect(campus_backend()).await;
    let before: usize = backend.calls().await.len();

    let result = persistence
        .repository::<User>()
        .create(fields(json!({ "first_name": "Lea", "last_name": "Tan" })))
        .await;

    assert!(matches!(
        result,
        Err(PersistenceError::Validation(DomainError::MissingRequiredField { .. }))
    ));
    assert_eq!(backend.calls().await.len(), before);
}

#[tokio::test]
async fn test_create_building_generates_key_and_defaults() {
    let (backend, persistence) = connect(campus_backend()).await;

    let created: Building = persistence
        .repository::<Building>()
        .create(fields(json!({ "name": "Gymnasium", "address": "9 University Avenue" })))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.name, "Gymnasium");
    assert_eq!(created.building_type, "Academic");
    let Some(RecordId::Int(id)) = created.id else {
        panic!("expected an integer building id, got {:?}", created.id);
    };
    assert!((100..10_100).contains(&id));

    let stored: Vec<Row> = backend.rows("Building").await;
    let last: &Row = stored.last().unwrap();
    assert_eq!(last.get("building_name"), Some(&json!("Gymnasium")));
    assert_eq!(last.get("building_nickname"), Some(&json!("")));
}

#[tokio::test]
async fn test_create_writes_primary_spellings_into_empty_table() {
    let (backend, persistence) = connect(
        MemoryBackend::new().with_table("Building", BUILDING_COLUMNS, Vec::new()),
    )
    .await;

    persistence
        .repository::<Building>()
        .create(fields(json!({ "name": "Chapel", "address": "2 Hill Road" })))
        .await
        .unwrap();

    let stored: Vec<Row> = backend.rows("Building").await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get("building_name"), Some(&json!("Chapel")));
    assert_eq!(stored[0].get("building_type"), Some(&json!("Academic")));
    assert!(stored[0].get("building_id").is_some_and(|v| v.is_i64()));
}

#[tokio::test]
async fn test_create_room_drops_columns_the_table_lacks() {
    let (backend, persistence) = connect(campus_backend()).await;

    let created: Room = persistence
        .repository::<Room>()
        .create(fields(json!({
            "building_id": "101",
            "name": "Seminar Room",
            "room_number": "305",
        })))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.building_id, Some(RecordId::Int(101)));
    assert_eq!(created.room_type, "");
    let Some(RecordId::Int(id)) = created.id else {
        panic!("expected an integer room id, got {:?}", created.id);
    };
    assert!((0..1_000_000).contains(&id));
    assert_eq!(backend.rows("Room").await.len(), 3);
}

#[tokio::test]
async fn test_update_user_by_discovered_key() {
    let (backend, persistence) = connect(campus_backend()).await;

    let updated: Option<User> = persistence
        .repository::<User>()
        .update(&RecordId::Int(1), fields(json!({ "first_name": "Mary" })))
        .await
        .unwrap();

    assert_eq!(updated.map(|u| u.first_name), Some(String::from("Mary")));
    assert!(
        backend
            .calls()
            .await
            .contains(&String::from("update Users user_id=1"))
    );
}

#[tokio::test]
async fn test_update_of_missing_row_returns_none() {
    let (_, persistence) = connect(campus_backend()).await;

    let updated: Option<User> = persistence
        .repository::<User>()
        .update(&RecordId::Int(99), fields(json!({ "first_name": "Nobody" })))
        .await
        .unwrap();

    assert_eq!(updated, None);
}

#[tokio::test]
async fn test_update_where_matches_canonical_filters() {
    let (backend, persistence) = connect(campus_backend()).await;

    let updated: Vec<Room> = persistence
        .repository::<Room>()
        .update_where(&[("building_id", json!(102))], fields(json!({ "name": "Organic Lab" })))
        .await
        .unwrap();

    assert_eq!(updated.len(), 1);
    let rows: Vec<Row> = backend.rows("Room").await;
    assert_eq!(rows[1].get("room_name"), Some(&json!("Organic Lab")));
}

#[tokio::test]
async fn test_unresolved_table_is_reported() {
    let (_, persistence) = connect(MemoryBackend::new()).await;

    let result = persistence.repository::<Activity>().list().await;

    assert_eq!(
        result.unwrap_err(),
        PersistenceError::TableUnresolvable(LogicalTable::Activities)
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend: MemoryBackend = MemoryBackend::new()
        .with_table("Room", ROOM_COLUMNS, Vec::new())
        .with_latency(Duration::from_millis(200));
    let config: BackendConfig =
        BackendConfig::new(TEST_URL, "anon-key").with_request_timeout(Duration::from_millis(20));
    let persistence: Persistence =
        Persistence::with_schema(Arc::new(backend), SchemaMap::defaults(), &config);

    let result = persistence.repository::<Room>().list().await;

    assert_eq!(
        result.unwrap_err(),
        PersistenceError::Timeout(Duration::from_millis(20))
    );
}

#[tokio::test]
async fn test_count_uses_resolved_table() {
    let (_, persistence) = connect(campus_backend()).await;

    assert_eq!(persistence.count(LogicalTable::Rooms).await.unwrap(), 2);
    assert!(matches!(
        persistence.count(LogicalTable::Notifications).await,
        Err(PersistenceError::TableUnresolvable(_))
    ));
}
