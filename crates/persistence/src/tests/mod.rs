// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the persistence crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod normalize_tests;
mod repository_tests;
mod storage_tests;

use crate::{BackendConfig, MemoryBackend, Persistence, Row};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_URL: &str = "https://demo.supabase.co";

/// Converts a JSON object literal into a row.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn test_config() -> BackendConfig {
    BackendConfig::new(TEST_URL, "anon-key").with_request_timeout(Duration::from_secs(2))
}

pub const USER_COLUMNS: &[&str] = &["user_id", "email", "first_name", "last_name", "created_at"];

pub fn user_rows() -> Vec<Row> {
    vec![
        row(json!({
            "user_id": 1,
            "email": "maria@example.edu",
            "first_name": "Maria",
            "last_name": "Santos",
            "created_at": "2025-01-10T08:00:00+00:00",
        })),
        row(json!({
            "user_id": 2,
            "email": "jose@example.edu",
            "first_name": "Jose",
            "last_name": "Reyes",
            "created_at": "2025-01-12T08:00:00+00:00",
        })),
    ]
}

pub const BUILDING_COLUMNS: &[&str] = &[
    "building_id",
    "building_name",
    "building_nickname",
    "building_type",
    "address",
    "college_id",
];

pub fn building_rows() -> Vec<Row> {
    vec![
        row(json!({
            "building_id": 101,
            "building_name": "Main Library",
            "building_nickname": "Library",
            "building_type": "Academic",
            "address": "1 University Avenue",
            "college_id": 7,
        })),
        row(json!({
            "building_id": 102,
            "building_name": "Science Building",
            "building_nickname": "SciBldg",
            "building_type": "Academic",
            "address": "3 University Avenue",
            "college_id": 101,
        })),
    ]
}

pub const ROOM_COLUMNS: &[&str] = &[
    "room_id",
    "building_id",
    "room_name",
    "room_number",
    "created_at",
];

pub fn room_rows() -> Vec<Row> {
    vec![
        row(json!({
            "room_id": 5001,
            "building_id": 101,
            "room_name": "Reading Hall",
            "room_number": "101",
            "created_at": "2025-01-10T08:00:00+00:00",
        })),
        row(json!({
            "room_id": 5002,
            "building_id": 102,
            "room_name": "Chemistry Lab",
            "room_number": "204",
            "created_at": "2025-01-11T08:00:00+00:00",
        })),
    ]
}

/// A backend with users, buildings (no `created_at`) and rooms.
pub fn campus_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_table("Users", USER_COLUMNS, user_rows())
        .with_table("Building", BUILDING_COLUMNS, building_rows())
        .with_table("Room", ROOM_COLUMNS, room_rows())
}

/// Initializes a `Persistence` over `backend`, keeping a handle for
/// inspecting rows and the call log.
pub async fn connect(backend: MemoryBackend) -> (Arc<MemoryBackend>, Persistence) {
    let backend: Arc<MemoryBackend> = Arc::new(backend);
    let persistence: Persistence = Persistence::initialize(backend.clone(), &test_config()).await;
    (backend, persistence)
}
