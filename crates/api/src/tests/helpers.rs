// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for the api tests.

use crate::Dashboard;
use itouru_domain::Fields;
use itouru_persistence::{BackendConfig, MemoryBackend, Row};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_URL: &str = "https://demo.supabase.co";

/// Converts a JSON object literal into a row (or a field map).
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn fields(value: Value) -> Fields {
    row(value)
}

pub fn test_config() -> BackendConfig {
    BackendConfig::new(TEST_URL, "anon-key").with_request_timeout(Duration::from_secs(2))
}

pub const USER_COLUMNS: &[&str] = &[
    "user_id",
    "email",
    "first_name",
    "last_name",
    "user_type",
    "created_at",
];

pub fn create_test_users() -> Vec<Row> {
    vec![
        row(json!({
            "user_id": 1,
            "email": "maria@example.edu",
            "first_name": "Maria",
            "last_name": "Santos",
            "user_type": "Student",
            "created_at": "2025-01-10T08:00:00+00:00",
        })),
        row(json!({
            "user_id": 2,
            "email": "jose@example.edu",
            "first_name": "Jose",
            "last_name": "Reyes",
            "user_type": "Faculty",
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
];

pub fn create_test_buildings() -> Vec<Row> {
    vec![
        row(json!({
            "building_id": 101,
            "building_name": "Main Library",
            "building_nickname": "Library",
            "building_type": "Academic",
            "address": "1 University Avenue",
        })),
        row(json!({
            "building_id": 102,
            "building_name": "DELETED_1736931600000",
            "building_nickname": "DELETED",
            "building_type": "Academic",
            "address": "3 University Avenue",
        })),
    ]
}

pub const ROOM_COLUMNS: &[&str] = &["room_id", "building_id", "room_name", "room_number"];

pub fn create_test_rooms() -> Vec<Row> {
    vec![
        row(json!({
            "room_id": 5001,
            "building_id": 101,
            "room_name": "Reading Hall",
            "room_number": "101",
        })),
        row(json!({
            "room_id": 5002,
            "building_id": 101,
            "room_name": "Archive",
            "room_number": "B1",
        })),
        row(json!({
            "room_id": 5003,
            "building_id": 102,
            "room_name": "Chemistry Lab",
            "room_number": "204",
        })),
    ]
}

pub const ACTIVITY_COLUMNS: &[&str] = &[
    "id",
    "activity_type",
    "title",
    "description",
    "user_name",
    "created_at",
];

pub fn create_test_activities() -> Vec<Row> {
    vec![
        row(json!({
            "id": 1,
            "activity_type": "registration",
            "title": "New User Registration",
            "description": "Maria registered",
            "created_at": "2025-01-10T08:00:00+00:00",
        })),
        row(json!({
            "id": 2,
            "activity_type": "media_upload",
            "title": "Media Upload Complete",
            "description": "Two photos added",
            "user_name": "Admin",
            "created_at": "2025-01-12T08:00:00+00:00",
        })),
        row(json!({
            "id": 3,
            "activity_type": "qr_generated",
            "title": "QR Code Generated",
            "description": "Library entrance",
            "created_at": "2025-01-11T08:00:00+00:00",
        })),
    ]
}

pub const NOTIFICATION_COLUMNS: &[&str] = &[
    "id",
    "type",
    "title",
    "description",
    "priority",
    "is_read",
    "user_id",
    "created_at",
    "read_at",
];

pub fn create_test_notifications() -> Vec<Row> {
    vec![
        row(json!({
            "id": 1,
            "type": "alert",
            "title": "System Maintenance",
            "priority": "high",
            "is_read": false,
            "user_id": 1,
            "created_at": "2025-01-10T08:00:00+00:00",
        })),
        row(json!({
            "id": 2,
            "type": "info",
            "title": "New Feature Available",
            "is_read": false,
            "user_id": 2,
            "created_at": "2025-01-11T08:00:00+00:00",
        })),
        row(json!({
            "id": 3,
            "type": "success",
            "title": "Backup Completed",
            "priority": "low",
            "is_read": true,
            "user_id": 1,
            "created_at": "2025-01-12T08:00:00+00:00",
        })),
    ]
}

/// A campus with users, buildings and rooms but no feed tables.
pub fn create_test_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_table("Users", USER_COLUMNS, create_test_users())
        .with_table("Building", BUILDING_COLUMNS, create_test_buildings())
        .with_table("Room", ROOM_COLUMNS, create_test_rooms())
}

/// The test campus plus activity and notification tables.
pub fn create_test_backend_with_feed() -> MemoryBackend {
    create_test_backend()
        .with_table("Activity", ACTIVITY_COLUMNS, create_test_activities())
        .with_table("Notification", NOTIFICATION_COLUMNS, create_test_notifications())
}

/// Initializes a dashboard over `backend`, keeping a handle for inspecting
/// rows and the call log.
pub async fn create_test_dashboard(backend: MemoryBackend) -> (Arc<MemoryBackend>, Dashboard) {
    let backend: Arc<MemoryBackend> = Arc::new(backend);
    let dashboard: Dashboard = Dashboard::with_backend(backend.clone(), &test_config()).await;
    (backend, dashboard)
}

/// Counts recorded backend calls starting with `prefix`.
pub async fn count_calls(backend: &MemoryBackend, prefix: &str) -> usize {
    backend
        .calls()
        .await
        .iter()
        .filter(|call| call.starts_with(prefix))
        .count()
}
