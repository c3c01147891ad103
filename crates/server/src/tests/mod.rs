// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the server binary.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod api_tests;

use crate::{AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use itouru_api::Dashboard;
use itouru_persistence::{BackendConfig, MemoryBackend, Row};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_URL: &str = "https://demo.supabase.co";

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A backend with two users and two buildings.
pub fn create_test_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_table(
            "Users",
            &["user_id", "email", "first_name", "last_name", "created_at"],
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
            ],
        )
        .with_table(
            "Building",
            &["building_id", "building_name", "building_type", "address"],
            vec![row(json!({
                "building_id": 101,
                "building_name": "Main Library",
                "building_type": "Academic",
                "address": "1 University Avenue",
            }))],
        )
}

/// Helper to create app state in demo mode.
pub fn create_demo_app_state() -> AppState {
    AppState {
        dashboard: Arc::new(Dashboard::unconfigured()),
        public_base_url: String::from(TEST_URL),
    }
}

/// Helper to create app state over an in-memory backend.
pub async fn create_test_app_state(backend: MemoryBackend) -> (Arc<MemoryBackend>, AppState) {
    let backend: Arc<MemoryBackend> = Arc::new(backend);
    let dashboard: Dashboard =
        Dashboard::with_backend(backend.clone(), &BackendConfig::new(TEST_URL, "anon-key")).await;
    let app_state: AppState = AppState {
        dashboard: Arc::new(dashboard),
        public_base_url: String::from(TEST_URL),
    };
    (backend, app_state)
}

/// Sends one request through the router.
pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn demo_router() -> Router {
    build_router(create_demo_app_state())
}
