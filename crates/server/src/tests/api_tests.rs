// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    TEST_URL, body_json, create_demo_app_state, create_test_app_state, create_test_backend,
    demo_router, send,
};
use crate::{AppState, build_router};
use axum::http::StatusCode;
use itouru_domain::mock_stats;
use serde_json::{Value, json};

// ============================================================================
// Health and schema
// ============================================================================

#[tokio::test]
async fn test_health_in_demo_mode() {
    let response = send(demo_router(), "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "configured": false, "tables": 8 })
    );
}

#[tokio::test]
async fn test_health_with_backend() {
    let (_backend, app_state) = create_test_app_state(create_test_backend()).await;

    let body: Value = body_json(send(build_router(app_state), "GET", "/health", None).await).await;

    assert_eq!(body["configured"], json!(true));
}

#[tokio::test]
async fn test_schema_reports_table_mapping() {
    let body: Value = body_json(send(demo_router(), "GET", "/schema", None).await).await;

    assert_eq!(body["tables"]["buildings"], json!("Building"));
    assert_eq!(body["tables"]["activities"], Value::Null);
}

// ============================================================================
// Public file URLs
// ============================================================================

#[tokio::test]
async fn test_get_public_file_builds_url() {
    let response = send(
        demo_router(),
        "GET",
        "/get-public-file?bucket=campus-media&path=photos/front%20door.jpg",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "publicUrl": format!(
                "{TEST_URL}/storage/v1/object/public/campus-media/photos%2Ffront%20door.jpg"
            )
        })
    );
}

#[tokio::test]
async fn test_get_public_file_without_path_is_bad_request() {
    let response = send(demo_router(), "GET", "/get-public-file?bucket=campus-media", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing bucket or path" })
    );
}

#[tokio::test]
async fn test_get_public_file_without_base_url_is_server_error() {
    let app_state: AppState = AppState {
        public_base_url: String::new(),
        ..create_demo_app_state()
    };

    let response = send(
        build_router(app_state),
        "GET",
        "/get-public-file?bucket=a&path=b.png",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "SUPABASE_URL not configured" })
    );
}

// ============================================================================
// Overview and feed
// ============================================================================

#[tokio::test]
async fn test_stats_in_demo_mode_are_placeholders() {
    let body: Value = body_json(send(demo_router(), "GET", "/api/stats", None).await).await;

    assert_eq!(body["totalUsers"], json!(mock_stats().total_users));
    assert_eq!(body["tourViews"], json!(mock_stats().tour_views));
}

#[tokio::test]
async fn test_stats_count_live_rows() {
    let (_backend, app_state) = create_test_app_state(create_test_backend()).await;

    let body: Value =
        body_json(send(build_router(app_state), "GET", "/api/stats", None).await).await;

    assert_eq!(body["totalUsers"], json!(2));
    assert_eq!(body["buildingsMapped"], json!(1));
}

#[tokio::test]
async fn test_activities_respect_limit() {
    let body: Value =
        body_json(send(demo_router(), "GET", "/api/activities?limit=2", None).await).await;

    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["type"], json!("registration"));
}

#[tokio::test]
async fn test_notifications_in_demo_mode() {
    let body: Value = body_json(send(demo_router(), "GET", "/api/notifications", None).await).await;

    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_mark_notification_read_in_demo_mode() {
    let response = send(demo_router(), "POST", "/api/notifications/1/read", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn test_mark_all_notifications_read_in_demo_mode() {
    let response = send(
        demo_router(),
        "POST",
        "/api/notifications/read-all?user_id=1",
        None,
    )
    .await;

    assert_eq!(body_json(response).await, json!({ "success": true }));
}
