// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod entities;
mod storage;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use itouru_api::{ApiError, DEFAULT_ACTIVITY_LIMIT, Dashboard};
use itouru_domain::{ActivityFeedItem, DashboardStats, NotificationItem, RecordId};
use itouru_persistence::{BackendConfig, SchemaMap, public_url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// iTOURu Server - HTTP server for the iTOURu campus tour dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend project URL. Falls back to `NEXT_PUBLIC_SUPABASE_URL`.
    #[arg(long, env = "SUPABASE_URL", default_value = "")]
    supabase_url: String,

    /// Backend anonymous API key. Falls back to `NEXT_PUBLIC_SUPABASE_ANON_KEY`.
    #[arg(long, env = "SUPABASE_ANON_KEY", default_value = "", hide_env_values = true)]
    supabase_anon_key: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Per-call backend timeout, in seconds
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,
}

impl Args {
    /// Builds the backend configuration, filling blank arguments from the
    /// environment fallbacks.
    fn backend_config(&self) -> BackendConfig {
        let env: BackendConfig = BackendConfig::from_env();
        let url: &str = if self.supabase_url.trim().is_empty() {
            env.url()
        } else {
            &self.supabase_url
        };
        let anon_key: &str = if self.supabase_anon_key.trim().is_empty() {
            env.anon_key()
        } else {
            &self.supabase_anon_key
        };

        BackendConfig::new(url, anon_key)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The dashboard facade; in demo mode when the backend is not configured.
    dashboard: Arc<Dashboard>,
    /// Base URL used to build public file links.
    public_base_url: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Backend { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// API response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Whether a live backend is attached.
    configured: bool,
    /// Number of logical tables that resolved to a physical table.
    tables: usize,
}

/// Query parameters for the public file endpoint.
#[derive(Debug, Deserialize)]
struct PublicFileQuery {
    bucket: Option<String>,
    path: Option<String>,
}

/// API response for the public file endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicFileResponse {
    public_url: String,
}

/// Error body of the public file endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PublicFileError {
    error: String,
}

/// Query parameters for the activity feed.
#[derive(Debug, Deserialize)]
struct ActivitiesQuery {
    limit: Option<usize>,
}

/// Query parameters scoping notifications to one user.
#[derive(Debug, Deserialize)]
struct NotificationsQuery {
    user_id: Option<String>,
}

/// Outcome of a write that reports only success.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SuccessResponse {
    success: bool,
}

/// Handler for GET `/health`.
#[allow(clippy::unused_async)]
async fn handle_health(AxumState(app_state): AxumState<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        configured: app_state.dashboard.is_configured(),
        tables: app_state.dashboard.schema().resolved_count(),
    })
}

/// Handler for GET `/schema`.
///
/// Returns the table mapping and detected columns.
#[allow(clippy::unused_async)]
async fn handle_schema(AxumState(app_state): AxumState<AppState>) -> Json<SchemaMap> {
    Json(app_state.dashboard.schema())
}

/// Handler for GET `/get-public-file`.
///
/// Builds the public URL of a stored object without touching the backend.
#[allow(clippy::unused_async)]
async fn handle_get_public_file(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PublicFileQuery>,
) -> Response {
    let (Some(bucket), Some(path)) = (
        query.bucket.filter(|b| !b.is_empty()),
        query.path.filter(|p| !p.is_empty()),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(PublicFileError {
                error: String::from("Missing bucket or path"),
            }),
        )
            .into_response();
    };

    let base: &str = app_state.public_base_url.trim();
    if base.is_empty() || base == "undefined" {
        warn!("public file requested but no backend URL is configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PublicFileError {
                error: String::from("SUPABASE_URL not configured"),
            }),
        )
            .into_response();
    }

    Json(PublicFileResponse {
        public_url: public_url(base, &bucket, &path),
    })
    .into_response()
}

/// Handler for GET `/api/stats`.
async fn handle_stats(AxumState(app_state): AxumState<AppState>) -> Json<DashboardStats> {
    Json(app_state.dashboard.stats().await)
}

/// Handler for GET `/api/activities`.
async fn handle_activities(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> Json<Vec<ActivityFeedItem>> {
    let limit: usize = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    info!(limit, "Handling activities request");
    Json(app_state.dashboard.activities(limit).await)
}

/// Handler for GET `/api/notifications`.
async fn handle_notifications(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Json<Vec<NotificationItem>> {
    let user: Option<RecordId> = query.user_id.as_deref().map(RecordId::parse);
    Json(app_state.dashboard.notifications(user.as_ref()).await)
}

/// Handler for POST `/api/notifications/{id}/read`.
async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Json<SuccessResponse> {
    info!(notification = %id, "Marking notification read");
    let success: bool = app_state
        .dashboard
        .mark_notification_read(&RecordId::parse(&id))
        .await;
    Json(SuccessResponse { success })
}

/// Handler for POST `/api/notifications/read-all`.
async fn handle_mark_all_notifications_read(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Json<SuccessResponse> {
    let user: Option<RecordId> = query.user_id.as_deref().map(RecordId::parse);
    let success: bool = app_state
        .dashboard
        .mark_all_notifications_read(user.as_ref())
        .await;
    Json(SuccessResponse { success })
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/schema", get(handle_schema))
        .route("/get-public-file", get(handle_get_public_file))
        .route("/api/stats", get(handle_stats))
        .route("/api/activities", get(handle_activities))
        .route("/api/notifications", get(handle_notifications))
        .route(
            "/api/notifications/read-all",
            post(handle_mark_all_notifications_read),
        )
        .route(
            "/api/notifications/{id}/read",
            post(handle_mark_notification_read),
        )
        .route("/api/storage/buckets", get(storage::handle_buckets))
        .route(
            "/api/storage/buckets/{bucket}/files",
            get(storage::handle_files),
        )
        .route(
            "/api/storage/buckets/{bucket}/walk",
            get(storage::handle_walk),
        )
        .route(
            "/api/storage/buckets/{bucket}/snapshot",
            get(storage::handle_snapshot),
        )
        .route(
            "/api/{entity}",
            get(entities::handle_list).post(entities::handle_create),
        )
        .route("/api/{entity}/export.csv", get(entities::handle_export))
        .route(
            "/api/{entity}/{id}",
            patch(entities::handle_update).delete(entities::handle_delete),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing iTOURu Server");

    let config: BackendConfig = args.backend_config();
    let dashboard: Dashboard = Dashboard::connect(&config).await?;
    if dashboard.is_configured() {
        info!(
            "Resolved {} logical tables",
            dashboard.schema().resolved_count()
        );
    } else {
        info!("Serving placeholder data");
    }

    let app_state: AppState = AppState {
        dashboard: Arc::new(dashboard),
        public_base_url: config.url().to_string(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
