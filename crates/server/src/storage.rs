// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Object storage browsing under `/api/storage`.
//!
//! Every route answers 200; demo mode and storage failures yield empty lists.

use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
};
use itouru_persistence::{Bucket, ListOptions, Row, StorageObject, StoredFile};
use serde::Deserialize;
use tracing::info;

/// Query parameters for bucket listings.
#[derive(Debug, Default, Deserialize)]
pub struct StorageQuery {
    /// Folder to list, relative to the bucket root.
    #[serde(default)]
    prefix: String,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl StorageQuery {
    fn list_options(&self) -> ListOptions {
        let defaults: ListOptions = ListOptions::default();
        ListOptions {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

/// Handler for GET `/api/storage/buckets`.
pub async fn handle_buckets(AxumState(app_state): AxumState<AppState>) -> Json<Vec<Bucket>> {
    Json(app_state.dashboard.buckets().await)
}

/// Handler for GET `/api/storage/buckets/{bucket}/files`.
///
/// One page of the direct children of `prefix`; folders have no `id`.
pub async fn handle_files(
    AxumState(app_state): AxumState<AppState>,
    Path(bucket): Path<String>,
    Query(query): Query<StorageQuery>,
) -> Json<Vec<StorageObject>> {
    info!(bucket = %bucket, prefix = %query.prefix, "Handling storage listing request");
    Json(
        app_state
            .dashboard
            .bucket_files(&bucket, &query.prefix, query.list_options())
            .await,
    )
}

/// Handler for GET `/api/storage/buckets/{bucket}/walk`.
pub async fn handle_walk(
    AxumState(app_state): AxumState<AppState>,
    Path(bucket): Path<String>,
    Query(query): Query<StorageQuery>,
) -> Json<Vec<StoredFile>> {
    info!(bucket = %bucket, prefix = %query.prefix, "Handling storage walk request");
    Json(app_state.dashboard.walk_bucket(&bucket, &query.prefix).await)
}

/// Handler for GET `/api/storage/buckets/{bucket}/snapshot`.
pub async fn handle_snapshot(
    AxumState(app_state): AxumState<AppState>,
    Path(bucket): Path<String>,
    Query(query): Query<StorageQuery>,
) -> Json<Vec<Row>> {
    Json(
        app_state
            .dashboard
            .storage_snapshot(&bucket, &query.prefix)
            .await,
    )
}
