// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Object storage reads.
//!
//! Like every other read, these never fail: demo mode and errors yield
//! empty results.

use crate::dashboard::Dashboard;
use itouru_persistence::{Bucket, ListOptions, Row, StorageObject, StoredFile};
use tracing::error;

impl Dashboard {
    /// Storage buckets visible to the session.
    pub async fn buckets(&self) -> Vec<Bucket> {
        let Some(persistence) = self.persistence() else {
            return Vec::new();
        };
        persistence.buckets().await.unwrap_or_else(|e| {
            error!("error fetching storage buckets: {}", e);
            Vec::new()
        })
    }

    /// One page of the direct children of `prefix` in `bucket`.
    pub async fn bucket_files(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Vec<StorageObject> {
        let Some(persistence) = self.persistence() else {
            return Vec::new();
        };
        persistence
            .bucket_files(bucket, prefix, options)
            .await
            .unwrap_or_else(|e| {
                error!("error listing files for bucket {}: {}", bucket, e);
                Vec::new()
            })
    }

    /// Every file under `prefix` in `bucket`, sorted by path.
    pub async fn walk_bucket(&self, bucket: &str, prefix: &str) -> Vec<StoredFile> {
        let Some(persistence) = self.persistence() else {
            return Vec::new();
        };
        persistence
            .walk_bucket(bucket, prefix)
            .await
            .unwrap_or_else(|e| {
                error!("error walking bucket {}: {}", bucket, e);
                Vec::new()
            })
    }

    /// Snapshot rows of `bucket` under `prefix`, newest first.
    pub async fn storage_snapshot(&self, bucket: &str, prefix: &str) -> Vec<Row> {
        let Some(persistence) = self.persistence() else {
            return Vec::new();
        };
        persistence
            .storage_snapshot(bucket, prefix)
            .await
            .unwrap_or_else(|e| {
                error!("error fetching storage snapshot of {}: {}", bucket, e);
                Vec::new()
            })
    }

    /// Public URL of an object; empty in demo mode.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.persistence()
            .map(|p| p.public_url(bucket, path))
            .unwrap_or_default()
    }
}
