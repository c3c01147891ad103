// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Object storage: public URLs, listings, and the snapshot view.

use crate::Persistence;
use crate::backend::{Bucket, Filter, ListOptions, Row, Select, StorageObject};
use crate::error::PersistenceError;
use itouru_domain::{ContentItem, ContentKind, RecordId};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Database view mirroring `storage.objects`.
pub const SNAPSHOT_TABLE: &str = "storage_objects_snapshot";

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PAGE_SIZE: usize = 100;

/// Builds the public URL of an object.
///
/// The bucket and the path are each encoded as a single URI component, so a
/// `/` inside the path becomes `%2F`. Returns an empty string when there is
/// no base URL.
#[must_use]
pub fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
    if base_url.is_empty() {
        return String::new();
    }
    let base: &str = base_url.strip_suffix('/').unwrap_or(base_url);
    let path: &str = path.trim_start_matches('/');

    format!(
        "{base}/storage/v1/object/public/{}/{}",
        utf8_percent_encode(bucket, COMPONENT),
        utf8_percent_encode(path, COMPONENT)
    )
}

/// A file found by a recursive bucket walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFile {
    /// Path relative to the bucket root.
    pub path: String,
    pub object: StorageObject,
}

fn text_at<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a str> {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn non_empty<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Maps a snapshot row onto a content item.
///
/// `bucket_names` maps bucket ids to names; unknown ids are used as names.
#[must_use]
pub fn content_from_snapshot(
    row: &Row,
    bucket_names: &HashMap<String, String>,
    base_url: &str,
) -> ContentItem {
    let bucket_id: &str = non_empty(row, "bucket_id").unwrap_or_default();
    let bucket: &str = bucket_names
        .get(bucket_id)
        .map_or(bucket_id, String::as_str);
    let path: &str = non_empty(row, "name")
        .or_else(|| non_empty(row, "filename"))
        .unwrap_or_default();

    let metadata: Option<&Value> = row.get("metadata");
    let mime: Option<&str> = non_empty(row, "metadata_mimetype")
        .or_else(|| text_at(metadata, "mimetype"))
        .or_else(|| text_at(metadata, "type"));
    let size: i64 = metadata
        .and_then(|m| m.get("size").or_else(|| m.get("bytes")))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let file_url: String = if bucket.is_empty() || path.is_empty() {
        String::new()
    } else {
        public_url(base_url, bucket, path)
    };
    let kind: ContentKind = ContentKind::classify(mime, path);
    let thumbnail_url: String = if kind == ContentKind::Image {
        file_url.clone()
    } else {
        String::new()
    };

    let user_metadata: Option<&Value> = row.get("user_metadata");
    let tags: Vec<String> = user_metadata
        .and_then(|m| m.get("tags"))
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    ContentItem {
        id: row.get("id").and_then(RecordId::from_value),
        title: non_empty(row, "filename")
            .or_else(|| non_empty(row, "name"))
            .unwrap_or("file")
            .to_string(),
        description: text_at(user_metadata, "description")
            .unwrap_or_default()
            .to_string(),
        content_type: kind.as_str().to_string(),
        file_url,
        thumbnail_url,
        file_size: size,
        tags,
        building_id: None,
        room_id: None,
        created_at: non_empty(row, "created_at")
            .or_else(|| non_empty(row, "updated_at"))
            .map(String::from),
    }
}

impl Persistence {
    /// Builds the public URL of an object on this backend.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        public_url(self.base_url(), bucket, path)
    }

    /// Lists storage buckets.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing fails.
    pub async fn buckets(&self) -> Result<Vec<Bucket>, PersistenceError> {
        self.call(self.backend().list_buckets()).await
    }

    /// Lists one page of the direct children of `prefix`.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing fails.
    pub async fn bucket_files(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<Vec<StorageObject>, PersistenceError> {
        self.call(self.backend().list_objects(bucket, prefix, options))
            .await
    }

    /// Recursively lists every file under `prefix`.
    ///
    /// Folders are listing entries without an id. The walk uses an explicit
    /// stack and pages through each folder.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn walk_bucket(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<StoredFile>, PersistenceError> {
        let mut files: Vec<StoredFile> = Vec::new();
        let mut pending: Vec<String> = vec![prefix.trim_matches('/').to_string()];

        while let Some(folder) = pending.pop() {
            let mut offset: usize = 0;
            loop {
                let options: ListOptions = ListOptions {
                    limit: PAGE_SIZE,
                    offset,
                };
                let page: Vec<StorageObject> = self.bucket_files(bucket, &folder, options).await?;
                let page_len: usize = page.len();

                for entry in page {
                    let path: String = if folder.is_empty() {
                        entry.name.clone()
                    } else {
                        format!("{folder}/{}", entry.name)
                    };
                    if entry.is_folder() {
                        pending.push(path);
                    } else {
                        files.push(StoredFile {
                            path,
                            object: entry,
                        });
                    }
                }

                if page_len < PAGE_SIZE {
                    break;
                }
                offset += PAGE_SIZE;
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("walked {} file(s) in {}/{}", files.len(), bucket, prefix);
        Ok(files)
    }

    /// Resolves a bucket id from its name, caching hits.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no bucket has that name.
    pub async fn bucket_id(&self, name: &str) -> Result<String, PersistenceError> {
        if let Some(id) = self.bucket_ids.lock().await.get(name) {
            return Ok(id.clone());
        }

        let buckets: Vec<Bucket> = self.buckets().await?;
        let found: Bucket = buckets
            .into_iter()
            .find(|bucket| bucket.name == name)
            .ok_or_else(|| PersistenceError::NotFound {
                table: String::from("storage.buckets"),
                column: String::from("name"),
                value: name.to_string(),
            })?;

        let id: String = if found.id.is_empty() {
            found.name
        } else {
            found.id
        };
        self.bucket_ids
            .lock()
            .await
            .insert(name.to_string(), id.clone());
        Ok(id)
    }

    /// Reads snapshot rows of one bucket, optionally under `prefix`.
    ///
    /// Newest first when the view has `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket is unknown or the query fails.
    pub async fn storage_snapshot(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<Row>, PersistenceError> {
        let bucket_id: String = self.bucket_id(bucket).await?;
        let mut query: Select = Select::all().filter(Filter::eq("bucket_id", bucket_id));
        if !prefix.is_empty() {
            let pattern: String = if prefix.ends_with('/') {
                format!("{prefix}%")
            } else {
                format!("{prefix}/%")
            };
            query = query.filter(Filter::ilike("name", pattern));
        }

        self.select_newest_first(SNAPSHOT_TABLE, query, "updated_at")
            .await
    }

    /// Reads the whole snapshot view as content items.
    ///
    /// Bucket listing failures only cost the public URLs of rows whose
    /// bucket id is not also its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be read.
    pub async fn snapshot_content(&self) -> Result<Vec<ContentItem>, PersistenceError> {
        let bucket_names: HashMap<String, String> = match self.buckets().await {
            Ok(buckets) => buckets
                .into_iter()
                .map(|bucket| {
                    let key: String = if bucket.id.is_empty() {
                        bucket.name.clone()
                    } else {
                        bucket.id
                    };
                    (key, bucket.name)
                })
                .collect(),
            Err(e) => {
                warn!("could not list buckets, content URLs may be missing: {}", e);
                HashMap::new()
            }
        };

        let rows: Vec<Row> = self
            .call(self.backend().select(
                SNAPSHOT_TABLE,
                &Select::all().order_by("updated_at", false),
            ))
            .await?;

        Ok(rows
            .iter()
            .map(|row| content_from_snapshot(row, &bucket_names, self.base_url()))
            .collect())
    }

    async fn select_newest_first(
        &self,
        table: &str,
        query: Select,
        order_column: &str,
    ) -> Result<Vec<Row>, PersistenceError> {
        let ordered: Select = query.clone().order_by(order_column, false);
        match self.call(self.backend().select(table, &ordered)).await {
            Err(e) if e.is_missing_column(order_column) => {
                warn!("'{}' has no {} column, selecting without ordering", table, order_column);
                self.call(self.backend().select(table, &query)).await
            }
            result => result,
        }
    }
}
