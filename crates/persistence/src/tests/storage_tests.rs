// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{TEST_URL, connect, row};
use crate::{
    MemoryBackend, PersistenceError, Row, SNAPSHOT_TABLE, StoredFile, content_from_snapshot,
    public_url,
};
use itouru_domain::{ContentItem, RecordId};
use serde_json::json;
use std::collections::HashMap;

const SNAPSHOT_COLUMNS: &[&str] = &[
    "id",
    "bucket_id",
    "name",
    "metadata",
    "user_metadata",
    "created_at",
    "updated_at",
];

fn snapshot_rows() -> Vec<Row> {
    vec![
        row(json!({
            "id": "0b6c1c8e-1111-4000-8000-000000000001",
            "bucket_id": "b-1",
            "name": "photos/library front.jpg",
            "metadata": { "mimetype": "image/jpeg", "size": 2048 },
            "created_at": "2025-02-01T10:00:00+00:00",
            "updated_at": "2025-02-01T10:00:00+00:00",
        })),
        row(json!({
            "id": "0b6c1c8e-1111-4000-8000-000000000002",
            "bucket_id": "b-1",
            "name": "docs/campus-map.pdf",
            "metadata": { "mimetype": "application/pdf", "size": 4096 },
            "user_metadata": { "description": "Printable map", "tags": ["map"] },
            "created_at": "2025-02-03T10:00:00+00:00",
            "updated_at": "2025-02-03T10:00:00+00:00",
        })),
        row(json!({
            "id": "0b6c1c8e-1111-4000-8000-000000000003",
            "bucket_id": "b-1",
            "name": "photos/lab.png",
            "metadata": { "mimetype": "image/png", "size": 1024 },
            "created_at": "2025-02-05T10:00:00+00:00",
            "updated_at": "2025-02-05T10:00:00+00:00",
        })),
    ]
}

fn storage_backend() -> MemoryBackend {
    MemoryBackend::new()
        .with_bucket("b-1", "campus-media", &["photos/library front.jpg", "photos/lab.png"])
        .with_table(SNAPSHOT_TABLE, SNAPSHOT_COLUMNS, snapshot_rows())
}

#[test]
fn test_public_url_encodes_bucket_and_path_as_components() {
    assert_eq!(
        public_url("https://demo.supabase.co/", "campus media", "/photos/a b.png"),
        "https://demo.supabase.co/storage/v1/object/public/campus%20media/photos%2Fa%20b.png"
    );
}

#[test]
fn test_public_url_keeps_unreserved_characters() {
    assert_eq!(
        public_url(TEST_URL, "media", "a-b_c.d!e~f*g'h(i).png"),
        format!("{TEST_URL}/storage/v1/object/public/media/a-b_c.d!e~f*g'h(i).png")
    );
}

#[test]
fn test_public_url_is_empty_without_base() {
    assert_eq!(public_url("", "media", "a.png"), "");
}

#[test]
fn test_content_from_snapshot_builds_urls_and_metadata() {
    let names: HashMap<String, String> =
        HashMap::from([(String::from("b-1"), String::from("campus-media"))]);

    let image: ContentItem = content_from_snapshot(&snapshot_rows()[0], &names, TEST_URL);
    assert_eq!(image.content_type, "image");
    assert_eq!(image.title, "photos/library front.jpg");
    assert_eq!(image.file_size, 2048);
    assert_eq!(
        image.file_url,
        format!("{TEST_URL}/storage/v1/object/public/campus-media/photos%2Flibrary%20front.jpg")
    );
    assert_eq!(image.thumbnail_url, image.file_url);
    assert_eq!(
        image.id,
        Some(RecordId::Text(String::from("0b6c1c8e-1111-4000-8000-000000000001")))
    );

    let document: ContentItem = content_from_snapshot(&snapshot_rows()[1], &names, TEST_URL);
    assert_eq!(document.content_type, "document");
    assert_eq!(document.thumbnail_url, "");
    assert_eq!(document.description, "Printable map");
    assert_eq!(document.tags, vec![String::from("map")]);
}

#[test]
fn test_content_from_snapshot_falls_back_to_bucket_id() {
    let item: ContentItem =
        content_from_snapshot(&snapshot_rows()[2], &HashMap::new(), TEST_URL);

    assert!(item.file_url.contains("/public/b-1/photos%2Flab.png"));
}

#[tokio::test]
async fn test_walk_bucket_recurses_into_folders() {
    let (_, persistence) = connect(MemoryBackend::new().with_bucket(
        "media",
        "media",
        &["z.png", "photos/b.png", "photos/2025/c.jpg", "docs/map.pdf"],
    ))
    .await;

    let files: Vec<StoredFile> = persistence.walk_bucket("media", "").await.unwrap();

    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["docs/map.pdf", "photos/2025/c.jpg", "photos/b.png", "z.png"]
    );

    let photos: Vec<StoredFile> = persistence.walk_bucket("media", "/photos/").await.unwrap();
    assert_eq!(photos.len(), 2);
}

#[tokio::test]
async fn test_walk_bucket_pages_through_large_folders() {
    let paths: Vec<String> = (0..250).map(|i| format!("scans/{i:03}.png")).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let (backend, persistence) =
        connect(MemoryBackend::new().with_bucket("media", "media", &path_refs)).await;

    let files: Vec<StoredFile> = persistence.walk_bucket("media", "scans").await.unwrap();

    assert_eq!(files.len(), 250);
    let listings: usize = backend
        .calls()
        .await
        .iter()
        .filter(|c| c.starts_with("list_objects"))
        .count();
    assert_eq!(listings, 3);
}

#[tokio::test]
async fn test_bucket_id_is_cached() {
    let (backend, persistence) = connect(storage_backend()).await;

    assert_eq!(persistence.bucket_id("campus-media").await.unwrap(), "b-1");
    assert_eq!(persistence.bucket_id("campus-media").await.unwrap(), "b-1");

    let listings: usize = backend
        .calls()
        .await
        .iter()
        .filter(|c| *c == "list_buckets")
        .count();
    assert_eq!(listings, 1);
}

#[tokio::test]
async fn test_bucket_id_of_unknown_bucket_is_not_found() {
    let (_, persistence) = connect(storage_backend()).await;

    assert!(matches!(
        persistence.bucket_id("nope").await,
        Err(PersistenceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_storage_snapshot_filters_by_prefix_newest_first() {
    let (_, persistence) = connect(storage_backend()).await;

    let rows: Vec<Row> = persistence
        .storage_snapshot("campus-media", "photos")
        .await
        .unwrap();

    let names: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["photos/lab.png", "photos/library front.jpg"]);
}

#[tokio::test]
async fn test_storage_snapshot_without_updated_at_keeps_prefix_filter() {
    let (_, persistence) = connect(
        MemoryBackend::new()
            .with_bucket("b-1", "campus-media", &[])
            .with_table(SNAPSHOT_TABLE, &["id", "bucket_id", "name"], snapshot_rows()),
    )
    .await;

    let rows: Vec<Row> = persistence
        .storage_snapshot("campus-media", "docs/")
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&json!("docs/campus-map.pdf")));
}

#[tokio::test]
async fn test_snapshot_content_maps_every_row() {
    let (_, persistence) = connect(storage_backend()).await;

    let items: Vec<ContentItem> = persistence.snapshot_content().await.unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "photos/lab.png");
    assert!(items[0].file_url.contains("/public/campus-media/"));
    assert_eq!(items[1].content_type, "document");
}

#[tokio::test]
async fn test_snapshot_content_requires_the_view() {
    let (_, persistence) = connect(MemoryBackend::new()).await;

    let err = persistence.snapshot_content().await.unwrap_err();

    assert_eq!(err.code(), Some("42P01"));
}
