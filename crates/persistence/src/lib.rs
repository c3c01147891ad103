// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the iTOURu dashboard.
//!
//! This crate talks to a hosted database-plus-storage service whose schema
//! is not known in advance. Table and column spellings vary between
//! deployments, so the layer discovers them at startup and maps every row
//! onto the canonical records of `itouru-domain`.
//!
//! ## Layers
//!
//! - `backend`: the [`Backend`] trait, the `PostgREST` client
//!   ([`RestBackend`]) and an in-memory implementation ([`MemoryBackend`])
//! - `schema`: table resolution by first-match probing, column detection,
//!   field alias tables and the pure normalizer
//! - `entity`: one static configuration per record type
//! - `repository`: generic list/create/update over any [`Entity`]
//! - `deletion`: identifier discovery, ordered delete attempts and the
//!   soft-delete fallback
//! - `storage`: public URLs, bucket listings and the snapshot view
//!
//! ## Initialization
//!
//! [`Persistence::initialize`] signs in anonymously (failures are tolerated,
//! row-level security may admit the anon role), resolves every logical table
//! sequentially and freezes the result in a [`SchemaMap`]. The map is never
//! re-probed for the lifetime of the `Persistence`.
//!
//! ## Timeouts
//!
//! Every backend call races the configured request timeout. A timeout
//! abandons the wait but cannot cancel the request already in flight.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod config;
mod deletion;
mod entity;
mod error;
mod repository;
mod schema;
mod storage;

#[cfg(test)]
mod tests;

pub use backend::{
    BUCKET_LIST, Backend, Bucket, Filter, FilterOp, ForeignKey, ListOptions, MemoryBackend,
    Order, RestBackend, Row, Select, Session, StorageObject, scalar_text,
};
pub use config::{BackendConfig, DEFAULT_REQUEST_TIMEOUT, FEED_REQUEST_TIMEOUT};
pub use deletion::{DeleteAttempt, DeleteOutcome, DeleteTarget, plan_attempts};
pub use entity::{
    ACTIVITY, BUILDING, CONTENT_ITEM, Entity, EntityConfig, NOTIFICATION, OrderSpec, QR_CODE,
    ROOM, SoftDeleteField, SoftDeleteValue, SurrogateKey, TOUR, TOUR_STOP, USER,
};
pub use error::PersistenceError;
pub use repository::EntityRepository;
pub use schema::{
    ColumnMapping, FieldAlias, FieldDefault, FieldKind, LogicalTable, SchemaMap, aliases,
    aliases_for, decode, normalize, resolve_table, sample_columns,
};
pub use storage::{SNAPSHOT_TABLE, StoredFile, content_from_snapshot, public_url};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Races `future` against `timeout`.
///
/// # Errors
///
/// Returns `PersistenceError::Timeout` if the timeout elapses first, or the
/// future's own error.
pub(crate) async fn timed<T, F>(timeout: Duration, future: F) -> Result<T, PersistenceError>
where
    F: Future<Output = Result<T, PersistenceError>>,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| PersistenceError::Timeout(timeout))?
}

/// Handle to an initialized backend.
///
/// Owns the backend, the frozen [`SchemaMap`] and the per-call timeout.
pub struct Persistence {
    backend: Arc<dyn Backend>,
    schema: SchemaMap,
    base_url: String,
    request_timeout: Duration,
    /// Bucket name to bucket id.
    bucket_ids: Mutex<HashMap<String, String>>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("schema", &self.schema)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Connects to the configured hosted backend and initializes.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if the connection gate is closed, or
    /// `InvalidConfiguration` if the client cannot be built.
    pub async fn connect(config: &BackendConfig) -> Result<Self, PersistenceError> {
        let backend: RestBackend = RestBackend::new(config)?;
        Ok(Self::initialize(Arc::new(backend), config).await)
    }

    /// Establishes a session and discovers the schema.
    ///
    /// Never fails: unreachable tables resolve to their defaults and an
    /// unavailable anonymous sign-in is only logged.
    pub async fn initialize(backend: Arc<dyn Backend>, config: &BackendConfig) -> Self {
        let timeout: Duration = config.request_timeout();
        match timed(timeout, backend.sign_in_anonymously()).await {
            Ok(session) => info!("anonymous session ready ({})", session.user_id),
            Err(e) => warn!("anonymous sign-in failed, continuing with anon key: {}", e),
        }

        let schema: SchemaMap = SchemaMap::discover(backend.as_ref(), timeout).await;
        Self::with_schema(backend, schema, config)
    }

    /// Wraps a backend with an already known schema. Performs no I/O.
    #[must_use]
    pub fn with_schema(
        backend: Arc<dyn Backend>,
        schema: SchemaMap,
        config: &BackendConfig,
    ) -> Self {
        Self {
            backend,
            schema,
            base_url: config.url().to_string(),
            request_timeout: config.request_timeout(),
            bucket_ids: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the physical table of `logical`.
    ///
    /// # Errors
    ///
    /// Returns `TableUnresolvable` if the table is absent.
    pub fn table(&self, logical: LogicalTable) -> Result<&str, PersistenceError> {
        self.schema
            .table(logical)
            .ok_or(PersistenceError::TableUnresolvable(logical))
    }

    /// Races a backend call against the request timeout.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or the call's own error.
    pub async fn call<T, F>(&self, future: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = Result<T, PersistenceError>>,
    {
        timed(self.request_timeout, future).await
    }

    /// Exact row count of a logical table.
    ///
    /// # Errors
    ///
    /// Returns `TableUnresolvable` or the backend error.
    pub async fn count(&self, logical: LogicalTable) -> Result<u64, PersistenceError> {
        let table: &str = self.table(logical)?;
        self.call(self.backend.count(table)).await
    }

    /// Returns the repository of entity `T`.
    #[must_use]
    pub fn repository<T: Entity>(&self) -> EntityRepository<'_, T> {
        EntityRepository::new(self)
    }
}
