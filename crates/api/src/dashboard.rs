// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The dashboard facade.
//!
//! Reads are tolerant: a failed or impossible read degrades to placeholder
//! data and never surfaces an error. Writes are strict: validation failures
//! and backend rejections are returned to the caller.

use crate::error::ApiError;
use itouru_domain::{
    Building, ContentItem, Fields, RecordId, Room, TourStop, User, validate_email_unique,
    validate_name_unique, validate_required_fields,
};
use itouru_persistence::{
    Backend, BackendConfig, DeleteOutcome, DeleteTarget, Entity, Persistence, SchemaMap, USER,
    scalar_text,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What a listing returns when live data is unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFallback {
    /// The entity's placeholder dataset.
    #[default]
    Mock,
    /// An empty list.
    Empty,
}

/// Entry point for every dashboard read and write.
///
/// Holds an initialized [`Persistence`] when the backend is configured; in
/// demo mode it holds nothing and serves placeholder data.
#[derive(Debug)]
pub struct Dashboard {
    persistence: Option<Persistence>,
    fallback: ListFallback,
}

impl Dashboard {
    /// Connects to the configured backend.
    ///
    /// A closed connection gate yields a dashboard in demo mode rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub async fn connect(config: &BackendConfig) -> Result<Self, ApiError> {
        if !config.is_configured() {
            warn!("backend URL or key missing, running with placeholder data");
            return Ok(Self::unconfigured());
        }

        let persistence: Persistence = Persistence::connect(config).await?;
        info!("dashboard connected to {}", config.url());
        Ok(Self::from_persistence(persistence))
    }

    /// Initializes a dashboard over an injected backend.
    pub async fn with_backend(backend: Arc<dyn Backend>, config: &BackendConfig) -> Self {
        Self::from_persistence(Persistence::initialize(backend, config).await)
    }

    /// Wraps an already initialized persistence handle.
    #[must_use]
    pub const fn from_persistence(persistence: Persistence) -> Self {
        Self {
            persistence: Some(persistence),
            fallback: ListFallback::Mock,
        }
    }

    /// A dashboard in demo mode.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self {
            persistence: None,
            fallback: ListFallback::Mock,
        }
    }

    #[must_use]
    pub const fn with_fallback(mut self, fallback: ListFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns whether a live backend is attached.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.persistence.is_some()
    }

    #[must_use]
    pub const fn persistence(&self) -> Option<&Persistence> {
        self.persistence.as_ref()
    }

    /// The discovered schema, or the default mapping in demo mode.
    #[must_use]
    pub fn schema(&self) -> SchemaMap {
        self.persistence
            .as_ref()
            .map_or_else(SchemaMap::defaults, |p| p.schema().clone())
    }

    fn fallback_list<T: Entity>(&self) -> Vec<T> {
        match self.fallback {
            ListFallback::Mock => T::mock_dataset(),
            ListFallback::Empty => Vec::new(),
        }
    }

    /// Lists every record of `T`.
    ///
    /// Never fails: demo mode and read errors yield the fallback list.
    pub async fn list<T: Entity>(&self) -> Vec<T> {
        let Some(persistence) = &self.persistence else {
            return self.fallback_list();
        };

        match persistence.repository::<T>().list().await {
            Ok(records) => records,
            Err(e) => {
                warn!("listing {} failed, using fallback: {}", T::config().name, e);
                self.fallback_list()
            }
        }
    }

    /// Lists records of `T` whose canonical `field` equals `value`.
    ///
    /// The fallback list is filtered the same way.
    pub async fn list_where<T: Entity>(
        &self,
        field: &str,
        value: impl Into<Value> + Send,
    ) -> Vec<T> {
        let value: Value = value.into();
        let Some(persistence) = &self.persistence else {
            return filter_records(self.fallback_list(), field, &value);
        };

        match persistence
            .repository::<T>()
            .list_where(field, value.clone())
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "listing {} by {} failed, using fallback: {}",
                    T::config().name,
                    field,
                    e
                );
                filter_records(self.fallback_list(), field, &value)
            }
        }
    }

    /// Rooms of one building.
    pub async fn rooms_in_building(&self, building_id: &RecordId) -> Vec<Room> {
        self.list_where::<Room>("building_id", building_id.to_value())
            .await
    }

    /// Stops of one tour, in stop order.
    pub async fn tour_stops(&self, tour_id: &RecordId) -> Vec<TourStop> {
        self.list_where::<TourStop>("tour_id", tour_id.to_value())
            .await
    }

    /// Buildings that have not been soft-deleted.
    pub async fn visible_buildings(&self) -> Vec<Building> {
        self.list::<Building>()
            .await
            .into_iter()
            .filter(|building| !building.is_soft_deleted())
            .collect()
    }

    /// Media content.
    ///
    /// Prefers the storage snapshot view and falls back to the content
    /// table. Demo mode and total failure yield an empty list.
    pub async fn content(&self) -> Vec<ContentItem> {
        let Some(persistence) = &self.persistence else {
            return Vec::new();
        };

        match persistence.snapshot_content().await {
            Ok(items) => return items,
            Err(e) => debug!("storage snapshot unavailable, reading content table: {}", e),
        }

        match persistence.repository::<ContentItem>().list().await {
            Ok(items) => items,
            Err(e) => {
                error!("error fetching content: {}", e);
                Vec::new()
            }
        }
    }

    /// Creates a record of `T`.
    ///
    /// Returns `Ok(None)` in demo mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for missing required fields, or the backend
    /// error if the insert is rejected.
    pub async fn create<T: Entity>(&self, fields: Fields) -> Result<Option<T>, ApiError> {
        let Some(persistence) = &self.persistence else {
            debug!("demo mode, not creating {}", T::config().name);
            return Ok(None);
        };
        Ok(persistence.repository::<T>().create(fields).await?)
    }

    /// Creates a user after checking for duplicates among `existing`.
    ///
    /// Required fields, then email uniqueness, then name uniqueness are
    /// checked before any backend call. The check only sees `existing`, so a
    /// concurrent create by another client can still produce a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` or `DomainRuleViolation` for rejected input,
    /// or the backend error if the insert is rejected.
    pub async fn create_user(
        &self,
        fields: Fields,
        existing: &[User],
    ) -> Result<Option<User>, ApiError> {
        validate_required_fields(USER.name, &fields, USER.required)?;

        let text = |key: &str| -> String { fields.get(key).map(scalar_text).unwrap_or_default() };
        validate_email_unique(&text("email"), existing)?;
        validate_name_unique(&text("first_name"), &text("last_name"), existing)?;

        self.create::<User>(fields).await
    }

    /// Applies `fields` to the record of `T` identified by `id`.
    ///
    /// Returns `Ok(None)` in demo mode or when no row matched.
    ///
    /// # Errors
    ///
    /// Returns the backend error if every update attempt failed.
    pub async fn update<T: Entity>(
        &self,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<T>, ApiError> {
        let Some(persistence) = &self.persistence else {
            debug!("demo mode, not updating {} {}", T::config().name, id);
            return Ok(None);
        };
        Ok(persistence.repository::<T>().update(id, fields).await?)
    }

    /// Deletes a record of `T`.
    ///
    /// Returns `true` when the row was removed or soft-deleted. Failures are
    /// logged, never returned; demo mode always returns `false`.
    pub async fn delete<T: Entity>(&self, target: &DeleteTarget) -> bool {
        let Some(persistence) = &self.persistence else {
            debug!("demo mode, not deleting {}", T::config().name);
            return false;
        };

        match persistence.repository::<T>().delete(target).await {
            Ok(DeleteOutcome::Deleted { column, rows }) => {
                debug!("{} row(s) deleted by {}", rows, column);
                true
            }
            Ok(DeleteOutcome::SoftDeleted { sentinel }) => {
                debug!("soft-deleted as {}", sentinel);
                true
            }
            Err(e) => {
                error!("delete of {} failed: {}", T::config().name, e);
                false
            }
        }
    }
}

/// Keeps the records whose serialized `field` equals `value`.
fn filter_records<T: Entity>(records: Vec<T>, field: &str, value: &Value) -> Vec<T> {
    let wanted: String = scalar_text(value);
    records
        .into_iter()
        .filter(|record| {
            serde_json::to_value(record)
                .ok()
                .and_then(|v| v.get(field).map(scalar_text))
                .is_some_and(|found| found == wanted)
        })
        .collect()
}
