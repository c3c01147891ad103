// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The hosted-backend contract.
//!
//! Everything above this module treats the backend as "give me a table name
//! and a filter, get rows or an error". `RestBackend` talks to a hosted
//! `PostgREST` deployment; `MemoryBackend` is the in-process test double.

mod memory;
mod rest;

pub use memory::{BUCKET_LIST, ForeignKey, MemoryBackend};
pub use rest::RestBackend;

use crate::error::PersistenceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw backend row keyed by physical column name.
pub type Row = serde_json::Map<String, Value>;

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Exact equality. A `null` value matches null cells.
    Eq,
    /// Case-insensitive `LIKE` with `%` wildcards.
    ILike,
}

/// A single column filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn ilike(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::ILike,
            value: Value::String(pattern.into()),
        }
    }
}

/// An ordering clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A select query: filters are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Select {
    /// Selects every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

/// An object-storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

/// One entry of a storage listing.
///
/// Folders are reported with no `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl StorageObject {
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.id.is_none()
    }
}

/// Paging for storage listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

/// Operations the dashboard needs from a hosted database and storage service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the exact row count of `table` without fetching rows.
    ///
    /// Doubles as the existence probe used by table resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist or the call fails.
    async fn count(&self, table: &str) -> Result<u64, PersistenceError>;

    /// Selects rows from `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table or a referenced column does not exist.
    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>, PersistenceError>;

    /// Inserts rows and returns them as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert is rejected.
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, PersistenceError>;

    /// Applies `changes` to every matching row and returns the updated rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Row,
    ) -> Result<Vec<Row>, PersistenceError>;

    /// Deletes every matching row and returns the deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected, e.g. by a constraint.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, PersistenceError>;

    /// Establishes an anonymous session used for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns an error if anonymous sign-in is disabled or fails.
    async fn sign_in_anonymously(&self) -> Result<Session, PersistenceError>;

    /// Lists storage buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage call fails.
    async fn list_buckets(&self) -> Result<Vec<Bucket>, PersistenceError>;

    /// Lists the direct children of `prefix` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket does not exist or the call fails.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<Vec<StorageObject>, PersistenceError>;
}

/// Renders a scalar cell as text for comparison and query strings.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
