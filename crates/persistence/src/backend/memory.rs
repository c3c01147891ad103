// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-process backend.
//!
//! Tables have a fixed column set and reject unknown tables and columns with
//! the same error codes and messages Postgres produces, so the resolution
//! and fallback paths behave as they would against a live deployment.
//! Foreign keys block deletes of referenced rows. Every call is recorded in
//! a call log.

use super::{
    Backend, Bucket, Filter, FilterOp, ListOptions, Row, Select, Session, StorageObject,
    scalar_text,
};
use crate::error::PersistenceError;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::sync::Mutex;

/// Failure key for the bucket listing.
pub const BUCKET_LIST: &str = "storage.buckets";

/// A foreign key from `child_table.child_column` to
/// `parent_table.parent_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub child_table: String,
    pub child_column: String,
    pub parent_table: String,
    pub parent_column: String,
}

impl ForeignKey {
    #[must_use]
    pub fn new(
        child_table: impl Into<String>,
        child_column: impl Into<String>,
        parent_table: impl Into<String>,
        parent_column: impl Into<String>,
    ) -> Self {
        Self {
            child_table: child_table.into(),
            child_column: child_column.into(),
            parent_table: parent_table.into(),
            parent_column: parent_column.into(),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<Row>,
    next_id: i64,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    foreign_keys: Vec<ForeignKey>,
    failures: HashMap<String, PersistenceError>,
    anonymous_sign_in: bool,
    buckets: Vec<Bucket>,
    /// Bucket name to full object paths.
    objects: HashMap<String, Vec<String>>,
    calls: Vec<String>,
}

/// An in-memory implementation of [`Backend`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    /// Creates an empty backend with anonymous sign-in enabled.
    #[must_use]
    pub fn new() -> Self {
        let mut backend: Self = Self::default();
        backend.state.get_mut().anonymous_sign_in = true;
        backend
    }

    /// Adds a table with the given columns and rows.
    ///
    /// Row keys that are not declared columns are ignored; missing columns
    /// are stored as null.
    #[must_use]
    pub fn with_table(mut self, name: &str, columns: &[&str], rows: Vec<Row>) -> Self {
        let columns: Vec<String> = columns.iter().map(ToString::to_string).collect();
        let rows: Vec<Row> = rows.iter().map(|row| conform(&columns, row)).collect();
        let next_id: i64 = rows
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        self.state.get_mut().tables.insert(
            name.to_string(),
            MemoryTable {
                columns,
                rows,
                next_id,
            },
        );
        self
    }

    #[must_use]
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.state.get_mut().foreign_keys.push(foreign_key);
        self
    }

    /// Makes every call touching `table` fail with `error`.
    ///
    /// Object listings are keyed by bucket name and the bucket listing by
    /// [`BUCKET_LIST`].
    #[must_use]
    pub fn with_failure(mut self, table: &str, error: PersistenceError) -> Self {
        self.state
            .get_mut()
            .failures
            .insert(table.to_string(), error);
        self
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    #[must_use]
    pub fn without_anonymous_sign_in(mut self) -> Self {
        self.state.get_mut().anonymous_sign_in = false;
        self
    }

    /// Adds a storage bucket holding files at the given paths.
    #[must_use]
    pub fn with_bucket(mut self, id: &str, name: &str, paths: &[&str]) -> Self {
        let state: &mut MemoryState = self.state.get_mut();
        state.buckets.push(Bucket {
            id: id.to_string(),
            name: name.to_string(),
            public: true,
        });
        state.objects.insert(
            name.to_string(),
            paths.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Returns the current rows of `table`.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.state
            .lock()
            .await
            .tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Returns every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn conform(columns: &[String], row: &Row) -> Row {
    columns
        .iter()
        .map(|column| {
            (
                column.clone(),
                row.get(column).cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}

fn missing_table(table: &str) -> PersistenceError {
    PersistenceError::backend(
        404,
        Some("42P01"),
        format!("relation \"public.{table}\" does not exist"),
    )
}

fn missing_column(table: &str, column: &str) -> PersistenceError {
    PersistenceError::backend(
        400,
        Some("42703"),
        format!("column {table}.{column} does not exist"),
    )
}

fn describe(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|f| match f.op {
            FilterOp::Eq => format!("{}={}", f.column, scalar_text(&f.value)),
            FilterOp::ILike => format!("{}~{}", f.column, scalar_text(&f.value)),
        })
        .collect::<Vec<String>>()
        .join(",")
}

/// Case-insensitive `LIKE` supporting `%` wildcards.
fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: String = pattern.to_lowercase();
    let text: String = text.to_lowercase();
    let parts: Vec<&str> = pattern.split('%').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut rest: &str = text.as_str();
    for (index, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if index == 0 {
            let Some(stripped) = rest.strip_prefix(part) else {
                return false;
            };
            rest = stripped;
        } else if index == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            let Some(position) = rest.find(part) else {
                return false;
            };
            rest = &rest[position + part.len()..];
        }
    }
    true
}

fn matches(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let cell: &Value = row.get(&filter.column).unwrap_or(&Value::Null);
        match filter.op {
            FilterOp::Eq if filter.value.is_null() => cell.is_null(),
            FilterOp::Eq => !cell.is_null() && scalar_text(cell) == scalar_text(&filter.value),
            FilterOp::ILike => match cell {
                Value::String(s) => like_matches(&scalar_text(&filter.value), s),
                _ => false,
            },
        }
    })
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => scalar_text(a).cmp(&scalar_text(b)),
    }
}

impl MemoryState {
    fn check(&mut self, table: &str, call: String) -> Result<(), PersistenceError> {
        self.calls.push(call);
        if let Some(error) = self.failures.get(table) {
            return Err(error.clone());
        }
        Ok(())
    }

    fn table(&self, table: &str) -> Result<&MemoryTable, PersistenceError> {
        self.tables.get(table).ok_or_else(|| missing_table(table))
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut MemoryTable, PersistenceError> {
        self.tables.get_mut(table).ok_or_else(|| missing_table(table))
    }

    fn check_columns<'a>(
        &self,
        table: &str,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), PersistenceError> {
        let known: &MemoryTable = self.table(table)?;
        for column in columns {
            if !known.columns.iter().any(|c| c == column) {
                return Err(missing_column(table, column));
            }
        }
        Ok(())
    }

    /// Returns a foreign-key violation if any child row references `row`.
    fn referencing_violation(&self, table: &str, row: &Row) -> Option<PersistenceError> {
        self.foreign_keys
            .iter()
            .filter(|fk| fk.parent_table == table)
            .find_map(|fk| {
                let parent_value: &Value = row.get(&fk.parent_column)?;
                if parent_value.is_null() {
                    return None;
                }
                let referenced: bool = self.tables.get(&fk.child_table).is_some_and(|child| {
                    child.rows.iter().any(|child_row| {
                        child_row.get(&fk.child_column).is_some_and(|v| {
                            !v.is_null() && scalar_text(v) == scalar_text(parent_value)
                        })
                    })
                });
                referenced.then(|| {
                    PersistenceError::backend(
                        409,
                        Some("23503"),
                        format!(
                            "update or delete on table \"{table}\" violates foreign key constraint \"{}_{}_fkey\" on table \"{}\"",
                            fk.child_table, fk.child_column, fk.child_table
                        ),
                    )
                })
            })
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn count(&self, table: &str) -> Result<u64, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(table, format!("count {table}"))?;
        let rows: usize = state.table(table)?.rows.len();
        Ok(u64::try_from(rows).unwrap_or(u64::MAX))
    }

    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Row>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(
            table,
            format!("select {table} {}", describe(&query.filters)),
        )?;
        state.check_columns(table, query.filters.iter().map(|f| f.column.as_str()))?;
        if let Some(order) = &query.order {
            state.check_columns(table, [order.column.as_str()])?;
        }

        let mut rows: Vec<Row> = state
            .table(table)?
            .rows
            .iter()
            .filter(|row| matches(row, &query.filters))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering: Ordering = compare_cells(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(table, format!("insert {table}"))?;
        let columns: Vec<String> = state.table(table)?.columns.clone();
        for row in &rows {
            if let Some(column) = row.keys().find(|key| !columns.contains(key)) {
                return Err(PersistenceError::backend(
                    400,
                    Some("PGRST204"),
                    format!(
                        "Could not find the '{column}' column of '{table}' in the schema cache"
                    ),
                ));
            }
        }

        let target: &mut MemoryTable = state.table_mut(table)?;
        let has_id: bool = target.columns.iter().any(|c| c == "id");
        let mut inserted: Vec<Row> = Vec::with_capacity(rows.len());
        for row in rows {
            let mut stored: Row = conform(&target.columns, &row);
            if has_id && stored.get("id").is_none_or(Value::is_null) {
                stored.insert(String::from("id"), Value::from(target.next_id));
                target.next_id += 1;
            }
            target.rows.push(stored.clone());
            inserted.push(stored);
        }
        Ok(inserted)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Row,
    ) -> Result<Vec<Row>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(table, format!("update {table} {}", describe(filters)))?;
        state.check_columns(table, filters.iter().map(|f| f.column.as_str()))?;
        state.check_columns(table, changes.keys().map(String::as_str))?;

        let target: &mut MemoryTable = state.table_mut(table)?;
        let mut updated: Vec<Row> = Vec::new();
        for row in target.rows.iter_mut().filter(|row| matches(row, filters)) {
            for (column, value) in &changes {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(table, format!("delete {table} {}", describe(filters)))?;
        state.check_columns(table, filters.iter().map(|f| f.column.as_str()))?;

        let doomed: Vec<Row> = state
            .table(table)?
            .rows
            .iter()
            .filter(|row| matches(row, filters))
            .cloned()
            .collect();
        if let Some(violation) = doomed
            .iter()
            .find_map(|row| state.referencing_violation(table, row))
        {
            return Err(violation);
        }

        state
            .table_mut(table)?
            .rows
            .retain(|row| !matches(row, filters));
        Ok(doomed)
    }

    async fn sign_in_anonymously(&self) -> Result<Session, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.calls.push(String::from("sign_in_anonymously"));
        if !state.anonymous_sign_in {
            return Err(PersistenceError::backend(
                422,
                None,
                "Anonymous sign-ins are disabled",
            ));
        }
        Ok(Session {
            user_id: String::from("anonymous"),
            access_token: String::from("memory-token"),
        })
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(BUCKET_LIST, String::from("list_buckets"))?;
        Ok(state.buckets.clone())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        options: ListOptions,
    ) -> Result<Vec<StorageObject>, PersistenceError> {
        self.pause().await;
        let mut state = self.state.lock().await;
        state.check(bucket, format!("list_objects {bucket}/{prefix}"))?;
        let paths: &Vec<String> = state.objects.get(bucket).ok_or_else(|| {
            PersistenceError::backend(404, None, format!("Bucket not found: {bucket}"))
        })?;

        let folder: String = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", prefix.trim_end_matches('/'))
        };

        let mut folders: BTreeSet<String> = BTreeSet::new();
        let mut files: Vec<StorageObject> = Vec::new();
        for path in paths {
            let Some(relative) = path.strip_prefix(&folder) else {
                continue;
            };
            match relative.split_once('/') {
                Some((child, _)) => {
                    folders.insert(child.to_string());
                }
                None => files.push(StorageObject {
                    name: relative.to_string(),
                    id: Some(format!("{bucket}:{path}")),
                    metadata: None,
                    created_at: None,
                    updated_at: None,
                }),
            }
        }

        let mut entries: Vec<StorageObject> = folders
            .into_iter()
            .map(|name| StorageObject {
                name,
                id: None,
                metadata: None,
                created_at: None,
                updated_at: None,
            })
            .collect();
        entries.extend(files);
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(entries
            .into_iter()
            .skip(options.offset)
            .take(options.limit)
            .collect())
    }
}
