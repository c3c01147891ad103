// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identifier discovery and deletion.
//!
//! Deployments disagree on which column identifies a row (`user_id`, `id`,
//! `ID`, ...). A delete therefore plans a list of `(column, value)` attempts
//! from the input and from a sampled row, tries them in order, and stops at
//! the first one that removes a row. Buildings referenced by other rows are
//! soft-deleted instead.

use crate::backend::{Filter, Row, Select};
use crate::entity::{Entity, EntityConfig, SoftDeleteValue};
use crate::error::PersistenceError;
use crate::repository::EntityRepository;
use itouru_domain::{RecordId, SOFT_DELETE_MARKER, soft_delete_sentinel};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// What to delete: a bare identifier or a record carrying one.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Id(RecordId),
    Record(Row),
}

impl DeleteTarget {
    /// Interprets a JSON value: objects are records, scalars identifiers.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(row) => Some(Self::Record(row.clone())),
            other => RecordId::from_value(other).map(Self::Id),
        }
    }

    /// Extracts the single identifier value for this target.
    ///
    /// Records are searched using the entity's identifier keys in order, so
    /// the true primary key wins over a generic `id`.
    #[must_use]
    pub fn candidate(&self, config: &EntityConfig) -> Option<RecordId> {
        match self {
            Self::Id(id) => Some(id.clone()),
            Self::Record(row) => config
                .identifier_keys
                .iter()
                .find_map(|key| row.get(*key).and_then(RecordId::from_value)),
        }
    }
}

impl From<RecordId> for DeleteTarget {
    fn from(id: RecordId) -> Self {
        Self::Id(id)
    }
}

impl From<Row> for DeleteTarget {
    fn from(row: Row) -> Self {
        Self::Record(row)
    }
}

/// One `delete ... where column = value` attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAttempt {
    pub column: String,
    pub value: RecordId,
}

/// How a delete succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Rows were removed by matching `column`.
    Deleted { column: String, rows: usize },
    /// The row was kept and renamed with `sentinel`.
    SoftDeleted { sentinel: String },
}

fn is_primary(config: &EntityConfig, column: &str) -> bool {
    column.eq_ignore_ascii_case(config.primary_key)
}

/// Returns whether a key on the input record names this record's identifier.
fn is_identifier_key(config: &EntityConfig, key: &str) -> bool {
    key.eq_ignore_ascii_case("id")
        || is_primary(config, key)
        || config
            .identifier_keys
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key))
}

/// Returns whether a sampled column looks like this record's identifier.
fn is_identifier_column(config: &EntityConfig, column: &str) -> bool {
    if column.eq_ignore_ascii_case("id") || is_primary(config, column) {
        return true;
    }
    column.to_ascii_lowercase().ends_with("id")
        && column.len() <= config.id_column_max_len
        && !config.is_reference_column(column)
}

/// Plans the ordered, de-duplicated delete (or update) attempts.
///
/// Attempts come from identifier keys on the input record, then from
/// identifier-like columns of the sampled row, then the primary key as a
/// last resort. When columns were discovered, attempts naming a column the
/// table does not have are dropped. The primary key always goes first.
#[must_use]
pub fn plan_attempts(
    config: &EntityConfig,
    target: &DeleteTarget,
    candidate: &RecordId,
    discovered: Option<&[String]>,
) -> Vec<DeleteAttempt> {
    let mut attempts: Vec<DeleteAttempt> = Vec::new();

    if let DeleteTarget::Record(row) = target {
        for (key, value) in row {
            if !is_identifier_key(config, key) {
                continue;
            }
            if let Some(id) = RecordId::from_value(value) {
                attempts.push(DeleteAttempt {
                    column: key.clone(),
                    value: id.coerced(),
                });
            }
        }
    }

    if let Some(columns) = discovered {
        let rank = |column: &str| -> u8 {
            if is_primary(config, column) {
                0
            } else if column.eq_ignore_ascii_case("id") {
                1
            } else {
                2
            }
        };
        let mut id_columns: Vec<&String> = columns
            .iter()
            .filter(|column| is_identifier_column(config, column))
            .collect();
        id_columns.sort_by_key(|column| rank(column));

        attempts.extend(id_columns.into_iter().map(|column| DeleteAttempt {
            column: column.clone(),
            value: candidate.coerced(),
        }));
    }

    if attempts.is_empty() {
        attempts.push(DeleteAttempt {
            column: config.primary_key.to_string(),
            value: candidate.coerced(),
        });
    }

    if let Some(columns) = discovered {
        attempts.retain(|attempt| columns.contains(&attempt.column));
    }

    let mut seen: Vec<String> = Vec::new();
    attempts.retain(|attempt| {
        let key: String = attempt.column.to_ascii_lowercase();
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });

    attempts.sort_by_key(|attempt| u8::from(!is_primary(config, &attempt.column)));
    attempts
}

impl<T: Entity> EntityRepository<'_, T> {
    /// Deletes one row.
    ///
    /// Checks that the row exists, then runs the planned attempts in order
    /// until one removes rows. Failing attempts are logged and skipped. For
    /// entities with a soft-delete plan, a constraint violation on the last
    /// failing attempt turns into a soft delete.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdentifier` if no identifier can be found, `NotFound`
    /// if the row does not exist or no attempt matched, or the last backend
    /// error.
    pub async fn delete(&self, target: &DeleteTarget) -> Result<DeleteOutcome, PersistenceError> {
        let config: &EntityConfig = self.config;
        let candidate: RecordId = target.candidate(config).ok_or_else(|| {
            PersistenceError::MissingIdentifier(format!(
                "no identifier supplied for {}",
                config.name
            ))
        })?;
        candidate.validate()?;

        let table: &str = self.table()?;
        let discovered: Option<Vec<String>> = self.discovered_columns(table).await;
        let attempts: Vec<DeleteAttempt> =
            plan_attempts(config, target, &candidate, discovered.as_deref());
        let Some(key) = attempts.first() else {
            error!("no identifier column for {} in '{}'", config.name, table);
            return Err(PersistenceError::MissingIdentifier(format!(
                "no identifier column found for {} in '{table}'",
                config.name
            )));
        };
        debug!(
            "delete plan for {} {}: {:?}",
            config.name,
            candidate,
            attempts.iter().map(|a| a.column.as_str()).collect::<Vec<&str>>()
        );

        let backend = self.persistence.backend();
        let key_filter: [Filter; 1] = [Filter::eq(&key.column, candidate.coerced().to_value())];

        let existing: Vec<Row> = self
            .persistence
            .call(backend.select(
                table,
                &Select::all().filters(key_filter.clone()).limit(1),
            ))
            .await
            .inspect_err(|e| error!("existence check on '{}' failed: {}", table, e))?;
        if existing.is_empty() {
            warn!("{} {} does not exist in '{}'", config.name, candidate, table);
            return Err(PersistenceError::NotFound {
                table: table.to_string(),
                column: key.column.clone(),
                value: candidate.to_string(),
            });
        }

        let mut last_error: Option<PersistenceError> = None;
        for attempt in &attempts {
            let filters: [Filter; 1] = [Filter::eq(&attempt.column, attempt.value.to_value())];
            match self.persistence.call(backend.delete(table, &filters)).await {
                Ok(rows) if !rows.is_empty() => {
                    info!(
                        "deleted {} {} from '{}' by {}",
                        config.name, candidate, table, attempt.column
                    );
                    return Ok(DeleteOutcome::Deleted {
                        column: attempt.column.clone(),
                        rows: rows.len(),
                    });
                }
                Ok(_) => debug!("delete by {} = {} matched no rows", attempt.column, attempt.value),
                Err(e) => {
                    warn!("delete by {} failed: {}", attempt.column, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !config.soft_delete.is_empty() && e.is_constraint_violation() => {
                info!(
                    "{} {} is still referenced, falling back to soft delete",
                    config.name, candidate
                );
                self.soft_delete(table, &key_filter, discovered.as_deref())
                    .await
            }
            Some(e) => {
                error!("failed to delete {} {}: {}", config.name, candidate, e);
                Err(e)
            }
            None => {
                error!("no delete attempt matched {} {}", config.name, candidate);
                Err(PersistenceError::NotFound {
                    table: table.to_string(),
                    column: key.column.clone(),
                    value: candidate.to_string(),
                })
            }
        }
    }

    /// Overwrites the soft-delete fields of the row matched by `filters`.
    async fn soft_delete(
        &self,
        table: &str,
        filters: &[Filter],
        discovered: Option<&[String]>,
    ) -> Result<DeleteOutcome, PersistenceError> {
        let millis: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let sentinel: String = soft_delete_sentinel(millis);

        let mut changes: Row = Row::new();
        for field in self.config.soft_delete {
            let Some(alias) = self.config.alias(field.field) else {
                continue;
            };
            let column: String = discovered
                .and_then(|columns| alias.physical_in(columns))
                .map_or_else(|| alias.primary_spelling().to_string(), String::from);
            let value: &str = match field.value {
                SoftDeleteValue::Sentinel => &sentinel,
                SoftDeleteValue::Marker => SOFT_DELETE_MARKER,
            };
            changes.insert(column, Value::from(value));
        }

        self.persistence
            .call(self.persistence.backend().update(table, filters, changes))
            .await
            .inspect_err(|e| error!("soft delete on '{}' failed: {}", table, e))?;

        warn!("soft-deleted {} in '{}' as {}", self.config.name, table, sentinel);
        Ok(DeleteOutcome::SoftDeleted { sentinel })
    }
}
