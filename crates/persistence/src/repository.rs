// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Generic entity access.

use crate::Persistence;
use crate::backend::{Filter, Row, Select};
use crate::deletion::{DeleteTarget, plan_attempts};
use crate::entity::{Entity, EntityConfig};
use crate::error::PersistenceError;
use crate::schema::{FieldKind, decode, sample_columns};
use itouru_domain::{Fields, RecordId, validate_required_fields};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, error, info, warn};

/// Typed access to one entity's table.
///
/// Every operation returns a `Result`; the caller decides whether a failure
/// degrades to placeholder data or is surfaced.
pub struct EntityRepository<'a, T> {
    pub(crate) persistence: &'a Persistence,
    pub(crate) config: &'static EntityConfig,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> EntityRepository<'a, T> {
    #[must_use]
    pub fn new(persistence: &'a Persistence) -> Self {
        Self {
            persistence,
            config: T::config(),
            marker: PhantomData,
        }
    }

    /// Returns the resolved physical table.
    ///
    /// # Errors
    ///
    /// Returns `TableUnresolvable` if the logical table has no mapping.
    pub fn table(&self) -> Result<&'a str, PersistenceError> {
        self.persistence.table(self.config.table)
    }

    /// Returns the physical column for a canonical field.
    #[must_use]
    pub fn column(&self, field: &str) -> String {
        self.persistence
            .schema()
            .column_for(self.config.table, field)
    }

    /// Lists every row, newest first where the table allows.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unresolvable or the query fails.
    pub async fn list(&self) -> Result<Vec<T>, PersistenceError> {
        self.fetch(Vec::new(), None).await
    }

    /// Lists rows whose canonical `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unresolvable or the query fails.
    pub async fn list_where(
        &self,
        field: &str,
        value: impl Into<Value> + Send,
    ) -> Result<Vec<T>, PersistenceError> {
        let filter: Filter = Filter::eq(self.column(field), value);
        self.fetch(vec![filter], None).await
    }

    /// Lists at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is unresolvable or the query fails.
    pub async fn list_limited(&self, limit: usize) -> Result<Vec<T>, PersistenceError> {
        self.fetch(Vec::new(), Some(limit)).await
    }

    /// Runs a select with the entity's default ordering.
    ///
    /// When the ordering column does not exist the query is repeated
    /// without ordering instead of failing.
    async fn fetch(
        &self,
        filters: Vec<Filter>,
        limit: Option<usize>,
    ) -> Result<Vec<T>, PersistenceError> {
        let table: &str = self.table()?;
        let mut query: Select = Select::all().filters(filters);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let backend = self.persistence.backend();
        let rows: Vec<Row> = match self.config.order {
            Some(order) => {
                let column: String = self.column(order.column);
                let ordered: Select = query.clone().order_by(column.clone(), order.ascending);
                match self
                    .persistence
                    .call(backend.select(table, &ordered))
                    .await
                {
                    Ok(rows) => rows,
                    Err(e) if e.is_missing_column(&column) => {
                        warn!(
                            "'{}' has no {} column, listing without ordering",
                            table, column
                        );
                        self.persistence.call(backend.select(table, &query)).await?
                    }
                    Err(e) => return Err(e),
                }
            }
            None => self.persistence.call(backend.select(table, &query)).await?,
        };

        debug!("fetched {} {} row(s) from '{}'", rows.len(), self.config.name, table);
        rows.iter()
            .map(|row| decode::<T>(row, self.config.aliases))
            .collect()
    }

    /// Maps canonical (or physical) keys onto physical columns.
    ///
    /// When columns were detected, fields the table has no column for are
    /// dropped. Without a detected mapping a canonical key is written under
    /// its alias's primary spelling and a physical key is kept as given.
    /// Unknown keys are dropped. Nulls are dropped unless `keep_nulls`.
    #[must_use]
    pub fn to_physical(&self, fields: &Fields, keep_nulls: bool) -> Row {
        let mapping = self.persistence.schema().columns(self.config.table);
        let mut row: Row = Row::new();

        for (key, value) in fields {
            if value.is_null() && !keep_nulls {
                continue;
            }
            let Some(alias) = self.config.alias_for_key(key) else {
                debug!("ignoring unknown {} field '{}'", self.config.name, key);
                continue;
            };

            let column: &str = match mapping {
                Some(mapping) => {
                    let Some(column) = mapping.column(alias.field) else {
                        debug!("no column for {} field '{}', dropping it", self.config.name, key);
                        continue;
                    };
                    column
                }
                None if key == alias.field => alias.primary_spelling(),
                None => key.as_str(),
            };
            row.insert(column.to_string(), write_value(alias.kind, value));
        }

        row
    }

    /// Samples one row and returns its column names.
    ///
    /// Failures and empty tables yield `None`.
    pub(crate) async fn discovered_columns(&self, table: &str) -> Option<Vec<String>> {
        match sample_columns(
            self.persistence.backend(),
            table,
            self.persistence.request_timeout(),
        )
        .await
        {
            Ok(columns) => columns,
            Err(e) => {
                debug!("could not sample '{}': {}", table, e);
                None
            }
        }
    }

    /// Creates a row.
    ///
    /// Required fields are checked before anything else, then entity
    /// defaults and any client-generated key are filled in.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for missing required fields, or the backend
    /// error if the insert is rejected.
    pub async fn create(&self, fields: Fields) -> Result<Option<T>, PersistenceError> {
        validate_required_fields(self.config.name, &fields, self.config.required)?;

        let mut fields: Fields = fields;
        (self.config.prepare)(&mut fields);

        let table: &str = self.table()?;
        let mut row: Row = self.to_physical(&fields, false);
        if let Some(key) = self.config.surrogate_key {
            let present: bool = row
                .iter()
                .any(|(column, value)| column.eq_ignore_ascii_case(key.column) && !value.is_null());
            let has_column: bool = self
                .persistence
                .schema()
                .columns(self.config.table)
                .is_none_or(|m| m.columns.iter().any(|c| c == key.column));
            if !present && has_column {
                row.insert(key.column.to_string(), Value::from(key.generate()));
            }
        }

        let inserted: Vec<Row> = self
            .persistence
            .call(self.persistence.backend().insert(table, vec![row]))
            .await
            .inspect_err(|e| {
                error!("failed to create {} in '{}': {}", self.config.name, table, e);
            })?;

        info!("created {} in '{}'", self.config.name, table);
        inserted
            .first()
            .map(|row| decode::<T>(row, self.config.aliases))
            .transpose()
    }

    /// Updates the row identified by `id`.
    ///
    /// The identifier column is discovered the same way deletion discovers
    /// it; attempts stop at the first one that updates a row. Returns
    /// `Ok(None)` when no attempt matched.
    ///
    /// # Errors
    ///
    /// Returns the last backend error if every attempt failed, or
    /// `MissingIdentifier` if no identifier column could be found.
    pub async fn update(
        &self,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Option<T>, PersistenceError> {
        id.validate()?;
        let table: &str = self.table()?;
        let changes: Row = self.to_physical(&fields, true);
        if changes.is_empty() {
            warn!("update of {} {} has no known fields", self.config.name, id);
            return Ok(None);
        }

        let discovered: Option<Vec<String>> = self.discovered_columns(table).await;
        let attempts = plan_attempts(
            self.config,
            &DeleteTarget::Id(id.clone()),
            id,
            discovered.as_deref(),
        );
        if attempts.is_empty() {
            return Err(PersistenceError::MissingIdentifier(format!(
                "no identifier column found for {} in '{table}'",
                self.config.name
            )));
        }

        let mut last_error: Option<PersistenceError> = None;
        for attempt in &attempts {
            let filters: [Filter; 1] = [Filter::eq(&attempt.column, attempt.value.to_value())];
            match self
                .persistence
                .call(self.persistence.backend().update(table, &filters, changes.clone()))
                .await
            {
                Ok(rows) => {
                    if let Some(row) = rows.first() {
                        info!(
                            "updated {} {} in '{}' by {}",
                            self.config.name, id, table, attempt.column
                        );
                        return decode::<T>(row, self.config.aliases).map(Some);
                    }
                    debug!("update by {} = {} matched no rows", attempt.column, attempt.value);
                }
                Err(e) => {
                    warn!("update by {} failed: {}", attempt.column, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => {
                error!("failed to update {} {}: {}", self.config.name, id, e);
                Err(e)
            }
            None => Ok(None),
        }
    }

    /// Applies `fields` to every row whose canonical fields match `filters`.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the update is rejected.
    pub async fn update_where(
        &self,
        filters: &[(&str, Value)],
        fields: Fields,
    ) -> Result<Vec<T>, PersistenceError> {
        let table: &str = self.table()?;
        let filters: Vec<Filter> = filters
            .iter()
            .map(|(field, value)| Filter::eq(self.column(field), value.clone()))
            .collect();
        let changes: Row = self.to_physical(&fields, true);

        let rows: Vec<Row> = self
            .persistence
            .call(self.persistence.backend().update(table, &filters, changes))
            .await?;
        rows.iter()
            .map(|row| decode::<T>(row, self.config.aliases))
            .collect()
    }
}

/// Coerces a caller-supplied value for writing.
///
/// Form input arrives as text; numeric and boolean columns get the typed
/// value when the text converts cleanly.
fn write_value(kind: FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (FieldKind::Integer | FieldKind::Boolean, Value::String(_)) => {
            kind.coerce(value).unwrap_or_else(|| value.clone())
        }
        (FieldKind::Identifier, Value::String(s)) => RecordId::parse(s).to_value(),
        _ => value.clone(),
    }
}
