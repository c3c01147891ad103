// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::aliases::aliases_for;
use super::{ColumnMapping, LogicalTable, SchemaMap};
use crate::backend::{Backend, Row, Select};
use crate::error::PersistenceError;
use crate::timed;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves a logical table to a physical one.
///
/// Probes each candidate in order with a count query and returns the first
/// that answers without error. Probe failures are treated as "does not
/// exist". When every candidate fails the default mapping is used, which may
/// be `None`.
pub async fn resolve_table(
    backend: &dyn Backend,
    logical: LogicalTable,
    timeout: Duration,
) -> Option<String> {
    for candidate in logical.candidates() {
        match timed(timeout, backend.count(candidate)).await {
            Ok(count) => {
                info!(
                    "resolved {} to table '{}' ({} rows)",
                    logical, candidate, count
                );
                return Some((*candidate).to_string());
            }
            Err(e) => {
                debug!("probe of '{}' for {} failed: {}", candidate, logical, e);
            }
        }
    }

    match logical.default_table() {
        Some(default) => {
            warn!(
                "no candidate table answered for {}, using default '{}'",
                logical, default
            );
            Some(default.to_string())
        }
        None => {
            warn!("no table for {}, mock data will be used", logical);
            None
        }
    }
}

/// Samples one row of `table` and returns its column names.
///
/// Returns `Ok(None)` for an empty table.
///
/// # Errors
///
/// Returns an error if the sample query fails.
pub async fn sample_columns(
    backend: &dyn Backend,
    table: &str,
    timeout: Duration,
) -> Result<Option<Vec<String>>, PersistenceError> {
    let rows: Vec<Row> = timed(timeout, backend.select(table, &Select::all().limit(1))).await?;
    Ok(rows.first().map(|row| row.keys().cloned().collect()))
}

impl SchemaMap {
    /// Resolves every logical table and detects columns where possible.
    ///
    /// Resolution is sequential in declared order. Column detection failures
    /// and empty tables leave that table without a mapping.
    pub async fn discover(backend: &dyn Backend, timeout: Duration) -> Self {
        let mut tables: BTreeMap<LogicalTable, Option<String>> = BTreeMap::new();
        let mut columns: BTreeMap<LogicalTable, ColumnMapping> = BTreeMap::new();

        for logical in LogicalTable::ALL {
            let resolved: Option<String> = resolve_table(backend, logical, timeout).await;

            if let Some(table) = &resolved {
                let aliases = aliases_for(logical);
                if !aliases.is_empty() {
                    match sample_columns(backend, table, timeout).await {
                        Ok(Some(sampled)) => {
                            let mapping: ColumnMapping = ColumnMapping::detect(sampled, aliases);
                            debug!("columns of '{}': {:?}", table, mapping.fields);
                            columns.insert(logical, mapping);
                        }
                        Ok(None) => debug!("'{}' is empty, no columns detected", table),
                        Err(e) => debug!("column detection on '{}' failed: {}", table, e),
                    }
                }
            }

            tables.insert(logical, resolved);
        }

        let schema: Self = Self::from_parts(tables, columns);
        info!(
            "schema discovery complete: {} of {} tables resolved",
            schema.resolved_count(),
            LogicalTable::ALL.len()
        );
        schema
    }
}
