// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Physical schema discovery.
//!
//! Deployments disagree on table and column spellings (`Building` versus
//! `buildings`, `building_name` versus `Name`). Discovery runs once during
//! initialization and produces an immutable [`SchemaMap`] that every
//! repository reads through.

pub mod aliases;
mod normalize;
mod resolver;

pub use aliases::{FieldAlias, FieldDefault, FieldKind, aliases_for};
pub use normalize::{decode, normalize};
pub use resolver::{resolve_table, sample_columns};

use serde::Serialize;
use std::collections::BTreeMap;

/// The fixed set of logical tables the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalTable {
    Users,
    Buildings,
    Rooms,
    ContentItems,
    Tours,
    TourStops,
    QrCodes,
    TourVisits,
    Activities,
    Notifications,
}

impl LogicalTable {
    /// Every logical table, in resolution order.
    pub const ALL: [Self; 10] = [
        Self::Users,
        Self::Buildings,
        Self::Rooms,
        Self::ContentItems,
        Self::Tours,
        Self::TourStops,
        Self::QrCodes,
        Self::TourVisits,
        Self::Activities,
        Self::Notifications,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Buildings => "buildings",
            Self::Rooms => "rooms",
            Self::ContentItems => "content_items",
            Self::Tours => "tours",
            Self::TourStops => "tour_stops",
            Self::QrCodes => "qr_codes",
            Self::TourVisits => "tour_visits",
            Self::Activities => "activities",
            Self::Notifications => "notifications",
        }
    }

    /// Candidate physical names, in probe order.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["Users", "users", "user", "User"],
            Self::Buildings => &["Building", "Buildings", "buildings", "building"],
            Self::Rooms => &["Room", "Rooms", "rooms", "room"],
            Self::ContentItems => &["Content", "content_items", "content", "Content_Items"],
            Self::Tours => &["Tours", "tours", "tour", "Tour"],
            Self::TourStops => &["Tour_Stops", "tour_stops", "TourStops", "tour_stop"],
            Self::QrCodes => &["QR Code", "QR_Codes", "qr_codes", "qrcodes", "QRCodes"],
            Self::TourVisits => &["Tour_Visits", "tour_visits", "TourVisits", "tour_visit"],
            Self::Activities => &["Activity", "Activities", "activities", "activity"],
            Self::Notifications => &[
                "Notification",
                "Notifications",
                "notifications",
                "notification",
            ],
        }
    }

    /// The physical name assumed when no candidate answers a probe.
    ///
    /// `None` means the table is treated as absent.
    #[must_use]
    pub const fn default_table(self) -> Option<&'static str> {
        match self {
            Self::Users => Some("Users"),
            Self::Buildings => Some("Building"),
            Self::Rooms => Some("Room"),
            Self::ContentItems => Some("Content"),
            Self::Tours => Some("Tours"),
            Self::TourStops => Some("Tour_Stops"),
            Self::QrCodes => Some("QR Code"),
            Self::TourVisits => Some("Tour_Visits"),
            Self::Activities | Self::Notifications => None,
        }
    }
}

impl std::fmt::Display for LogicalTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Columns detected on one physical table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    /// Column names of the sampled row, in row order.
    pub columns: Vec<String>,
    /// Canonical field name to physical column name.
    pub fields: BTreeMap<String, String>,
}

impl ColumnMapping {
    /// Maps each alias onto the first of its candidates present in `columns`.
    ///
    /// An exact match wins over a case-insensitive one.
    #[must_use]
    pub fn detect(columns: Vec<String>, aliases: &[FieldAlias]) -> Self {
        let fields: BTreeMap<String, String> = aliases
            .iter()
            .filter_map(|alias| {
                alias
                    .physical_in(&columns)
                    .map(|physical| (alias.field.to_string(), physical.to_string()))
            })
            .collect();

        Self { columns, fields }
    }

    #[must_use]
    pub fn column(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// The resolved physical schema.
///
/// Built once and never mutated; share it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaMap {
    tables: BTreeMap<LogicalTable, Option<String>>,
    columns: BTreeMap<LogicalTable, ColumnMapping>,
}

impl SchemaMap {
    /// The default table mapping with no detected columns.
    #[must_use]
    pub fn defaults() -> Self {
        let tables: BTreeMap<LogicalTable, Option<String>> = LogicalTable::ALL
            .iter()
            .map(|logical| (*logical, logical.default_table().map(String::from)))
            .collect();

        Self {
            tables,
            columns: BTreeMap::new(),
        }
    }

    /// Creates a schema map from explicit parts.
    #[must_use]
    pub const fn from_parts(
        tables: BTreeMap<LogicalTable, Option<String>>,
        columns: BTreeMap<LogicalTable, ColumnMapping>,
    ) -> Self {
        Self { tables, columns }
    }

    /// Returns the physical table for `logical`, if any.
    #[must_use]
    pub fn table(&self, logical: LogicalTable) -> Option<&str> {
        self.tables.get(&logical).and_then(|t| t.as_deref())
    }

    /// Returns the detected columns of `logical`'s table, if any.
    #[must_use]
    pub fn columns(&self, logical: LogicalTable) -> Option<&ColumnMapping> {
        self.columns.get(&logical)
    }

    /// Returns the physical column for a canonical field.
    ///
    /// Falls back to the canonical name when no mapping was detected.
    #[must_use]
    pub fn column_for(&self, logical: LogicalTable, field: &str) -> String {
        self.columns
            .get(&logical)
            .and_then(|mapping| mapping.column(field))
            .unwrap_or(field)
            .to_string()
    }

    /// Number of logical tables that resolved to a physical table.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.tables.values().filter(|t| t.is_some()).count()
    }
}
