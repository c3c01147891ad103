// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of dashboard listings.
//!
//! Each exportable record has a fixed header and one row per record. Fields
//! containing commas, quotes or newlines are quoted.

use itouru_domain::{Building, ContentItem, QrCode, RecordId, Room, Tour, User};
use thiserror::Error;

/// CSV export errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("Failed to write CSV record: {0}")]
    Write(String),

    /// The writer's buffer could not be recovered.
    #[error("Failed to finish CSV output: {0}")]
    Flush(String),

    /// The output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8")]
    Encoding,
}

/// A record that can be exported as one CSV row.
pub trait CsvExport {
    /// Column headers, in row order.
    const HEADERS: &'static [&'static str];

    /// Suggested download file name.
    const FILE_NAME: &'static str;

    /// The record's cells, matching [`Self::HEADERS`].
    fn csv_row(&self) -> Vec<String>;
}

fn id_text(id: Option<&RecordId>) -> String {
    id.map(ToString::to_string).unwrap_or_default()
}

fn status(active: bool) -> String {
    String::from(if active { "Active" } else { "Inactive" })
}

fn optional(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvExport for User {
    const HEADERS: &'static [&'static str] = &[
        "First Name",
        "Middle Name",
        "Last Name",
        "Email",
        "User Type",
        "College",
        "Status",
    ];
    const FILE_NAME: &'static str = "users.csv";

    fn csv_row(&self) -> Vec<String> {
        let status: String = if self.status.trim().is_empty() {
            String::from("Active")
        } else {
            self.status.clone()
        };
        vec![
            self.first_name.clone(),
            self.middle_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.user_type.clone(),
            self.college.clone(),
            status,
        ]
    }
}

impl CsvExport for QrCode {
    const HEADERS: &'static [&'static str] =
        &["Title", "Type", "Destination ID", "Scans", "Status"];
    const FILE_NAME: &'static str = "qr-codes.csv";

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.destination_type.clone(),
            id_text(self.destination_id.as_ref()),
            self.scan_count.to_string(),
            status(self.is_active),
        ]
    }
}

impl CsvExport for Building {
    const HEADERS: &'static [&'static str] = &["Name", "Nickname", "Type", "Address"];
    const FILE_NAME: &'static str = "buildings.csv";

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.nickname.clone(),
            self.building_type.clone(),
            self.address.clone(),
        ]
    }
}

impl CsvExport for Room {
    const HEADERS: &'static [&'static str] =
        &["Name", "Room Number", "Type", "Floor", "Building ID"];
    const FILE_NAME: &'static str = "rooms.csv";

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.room_number.clone(),
            self.room_type.clone(),
            optional(self.floor_level),
            id_text(self.building_id.as_ref()),
        ]
    }
}

impl CsvExport for Tour {
    const HEADERS: &'static [&'static str] = &["Name", "Type", "Duration", "Stops", "Status"];
    const FILE_NAME: &'static str = "tours.csv";

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.tour_type.clone(),
            optional(self.estimated_duration),
            self.total_stops.to_string(),
            status(self.is_active),
        ]
    }
}

impl CsvExport for ContentItem {
    const HEADERS: &'static [&'static str] = &["Title", "Type", "URL", "Size"];
    const FILE_NAME: &'static str = "content.csv";

    fn csv_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.content_type.clone(),
            self.file_url.clone(),
            self.file_size.to_string(),
        ]
    }
}

/// Renders `records` as CSV text, header first.
///
/// # Errors
///
/// Returns an `ExportError` if the writer fails.
pub fn export_csv<T: CsvExport>(records: &[T]) -> Result<String, ExportError> {
    let mut writer: csv::Writer<Vec<u8>> = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(T::HEADERS)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    for record in records {
        writer
            .write_record(record.csv_row())
            .map_err(|e| ExportError::Write(e.to_string()))?;
    }

    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}
