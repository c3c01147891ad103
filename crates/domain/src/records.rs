// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical record shapes.
//!
//! Every record here is the normalized view of a backend row. Field names
//! are the canonical vocabulary used throughout the dashboard; the
//! persistence layer is responsible for mapping whatever physical columns a
//! deployment has onto these names. Every field is always present after
//! normalization, so consumers never branch on which schema variant (or
//! which mock dataset) produced the record.

use crate::soft_delete::is_soft_deleted;
use crate::types::RecordId;
use serde::{Deserialize, Serialize};

/// A registered dashboard user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Display identifier. Mirrors `user_id` when the table has one.
    pub id: Option<RecordId>,
    /// The table's primary key.
    pub user_id: Option<RecordId>,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Role classification (e.g. "Student", "visitor").
    pub user_type: String,
    pub phone_number: String,
    pub college: String,
    pub status: String,
    pub created_at: Option<String>,
    pub last_active: Option<String>,
    pub profile_image: Option<String>,
}

impl User {
    /// Returns the user's name with blank parts omitted.
    #[must_use]
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

/// A campus building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Building {
    pub id: Option<RecordId>,
    pub name: String,
    pub nickname: String,
    pub building_type: String,
    pub address: String,
    pub description: String,
    pub college_id: Option<RecordId>,
    pub created_at: Option<String>,
}

impl Building {
    /// Returns whether this building was soft-deleted.
    ///
    /// Soft-deleted buildings keep their row but carry the sentinel prefix
    /// in their name.
    #[must_use]
    pub fn is_soft_deleted(&self) -> bool {
        is_soft_deleted(&self.name)
    }
}

/// A room inside a building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub id: Option<RecordId>,
    pub building_id: Option<RecordId>,
    pub name: String,
    pub room_number: String,
    pub room_type: String,
    pub floor_level: Option<i64>,
    pub capacity: Option<i64>,
    pub description: String,
    pub created_at: Option<String>,
}

/// A media item (image, video, audio, document).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub file_url: String,
    pub thumbnail_url: String,
    /// Size in bytes. Zero when unknown.
    pub file_size: i64,
    pub tags: Vec<String>,
    pub building_id: Option<RecordId>,
    pub room_id: Option<RecordId>,
    pub created_at: Option<String>,
}

/// A guided or self-guided tour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tour {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub tour_type: String,
    /// Estimated duration in minutes.
    pub estimated_duration: Option<i64>,
    pub is_active: bool,
    pub total_stops: i64,
    pub created_at: Option<String>,
}

/// A single stop on a tour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourStop {
    pub id: Option<RecordId>,
    pub tour_id: Option<RecordId>,
    pub building_id: Option<RecordId>,
    pub room_id: Option<RecordId>,
    pub stop_order: i64,
    pub title: String,
    pub description: String,
    /// Estimated time at this stop in minutes.
    pub estimated_time: Option<i64>,
    pub created_at: Option<String>,
}

/// A QR code pointing at a building, room, or tour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCode {
    pub id: Option<RecordId>,
    pub code: String,
    pub qr_url: String,
    /// One of "building", "room", or "tour".
    pub destination_type: String,
    pub destination_id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub scan_count: i64,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub last_scanned: Option<String>,
}

/// A raw activity row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: Option<RecordId>,
    pub activity_type: String,
    pub title: String,
    pub description: String,
    pub user_id: Option<RecordId>,
    /// Name of the acting user, when the row carries one.
    pub user_name: String,
    pub created_at: Option<String>,
}

/// A raw notification row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: Option<RecordId>,
    /// One of "alert", "info", "success", or "warning".
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub description: String,
    /// One of "high", "medium", or "low".
    pub priority: String,
    pub is_read: bool,
    pub user_id: Option<RecordId>,
    pub created_at: Option<String>,
    pub read_at: Option<String>,
}
