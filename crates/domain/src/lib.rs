// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical records and validation rules for the iTOURu dashboard.
//!
//! Nothing in this crate performs I/O. The persistence layer maps backend
//! rows onto these records; the API layer applies these rules before
//! issuing any backend call.

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

mod content_kind;
mod error;
mod feed;
mod mock;
mod records;
mod soft_delete;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use content_kind::ContentKind;
pub use error::DomainError;
pub use feed::{
    ActivityFeedItem, DashboardStats, NotificationItem, activity_color, activity_icon,
    format_time_ago, parse_timestamp,
};
pub use mock::{
    mock_activities, mock_buildings, mock_content, mock_notifications, mock_qr_codes,
    mock_rooms, mock_stats, mock_tour_stops, mock_tours, mock_users,
};
pub use records::{
    Activity, Building, ContentItem, Notification, QrCode, Room, Tour, TourStop, User,
};
pub use soft_delete::{
    SOFT_DELETE_MARKER, SOFT_DELETE_PREFIX, is_soft_deleted, soft_delete_sentinel,
};
pub use types::{Fields, RecordId};
pub use validation::{validate_email_unique, validate_name_unique, validate_required_fields};
