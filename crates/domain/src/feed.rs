// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard overview records: statistics, activity feed, notifications.

use crate::error::DomainError;
use crate::records::{Activity, Notification};
use crate::types::RecordId;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Headline counts shown on the dashboard overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub buildings_mapped: u64,
    pub content_items: u64,
    pub tour_views: u64,
}

/// An activity row prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFeedItem {
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub title: String,
    pub description: String,
    /// Relative time, e.g. "3 hours ago".
    pub time: String,
    pub user: String,
    pub icon: String,
    pub color: String,
}

impl ActivityFeedItem {
    /// Builds a feed item from a normalized activity row.
    #[must_use]
    pub fn from_activity(activity: &Activity, now: OffsetDateTime) -> Self {
        let user: String = if activity.user_name.trim().is_empty() {
            String::from("System")
        } else {
            activity.user_name.clone()
        };

        Self {
            id: activity.id.clone(),
            activity_type: activity.activity_type.clone(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            time: format_time_ago(activity.created_at.as_deref(), now),
            user,
            icon: activity_icon(&activity.activity_type).to_string(),
            color: activity_color(&activity.activity_type).to_string(),
        }
    }
}

/// A notification prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub description: String,
    pub time: String,
    pub read: bool,
    pub priority: String,
}

impl NotificationItem {
    /// Builds a display item from a normalized notification row.
    #[must_use]
    pub fn from_notification(notification: &Notification, now: OffsetDateTime) -> Self {
        Self {
            id: notification.id.clone(),
            notification_type: notification.notification_type.clone(),
            title: notification.title.clone(),
            description: notification.description.clone(),
            time: format_time_ago(notification.created_at.as_deref(), now),
            read: notification.is_read,
            priority: notification.priority.clone(),
        }
    }
}

/// Returns the icon name for an activity type.
#[must_use]
pub fn activity_icon(activity_type: &str) -> &'static str {
    match activity_type {
        "registration" => "Users",
        "media_upload" => "Upload",
        "qr_generated" => "QrCode",
        "tour_started" => "Route",
        "content_updated" => "Building",
        _ => "Activity",
    }
}

/// Returns the badge colour class for an activity type.
#[must_use]
pub fn activity_color(activity_type: &str) -> &'static str {
    match activity_type {
        "registration" => "bg-blue-500",
        "media_upload" => "bg-green-500",
        "qr_generated" => "bg-purple-500",
        "tour_started" => "bg-orange-500",
        "content_updated" => "bg-yellow-500",
        _ => "bg-gray-500",
    }
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 as well as the zone-less `timestamp` rendering Postgres
/// produces for columns without a time zone (interpreted as UTC).
///
/// # Errors
///
/// Returns an error if the value matches none of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, DomainError> {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(parsed);
    }

    let candidate: String = raw.trim().replacen(' ', "T", 1);
    let with_fraction =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let without_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    PrimitiveDateTime::parse(&candidate, with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(&candidate, without_fraction))
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::InvalidTimestamp(format!("{raw}: {e}")))
}

/// Formats the distance between `timestamp` and `now` as relative text.
///
/// Under an hour is "Just now", under a day is counted in hours, anything
/// older in days. Missing or unparseable timestamps yield "Unknown".
#[must_use]
pub fn format_time_ago(timestamp: Option<&str>, now: OffsetDateTime) -> String {
    let Some(parsed) = timestamp.and_then(|raw| parse_timestamp(raw).ok()) else {
        return String::from("Unknown");
    };

    let hours: i64 = (now - parsed).whole_hours();
    if hours < 1 {
        return String::from("Just now");
    }
    if hours < 24 {
        let suffix: &str = if hours > 1 { "s" } else { "" };
        return format!("{hours} hour{suffix} ago");
    }

    let days: i64 = hours / 24;
    let suffix: &str = if days > 1 { "s" } else { "" };
    format!("{days} day{suffix} ago")
}
