// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Activity, ActivityFeedItem, format_time_ago, parse_timestamp};
use time::OffsetDateTime;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2025-01-15 12:00:00 UTC);

#[test]
fn test_format_time_ago_just_now() {
    assert_eq!(
        format_time_ago(Some("2025-01-15T11:30:00+00:00"), NOW),
        "Just now"
    );
}

#[test]
fn test_format_time_ago_hours() {
    assert_eq!(format_time_ago(Some("2025-01-15T11:00:00Z"), NOW), "1 hour ago");
    assert_eq!(format_time_ago(Some("2025-01-15T07:00:00Z"), NOW), "5 hours ago");
}

#[test]
fn test_format_time_ago_days() {
    assert_eq!(format_time_ago(Some("2025-01-14T12:00:00Z"), NOW), "1 day ago");
    assert_eq!(format_time_ago(Some("2025-01-10 12:00:00"), NOW), "5 days ago");
}

#[test]
fn test_format_time_ago_unknown() {
    assert_eq!(format_time_ago(None, NOW), "Unknown");
    assert_eq!(format_time_ago(Some("yesterday"), NOW), "Unknown");
}

#[test]
fn test_parse_timestamp_accepts_fractional_zoneless() {
    let parsed: OffsetDateTime = parse_timestamp("2025-01-15T10:00:00.123456").unwrap();
    assert_eq!(parsed.hour(), 10);
}

#[test]
fn test_feed_item_defaults_user_to_system() {
    let activity: Activity = Activity {
        activity_type: String::from("qr_generated"),
        title: String::from("QR Code Generated"),
        created_at: Some(String::from("2025-01-15T09:00:00Z")),
        ..Activity::default()
    };

    let item: ActivityFeedItem = ActivityFeedItem::from_activity(&activity, NOW);
    assert_eq!(item.user, "System");
    assert_eq!(item.icon, "QrCode");
    assert_eq!(item.color, "bg-purple-500");
    assert_eq!(item.time, "3 hours ago");
}

#[test]
fn test_feed_item_unknown_type_uses_generic_icon() {
    let activity: Activity = Activity {
        activity_type: String::from("something_else"),
        user_name: String::from("Admin"),
        ..Activity::default()
    };

    let item: ActivityFeedItem = ActivityFeedItem::from_activity(&activity, NOW);
    assert_eq!(item.user, "Admin");
    assert_eq!(item.icon, "Activity");
    assert_eq!(item.color, "bg-gray-500");
}
