// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Static placeholder data for demo mode.
//!
//! These datasets are served when no backend is configured, when an entity
//! has no resolvable table, or when a live read fails. They use exactly the
//! canonical record shapes, so callers never need to know which source
//! produced a list.

use crate::feed::{ActivityFeedItem, DashboardStats, NotificationItem};
use crate::records::{Building, ContentItem, QrCode, Room, Tour, TourStop, User};
use crate::types::RecordId;

const MOCK_CREATED_AT: &str = "2025-01-15T09:00:00+00:00";

fn created_at() -> Option<String> {
    Some(String::from(MOCK_CREATED_AT))
}

fn mock_user(
    id: i64,
    email: &str,
    first: &str,
    last: &str,
    user_type: &str,
    college: &str,
) -> User {
    User {
        id: Some(RecordId::Int(id)),
        user_id: Some(RecordId::Int(id)),
        email: email.to_string(),
        first_name: first.to_string(),
        middle_name: String::new(),
        last_name: last.to_string(),
        user_type: user_type.to_string(),
        phone_number: String::new(),
        college: college.to_string(),
        status: String::from("Active"),
        created_at: created_at(),
        last_active: created_at(),
        profile_image: None,
    }
}

/// Placeholder users.
#[must_use]
pub fn mock_users() -> Vec<User> {
    vec![
        mock_user(
            1,
            "maria.santos@example.edu",
            "Maria",
            "Santos",
            "Student",
            "College of Engineering",
        ),
        mock_user(2, "jose.reyes@example.edu", "Jose", "Reyes", "Faculty", "College of Science"),
        mock_user(3, "visitor@example.com", "Ana", "Cruz", "visitor", ""),
    ]
}

fn mock_building(
    id: i64,
    name: &str,
    nickname: &str,
    building_type: &str,
    address: &str,
) -> Building {
    Building {
        id: Some(RecordId::Int(id)),
        name: name.to_string(),
        nickname: nickname.to_string(),
        building_type: building_type.to_string(),
        address: address.to_string(),
        description: String::new(),
        college_id: None,
        created_at: created_at(),
    }
}

/// Placeholder buildings.
#[must_use]
pub fn mock_buildings() -> Vec<Building> {
    vec![
        mock_building(101, "Main Library", "Library", "Academic", "1 University Avenue"),
        mock_building(102, "Science Building", "SciBldg", "Academic", "3 University Avenue"),
        mock_building(103, "Engineering Building", "EngBldg", "Academic", "5 University Avenue"),
    ]
}

/// Placeholder rooms.
#[must_use]
pub fn mock_rooms() -> Vec<Room> {
    vec![
        Room {
            id: Some(RecordId::Int(5001)),
            building_id: Some(RecordId::Int(101)),
            name: String::from("Reading Hall"),
            room_number: String::from("101"),
            room_type: String::from("Study Area"),
            floor_level: Some(1),
            capacity: Some(120),
            description: String::new(),
            created_at: created_at(),
        },
        Room {
            id: Some(RecordId::Int(5002)),
            building_id: Some(RecordId::Int(102)),
            name: String::from("Chemistry Lab"),
            room_number: String::from("204"),
            room_type: String::from("Laboratory"),
            floor_level: Some(2),
            capacity: Some(30),
            description: String::new(),
            created_at: created_at(),
        },
    ]
}

/// Placeholder media items.
#[must_use]
pub fn mock_content() -> Vec<ContentItem> {
    vec![ContentItem {
        id: Some(RecordId::Text(String::from("mock-content-1"))),
        title: String::from("Library Entrance"),
        description: String::from("Front view of the main library"),
        content_type: String::from("image"),
        file_url: String::new(),
        thumbnail_url: String::new(),
        file_size: 0,
        tags: vec![String::from("library")],
        building_id: Some(RecordId::Int(101)),
        room_id: None,
        created_at: created_at(),
    }]
}

/// Placeholder tours.
#[must_use]
pub fn mock_tours() -> Vec<Tour> {
    vec![Tour {
        id: Some(RecordId::Text(String::from("mock-tour-1"))),
        name: String::from("Campus Highlights"),
        description: String::from("A walk past the most visited buildings"),
        tour_type: String::from("self_guided"),
        estimated_duration: Some(30),
        is_active: true,
        total_stops: 2,
        created_at: created_at(),
    }]
}

/// Placeholder tour stops.
#[must_use]
pub fn mock_tour_stops() -> Vec<TourStop> {
    vec![
        TourStop {
            id: Some(RecordId::Text(String::from("mock-stop-1"))),
            tour_id: Some(RecordId::Text(String::from("mock-tour-1"))),
            building_id: Some(RecordId::Int(101)),
            room_id: None,
            stop_order: 1,
            title: String::from("Main Library"),
            description: String::new(),
            estimated_time: Some(10),
            created_at: created_at(),
        },
        TourStop {
            id: Some(RecordId::Text(String::from("mock-stop-2"))),
            tour_id: Some(RecordId::Text(String::from("mock-tour-1"))),
            building_id: Some(RecordId::Int(102)),
            room_id: None,
            stop_order: 2,
            title: String::from("Science Building"),
            description: String::new(),
            estimated_time: Some(15),
            created_at: created_at(),
        },
    ]
}

/// Placeholder QR codes.
#[must_use]
pub fn mock_qr_codes() -> Vec<QrCode> {
    vec![QrCode {
        id: Some(RecordId::Text(String::from("mock-qr-1"))),
        code: String::from("QR_1736931600000"),
        qr_url: String::from(
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=101",
        ),
        destination_type: String::from("building"),
        destination_id: Some(RecordId::Int(101)),
        title: String::from("Library Entrance"),
        description: String::new(),
        scan_count: 42,
        is_active: true,
        created_at: created_at(),
        last_scanned: None,
    }]
}

/// Placeholder overview statistics.
#[must_use]
pub const fn mock_stats() -> DashboardStats {
    DashboardStats {
        total_users: 2947,
        buildings_mapped: 24,
        content_items: 1452,
        tour_views: 18921,
    }
}

fn feed_item(
    id: i64,
    activity_type: &str,
    title: &str,
    description: &str,
    time: &str,
    user: &str,
) -> ActivityFeedItem {
    ActivityFeedItem {
        id: Some(RecordId::Int(id)),
        activity_type: activity_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        time: time.to_string(),
        user: user.to_string(),
        icon: crate::feed::activity_icon(activity_type).to_string(),
        color: crate::feed::activity_color(activity_type).to_string(),
    }
}

/// Placeholder activity feed.
#[must_use]
pub fn mock_activities() -> Vec<ActivityFeedItem> {
    vec![
        feed_item(
            1,
            "registration",
            "New User Registration",
            "15 users registered for virtual tours",
            "2 hours ago",
            "System",
        ),
        feed_item(
            2,
            "media_upload",
            "Media Upload Complete",
            "Added 8 photos to Science Building tour",
            "4 hours ago",
            "Admin",
        ),
        feed_item(
            3,
            "qr_generated",
            "QR Code Generated",
            "New QR Codes for Library entrance",
            "6 hours ago",
            "System",
        ),
        feed_item(
            4,
            "content_updated",
            "Building Content Updated",
            "Engineering Building tour content revised",
            "8 hours ago",
            "Admin",
        ),
    ]
}

fn notification(
    id: i64,
    notification_type: &str,
    title: &str,
    description: &str,
    time: &str,
    read: bool,
    priority: &str,
) -> NotificationItem {
    NotificationItem {
        id: Some(RecordId::Int(id)),
        notification_type: notification_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        time: time.to_string(),
        read,
        priority: priority.to_string(),
    }
}

/// Placeholder notifications.
#[must_use]
pub fn mock_notifications() -> Vec<NotificationItem> {
    vec![
        notification(
            1,
            "alert",
            "System Maintenance",
            "Scheduled maintenance tonight 2:00 AM - 4:00 AM",
            "1 hour ago",
            false,
            "high",
        ),
        notification(
            2,
            "info",
            "New Feature Available",
            "QR Code analytics dashboard is now live",
            "3 hours ago",
            false,
            "medium",
        ),
        notification(
            3,
            "success",
            "Backup Completed",
            "Daily data backup finished successfully",
            "5 hours ago",
            true,
            "low",
        ),
    ]
}
