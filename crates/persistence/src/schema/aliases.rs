// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field alias tables.
//!
//! Each canonical field lists the physical spellings it may appear under,
//! in priority order. The canonical name always appears in its own list so
//! that normalizing a normalized row is a no-op.

use super::LogicalTable;
use serde_json::Value;

/// How a raw value is coerced during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    /// An integer or an opaque string key.
    Identifier,
    Timestamp,
    /// A list of strings.
    TextList,
    /// Any non-null value, unchanged.
    Json,
}

/// The value used when no candidate yields one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Null,
    EmptyText,
    Text(&'static str),
    Integer(i64),
    Boolean(bool),
    EmptyList,
}

impl FieldDefault {
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::EmptyText => Value::String(String::new()),
            Self::Text(text) => Value::String(text.to_string()),
            Self::Integer(n) => Value::from(n),
            Self::Boolean(b) => Value::Bool(b),
            Self::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// A canonical field and the physical names it may be stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    pub field: &'static str,
    pub candidates: &'static [&'static str],
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldAlias {
    /// Returns the first candidate present in `columns`.
    ///
    /// Exact matches are preferred; otherwise the first case-insensitive
    /// match is returned.
    #[must_use]
    pub fn physical_in<'a>(&self, columns: &'a [String]) -> Option<&'a str> {
        self.candidates
            .iter()
            .find_map(|candidate| columns.iter().find(|column| column == candidate))
            .or_else(|| {
                self.candidates.iter().find_map(|candidate| {
                    columns
                        .iter()
                        .find(|column| column.eq_ignore_ascii_case(candidate))
                })
            })
            .map(String::as_str)
    }

    /// The spelling written when no column was detected.
    #[must_use]
    pub fn primary_spelling(&self) -> &'static str {
        self.candidates.first().copied().unwrap_or(self.field)
    }

    /// Returns whether `key` is one of this field's spellings.
    #[must_use]
    pub fn accepts(&self, key: &str) -> bool {
        self.field == key || self.candidates.iter().any(|c| c.eq_ignore_ascii_case(key))
    }
}

const fn alias(
    field: &'static str,
    candidates: &'static [&'static str],
    kind: FieldKind,
    default: FieldDefault,
) -> FieldAlias {
    FieldAlias {
        field,
        candidates,
        kind,
        default,
    }
}

const fn text(field: &'static str, candidates: &'static [&'static str]) -> FieldAlias {
    alias(field, candidates, FieldKind::Text, FieldDefault::EmptyText)
}

const fn id(field: &'static str, candidates: &'static [&'static str]) -> FieldAlias {
    alias(field, candidates, FieldKind::Identifier, FieldDefault::Null)
}

const fn timestamp(field: &'static str, candidates: &'static [&'static str]) -> FieldAlias {
    alias(field, candidates, FieldKind::Timestamp, FieldDefault::Null)
}

const CREATED_AT: FieldAlias = timestamp("created_at", &["created_at", "Created_At", "createdAt"]);
const DESCRIPTION: FieldAlias = text("description", &["description", "Description"]);

pub const USER_ALIASES: &[FieldAlias] = &[
    id("id", &["user_id", "ID", "Id", "id"]),
    id("user_id", &["user_id", "ID", "Id"]),
    text("email", &["email", "Email", "EMAIL"]),
    text(
        "first_name",
        &["first_name", "First_Name", "FirstName", "firstname"],
    ),
    text(
        "middle_name",
        &["middle_name", "Middle_Name", "MiddleName", "middlename"],
    ),
    text("last_name", &["last_name", "Last_Name", "LastName", "lastname"]),
    alias(
        "user_type",
        &["user_type", "User_Type", "UserType", "usertype", "role"],
        FieldKind::Text,
        FieldDefault::Text("visitor"),
    ),
    text(
        "phone_number",
        &["phone_number", "Phone_Number", "phone", "Phone"],
    ),
    text("college", &["college", "College", "college_name"]),
    alias(
        "status",
        &["status", "Status"],
        FieldKind::Text,
        FieldDefault::Text("Active"),
    ),
    CREATED_AT,
    timestamp(
        "last_active",
        &["last_active", "Last_Active", "lastActive", "last_login"],
    ),
    alias(
        "profile_image",
        &["profile_image", "Profile_Image", "avatar_url"],
        FieldKind::Text,
        FieldDefault::Null,
    ),
];

pub const BUILDING_ALIASES: &[FieldAlias] = &[
    id("id", &["building_id", "id", "ID", "Id", "Building_ID"]),
    text("name", &["building_name", "name", "Name", "Building_Name"]),
    text(
        "nickname",
        &["building_nickname", "nickname", "Nickname", "Building_Nickname"],
    ),
    text(
        "building_type",
        &["building_type", "type", "Type", "Building_Type"],
    ),
    text("address", &["address", "Address", "building_address"]),
    text(
        "description",
        &["description", "Description", "building_description"],
    ),
    id("college_id", &["college_id", "College_ID", "collegeId"]),
    CREATED_AT,
];

pub const ROOM_ALIASES: &[FieldAlias] = &[
    id("id", &["room_id", "id", "ID", "Id", "Room_ID"]),
    id("building_id", &["building_id", "Building_ID", "buildingId"]),
    text("name", &["room_name", "name", "Name", "Room_Name"]),
    text(
        "room_number",
        &["room_number", "Room_Number", "roomNumber", "number"],
    ),
    text("room_type", &["room_type", "Room_Type", "type", "Type"]),
    alias(
        "floor_level",
        &["floor_level", "Floor_Level", "floor", "Floor"],
        FieldKind::Integer,
        FieldDefault::Null,
    ),
    alias(
        "capacity",
        &["capacity", "Capacity"],
        FieldKind::Integer,
        FieldDefault::Null,
    ),
    DESCRIPTION,
    CREATED_AT,
];

pub const CONTENT_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "content_id", "ID", "Content_ID"]),
    text("title", &["title", "Title", "name", "file_name", "filename"]),
    DESCRIPTION,
    text(
        "content_type",
        &["content_type", "Content_Type", "type", "Type", "file_type"],
    ),
    text("file_url", &["file_url", "File_URL", "url", "URL", "public_url"]),
    text(
        "thumbnail_url",
        &["thumbnail_url", "Thumbnail_URL", "thumbnail"],
    ),
    alias(
        "file_size",
        &["file_size", "File_Size", "size", "Size"],
        FieldKind::Integer,
        FieldDefault::Integer(0),
    ),
    alias(
        "tags",
        &["tags", "Tags"],
        FieldKind::TextList,
        FieldDefault::EmptyList,
    ),
    id("building_id", &["building_id", "Building_ID"]),
    id("room_id", &["room_id", "Room_ID"]),
    CREATED_AT,
];

pub const TOUR_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "tour_id", "ID", "Tour_ID"]),
    text("name", &["name", "tour_name", "Name", "Tour_Name", "title"]),
    DESCRIPTION,
    text("tour_type", &["tour_type", "Tour_Type", "type"]),
    alias(
        "estimated_duration",
        &["estimated_duration", "Estimated_Duration", "duration"],
        FieldKind::Integer,
        FieldDefault::Null,
    ),
    alias(
        "is_active",
        &["is_active", "Is_Active", "active"],
        FieldKind::Boolean,
        FieldDefault::Boolean(true),
    ),
    alias(
        "total_stops",
        &["total_stops", "Total_Stops", "stops_count"],
        FieldKind::Integer,
        FieldDefault::Integer(0),
    ),
    CREATED_AT,
];

pub const TOUR_STOP_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "stop_id", "tour_stop_id", "ID"]),
    id("tour_id", &["tour_id", "Tour_ID", "tourId"]),
    id("building_id", &["building_id", "Building_ID"]),
    id("room_id", &["room_id", "Room_ID"]),
    alias(
        "stop_order",
        &["stop_order", "Stop_Order", "order", "position"],
        FieldKind::Integer,
        FieldDefault::Integer(0),
    ),
    text("title", &["title", "Title", "name"]),
    DESCRIPTION,
    alias(
        "estimated_time",
        &["estimated_time", "Estimated_Time", "duration"],
        FieldKind::Integer,
        FieldDefault::Null,
    ),
    CREATED_AT,
];

pub const QR_CODE_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "qr_id", "qr_code_id", "ID"]),
    text("code", &["code", "Code", "qr_code"]),
    text("qr_url", &["qr_url", "QR_URL", "qr_image_url", "image_url"]),
    text(
        "destination_type",
        &["destination_type", "Destination_Type", "target_type"],
    ),
    id(
        "destination_id",
        &["destination_id", "Destination_ID", "target_id"],
    ),
    text("title", &["title", "Title", "name"]),
    DESCRIPTION,
    alias(
        "scan_count",
        &["scan_count", "Scan_Count", "scans"],
        FieldKind::Integer,
        FieldDefault::Integer(0),
    ),
    alias(
        "is_active",
        &["is_active", "Is_Active", "active"],
        FieldKind::Boolean,
        FieldDefault::Boolean(true),
    ),
    CREATED_AT,
    timestamp(
        "last_scanned",
        &["last_scanned", "Last_Scanned", "last_scanned_at"],
    ),
];

pub const ACTIVITY_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "activity_id", "ID"]),
    text(
        "activity_type",
        &["activity_type", "type", "Type", "action"],
    ),
    text("title", &["title", "Title"]),
    DESCRIPTION,
    id("user_id", &["user_id", "User_ID"]),
    text("user_name", &["user_name", "User_Name", "actor"]),
    CREATED_AT,
];

pub const NOTIFICATION_ALIASES: &[FieldAlias] = &[
    id("id", &["id", "notification_id", "ID"]),
    alias(
        "type",
        &["type", "notification_type", "Type"],
        FieldKind::Text,
        FieldDefault::Text("info"),
    ),
    text("title", &["title", "Title"]),
    DESCRIPTION,
    alias(
        "priority",
        &["priority", "Priority"],
        FieldKind::Text,
        FieldDefault::Text("medium"),
    ),
    alias(
        "is_read",
        &["is_read", "Is_Read", "read"],
        FieldKind::Boolean,
        FieldDefault::Boolean(false),
    ),
    id("user_id", &["user_id", "User_ID"]),
    CREATED_AT,
    timestamp("read_at", &["read_at", "Read_At"]),
];

/// Returns the alias table used to detect columns on `logical`'s table.
#[must_use]
pub const fn aliases_for(logical: LogicalTable) -> &'static [FieldAlias] {
    match logical {
        LogicalTable::Users => USER_ALIASES,
        LogicalTable::Buildings => BUILDING_ALIASES,
        LogicalTable::Rooms => ROOM_ALIASES,
        LogicalTable::ContentItems => CONTENT_ALIASES,
        LogicalTable::Tours => TOUR_ALIASES,
        LogicalTable::TourStops => TOUR_STOP_ALIASES,
        LogicalTable::QrCodes => QR_CODE_ALIASES,
        LogicalTable::Activities => ACTIVITY_ALIASES,
        LogicalTable::Notifications => NOTIFICATION_ALIASES,
        LogicalTable::TourVisits => &[],
    }
}
