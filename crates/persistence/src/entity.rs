// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-entity configuration.
//!
//! Each record type is described by a static [`EntityConfig`]; the generic
//! repository does the rest.

use crate::schema::LogicalTable;
use crate::schema::aliases::{
    ACTIVITY_ALIASES, BUILDING_ALIASES, CONTENT_ALIASES, NOTIFICATION_ALIASES, QR_CODE_ALIASES,
    ROOM_ALIASES, TOUR_ALIASES, TOUR_STOP_ALIASES, USER_ALIASES,
};
use crate::schema::FieldAlias;
use itouru_domain::{
    Activity, Building, ContentItem, Fields, Notification, QrCode, Room, Tour, TourStop, User,
    mock_buildings, mock_content, mock_qr_codes, mock_rooms, mock_tour_stops, mock_tours,
    mock_users,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;

/// Default ordering of a listing, by canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: &'static str,
    pub ascending: bool,
}

/// A client-generated integer primary key.
///
/// Some deployments declare the key without a default, so the client has to
/// pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurrogateKey {
    /// Physical column the key is written to.
    pub column: &'static str,
    pub min: u64,
    /// Number of distinct values, starting at `min`.
    pub span: u64,
}

impl SurrogateKey {
    /// Draws a key in `[min, min + span)`.
    #[must_use]
    pub fn generate(&self) -> i64 {
        let drawn: u64 = self.min + rand::random::<u64>() % self.span.max(1);
        i64::try_from(drawn).unwrap_or(i64::MAX)
    }
}

/// What a soft delete writes into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeleteValue {
    /// `DELETED_<unix millis>`.
    Sentinel,
    /// The literal `DELETED`.
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftDeleteField {
    /// Canonical field name.
    pub field: &'static str,
    pub value: SoftDeleteValue,
}

/// Static description of one entity.
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    /// Name used in logs and validation errors.
    pub name: &'static str,
    pub table: LogicalTable,
    /// Canonical physical primary-key column. Always tried first on delete.
    pub primary_key: &'static str,
    /// Keys consulted, in order, to pull an identifier out of a record.
    pub identifier_keys: &'static [&'static str],
    pub aliases: &'static [FieldAlias],
    /// Canonical fields that must be present on create.
    pub required: &'static [&'static str],
    pub order: Option<OrderSpec>,
    pub surrogate_key: Option<SurrogateKey>,
    /// Fields rewritten when a delete is blocked by a constraint. Empty means
    /// the entity is never soft-deleted.
    pub soft_delete: &'static [SoftDeleteField],
    /// Longest `...id` column name accepted during identifier discovery.
    pub id_column_max_len: usize,
    /// Fills in create-time defaults.
    pub prepare: fn(&mut Fields),
}

impl EntityConfig {
    /// Returns the alias of a canonical field.
    #[must_use]
    pub fn alias(&self, field: &str) -> Option<&'static FieldAlias> {
        self.aliases.iter().find(|alias| alias.field == field)
    }

    /// Returns the alias a caller-supplied key refers to.
    ///
    /// Canonical names win over physical spellings.
    #[must_use]
    pub fn alias_for_key(&self, key: &str) -> Option<&'static FieldAlias> {
        self.alias(key)
            .or_else(|| self.aliases.iter().find(|alias| alias.accepts(key)))
    }

    /// Returns whether `column` is a spelling of some field other than the
    /// record's own identifier, e.g. `college_id` on a building.
    #[must_use]
    pub fn is_reference_column(&self, column: &str) -> bool {
        self.aliases.iter().any(|alias| {
            alias.field != "id"
                && !alias.field.eq_ignore_ascii_case(self.primary_key)
                && alias.accepts(column)
        })
    }
}

/// A canonical record type backed by a logical table.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn config() -> &'static EntityConfig;

    /// Placeholder records served when no live data is available.
    fn mock_dataset() -> Vec<Self>;
}

fn default_field(fields: &mut Fields, key: &str, value: Value) {
    let missing: bool = match fields.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if missing {
        fields.insert(key.to_string(), value);
    }
}

fn now_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

const fn prepare_nothing(_: &mut Fields) {}

fn prepare_user(fields: &mut Fields) {
    default_field(fields, "middle_name", Value::from(""));
    default_field(fields, "phone_number", Value::from(""));
    default_field(fields, "college", Value::from(""));
    default_field(fields, "user_type", Value::from("visitor"));
}

fn prepare_building(fields: &mut Fields) {
    default_field(fields, "nickname", Value::from(""));
    default_field(fields, "address", Value::from(""));
    default_field(fields, "building_type", Value::from("Academic"));
}

fn prepare_room(fields: &mut Fields) {
    default_field(fields, "room_type", Value::from("Classroom"));
    default_field(fields, "floor_level", Value::from(1));
}

fn prepare_tour(fields: &mut Fields) {
    default_field(fields, "tour_type", Value::from("self_guided"));
    default_field(fields, "estimated_duration", Value::from(30));
    default_field(fields, "is_active", Value::Bool(true));
    default_field(fields, "total_stops", Value::from(0));
}

fn prepare_qr_code(fields: &mut Fields) {
    let destination: String = fields
        .get("destination_id")
        .map(crate::backend::scalar_text)
        .unwrap_or_default();

    default_field(fields, "code", Value::from(format!("QR_{}", now_millis())));
    default_field(
        fields,
        "qr_url",
        Value::from(format!(
            "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={destination}"
        )),
    );
    default_field(fields, "scan_count", Value::from(0));
    default_field(fields, "is_active", Value::Bool(true));
}

const CREATED_AT_DESC: Option<OrderSpec> = Some(OrderSpec {
    column: "created_at",
    ascending: false,
});

pub static USER: EntityConfig = EntityConfig {
    name: "user",
    table: LogicalTable::Users,
    primary_key: "user_id",
    identifier_keys: &["user_id", "id", "userId", "userid", "ID"],
    aliases: USER_ALIASES,
    required: &["email", "first_name", "last_name"],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 6,
    prepare: prepare_user,
};

pub static BUILDING: EntityConfig = EntityConfig {
    name: "building",
    table: LogicalTable::Buildings,
    primary_key: "building_id",
    identifier_keys: &["building_id", "id", "buildingId", "buildingid", "ID"],
    aliases: BUILDING_ALIASES,
    required: &["name", "address"],
    order: CREATED_AT_DESC,
    surrogate_key: Some(SurrogateKey {
        column: "building_id",
        min: 100,
        span: 10_000,
    }),
    soft_delete: &[
        SoftDeleteField {
            field: "name",
            value: SoftDeleteValue::Sentinel,
        },
        SoftDeleteField {
            field: "nickname",
            value: SoftDeleteValue::Sentinel,
        },
        SoftDeleteField {
            field: "building_type",
            value: SoftDeleteValue::Marker,
        },
    ],
    id_column_max_len: 10,
    prepare: prepare_building,
};

pub static ROOM: EntityConfig = EntityConfig {
    name: "room",
    table: LogicalTable::Rooms,
    primary_key: "room_id",
    identifier_keys: &["room_id", "id", "roomId", "roomid", "ID"],
    aliases: ROOM_ALIASES,
    required: &["building_id", "name", "room_number"],
    order: CREATED_AT_DESC,
    surrogate_key: Some(SurrogateKey {
        column: "room_id",
        min: 0,
        span: 1_000_000,
    }),
    soft_delete: &[],
    id_column_max_len: 10,
    prepare: prepare_room,
};

pub static CONTENT_ITEM: EntityConfig = EntityConfig {
    name: "content item",
    table: LogicalTable::ContentItems,
    primary_key: "id",
    identifier_keys: &["id", "content_id", "contentId", "ID"],
    aliases: CONTENT_ALIASES,
    required: &["title", "content_type", "file_url"],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 10,
    prepare: prepare_nothing,
};

pub static TOUR: EntityConfig = EntityConfig {
    name: "tour",
    table: LogicalTable::Tours,
    primary_key: "id",
    identifier_keys: &["id", "tour_id", "tourId", "ID"],
    aliases: TOUR_ALIASES,
    required: &["name", "description"],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 10,
    prepare: prepare_tour,
};

pub static TOUR_STOP: EntityConfig = EntityConfig {
    name: "tour stop",
    table: LogicalTable::TourStops,
    primary_key: "id",
    identifier_keys: &["id", "stop_id", "tour_stop_id", "ID"],
    aliases: TOUR_STOP_ALIASES,
    required: &["tour_id", "title", "stop_order"],
    order: Some(OrderSpec {
        column: "stop_order",
        ascending: true,
    }),
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 12,
    prepare: prepare_nothing,
};

pub static QR_CODE: EntityConfig = EntityConfig {
    name: "QR code",
    table: LogicalTable::QrCodes,
    primary_key: "id",
    identifier_keys: &["id", "qr_id", "qr_code_id", "ID"],
    aliases: QR_CODE_ALIASES,
    required: &["title", "destination_type", "destination_id"],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 10,
    prepare: prepare_qr_code,
};

pub static ACTIVITY: EntityConfig = EntityConfig {
    name: "activity",
    table: LogicalTable::Activities,
    primary_key: "id",
    identifier_keys: &["id", "activity_id", "ID"],
    aliases: ACTIVITY_ALIASES,
    required: &[],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 11,
    prepare: prepare_nothing,
};

pub static NOTIFICATION: EntityConfig = EntityConfig {
    name: "notification",
    table: LogicalTable::Notifications,
    primary_key: "id",
    identifier_keys: &["id", "notification_id", "ID"],
    aliases: NOTIFICATION_ALIASES,
    required: &[],
    order: CREATED_AT_DESC,
    surrogate_key: None,
    soft_delete: &[],
    id_column_max_len: 15,
    prepare: prepare_nothing,
};

impl Entity for User {
    fn config() -> &'static EntityConfig {
        &USER
    }

    fn mock_dataset() -> Vec<Self> {
        mock_users()
    }
}

impl Entity for Building {
    fn config() -> &'static EntityConfig {
        &BUILDING
    }

    fn mock_dataset() -> Vec<Self> {
        mock_buildings()
    }
}

impl Entity for Room {
    fn config() -> &'static EntityConfig {
        &ROOM
    }

    fn mock_dataset() -> Vec<Self> {
        mock_rooms()
    }
}

impl Entity for ContentItem {
    fn config() -> &'static EntityConfig {
        &CONTENT_ITEM
    }

    fn mock_dataset() -> Vec<Self> {
        mock_content()
    }
}

impl Entity for Tour {
    fn config() -> &'static EntityConfig {
        &TOUR
    }

    fn mock_dataset() -> Vec<Self> {
        mock_tours()
    }
}

impl Entity for TourStop {
    fn config() -> &'static EntityConfig {
        &TOUR_STOP
    }

    fn mock_dataset() -> Vec<Self> {
        mock_tour_stops()
    }
}

impl Entity for QrCode {
    fn config() -> &'static EntityConfig {
        &QR_CODE
    }

    fn mock_dataset() -> Vec<Self> {
        mock_qr_codes()
    }
}

// Feed mocks are served as display items by the dashboard, not as rows.
impl Entity for Activity {
    fn config() -> &'static EntityConfig {
        &ACTIVITY
    }

    fn mock_dataset() -> Vec<Self> {
        Vec::new()
    }
}

impl Entity for Notification {
    fn config() -> &'static EntityConfig {
        &NOTIFICATION
    }

    fn mock_dataset() -> Vec<Self> {
        Vec::new()
    }
}
