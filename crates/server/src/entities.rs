// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CRUD and export routes under `/api/{entity}`.

use crate::{AppState, HttpError};
use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use itouru_api::{ApiError, CsvExport, Dashboard, export_csv};
use itouru_domain::{Building, ContentItem, Fields, QrCode, RecordId, Room, Tour, TourStop, User};
use itouru_persistence::{DeleteTarget, Entity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// The entities exposed over HTTP, by path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Users,
    Buildings,
    Rooms,
    Content,
    Tours,
    TourStops,
    QrCodes,
}

impl EntityKind {
    fn parse(segment: &str) -> Result<Self, HttpError> {
        match segment {
            "users" => Ok(Self::Users),
            "buildings" => Ok(Self::Buildings),
            "rooms" => Ok(Self::Rooms),
            "content" => Ok(Self::Content),
            "tours" => Ok(Self::Tours),
            "tour-stops" => Ok(Self::TourStops),
            "qr-codes" => Ok(Self::QrCodes),
            other => Err(HttpError::not_found(format!("Unknown entity '{other}'"))),
        }
    }
}

/// Query parameters for filtered listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Restricts rooms to one building.
    building_id: Option<String>,
    /// Restricts tour stops to one tour.
    tour_id: Option<String>,
}

/// Response for create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse<T> {
    success: bool,
    /// The stored record; `None` in demo mode.
    record: Option<T>,
}

/// Response for delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    deleted: bool,
}

fn into_fields(body: Value) -> Result<Fields, HttpError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::InvalidInput {
            field: String::from("body"),
            message: String::from("expected a JSON object"),
        }
        .into()),
    }
}

fn listing<T: Serialize>(records: Vec<T>) -> Response {
    Json(records).into_response()
}

/// Handler for GET `/api/{entity}`.
///
/// Listings never fail; demo mode and backend errors serve placeholder
/// data. Soft-deleted buildings are hidden.
pub async fn handle_list(
    AxumState(app_state): AxumState<AppState>,
    Path(entity): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, HttpError> {
    let kind: EntityKind = EntityKind::parse(&entity)?;
    info!(entity = %entity, "Handling list request");

    let dashboard: &Dashboard = &app_state.dashboard;
    let response: Response = match kind {
        EntityKind::Users => listing(dashboard.list::<User>().await),
        EntityKind::Buildings => listing(dashboard.visible_buildings().await),
        EntityKind::Rooms => match query.building_id.as_deref() {
            Some(building) => {
                listing(dashboard.rooms_in_building(&RecordId::parse(building)).await)
            }
            None => listing(dashboard.list::<Room>().await),
        },
        EntityKind::Content => listing(dashboard.content().await),
        EntityKind::Tours => listing(dashboard.list::<Tour>().await),
        EntityKind::TourStops => match query.tour_id.as_deref() {
            Some(tour) => listing(dashboard.tour_stops(&RecordId::parse(tour)).await),
            None => listing(dashboard.list::<TourStop>().await),
        },
        EntityKind::QrCodes => listing(dashboard.list::<QrCode>().await),
    };
    Ok(response)
}

async fn create<T: Entity>(dashboard: &Dashboard, fields: Fields) -> Result<Response, HttpError> {
    let record: Option<T> = dashboard.create::<T>(fields).await?;
    Ok(created(record))
}

fn created<T: Serialize>(record: Option<T>) -> Response {
    (
        StatusCode::CREATED,
        Json(WriteResponse {
            success: true,
            record,
        }),
    )
        .into_response()
}

/// Handler for POST `/api/{entity}`.
///
/// New users are checked for duplicate emails and names against the
/// current user list first.
pub async fn handle_create(
    AxumState(app_state): AxumState<AppState>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, HttpError> {
    let kind: EntityKind = EntityKind::parse(&entity)?;
    let fields: Fields = into_fields(body)?;
    info!(entity = %entity, "Handling create request");

    let dashboard: &Dashboard = &app_state.dashboard;
    match kind {
        EntityKind::Users => {
            let existing: Vec<User> = dashboard.list::<User>().await;
            let record: Option<User> = dashboard.create_user(fields, &existing).await?;
            Ok(created(record))
        }
        EntityKind::Buildings => create::<Building>(dashboard, fields).await,
        EntityKind::Rooms => create::<Room>(dashboard, fields).await,
        EntityKind::Content => create::<ContentItem>(dashboard, fields).await,
        EntityKind::Tours => create::<Tour>(dashboard, fields).await,
        EntityKind::TourStops => create::<TourStop>(dashboard, fields).await,
        EntityKind::QrCodes => create::<QrCode>(dashboard, fields).await,
    }
}

async fn update<T: Entity>(
    dashboard: &Dashboard,
    id: &RecordId,
    fields: Fields,
) -> Result<Response, HttpError> {
    let record: Option<T> = dashboard.update::<T>(id, fields).await?;
    if record.is_none() && dashboard.is_configured() {
        return Err(HttpError::not_found(format!(
            "No {} with id {id}",
            T::config().name
        )));
    }

    Ok(Json(WriteResponse {
        success: true,
        record,
    })
    .into_response())
}

/// Handler for PATCH `/api/{entity}/{id}`.
pub async fn handle_update(
    AxumState(app_state): AxumState<AppState>,
    Path((entity, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Response, HttpError> {
    let kind: EntityKind = EntityKind::parse(&entity)?;
    let fields: Fields = into_fields(body)?;
    let id: RecordId = RecordId::parse(&id);
    info!(entity = %entity, id = %id, "Handling update request");

    let dashboard: &Dashboard = &app_state.dashboard;
    match kind {
        EntityKind::Users => update::<User>(dashboard, &id, fields).await,
        EntityKind::Buildings => update::<Building>(dashboard, &id, fields).await,
        EntityKind::Rooms => update::<Room>(dashboard, &id, fields).await,
        EntityKind::Content => update::<ContentItem>(dashboard, &id, fields).await,
        EntityKind::Tours => update::<Tour>(dashboard, &id, fields).await,
        EntityKind::TourStops => update::<TourStop>(dashboard, &id, fields).await,
        EntityKind::QrCodes => update::<QrCode>(dashboard, &id, fields).await,
    }
}

/// Handler for DELETE `/api/{entity}/{id}`.
///
/// Reports only whether the record is gone; the reason for a failure is
/// logged by the dashboard.
pub async fn handle_delete(
    AxumState(app_state): AxumState<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, HttpError> {
    let kind: EntityKind = EntityKind::parse(&entity)?;
    let target: DeleteTarget = DeleteTarget::Id(RecordId::parse(&id));
    info!(entity = %entity, id = %id, "Handling delete request");

    let dashboard: &Dashboard = &app_state.dashboard;
    let deleted: bool = match kind {
        EntityKind::Users => dashboard.delete::<User>(&target).await,
        EntityKind::Buildings => dashboard.delete::<Building>(&target).await,
        EntityKind::Rooms => dashboard.delete::<Room>(&target).await,
        EntityKind::Content => dashboard.delete::<ContentItem>(&target).await,
        EntityKind::Tours => dashboard.delete::<Tour>(&target).await,
        EntityKind::TourStops => dashboard.delete::<TourStop>(&target).await,
        EntityKind::QrCodes => dashboard.delete::<QrCode>(&target).await,
    };
    Ok(Json(DeleteResponse { deleted }))
}

fn csv_download<T: CsvExport>(records: &[T]) -> Result<Response, HttpError> {
    let body: String = export_csv(records).map_err(ApiError::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", T::FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

/// Handler for GET `/api/{entity}/export.csv`.
pub async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    Path(entity): Path<String>,
) -> Result<Response, HttpError> {
    let kind: EntityKind = EntityKind::parse(&entity)?;
    info!(entity = %entity, "Handling export request");

    let dashboard: &Dashboard = &app_state.dashboard;
    match kind {
        EntityKind::Users => csv_download(&dashboard.list::<User>().await),
        EntityKind::Buildings => csv_download(&dashboard.visible_buildings().await),
        EntityKind::Rooms => csv_download(&dashboard.list::<Room>().await),
        EntityKind::Content => csv_download(&dashboard.content().await),
        EntityKind::Tours => csv_download(&dashboard.list::<Tour>().await),
        EntityKind::QrCodes => csv_download(&dashboard.list::<QrCode>().await),
        EntityKind::TourStops => Err(HttpError {
            status: StatusCode::NOT_FOUND,
            message: String::from("Tour stops cannot be exported"),
        }),
    }
}
