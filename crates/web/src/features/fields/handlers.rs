use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        field::{
            CreateFieldRequest, FieldDetailResponse, FieldListEntry, FieldMarker, FieldResponse,
            NearbyFieldEntry, NearbyQuery, UpdateFieldRequest,
        },
    },
    models::Coordinates,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::TrafficSettings;

use super::services;

#[utoipa::path(
    get,
    path = "/api/fields",
    params(PaginationParams),
    responses(
        (status = 200, description = "Fields ordered by name with their traffic badge", body = PaginatedResponse<FieldListEntry>),
        (status = 400, description = "Invalid pagination"),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "fields"
)]
pub async fn list_fields(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let page = services::list_fields(db.pool(), &params, settings.window)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(page).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fields/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Fields nearest first", body = Vec<NearbyFieldEntry>),
        (status = 400, description = "Invalid coordinates or limit"),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "fields"
)]
pub async fn nearby_fields(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    Query(query): Query<NearbyQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let origin = Coordinates::new(query.lat, query.lng).map_err(WebError::BadRequest)?;
    let limit = query
        .limit
        .map(|l| l as usize)
        .unwrap_or(settings.nearby_limit);

    let fields = services::nearby_fields(db.pool(), origin, limit, settings.window)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(fields).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fields/markers",
    responses(
        (status = 200, description = "Map markers for fields with coordinates", body = Vec<FieldMarker>),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "fields"
)]
pub async fn field_markers(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
) -> Result<Response, WebError> {
    let markers = services::field_markers(db.pool(), settings.window)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(markers).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fields/{id}",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Field found", body = FieldResponse),
        (status = 404, description = "Field not found")
    ),
    tag = "fields"
)]
pub async fn get_field(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let field = services::get_field(db.pool(), id).await?;

    Ok(Json(FieldResponse::from(field)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fields/{id}/detailed",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Field with consensus, history, comments and nearby fields", body = FieldDetailResponse),
        (status = 404, description = "Field not found"),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "fields"
)]
pub async fn get_field_detailed(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_field_detailed(db.pool(), id, settings)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/fields",
    request_body = CreateFieldRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 201, description = "Field created successfully", body = FieldResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin")
    ),
    tag = "admin"
)]
pub async fn create_field(
    State(db): State<Database>,
    user: CurrentUser,
    Json(req): Json<CreateFieldRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let field = services::create_field(db.pool(), &req, &user.email).await?;

    Ok((StatusCode::CREATED, Json(FieldResponse::from(field))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/fields/{id}",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    request_body = UpdateFieldRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "Field updated successfully", body = FieldResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Field not found")
    ),
    tag = "admin"
)]
pub async fn update_field(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateFieldRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_field(db.pool(), id, &update_req).await?;

    Ok(Json(FieldResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/fields/{id}",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 204, description = "Field and its reports deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Field not found")
    ),
    tag = "admin"
)]
pub async fn delete_field(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_field(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
