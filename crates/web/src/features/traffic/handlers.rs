use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::traffic::{
        ConsensusResponse, ReportsQuery, SubmitReportRequest, SubmitReportResponse,
        TrafficReportResponse, WindowQuery,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::TrafficSettings;

use super::services;

#[utoipa::path(
    get,
    path = "/api/fields/{id}/traffic",
    params(
        ("id" = Uuid, Path, description = "Field ID"),
        WindowQuery
    ),
    responses(
        (status = 200, description = "Consensus over the most recent reports", body = ConsensusResponse),
        (status = 400, description = "Invalid window"),
        (status = 404, description = "Field not found"),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "traffic"
)]
pub async fn get_field_traffic(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    Path(id): Path<Uuid>,
    Query(query): Query<WindowQuery>,
) -> Result<Response, WebError> {
    let window = query.resolve(settings.window).map_err(WebError::BadRequest)?;

    let consensus = services::field_traffic(db.pool(), id, window)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(consensus).into_response())
}

#[utoipa::path(
    get,
    path = "/api/fields/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Field ID"),
        ReportsQuery
    ),
    responses(
        (status = 200, description = "Reports newest first", body = Vec<TrafficReportResponse>),
        (status = 400, description = "Invalid limit"),
        (status = 404, description = "Field not found"),
        (status = 503, description = "Traffic data unavailable")
    ),
    tag = "traffic"
)]
pub async fn list_field_reports(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportsQuery>,
) -> Result<Response, WebError> {
    let limit = query
        .resolve(settings.window.size())
        .map_err(WebError::BadRequest)?;

    let reports = services::field_reports(db.pool(), id, limit)
        .await
        .map_err(WebError::traffic_read)?;

    let response: Vec<TrafficReportResponse> = reports
        .into_iter()
        .map(TrafficReportResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/fields/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    request_body = SubmitReportRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 201, description = "Report stored, consensus refreshed", body = SubmitReportResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Field not found")
    ),
    tag = "traffic"
)]
pub async fn submit_report(
    State(db): State<Database>,
    State(settings): State<TrafficSettings>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitReportRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let level = req
        .traffic_level()
        .ok_or_else(|| WebError::BadRequest("Unknown traffic level".to_string()))?;
    let comment = req.trimmed_comment();

    let response = services::submit_report(
        db.pool(),
        id,
        level,
        comment.as_deref(),
        &user.user_id,
        settings.window,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}
