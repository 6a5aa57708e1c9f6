use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        field::FieldResponse,
        suggestion::{CreateSuggestionRequest, SuggestionApprovalResponse, SuggestionResponse},
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/suggestions",
    request_body = CreateSuggestionRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 201, description = "Suggestion queued for review", body = SuggestionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "suggestions"
)]
pub async fn create_suggestion(
    State(db): State<Database>,
    user: CurrentUser,
    Json(req): Json<CreateSuggestionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let suggestion =
        services::create_suggestion(db.pool(), &req, &user.user_id, &user.email).await?;

    Ok((StatusCode::CREATED, Json(SuggestionResponse::from(suggestion))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/suggestions",
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "Pending suggestions first, newest first", body = Vec<SuggestionResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin")
    ),
    tag = "admin"
)]
pub async fn list_suggestions(State(db): State<Database>) -> Result<Response, WebError> {
    let suggestions = services::list_for_review(db.pool()).await?;

    let response: Vec<SuggestionResponse> = suggestions
        .into_iter()
        .map(SuggestionResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/suggestions/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "Field created from the suggestion", body = SuggestionApprovalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Suggestion not found"),
        (status = 409, description = "Suggestion already processed")
    ),
    tag = "admin"
)]
pub async fn approve_suggestion(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (suggestion, field) = services::approve_suggestion(db.pool(), id, &user.email).await?;

    Ok(Json(SuggestionApprovalResponse {
        suggestion: SuggestionResponse::from(suggestion),
        field: FieldResponse::from(field),
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/suggestions/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "Suggestion rejected", body = SuggestionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Suggestion not found"),
        (status = 409, description = "Suggestion already processed")
    ),
    tag = "admin"
)]
pub async fn reject_suggestion(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let suggestion = services::reject_suggestion(db.pool(), id, &user.email).await?;

    Ok(Json(SuggestionResponse::from(suggestion)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/admin/suggestions/{id}",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 204, description = "Suggestion deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "admin"
)]
pub async fn delete_suggestion(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_suggestion(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
