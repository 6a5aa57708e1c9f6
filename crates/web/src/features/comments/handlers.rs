use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::comment::{CommentFilter, CommentResponse, CreateCommentRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/fields/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Field ID"),
        CommentFilter
    ),
    responses(
        (status = 200, description = "Comments newest first", body = Vec<CommentResponse>),
        (status = 400, description = "Unknown category"),
        (status = 404, description = "Field not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(filter): Query<CommentFilter>,
) -> Result<Response, WebError> {
    let category = filter.category().map_err(WebError::BadRequest)?;

    let comments = services::list_comments(db.pool(), id, category).await?;

    let response: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/fields/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    request_body = CreateCommentRequest,
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 201, description = "Comment posted", body = CommentResponse),
        (status = 400, description = "Empty or oversized comment"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Field not found")
    ),
    tag = "comments"
)]
pub async fn post_comment(
    State(db): State<Database>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let comment =
        services::post_comment(db.pool(), id, &req, &user.user_id, &user.display_name()).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))).into_response())
}
