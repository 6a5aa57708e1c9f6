use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::account::{UserActivityResponse, UserProfileResponse},
};

use crate::error::WebError;
use crate::middleware::auth::{AdminPolicy, CurrentUser};

use super::services;

#[utoipa::path(
    get,
    path = "/api/me",
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "Signed-in user", body = UserProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "account"
)]
pub async fn get_profile(
    State(admins): State<AdminPolicy>,
    user: CurrentUser,
) -> Result<Response, WebError> {
    Ok(Json(services::profile(&user, &admins)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/me/activity",
    security(
        ("gateway_identity" = [])
    ),
    responses(
        (status = 200, description = "The user's totals, favorite fields and latest posts", body = UserActivityResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "account"
)]
pub async fn get_activity(
    State(db): State<Database>,
    user: CurrentUser,
) -> Result<Response, WebError> {
    let activity = services::recent_activity(db.pool(), &user.user_id)
        .await
        .map_err(WebError::traffic_read)?;

    Ok(Json(activity).into_response())
}
