use axum::{
    Router,
    routing::{delete, get, post},
};

use super::handlers::{
    approve_suggestion, create_suggestion, delete_suggestion, list_suggestions, reject_suggestion,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_suggestion))
}

/// Review queue; the caller wraps these in the admin guard
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suggestions))
        .route("/:id", delete(delete_suggestion))
        .route("/:id/approve", post(approve_suggestion))
        .route("/:id/reject", post(reject_suggestion))
}
