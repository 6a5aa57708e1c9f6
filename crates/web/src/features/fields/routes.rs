use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    create_field, delete_field, field_markers, get_field, get_field_detailed, list_fields,
    nearby_fields, update_field,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fields))
        .route("/nearby", get(nearby_fields))
        .route("/markers", get(field_markers))
        .route("/:id", get(get_field))
        .route("/:id/detailed", get(get_field_detailed))
}

/// Curation endpoints; the caller wraps these in the admin guard
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_field))
        .route("/:id", put(update_field).delete(delete_field))
}
