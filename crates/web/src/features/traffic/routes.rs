use axum::{Router, routing::get};

use super::handlers::{get_field_traffic, list_field_reports, submit_report};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:id/traffic", get(get_field_traffic))
        .route("/:id/reports", get(list_field_reports).post(submit_report))
}
