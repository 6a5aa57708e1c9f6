use axum::{Router, routing::get};

use super::handlers::{list_comments, post_comment};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:id/comments", get(list_comments).post(post_comment))
}
