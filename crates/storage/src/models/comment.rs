use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FieldComment {
    pub comment_id: Uuid,
    pub field_id: Uuid,
    pub body: String,
    pub category: String,
    pub user_id: String,
    pub user_name: String,
    pub submitted_at: NaiveDateTime,
}
