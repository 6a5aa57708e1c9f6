use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A physical soccer field.
///
/// `current_traffic` is a denormalized hint written after each report; the
/// authoritative crowd level is always recomputed from `traffic_reports`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Field {
    pub field_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub surface: String,
    pub amenities: Vec<String>,
    pub current_traffic: String,
    pub traffic_updated_at: Option<NaiveDateTime>,
    pub suggestion_id: Option<Uuid>,
    pub added_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Field {
    /// Returns the field position when both coordinates are recorded
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err("latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err("longitude must be between -180 and 180".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}
