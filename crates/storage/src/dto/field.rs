use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::comment::CommentResponse;
use super::traffic::{ConsensusResponse, TrafficReportResponse};
use crate::models::{ConsensusLevel, Field, MarkerColor};
use crate::services::consensus::CacheStatus;

pub const MAX_NEARBY_LIMIT: u32 = 50;

/// Response containing the stored field record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldResponse {
    pub field_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub surface: String,
    pub amenities: Vec<String>,
    /// Denormalized hint, may trail the computed consensus
    pub current_traffic: String,
    pub traffic_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<Field> for FieldResponse {
    fn from(field: Field) -> Self {
        Self {
            field_id: field.field_id,
            name: field.name,
            address: field.address,
            latitude: field.latitude,
            longitude: field.longitude,
            surface: field.surface,
            amenities: field.amenities,
            current_traffic: field.current_traffic,
            traffic_updated_at: field.traffic_updated_at,
            created_at: field.created_at,
        }
    }
}

/// Compact consensus shown next to a field in lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrafficBadge {
    pub level: ConsensusLevel,
    pub marker_color: MarkerColor,
    pub confidence: u8,
    pub report_count: usize,
    pub last_updated: Option<NaiveDateTime>,
}

impl From<&ConsensusResponse> for TrafficBadge {
    fn from(consensus: &ConsensusResponse) -> Self {
        Self {
            level: consensus.level,
            marker_color: consensus.marker_color,
            confidence: consensus.confidence,
            report_count: consensus.report_count,
            last_updated: consensus.last_updated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldListEntry {
    #[serde(flatten)]
    pub field: FieldResponse,
    pub traffic: TrafficBadge,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NearbyFieldEntry {
    #[serde(flatten)]
    pub field: FieldResponse,
    /// `None` when the field has no recorded coordinates
    pub distance_miles: Option<f64>,
    pub traffic: TrafficBadge,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldMarker {
    pub field_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub level: ConsensusLevel,
    pub marker_color: MarkerColor,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldDetailResponse {
    pub field: FieldResponse,
    pub traffic: ConsensusResponse,
    pub cache_status: CacheStatus,
    pub recent_reports: Vec<TrafficReportResponse>,
    pub recent_comments: Vec<CommentResponse>,
    pub nearby: Vec<NearbyFieldEntry>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub limit: Option<u32>,
}

impl NearbyQuery {
    pub fn validate(&self) -> Result<(), String> {
        crate::models::Coordinates::new(self.lat, self.lng)?;

        if let Some(limit) = self.limit
            && (limit < 1 || limit > MAX_NEARBY_LIMIT)
        {
            return Err(format!("limit must be between 1 and {}", MAX_NEARBY_LIMIT));
        }

        Ok(())
    }
}

/// Request payload for adding a field directly (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_coordinates"))]
pub struct CreateFieldRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Address must be between 1 and 500 characters"
    ))]
    pub address: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub surface: Option<String>,

    #[serde(default)]
    pub amenities: Vec<String>,
}

/// Request payload for editing a field (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_coordinates"))]
pub struct UpdateFieldRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub surface: Option<String>,

    pub amenities: Option<Vec<String>>,
}

fn coordinates_pair(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), ValidationError> {
    if latitude.is_some() != longitude.is_some() {
        let mut error = ValidationError::new("coordinates_pair");
        error.message = Some("latitude and longitude must be provided together".into());
        return Err(error);
    }
    Ok(())
}

fn validate_create_coordinates(req: &CreateFieldRequest) -> Result<(), ValidationError> {
    coordinates_pair(req.latitude, req.longitude)
}

fn validate_update_coordinates(req: &UpdateFieldRequest) -> Result<(), ValidationError> {
    coordinates_pair(req.latitude, req.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateFieldRequest {
        CreateFieldRequest {
            name: "Nomahegan Park".to_string(),
            address: "1024 Springfield Ave, Cranford, NJ".to_string(),
            latitude: Some(40.6658),
            longitude: Some(-74.3050),
            surface: Some("grass".to_string()),
            amenities: vec!["parking".to_string()],
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_half_coordinates() {
        let mut req = create_request();
        req.longitude = None;
        assert!(req.validate().is_err());

        req.latitude = None;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_out_of_range() {
        let mut req = create_request();
        req.latitude = Some(123.0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_requires_name() {
        let mut req = create_request();
        req.name = String::new();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_nearby_query_validation() {
        let query = NearbyQuery {
            lat: 40.7,
            lng: -74.0,
            limit: Some(10),
        };
        assert!(query.validate().is_ok());

        let query = NearbyQuery {
            lat: 40.7,
            lng: -200.0,
            limit: None,
        };
        assert!(query.validate().is_err());

        let query = NearbyQuery {
            lat: 40.7,
            lng: -74.0,
            limit: Some(0),
        };
        assert!(query.validate().is_err());
    }
}
