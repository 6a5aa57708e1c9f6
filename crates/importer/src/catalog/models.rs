use serde::{Deserialize, Serialize};
use storage::dto::field::CreateFieldRequest;

pub const FORMAT_VERSION: &str = "1.0.0";

/// A curated list of fields, as stored in import files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub format_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default = "default_surface")]
    pub surface: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn default_surface() -> String {
    "grass".to_string()
}

impl From<&FieldEntry> for CreateFieldRequest {
    fn from(entry: &FieldEntry) -> Self {
        Self {
            name: entry.name.trim().to_string(),
            address: entry.address.trim().to_string(),
            latitude: entry.latitude,
            longitude: entry.longitude,
            surface: Some(entry.surface.trim().to_string()).filter(|s| !s.is_empty()),
            amenities: entry.amenities.clone(),
        }
    }
}
