use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::common::normalize_tags;
use crate::dto::field::{CreateFieldRequest, UpdateFieldRequest};
use crate::error::{Result, StorageError};
use crate::models::{ConsensusLevel, Field, FieldSuggestion};

const FIELD_COLUMNS: &str = r#"
    field_id, name, address, latitude, longitude, surface, amenities,
    current_traffic, traffic_updated_at, suggestion_id, added_by, created_at
"#;

const DEFAULT_SURFACE: &str = "grass";

pub struct FieldRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FieldRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all fields alphabetically
    pub async fn list(&self) -> Result<Vec<Field>> {
        let fields = sqlx::query_as::<_, Field>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields ORDER BY name, field_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(fields)
    }

    /// One page of fields plus the total count
    pub async fn list_page(&self, offset: i64, limit: i64) -> Result<(Vec<Field>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields")
            .fetch_one(self.pool)
            .await?;

        let fields = sqlx::query_as::<_, Field>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields ORDER BY name, field_id OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok((fields, total))
    }

    /// Fields that can be placed on a map
    pub async fn list_located(&self) -> Result<Vec<Field>> {
        let fields = sqlx::query_as::<_, Field>(&format!(
            r#"
            SELECT {FIELD_COLUMNS} FROM fields
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
            ORDER BY name, field_id
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(fields)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Field> {
        sqlx::query_as::<_, Field>(&format!(
            "SELECT {FIELD_COLUMNS} FROM fields WHERE field_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Case-insensitive lookup used to skip duplicates on bulk import
    pub async fn exists_by_name_and_address(&self, name: &str, address: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM fields
                WHERE LOWER(name) = LOWER($1) AND LOWER(address) = LOWER($2)
            )
            "#,
        )
        .bind(name.trim())
        .bind(address.trim())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn create(&self, req: &CreateFieldRequest, added_by: Option<&str>) -> Result<Field> {
        let field = sqlx::query_as::<_, Field>(&format!(
            r#"
            INSERT INTO fields (name, address, latitude, longitude, surface, amenities, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(req.address.trim())
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(req.surface.as_deref().map(str::trim).unwrap_or(DEFAULT_SURFACE))
        .bind(normalize_tags(&req.amenities))
        .bind(added_by)
        .fetch_one(self.pool)
        .await?;

        Ok(field)
    }

    /// Creates the field for an approved suggestion inside the caller's transaction
    pub async fn create_from_suggestion(
        tx: &mut Transaction<'_, Postgres>,
        suggestion: &FieldSuggestion,
        approved_by: &str,
    ) -> Result<Field> {
        let surface = if suggestion.surface.trim().is_empty() {
            DEFAULT_SURFACE
        } else {
            suggestion.surface.as_str()
        };

        let field = sqlx::query_as::<_, Field>(&format!(
            r#"
            INSERT INTO fields (name, address, surface, amenities, suggestion_id, added_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(&suggestion.name)
        .bind(&suggestion.address)
        .bind(surface)
        .bind(&suggestion.amenities)
        .bind(suggestion.suggestion_id)
        .bind(approved_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(field)
    }

    pub async fn update(&self, id: Uuid, existing: &Field, req: &UpdateFieldRequest) -> Result<Field> {
        let name = req.name.as_deref().unwrap_or(&existing.name).trim();
        let address = req.address.as_deref().unwrap_or(&existing.address).trim();
        let surface = req.surface.as_deref().unwrap_or(&existing.surface).trim();
        let (latitude, longitude) = match (req.latitude, req.longitude) {
            (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
            _ => (existing.latitude, existing.longitude),
        };
        let amenities = req
            .amenities
            .as_ref()
            .map(|a| normalize_tags(a))
            .unwrap_or_else(|| existing.amenities.clone());

        sqlx::query_as::<_, Field>(&format!(
            r#"
            UPDATE fields
            SET name = $2,
                address = $3,
                latitude = $4,
                longitude = $5,
                surface = $6,
                amenities = $7
            WHERE field_id = $1
            RETURNING {FIELD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(surface)
        .bind(amenities)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Refresh the denormalized traffic hint
    pub async fn update_traffic_cache(&self, id: Uuid, level: ConsensusLevel) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE fields
            SET current_traffic = $1, traffic_updated_at = CURRENT_TIMESTAMP
            WHERE field_id = $2
            "#,
        )
        .bind(level.as_str())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM fields WHERE field_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
