use super::models::FieldCatalog;
use crate::Result;
use sqlx::PgPool;
use storage::dto::field::CreateFieldRequest;
use storage::repository::field::FieldRepository;
use tracing::{debug, info};

/// Attribution stored on fields created by the importer
pub const IMPORT_AUTHOR: &str = "field-import";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn merge(&mut self, other: ImportSummary) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
    }
}

pub struct CatalogLoader<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Inserts every field not already present under the same name and address.
    pub async fn import(&self, catalog: &FieldCatalog) -> Result<ImportSummary> {
        let repo = FieldRepository::new(self.pool);
        let mut summary = ImportSummary::default();

        for entry in &catalog.fields {
            if repo
                .exists_by_name_and_address(&entry.name, &entry.address)
                .await?
            {
                debug!("Skipping existing field: {}", entry.name);
                summary.skipped += 1;
                continue;
            }

            let request = CreateFieldRequest::from(entry);
            let field = repo.create(&request, Some(IMPORT_AUTHOR)).await?;
            info!("Added field: {} ({})", field.name, field.field_id);
            summary.inserted += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_merge() {
        let mut total = ImportSummary::default();
        total.merge(ImportSummary {
            inserted: 3,
            skipped: 2,
        });
        total.merge(ImportSummary {
            inserted: 1,
            skipped: 0,
        });

        assert_eq!(
            total,
            ImportSummary {
                inserted: 4,
                skipped: 2
            }
        );
    }
}
