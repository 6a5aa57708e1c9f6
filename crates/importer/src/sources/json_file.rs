use crate::catalog::models::FieldCatalog;
use crate::traits::FieldSource;
use crate::{ImporterError, Result};
use std::path::{Path, PathBuf};

/// A catalog stored as a JSON file on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl FieldSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<FieldCatalog> {
        let json_content =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ImporterError::ReadError {
                    path: self.describe(),
                    source,
                })?;

        Ok(serde_json::from_str(&json_content)?)
    }
}

/// JSON files in `directory` and its immediate subdirectories, sorted
pub async fn discover_json_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let read_error = |source| ImporterError::ReadError {
        path: directory.display().to_string(),
        source,
    };

    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(directory).await.map_err(read_error)?;

    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let path = entry.path();
        if path.is_dir() {
            let mut sub_entries = tokio::fs::read_dir(&path).await.map_err(read_error)?;
            while let Some(sub_entry) = sub_entries.next_entry().await.map_err(read_error)? {
                let sub_path = sub_entry.path();
                if is_json(&sub_path) {
                    json_files.push(sub_path);
                }
            }
        } else if is_json(&path) {
            json_files.push(path);
        }
    }

    json_files.sort();
    Ok(json_files)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::validator::CatalogValidator;

    fn seed_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/predefined_fields.json")
    }

    #[tokio::test]
    async fn test_seed_catalog_loads_and_validates() {
        let source = JsonFileSource::new(seed_path());
        let catalog = source.load().await.unwrap();

        assert_eq!(catalog.fields.len(), 5);
        assert!(CatalogValidator::validate(&catalog).is_ok());

        let meisel = catalog
            .fields
            .iter()
            .find(|f| f.name.starts_with("Meisel"))
            .unwrap();
        assert_eq!(meisel.surface, "turf");
    }

    #[tokio::test]
    async fn test_missing_file_is_a_read_error() {
        let source = JsonFileSource::new("does/not/exist.json");
        let result = source.load().await;

        assert!(matches!(result, Err(ImporterError::ReadError { .. })));
    }

    #[tokio::test]
    async fn test_discovers_seed_directory() {
        let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let files = discover_json_files(&directory).await.unwrap();

        assert!(files.contains(&seed_path()));
    }
}
