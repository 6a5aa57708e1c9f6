use crate::Result;
use crate::catalog::models::FieldCatalog;

/// Somewhere a curated list of fields can be read from
#[async_trait::async_trait]
pub trait FieldSource: Send + Sync {
    /// Human-readable origin used in logs
    fn describe(&self) -> String;

    async fn load(&self) -> Result<FieldCatalog>;
}
