pub mod catalog;
pub mod error;
pub mod sources;
pub mod traits;

pub use catalog::{
    loader::{CatalogLoader, ImportSummary},
    models::{FieldCatalog, FieldEntry},
    validator::{CatalogValidator, ValidationReport},
};
pub use error::{ImporterError, Result};
pub use sources::json_file::JsonFileSource;
pub use traits::FieldSource;
