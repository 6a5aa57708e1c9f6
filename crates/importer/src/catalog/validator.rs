use super::models::{FORMAT_VERSION, FieldCatalog};
use crate::{ImporterError, Result};
use std::collections::HashSet;
use storage::models::Coordinates;
use tracing::warn;

pub struct CatalogValidator;

impl CatalogValidator {
    pub fn validate(catalog: &FieldCatalog) -> Result<ValidationReport> {
        let report = Self::inspect(catalog);

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }

    /// Collects every problem without failing
    pub fn inspect(catalog: &FieldCatalog) -> ValidationReport {
        let mut report = ValidationReport::default();

        if catalog.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                catalog.format_version, FORMAT_VERSION
            ));
        }

        if catalog.fields.is_empty() {
            report
                .errors
                .push("At least one field is required".to_string());
        }

        let mut names = HashSet::new();
        for (idx, field) in catalog.fields.iter().enumerate() {
            let name = field.name.trim();
            let label = format!("{}. {}", idx + 1, name);

            if name.is_empty() {
                report
                    .errors
                    .push(format!("Field #{} has an empty name", idx + 1));
            } else if !names.insert(name.to_lowercase()) {
                report
                    .errors
                    .push(format!("Duplicate field name: '{}'", name));
            }

            if field.address.trim().is_empty() {
                report
                    .errors
                    .push(format!("Field '{}' has an empty address", label));
            }

            match (field.latitude, field.longitude) {
                (Some(latitude), Some(longitude)) => {
                    if let Err(e) = Coordinates::new(latitude, longitude) {
                        report
                            .errors
                            .push(format!("Field '{}' has invalid coordinates: {}", label, e));
                    }
                }
                (None, None) => {
                    report.warnings.push(format!(
                        "Field '{}' has no coordinates and will not appear on the map",
                        label
                    ));
                }
                _ => {
                    report.errors.push(format!(
                        "Field '{}' must have both latitude and longitude",
                        label
                    ));
                }
            }

            if field.amenities.iter().all(|a| a.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("Field '{}' lists no amenities", label));
            }
        }

        report
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::FieldEntry;

    fn entry(name: &str, coordinates: Option<(f64, f64)>) -> FieldEntry {
        FieldEntry {
            name: name.to_string(),
            address: "Kenilworth, NJ 07033".to_string(),
            latitude: coordinates.map(|c| c.0),
            longitude: coordinates.map(|c| c.1),
            surface: "grass".to_string(),
            amenities: vec!["parking".to_string()],
        }
    }

    fn catalog(fields: Vec<FieldEntry>) -> FieldCatalog {
        FieldCatalog {
            format_version: FORMAT_VERSION.to_string(),
            description: None,
            fields,
        }
    }

    #[test]
    fn test_valid_catalog() {
        let report = CatalogValidator::validate(&catalog(vec![
            entry("Black Brook Park", Some((40.6821, -74.2908))),
            entry("Kenilworth Recreation Center", Some((40.6772, -74.2861))),
        ]))
        .unwrap();

        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_wrong_version_is_an_error() {
        let mut bad = catalog(vec![entry("Black Brook Park", None)]);
        bad.format_version = "0.9".to_string();

        assert!(CatalogValidator::validate(&bad).is_err());
    }

    #[test]
    fn test_duplicate_names_ignore_case() {
        let report = CatalogValidator::inspect(&catalog(vec![
            entry("Unami Park", Some((40.6558, -74.3211))),
            entry("unami park ", Some((40.6558, -74.3211))),
        ]));

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Duplicate"));
    }

    #[test]
    fn test_coordinate_problems() {
        let mut half = entry("Half", None);
        half.latitude = Some(40.0);

        let report = CatalogValidator::inspect(&catalog(vec![
            half,
            entry("Off the map", Some((95.0, -74.0))),
            entry("Unmapped", None),
        ]));

        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("Unmapped"));
    }

    #[test]
    fn test_missing_amenities_is_a_warning() {
        let mut bare = entry("Meisel Avenue Park", Some((40.6972, -74.3054)));
        bare.amenities = vec!["  ".to_string()];

        let report = CatalogValidator::validate(&catalog(vec![bare])).unwrap();
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        assert!(CatalogValidator::validate(&catalog(vec![])).is_err());
    }
}
