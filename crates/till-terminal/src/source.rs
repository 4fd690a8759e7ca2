//! # Collaborator Contracts
//!
//! The terminal consumes catalogs and dispatches print jobs through these
//! traits; implementations live in the shell (filesystem, HTTP, spooler).
//! The core never performs the I/O itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use till_core::RawCatalog;

use crate::document::ReceiptDocument;
use crate::error::{PrinterError, SourceError};

// =============================================================================
// Business Config
// =============================================================================

/// One selectable business (catalog) as described by its config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Stable identifier; generated when the config does not carry one.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Display name shown in the menu.
    pub name: String,

    /// Directory slug the source resolves files against.
    pub path: String,

    /// Catalog file name within the business directory.
    #[serde(default)]
    pub articles: Option<String>,

    /// Receipt header file name within the business directory.
    #[serde(default)]
    pub header: Option<String>,

    /// Editable businesses deliver a flat persisted article list instead
    /// of a category tree.
    #[serde(default)]
    pub editable: bool,
}

// =============================================================================
// Catalog Source
// =============================================================================

/// Delivers business configs, catalogs, and receipt headers.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All available businesses, sorted by display name.
    async fn businesses(&self) -> Result<Vec<BusinessConfig>, SourceError>;

    /// The raw catalog for one business (tree or flat article list).
    async fn load_catalog(&self, business: &BusinessConfig) -> Result<RawCatalog, SourceError>;

    /// Receipt header lines for one business. An absent header is an empty
    /// list, not an error.
    async fn load_header(&self, business: &BusinessConfig) -> Result<Vec<String>, SourceError>;
}

// =============================================================================
// Receipt Printer
// =============================================================================

/// Accepts a rendered receipt document and returns success or failure.
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    async fn print(&self, document: &ReceiptDocument) -> Result<(), PrinterError>;
}

/// No-op printer for tests and headless runs.
pub struct NoOpPrinter;

#[async_trait]
impl ReceiptPrinter for NoOpPrinter {
    async fn print(&self, _document: &ReceiptDocument) -> Result<(), PrinterError> {
        Ok(())
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// In-memory catalog source for tests and demos.
pub struct StaticSource {
    businesses: Vec<(BusinessConfig, RawCatalog, Vec<String>)>,
}

impl StaticSource {
    pub fn new() -> Self {
        StaticSource {
            businesses: Vec::new(),
        }
    }

    /// Adds a business with its catalog and header lines.
    pub fn with_business(
        mut self,
        name: &str,
        catalog: RawCatalog,
        header: Vec<String>,
    ) -> Self {
        self.businesses.push((
            BusinessConfig {
                id: Uuid::new_v4(),
                name: name.to_string(),
                path: name.to_lowercase().replace(' ', "-"),
                articles: None,
                header: None,
                editable: matches!(catalog, RawCatalog::Articles(_)),
            },
            catalog,
            header,
        ));
        self
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn businesses(&self) -> Result<Vec<BusinessConfig>, SourceError> {
        let mut configs: Vec<BusinessConfig> = self
            .businesses
            .iter()
            .map(|(config, _, _)| config.clone())
            .collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(configs)
    }

    async fn load_catalog(&self, business: &BusinessConfig) -> Result<RawCatalog, SourceError> {
        self.businesses
            .iter()
            .find(|(config, _, _)| config.id == business.id)
            .map(|(_, catalog, _)| catalog.clone())
            .ok_or_else(|| SourceError::UnknownBusiness(business.name.clone()))
    }

    async fn load_header(&self, business: &BusinessConfig) -> Result<Vec<String>, SourceError> {
        self.businesses
            .iter()
            .find(|(config, _, _)| config.id == business.id)
            .map(|(_, _, header)| header.clone())
            .ok_or_else(|| SourceError::UnknownBusiness(business.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_config_defaults() {
        let config: BusinessConfig = serde_json::from_str(
            r#"{"name": "Discounter", "path": "discounter", "articles": "articles.json"}"#,
        )
        .unwrap();
        assert_eq!(config.name, "Discounter");
        assert!(!config.editable);
        assert!(config.header.is_none());
    }

    #[tokio::test]
    async fn test_static_source_sorts_businesses_by_name() {
        let source = StaticSource::new()
            .with_business("Zoo Shop", RawCatalog::Tree(Vec::new()), Vec::new())
            .with_business("Bakery", RawCatalog::Tree(Vec::new()), Vec::new());

        let businesses = source.businesses().await.unwrap();
        let names: Vec<&str> = businesses.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Bakery", "Zoo Shop"]);
    }
}
