//! # Directory Catalog Source
//!
//! Loads businesses from a directory tree:
//!
//! ```text
//! <root>/
//! ├── discounter/
//! │   ├── config.json      { "name": "Discounter", "path": "discounter",
//! │   │                      "articles": "articles.json", "header": "header.txt" }
//! │   ├── articles.json    category tree or flat article list
//! │   └── header.txt       receipt header lines
//! └── kiosk/
//!     └── ...
//! ```
//!
//! Subdirectories without a readable config.json are skipped with a
//! warning; a malformed articles file fails the load so the terminal never
//! installs a partial catalog.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use till_core::RawCatalog;
use till_terminal::{BusinessConfig, CatalogSource, SourceError};

const DEFAULT_ARTICLES_FILE: &str = "articles.json";

/// Filesystem-backed catalog source.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    fn business_dir(&self, business: &BusinessConfig) -> PathBuf {
        self.root.join(&business.path)
    }
}

#[async_trait]
impl CatalogSource for DirSource {
    async fn businesses(&self) -> Result<Vec<BusinessConfig>, SourceError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|err| SourceError::Unavailable(format!("{}: {err}", self.root.display())))?;

        let mut configs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| SourceError::Unavailable(err.to_string()))?
        {
            let config_path = entry.path().join("config.json");
            let bytes = match tokio::fs::read(&config_path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %config_path.display(), %err, "skipping business without config");
                    continue;
                }
            };
            match serde_json::from_slice::<BusinessConfig>(&bytes) {
                Ok(config) => configs.push(config),
                Err(err) => {
                    warn!(path = %config_path.display(), %err, "skipping malformed config");
                }
            }
        }

        configs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(configs)
    }

    async fn load_catalog(&self, business: &BusinessConfig) -> Result<RawCatalog, SourceError> {
        let file = business
            .articles
            .as_deref()
            .unwrap_or(DEFAULT_ARTICLES_FILE);
        let path = self.business_dir(business).join(file);

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| SourceError::Unavailable(format!("{}: {err}", path.display())))?;

        serde_json::from_slice(&bytes)
            .map_err(|err| SourceError::Malformed(format!("{}: {err}", path.display())))
    }

    async fn load_header(&self, business: &BusinessConfig) -> Result<Vec<String>, SourceError> {
        let Some(file) = business.header.as_deref() else {
            return Ok(Vec::new());
        };
        let path = self.business_dir(business).join(file);

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| SourceError::Unavailable(format!("{}: {err}", path.display())))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn seed_business(root: &std::path::Path) {
        let dir = root.join("discounter");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.json"),
            r#"{"name": "Discounter", "path": "discounter",
                "articles": "articles.json", "header": "header.txt"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("articles.json"),
            r#"[{"category": "Drinks", "items": [{"name": "Cola", "price": 2.5}]}]"#,
        )
        .unwrap();
        fs::write(dir.join("header.txt"), "Discounter\nMain Street 1\n").unwrap();

        // a stray directory without a config must be skipped, not fatal
        fs::create_dir_all(root.join("lost+found")).unwrap();
    }

    #[tokio::test]
    async fn test_discovers_and_loads_business() {
        let tmp = tempfile::tempdir().unwrap();
        seed_business(tmp.path());

        let source = DirSource::new(tmp.path());
        let businesses = source.businesses().await.unwrap();
        assert_eq!(businesses.len(), 1);
        assert_eq!(businesses[0].name, "Discounter");

        let catalog = source
            .load_catalog(&businesses[0])
            .await
            .unwrap()
            .into_catalog()
            .unwrap();
        assert_eq!(catalog.lookup("0001").unwrap().name, "Cola");

        let header = source.load_header(&businesses[0]).await.unwrap();
        assert_eq!(header, vec!["Discounter", "Main Street 1"]);
    }

    #[tokio::test]
    async fn test_malformed_articles_fail_the_load() {
        let tmp = tempfile::tempdir().unwrap();
        seed_business(tmp.path());
        fs::write(
            tmp.path().join("discounter").join("articles.json"),
            "not json",
        )
        .unwrap();

        let source = DirSource::new(tmp.path());
        let businesses = source.businesses().await.unwrap();
        let err = source.load_catalog(&businesses[0]).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_missing_root_is_unavailable() {
        let source = DirSource::new("/definitely/not/here");
        assert!(matches!(
            source.businesses().await.unwrap_err(),
            SourceError::Unavailable(_)
        ));
    }
}
