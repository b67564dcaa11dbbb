//! Catalog stored as a JSON file on disk

use super::CatalogSource;
use crate::error::Result;
use crate::models::CatalogFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads the catalog JSON from a local file
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default catalog path: ~/.local/share/card_price_lookup/catalog.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("card_price_lookup")
            .join("catalog.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCatalogSource {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Option<CatalogFile>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No cached catalog at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let file: CatalogFile = serde_json::from_slice(&bytes)?;
        log::info!(
            "Read catalog with {} cards from {}",
            file.cards.len(),
            self.path.display()
        );
        Ok(Some(file))
    }

    fn describe(&self) -> String {
        format!("catalog file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn missing_file_is_unavailable_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = FileCatalogSource::new(temp_dir.path().join("catalog.json"));

        let result = source.fetch().await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn reads_catalog_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"{{
                "generatedAt": "2024-05-01T00:00:00Z",
                "minPrice": 1.0,
                "totalCards": 1,
                "cards": [{{
                    "id": "base1-4",
                    "name": "Charizard",
                    "number": "4/102",
                    "setName": "Base Set",
                    "prices": {{ "holofoil": {{ "market": 300.0 }} }}
                }}]
            }}"#
        )
        .unwrap();

        let source = FileCatalogSource::new(temp_file.path());
        let file = source.fetch().await.unwrap().unwrap();
        assert_eq!(file.cards.len(), 1);
        assert_eq!(file.cards[0].name(), "Charizard");
        assert_eq!(file.cards[0].highest_price(), 300.0);
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{{ not json").unwrap();

        let source = FileCatalogSource::new(temp_file.path());
        match source.fetch().await {
            Err(CatalogError::Parse(_)) => {}
            other => panic!("Expected CatalogError::Parse, got: {other:?}"),
        }
    }

    #[test]
    fn default_path_ends_with_catalog_json() {
        let path = FileCatalogSource::default_path();
        assert!(path.ends_with("card_price_lookup/catalog.json"));
    }
}
