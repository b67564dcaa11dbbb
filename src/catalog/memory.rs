//! In-memory catalog source

use super::CatalogSource;
use crate::error::Result;
use crate::models::CatalogFile;

/// Serves a catalog held in memory (embedded data, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    file: Option<CatalogFile>,
}

impl StaticCatalogSource {
    pub fn new(file: CatalogFile) -> Self {
        Self { file: Some(file) }
    }

    /// A source with nothing to serve
    pub fn empty() -> Self {
        Self { file: None }
    }
}

impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<Option<CatalogFile>> {
        Ok(self.file.clone())
    }

    fn describe(&self) -> String {
        match &self.file {
            Some(file) => format!("in-memory catalog ({} cards)", file.cards.len()),
            None => "empty in-memory catalog".to_string(),
        }
    }
}
