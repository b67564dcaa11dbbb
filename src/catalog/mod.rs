//! Catalog sources: where the card catalog comes from
//!
//! The search service only needs something that can produce a
//! [`CatalogFile`] on demand. `Ok(None)` means no catalog is available
//! right now, which is not an error.

mod file;
mod http;
mod memory;

pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;
pub use memory::StaticCatalogSource;

use crate::error::{CatalogError, Result};
use crate::models::CatalogFile;
use std::collections::HashSet;
use std::future::Future;

/// Something that can fetch the full card catalog
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the catalog; `Ok(None)` when no cached data is present
    fn fetch(&self) -> impl Future<Output = Result<Option<CatalogFile>>> + Send;

    /// Human-readable origin, used in log messages
    fn describe(&self) -> String;
}

/// Reject catalogs the indexes cannot be built from
pub fn validate_catalog(file: &CatalogFile) -> Result<()> {
    let mut seen = HashSet::with_capacity(file.cards.len());
    for card in &file.cards {
        if card.id().is_empty() {
            return Err(CatalogError::InvalidCatalog(format!(
                "card '{}' has an empty id",
                card.name()
            )));
        }
        if !seen.insert(card.id()) {
            return Err(CatalogError::InvalidCatalog(format!(
                "duplicate card id '{}'",
                card.id()
            )));
        }
    }
    Ok(())
}
