//! Card Price Lookup - hybrid search over a cached trading card price catalog
//!
//! Free-text queries are classified as card numbers ("4/102"), set plus
//! number ("base set 4") or names, then answered from an in-memory catalog
//! with exact-first name matching and fuzzy fallback.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod models;
pub mod number_index;
pub mod query;
pub mod service;
pub mod sets;

pub use catalog::{CatalogSource, FileCatalogSource, HttpCatalogSource, StaticCatalogSource};
pub use engine::{SearchConfig, SearchEngine};
pub use error::{CatalogError, Result};
pub use fuzzy::{FieldWeights, FuzzyIndex, FuzzyOptions};
pub use models::{Card, CatalogFile, CatalogInfo, VariantPrice};
pub use number_index::{normalize_number, NumberIndex};
pub use query::{classify, ParsedQuery, QueryIntent};
pub use service::SearchService;
pub use sets::match_set_name;
