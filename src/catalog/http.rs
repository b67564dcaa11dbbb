//! Catalog download over HTTP

use super::CatalogSource;
use crate::error::{CatalogError, Result};
use crate::models::CatalogFile;

const USER_AGENT: &str = "card_price_lookup/0.1";

/// Fetches the catalog JSON from a URL
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    /// Fails only when the HTTP client cannot be set up (e.g. TLS init)
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Option<CatalogFile>> {
        log::info!("Fetching card catalog from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            log::info!("No catalog published at {}", self.url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status));
        }

        // Decode separately so malformed JSON is a parse fault, not a network error
        let body = response.bytes().await?;
        let file: CatalogFile = serde_json::from_slice(&body)?;

        log::info!(
            "Fetched catalog with {} cards (generated: {})",
            file.cards.len(),
            file.generated_at
        );
        Ok(Some(file))
    }

    fn describe(&self) -> String {
        format!("http catalog {}", self.url)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
