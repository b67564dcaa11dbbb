//! Search service: owns the catalog snapshot and its load lifecycle
//!
//! State machine:
//!
//! ```text
//! Unloaded ──load──> Loading ──ok──────> Loaded
//!     ^                 │   └─unavailable/error─> Failed (or previous snapshot)
//!     └─────────────────┴── Failed ──load──> Loading
//! ```
//!
//! Only one load runs at a time. Callers arriving while a load is in flight
//! wait for that load instead of starting another. The load runs in its own
//! task, so it completes and publishes its snapshot even if every caller
//! stops waiting.

use crate::catalog::{validate_catalog, CatalogSource};
use crate::engine::{SearchConfig, SearchEngine};
use crate::error::{CatalogError, Result};
use crate::models::{Card, CatalogInfo};
use crate::query::{classify, ParsedQuery};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Shared result of one load, delivered to every waiting caller
type LoadOutcome = Result<()>;

enum LoadState {
    Unloaded,
    Loading {
        done: watch::Receiver<Option<LoadOutcome>>,
        /// Snapshot that keeps serving searches during a reload
        previous: Option<Arc<SearchEngine>>,
    },
    Loaded(Arc<SearchEngine>),
    Failed,
}

impl LoadState {
    fn snapshot(&self) -> Option<Arc<SearchEngine>> {
        match self {
            LoadState::Loaded(engine) => Some(Arc::clone(engine)),
            LoadState::Loading { previous, .. } => previous.clone(),
            LoadState::Unloaded | LoadState::Failed => None,
        }
    }
}

/// Card search over a lazily loaded catalog
pub struct SearchService<S: CatalogSource> {
    source: Arc<S>,
    config: SearchConfig,
    state: Arc<Mutex<LoadState>>,
}

impl<S: CatalogSource> SearchService<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, SearchConfig::default())
    }

    pub fn with_config(source: S, config: SearchConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
            state: Arc::new(Mutex::new(LoadState::Unloaded)),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Load the catalog once. A no-op when already loaded; joins an
    /// in-flight load instead of starting a second one.
    ///
    /// An unavailable catalog is not an error: the service stays unready.
    /// Faults in the fetched data are returned to every waiting caller.
    pub async fn load_catalog(&self) -> Result<()> {
        let done = {
            let mut state = lock(&self.state);
            let in_flight = match &*state {
                LoadState::Loaded(_) => return Ok(()),
                LoadState::Loading { done, .. } => Some(done.clone()),
                LoadState::Unloaded | LoadState::Failed => None,
            };
            in_flight.unwrap_or_else(|| self.begin_load(&mut state, None))
        };
        wait_for_outcome(done).await
    }

    /// Fetch the catalog again and swap it in whole. The current snapshot
    /// keeps serving searches until the new one is ready, and stays in
    /// place if the reload finds nothing or fails.
    pub async fn reload_catalog(&self) -> Result<()> {
        let done = {
            let mut state = lock(&self.state);
            let in_flight = match &*state {
                LoadState::Loading { done, .. } => Some(done.clone()),
                _ => None,
            };
            let previous = state.snapshot();
            in_flight.unwrap_or_else(|| self.begin_load(&mut state, previous))
        };
        wait_for_outcome(done).await
    }

    /// Whether a catalog and both indexes are available
    pub fn is_ready(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn get_catalog_info(&self) -> Option<CatalogInfo> {
        self.snapshot().map(|engine| engine.info().clone())
    }

    /// Hybrid search: number forms first, name search as fallback
    pub fn smart_search(&self, query: &str, limit: Option<usize>) -> Vec<Arc<Card>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.ready_snapshot() {
            Some(engine) => engine.smart_search(query, limit),
            None => Vec::new(),
        }
    }

    /// Exact-first name search without query classification
    pub fn search_by_name(&self, text: &str, limit: Option<usize>) -> Vec<Arc<Card>> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match self.ready_snapshot() {
            Some(engine) => {
                let mut results = engine.search_by_name(text);
                results.truncate(limit.unwrap_or(self.config.default_limit));
                results
            }
            None => Vec::new(),
        }
    }

    /// Plain fuzzy search with no classification and no exact-first phase
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<Arc<Card>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.ready_snapshot() {
            Some(engine) => engine.fuzzy_search(query, limit),
            None => Vec::new(),
        }
    }

    /// How a query would be interpreted
    pub fn classify(&self, query: &str) -> ParsedQuery {
        classify(query)
    }

    fn snapshot(&self) -> Option<Arc<SearchEngine>> {
        lock(&self.state).snapshot()
    }

    fn ready_snapshot(&self) -> Option<Arc<SearchEngine>> {
        let snapshot = self.snapshot();
        if snapshot.is_none() {
            log::warn!("Search called before the card catalog was loaded");
        }
        snapshot
    }

    /// Move into `Loading` and spawn the load task. Caller holds the lock.
    fn begin_load(
        &self,
        state: &mut LoadState,
        previous: Option<Arc<SearchEngine>>,
    ) -> watch::Receiver<Option<LoadOutcome>> {
        let (tx, rx) = watch::channel(None);
        *state = LoadState::Loading {
            done: rx.clone(),
            previous: previous.clone(),
        };

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.state);
        let config = self.config.clone();
        tokio::spawn(async move {
            // Run the fetch in its own task so a panic becomes a JoinError
            let result = tokio::spawn(fetch_and_build(source, config))
                .await
                .unwrap_or_else(|e| Err(CatalogError::LoadAborted(e.to_string())));

            let outcome = {
                let mut state = lock(&shared);
                match result {
                    Ok(Some(engine)) => {
                        *state = LoadState::Loaded(Arc::new(engine));
                        Ok(())
                    }
                    Ok(None) => {
                        *state = restore(previous);
                        Ok(())
                    }
                    Err(e) => {
                        *state = restore(previous);
                        Err(e)
                    }
                }
            };
            // Nobody waiting is fine; the state above is what matters
            let _ = tx.send(Some(outcome));
        });

        rx
    }
}

fn restore(previous: Option<Arc<SearchEngine>>) -> LoadState {
    match previous {
        Some(engine) => LoadState::Loaded(engine),
        None => LoadState::Failed,
    }
}

fn lock(state: &Mutex<LoadState>) -> MutexGuard<'_, LoadState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn wait_for_outcome(mut done: watch::Receiver<Option<LoadOutcome>>) -> Result<()> {
    match done.wait_for(Option::is_some).await {
        Ok(outcome) => (*outcome).clone().unwrap_or(Ok(())),
        Err(_) => Err(CatalogError::LoadAborted(
            "load task ended without reporting".to_string(),
        )),
    }
}

/// Fetch, validate and index the catalog.
///
/// `Ok(None)` when the source has nothing to offer or cannot be reached.
async fn fetch_and_build<S: CatalogSource>(
    source: Arc<S>,
    config: SearchConfig,
) -> Result<Option<SearchEngine>> {
    let origin = source.describe();
    log::info!("Loading card catalog from {}", origin);

    let file = match source.fetch().await {
        Ok(Some(file)) => file,
        Ok(None) => {
            log::info!("No card catalog available from {}", origin);
            return Ok(None);
        }
        Err(e) if e.is_unavailable() => {
            log::info!("Card catalog unavailable from {}: {}", origin, e);
            return Ok(None);
        }
        Err(e) => {
            log::error!("Failed to load card catalog from {}: {}", origin, e);
            return Err(e);
        }
    };

    validate_catalog(&file)?;
    let engine = SearchEngine::build(file, config);
    log::info!(
        "Card catalog ready: {} cards (generated: {})",
        engine.info().total_cards,
        engine.info().generated_at
    );
    Ok(Some(engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalogSource;
    use crate::models::CatalogFile;

    fn catalog() -> CatalogFile {
        CatalogFile {
            generated_at: "2024-05-01T00:00:00Z".to_string(),
            min_price: 0.5,
            total_cards: 2,
            cards: vec![
                Card::builder("a", "Charizard")
                    .number("4/102")
                    .set("base1", "Base Set")
                    .price("holofoil", 300.0)
                    .build(),
                Card::builder("b", "Charizard")
                    .number("4/102")
                    .set("base1s", "Base Set (Shadowless)")
                    .price("holofoil", 5000.0)
                    .build(),
            ],
        }
    }

    #[tokio::test]
    async fn searches_before_load_return_nothing() {
        let service = SearchService::new(StaticCatalogSource::new(catalog()));
        assert!(!service.is_ready());
        assert!(service.get_catalog_info().is_none());
        assert!(service.smart_search("charizard", None).is_empty());
        assert!(service.search("charizard", None).is_empty());
        assert!(service.search_by_name("charizard", None).is_empty());
    }

    #[tokio::test]
    async fn load_makes_service_ready() {
        let service = SearchService::new(StaticCatalogSource::new(catalog()));
        service.load_catalog().await.unwrap();

        assert!(service.is_ready());
        let info = service.get_catalog_info().unwrap();
        assert_eq!(info.total_cards, 2);
        assert_eq!(info.min_price, 0.5);

        let ids: Vec<String> = service
            .smart_search("4/102", None)
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn empty_source_leaves_service_unready() {
        let service = SearchService::new(StaticCatalogSource::empty());
        service.load_catalog().await.unwrap();

        assert!(!service.is_ready());
        assert!(service.smart_search("charizard", None).is_empty());
    }

    #[tokio::test]
    async fn invalid_catalog_is_reported() {
        let mut file = catalog();
        file.cards.push(Card::builder("a", "Duplicate").build());
        let service = SearchService::new(StaticCatalogSource::new(file));

        let err = service.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCatalog(_)));
        assert!(!service.is_ready());
    }

    #[tokio::test]
    async fn limits_apply_to_every_search_mode() {
        let service = SearchService::new(StaticCatalogSource::new(catalog()));
        service.load_catalog().await.unwrap();

        assert_eq!(service.smart_search("charizard", Some(1)).len(), 1);
        assert_eq!(service.search_by_name("charizard", Some(1)).len(), 1);
        assert_eq!(service.search("charizard", Some(1)).len(), 1);
        assert_eq!(service.search("charizard", None).len(), 2);
    }

    #[test]
    fn classify_is_available_without_a_catalog() {
        let service = SearchService::new(StaticCatalogSource::empty());
        assert!(!service.classify("4/102").is_name());
        assert!(service.classify("pikachu").is_name());
    }
}
