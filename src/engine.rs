//! Hybrid search over one loaded catalog snapshot
//!
//! Number-shaped queries go through the number index first because they are
//! precise. Anything that comes back empty is retried as a name search, and
//! name searches prefer literal substring hits over fuzzy ones.

use crate::fuzzy::{FuzzyIndex, FuzzyOptions};
use crate::models::{Card, CatalogFile, CatalogInfo};
use crate::number_index::NumberIndex;
use crate::query::{classify, QueryIntent};
use crate::sets::match_set_name;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Exact name hits at or above this count are returned without fuzzy results
pub const EXACT_MATCHES_SUFFICIENT: usize = 10;

/// Search tuning shared by every snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Result count when the caller gives no limit
    pub default_limit: usize,
    /// How many fuzzy candidates a name search considers
    pub fuzzy_candidates: usize,
    pub fuzzy: FuzzyOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            fuzzy_candidates: 100,
            fuzzy: FuzzyOptions::default(),
        }
    }
}

/// A catalog plus both indexes, built together and never modified
#[derive(Debug)]
pub struct SearchEngine {
    cards: Vec<Arc<Card>>,
    names_lower: Vec<String>,
    info: CatalogInfo,
    numbers: NumberIndex,
    fuzzy: FuzzyIndex,
    config: SearchConfig,
}

impl SearchEngine {
    /// Build the indexes for a freshly loaded catalog
    pub fn build(file: CatalogFile, config: SearchConfig) -> Self {
        let cards: Vec<Arc<Card>> = file.cards.into_iter().map(Arc::new).collect();

        if file.total_cards != 0 && file.total_cards != cards.len() {
            log::warn!(
                "Catalog metadata reports {} cards but {} were loaded",
                file.total_cards,
                cards.len()
            );
        }

        let names_lower = cards.iter().map(|c| c.name().to_lowercase()).collect();
        let numbers = NumberIndex::build(&cards);
        let fuzzy = FuzzyIndex::build(&cards, config.fuzzy.clone());
        let info = CatalogInfo {
            generated_at: file.generated_at,
            total_cards: cards.len(),
            min_price: file.min_price,
        };

        log::info!(
            "Built search indexes: {} cards, {} distinct numbers",
            cards.len(),
            numbers.len()
        );

        Self {
            cards,
            names_lower,
            info,
            numbers,
            fuzzy,
            config,
        }
    }

    pub fn info(&self) -> &CatalogInfo {
        &self.info
    }

    pub fn cards(&self) -> &[Arc<Card>] {
        &self.cards
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Classify the query, dispatch to the matching index, fall back to
    /// name search when a structured lookup finds nothing.
    pub fn smart_search(&self, query: &str, limit: Option<usize>) -> Vec<Arc<Card>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let limit = limit.unwrap_or(self.config.default_limit);
        let parsed = classify(query);
        log::debug!("Query {:?} classified as {:?}", query, parsed.intent());

        let mut results = match parsed.intent() {
            QueryIntent::CardNumber { number, set_size } => {
                self.by_card_number(number, set_size.as_deref())
            }
            QueryIntent::SetNumber {
                set_hint, number, ..
            } => self.by_set_number(number, set_hint.as_deref()),
            QueryIntent::Name { text } => self.search_by_name(text),
        };

        if results.is_empty() && !parsed.is_name() {
            log::debug!("No structured match for {:?}, retrying as name", query);
            results = self.search_by_name(parsed.raw());

            if results.is_empty() {
                if let Some(name_query) = parsed.name_query() {
                    if name_query != parsed.raw().trim() {
                        results = self.search_by_name(name_query);
                    }
                }
            }
        }

        results.truncate(limit);
        results
    }

    /// Exact substring hits on the name first, topped up with fuzzy hits
    /// when there are fewer than [`EXACT_MATCHES_SUFFICIENT`].
    pub fn search_by_name(&self, text: &str) -> Vec<Arc<Card>> {
        let trimmed = text.trim();
        let needle = trimmed.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact: Vec<usize> = self
            .names_lower
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(&needle))
            .map(|(position, _)| position)
            .collect();

        if exact.is_empty() {
            return self
                .fuzzy
                .search(trimmed, self.config.fuzzy_candidates)
                .into_iter()
                .map(|m| Arc::clone(&self.cards[m.position]))
                .collect();
        }

        exact.sort_by(|&a, &b| {
            let a_exact = self.names_lower[a] == needle;
            let b_exact = self.names_lower[b] == needle;
            b_exact
                .cmp(&a_exact)
                .then_with(|| by_price_desc(&self.cards[a], &self.cards[b]))
        });

        let mut results: Vec<Arc<Card>> = exact
            .iter()
            .map(|&position| Arc::clone(&self.cards[position]))
            .collect();
        if results.len() >= EXACT_MATCHES_SUFFICIENT {
            return results;
        }

        let seen: HashSet<&str> = results.iter().map(|c| c.id()).collect();
        let extra: Vec<Arc<Card>> = self
            .fuzzy
            .search(trimmed, self.config.fuzzy_candidates)
            .into_iter()
            .map(|m| &self.cards[m.position])
            .filter(|card| !seen.contains(card.id()))
            .map(Arc::clone)
            .collect();
        results.extend(extra);
        results
    }

    /// Plain fuzzy search: no classification, no exact-first phase
    pub fn fuzzy_search(&self, query: &str, limit: Option<usize>) -> Vec<Arc<Card>> {
        let limit = limit.unwrap_or(self.config.default_limit);
        self.fuzzy
            .search(query, limit)
            .into_iter()
            .map(|m| Arc::clone(&self.cards[m.position]))
            .collect()
    }

    fn by_card_number(&self, number: &str, set_size: Option<&str>) -> Vec<Arc<Card>> {
        let mut cards: Vec<Arc<Card>> = self
            .numbers
            .cards(&self.cards, number)
            .into_iter()
            .filter(|card| set_size.map_or(true, |size| card.set_size() == Some(size)))
            .cloned()
            .collect();
        cards.sort_by(|a, b| by_price_desc(a, b));
        cards
    }

    fn by_set_number(&self, number: &str, set_hint: Option<&str>) -> Vec<Arc<Card>> {
        let mut cards: Vec<Arc<Card>> = self
            .numbers
            .cards(&self.cards, number)
            .into_iter()
            .filter(|card| set_hint.map_or(true, |hint| match_set_name(hint, card.set_name())))
            .cloned()
            .collect();
        cards.sort_by(|a, b| by_price_desc(a, b));
        cards
    }
}

fn by_price_desc(a: &Card, b: &Card) -> Ordering {
    b.highest_price().total_cmp(&a.highest_price())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
