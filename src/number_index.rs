//! Lookup of cards by normalized in-set number

use crate::models::Card;
use std::collections::HashMap;

/// Normalize a card number into its join key.
///
/// Only the part before `/` counts. A leading digit run has its zeros
/// stripped ("025" -> "25", "000" -> "0") and anything after it is ignored
/// ("12a" -> "12"). Numbers that start with a non-digit ("TG05", "SV107")
/// are kept as-is. Only a blank number has no key; an empty part before
/// `/` ("/102") keys as "0".
pub fn normalize_number(number: &str) -> String {
    if number.trim().is_empty() {
        return String::new();
    }
    let head = number.split('/').next().unwrap_or("").trim();
    if head.is_empty() {
        return "0".to_string();
    }
    if !head.starts_with(|c: char| c.is_ascii_digit()) {
        return head.to_string();
    }

    let digits: String = head.chars().take_while(|c| c.is_ascii_digit()).collect();
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Cards grouped by normalized number, holding positions into the catalog
#[derive(Debug, Default)]
pub struct NumberIndex {
    buckets: HashMap<String, Vec<usize>>,
}

impl NumberIndex {
    /// Group catalog positions by normalized number, keeping catalog order
    pub fn build<C: AsRef<Card>>(cards: &[C]) -> Self {
        let mut buckets: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, card) in cards.iter().enumerate() {
            let key = normalize_number(card.as_ref().number());
            if key.is_empty() {
                continue;
            }
            buckets.entry(key).or_default().push(position);
        }
        Self { buckets }
    }

    /// Catalog positions for a normalized number, empty if unknown
    pub fn lookup(&self, normalized: &str) -> &[usize] {
        self.buckets
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cards for a normalized number, resolved against the catalog the index was built from
    pub fn cards<'a, C: AsRef<Card>>(&self, cards: &'a [C], normalized: &str) -> Vec<&'a C> {
        self.lookup(normalized)
            .iter()
            .filter_map(|&position| cards.get(position))
            .collect()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
