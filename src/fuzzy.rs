//! Weighted approximate matching over card name, set name and rarity
//!
//! Scores are on a 0..1 scale where 0 is a perfect match. A field matches
//! when its best window score is within the threshold; a card matches when
//! any field does. Matched fields are then combined into a ranking score
//! that favours heavily weighted, short fields.

use crate::models::Card;

/// Floor for perfect field scores so weights still separate them
const PERFECT_SCORE_FLOOR: f64 = 0.001;

/// Relative importance of each searchable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub name: f64,
    pub set_name: f64,
    pub rarity: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 2.0,
            set_name: 0.5,
            rarity: 0.3,
        }
    }
}

/// Tuning for the fuzzy index
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Maximum accepted field score (0 = exact)
    pub threshold: f64,
    /// Token offset at which the proximity penalty reaches 1.0
    pub distance: usize,
    /// Tokens shorter than this (in chars) are ignored
    pub min_match_len: usize,
    pub weights: FieldWeights,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            distance: 100,
            min_match_len: 2,
            weights: FieldWeights::default(),
        }
    }
}

/// A matching catalog position and its ranking score (lower is better)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    pub position: usize,
    pub score: f64,
}

#[derive(Debug)]
struct IndexedField {
    tokens: Vec<String>,
    /// 1/sqrt(token count): long fields weigh less per match
    norm: f64,
}

impl IndexedField {
    fn new(text: &str, min_len: usize) -> Self {
        let tokens = tokenize(text, min_len);
        let norm = if tokens.is_empty() {
            0.0
        } else {
            1.0 / (tokens.len() as f64).sqrt()
        };
        Self { tokens, norm }
    }
}

#[derive(Debug)]
struct IndexedCard {
    name: IndexedField,
    set_name: IndexedField,
    rarity: IndexedField,
}

/// Read-only fuzzy index over a catalog snapshot
#[derive(Debug)]
pub struct FuzzyIndex {
    records: Vec<IndexedCard>,
    options: FuzzyOptions,
}

impl FuzzyIndex {
    pub fn build<C: AsRef<Card>>(cards: &[C], options: FuzzyOptions) -> Self {
        let min_len = options.min_match_len;
        let records = cards
            .iter()
            .map(|card| {
                let card = card.as_ref();
                IndexedCard {
                    name: IndexedField::new(card.name(), min_len),
                    set_name: IndexedField::new(card.set_name(), min_len),
                    rarity: IndexedField::new(card.rarity(), min_len),
                }
            })
            .collect();

        Self { records, options }
    }

    pub fn options(&self) -> &FuzzyOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best matches for `text`, best first, at most `limit`
    pub fn search(&self, text: &str, limit: usize) -> Vec<FuzzyMatch> {
        let query_tokens = tokenize(text, self.options.min_match_len);
        if query_tokens.is_empty() || limit == 0 {
            return Vec::new();
        }
        let query = query_tokens.join(" ");

        let weights = self.options.weights;
        let total_weight = weights.name + weights.set_name + weights.rarity;
        let total_weight = if total_weight > 0.0 { total_weight } else { 1.0 };

        let mut matches: Vec<FuzzyMatch> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let fields = [
                    (&record.name, weights.name),
                    (&record.set_name, weights.set_name),
                    (&record.rarity, weights.rarity),
                ];

                let mut matched = false;
                let mut score = 1.0;
                for (field, weight) in fields {
                    let Some(field_score) = self.field_score(&query, query_tokens.len(), field)
                    else {
                        continue;
                    };
                    if field_score > self.options.threshold {
                        continue;
                    }
                    matched = true;
                    let exponent = weight / total_weight * field.norm;
                    score *= field_score.max(PERFECT_SCORE_FLOOR).powf(exponent);
                }

                matched.then_some(FuzzyMatch { position, score })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        matches.truncate(limit);
        matches
    }

    /// Best window score of the query against one field
    fn field_score(&self, query: &str, width: usize, field: &IndexedField) -> Option<f64> {
        if field.tokens.is_empty() {
            return None;
        }
        if field.tokens.len() <= width {
            return Some(text_distance(query, &field.tokens.join(" ")));
        }

        let distance = self.options.distance.max(1) as f64;
        (0..=field.tokens.len() - width)
            .take_while(|&start| (start as f64) < distance)
            .map(|start| {
                let window = field.tokens[start..start + width].join(" ");
                text_distance(query, &window) + start as f64 / distance
            })
            .min_by(f64::total_cmp)
    }
}

fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}

/// Blend of edit distance and bigram dissimilarity, 0 = identical.
///
/// Bigram overlap punishes a changed character inside a short word far more
/// than edit distance alone, so "latias"/"latios" stay apart.
fn text_distance(a: &str, b: &str) -> f64 {
    let edit = 1.0 - strsim::normalized_levenshtein(a, b);
    let bigram = 1.0 - strsim::sorensen_dice(a, b);
    (edit + bigram) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str, set_name: &str, rarity: &str) -> Card {
        Card::builder(id, name)
            .set(id, set_name)
            .rarity(rarity)
            .build()
    }

    fn catalog() -> Vec<Card> {
        vec![
            card("a", "Latias", "Dragon Majesty", "Rare Holo"),
            card("b", "Latios", "Dragon Majesty", "Rare Holo"),
            card("c", "Charizard", "Base Set", "Rare Holo"),
            card("d", "Dark Charizard", "Team Rocket", "Rare Holo"),
            card("e", "Pikachu", "Evolving Skies", "Common"),
            card("f", "Umbreon VMAX", "Evolving Skies", "Rare Secret"),
        ]
    }

    fn ids(index: &FuzzyIndex, cards: &[Card], query: &str) -> Vec<String> {
        index
            .search(query, 100)
            .iter()
            .map(|m| cards[m.position].id().to_string())
            .collect()
    }

    #[test]
    fn text_distance_is_zero_for_identical_text() {
        assert_eq!(text_distance("charizard", "charizard"), 0.0);
    }

    #[test]
    fn similar_names_stay_apart_at_default_threshold() {
        let distance = text_distance("latias", "latios");
        assert!(distance > 0.2, "latias/latios distance {distance}");

        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert_eq!(ids(&index, &cards, "latias"), vec!["a"]);
        assert_eq!(ids(&index, &cards, "Latios"), vec!["b"]);
    }

    #[test]
    fn single_typo_in_long_name_matches() {
        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        let found = ids(&index, &cards, "charizrd");
        assert_eq!(found, vec!["c", "d"]);
    }

    #[test]
    fn set_name_matches_rank_below_name_matches() {
        let cards = vec![
            card("set", "Pikachu", "Skyridge", "Common"),
            card("name", "Skyridge Guardian", "Base Set", "Common"),
        ];
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert_eq!(ids(&index, &cards, "skyridge"), vec!["name", "set"]);
    }

    #[test]
    fn rarity_only_matches_are_found() {
        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert_eq!(ids(&index, &cards, "secret"), vec!["f"]);
    }

    #[test]
    fn short_query_tokens_are_ignored() {
        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert!(index.search("a", 10).is_empty());
        assert!(index.search("   ", 10).is_empty());
        // "v" is dropped, "pikachu" still matches
        assert_eq!(ids(&index, &cards, "pikachu v"), vec!["e"]);
    }

    #[test]
    fn multi_word_queries_match_token_windows() {
        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert_eq!(ids(&index, &cards, "umbreon vmax"), vec!["f"]);
    }

    #[test]
    fn limit_truncates_results() {
        let cards = catalog();
        let index = FuzzyIndex::build(&cards, FuzzyOptions::default());
        assert_eq!(index.search("rare holo", 100).len(), 4);
        assert_eq!(index.search("rare holo", 2).len(), 2);
        assert!(index.search("rare holo", 0).is_empty());
    }

    #[test]
    fn looser_threshold_admits_similar_names() {
        let cards = catalog();
        let options = FuzzyOptions {
            threshold: 0.3,
            ..FuzzyOptions::default()
        };
        let index = FuzzyIndex::build(&cards, options);
        assert_eq!(ids(&index, &cards, "latias"), vec!["a", "b"]);
    }
}
