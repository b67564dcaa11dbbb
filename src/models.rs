//! Card records and catalog wire types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Market price tuple for one variant (holofoil, normal, 1st edition, ...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantPrice {
    pub market: f64,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
}

/// Card record as it appears in the catalog file.
///
/// Any `highestPrice` in the file is ignored; it is recomputed in [`Card::from`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCard {
    id: String,
    name: String,
    #[serde(default)]
    rarity: String,
    #[serde(default)]
    number: String,
    #[serde(default)]
    set_id: String,
    #[serde(default)]
    set_name: String,
    #[serde(default)]
    series: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    image_small: String,
    #[serde(default)]
    image_large: String,
    #[serde(default)]
    market_url: String,
    #[serde(default)]
    prices_updated_at: String,
    #[serde(default)]
    prices: BTreeMap<String, VariantPrice>,
}

/// One printed card with its cached prices. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCard", rename_all = "camelCase")]
pub struct Card {
    id: String,
    name: String,
    rarity: String,
    number: String,
    set_id: String,
    set_name: String,
    series: String,
    release_date: String,
    image_small: String,
    image_large: String,
    market_url: String,
    prices_updated_at: String,
    prices: BTreeMap<String, VariantPrice>,
    highest_price: f64,
}

impl From<RawCard> for Card {
    fn from(raw: RawCard) -> Self {
        let prices: BTreeMap<String, VariantPrice> = raw
            .prices
            .into_iter()
            .filter(|(variant, price)| {
                let keep = price.market.is_finite() && price.market > 0.0;
                if !keep {
                    log::debug!(
                        "Dropping variant '{}' of card {}: market price {}",
                        variant,
                        raw.id,
                        price.market
                    );
                }
                keep
            })
            .collect();
        let highest_price = highest_market_price(&prices);

        Self {
            id: raw.id,
            name: raw.name,
            rarity: raw.rarity,
            number: raw.number,
            set_id: raw.set_id,
            set_name: raw.set_name,
            series: raw.series,
            release_date: raw.release_date,
            image_small: raw.image_small,
            image_large: raw.image_large,
            market_url: raw.market_url,
            prices_updated_at: raw.prices_updated_at,
            prices,
            highest_price,
        }
    }
}

fn highest_market_price(prices: &BTreeMap<String, VariantPrice>) -> f64 {
    prices.values().map(|p| p.market).fold(0.0, f64::max)
}

impl Card {
    /// Start building a card; mostly useful for tests and in-memory catalogs
    pub fn builder(id: &str, name: &str) -> CardBuilder {
        CardBuilder::new(id, name)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rarity(&self) -> &str {
        &self.rarity
    }

    /// In-set number as printed, e.g. "4/102", "025", "TG05"
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn set_id(&self) -> &str {
        &self.set_id
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn release_date(&self) -> &str {
        &self.release_date
    }

    pub fn image_small(&self) -> &str {
        &self.image_small
    }

    pub fn image_large(&self) -> &str {
        &self.image_large
    }

    pub fn market_url(&self) -> &str {
        &self.market_url
    }

    pub fn prices_updated_at(&self) -> &str {
        &self.prices_updated_at
    }

    pub fn prices(&self) -> &BTreeMap<String, VariantPrice> {
        &self.prices
    }

    /// Max market price over all variants, 0 when the card has no prices
    pub fn highest_price(&self) -> f64 {
        self.highest_price
    }

    /// Printed set size: the part of the number after `/`, if any, verbatim
    pub fn set_size(&self) -> Option<&str> {
        self.number.split_once('/').map(|(_, size)| size)
    }

    /// Variant whose market price defines `highest_price`
    pub fn best_variant(&self) -> Option<(&str, &VariantPrice)> {
        self.prices
            .iter()
            .max_by(|a, b| a.1.market.total_cmp(&b.1.market))
            .map(|(variant, price)| (variant.as_str(), price))
    }
}

impl AsRef<Card> for Card {
    fn as_ref(&self) -> &Card {
        self
    }
}

/// Builder for [`Card`]; `build` computes the derived price fields
#[derive(Debug)]
pub struct CardBuilder {
    raw: RawCard,
}

impl CardBuilder {
    fn new(id: &str, name: &str) -> Self {
        Self {
            raw: RawCard {
                id: id.to_string(),
                name: name.to_string(),
                rarity: String::new(),
                number: String::new(),
                set_id: String::new(),
                set_name: String::new(),
                series: String::new(),
                release_date: String::new(),
                image_small: String::new(),
                image_large: String::new(),
                market_url: String::new(),
                prices_updated_at: String::new(),
                prices: BTreeMap::new(),
            },
        }
    }

    pub fn rarity(mut self, rarity: &str) -> Self {
        self.raw.rarity = rarity.to_string();
        self
    }

    pub fn number(mut self, number: &str) -> Self {
        self.raw.number = number.to_string();
        self
    }

    pub fn set(mut self, set_id: &str, set_name: &str) -> Self {
        self.raw.set_id = set_id.to_string();
        self.raw.set_name = set_name.to_string();
        self
    }

    pub fn series(mut self, series: &str) -> Self {
        self.raw.series = series.to_string();
        self
    }

    pub fn release_date(mut self, date: &str) -> Self {
        self.raw.release_date = date.to_string();
        self
    }

    pub fn images(mut self, small: &str, large: &str) -> Self {
        self.raw.image_small = small.to_string();
        self.raw.image_large = large.to_string();
        self
    }

    pub fn market_url(mut self, url: &str) -> Self {
        self.raw.market_url = url.to_string();
        self
    }

    pub fn prices_updated_at(mut self, timestamp: &str) -> Self {
        self.raw.prices_updated_at = timestamp.to_string();
        self
    }

    /// Add a variant with only a market price
    pub fn price(self, variant: &str, market: f64) -> Self {
        self.variant(
            variant,
            VariantPrice {
                market,
                low: None,
                high: None,
            },
        )
    }

    pub fn variant(mut self, variant: &str, price: VariantPrice) -> Self {
        self.raw.prices.insert(variant.to_string(), price);
        self
    }

    pub fn build(self) -> Card {
        Card::from(self.raw)
    }
}

/// Full catalog file structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    pub generated_at: String,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub total_cards: usize,
    pub cards: Vec<Card>,
}

/// Catalog metadata exposed to callers once a catalog is loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogInfo {
    pub generated_at: String,
    pub total_cards: usize,
    pub min_price: f64,
}
