//! Card Price Lookup CLI
//!
//! Loads the cached price catalog and prints the best matches for a query.

use card_price_lookup::{
    Card, CatalogSource, FileCatalogSource, HttpCatalogSource, SearchConfig, SearchService,
};
use clap::Parser;
use std::path::PathBuf;

/// Look up trading card prices by number, set and number, or name
#[derive(Parser, Debug)]
#[command(name = "card_lookup")]
#[command(version, about, long_about = None)]
struct Args {
    /// Search query, e.g. "4/102", "base set 4", "charizard"
    query: Option<String>,

    /// Path to the catalog JSON file
    #[arg(short, long, default_value_t = default_catalog_path())]
    catalog: String,

    /// Fetch the catalog from this URL instead of the local file
    #[arg(short, long)]
    url: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 50)]
    limit: usize,

    /// Plain fuzzy matching, without number parsing or exact-first ranking
    #[arg(long, default_value_t = false)]
    fuzzy_only: bool,

    /// Print catalog metadata and exit
    #[arg(long, default_value_t = false)]
    info: bool,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn default_catalog_path() -> String {
    FileCatalogSource::default_path()
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let code = match args.url.clone() {
        Some(url) => match HttpCatalogSource::new(url) {
            Ok(source) => run(source, &args).await,
            Err(e) => {
                log::error!("Failed to set up HTTP client: {}", e);
                1
            }
        },
        None => run(FileCatalogSource::new(PathBuf::from(&args.catalog)), &args).await,
    };
    std::process::exit(code);
}

async fn run<S: CatalogSource>(source: S, args: &Args) -> i32 {
    let config = SearchConfig {
        default_limit: args.limit,
        ..SearchConfig::default()
    };
    let service = SearchService::with_config(source, config);

    if let Err(e) = service.load_catalog().await {
        log::error!("Failed to load card catalog: {}", e);
        return 1;
    }

    let Some(info) = service.get_catalog_info() else {
        log::error!("No card catalog available");
        return 2;
    };

    if args.info {
        println!("Generated at: {}", info.generated_at);
        println!("Total cards:  {}", info.total_cards);
        println!("Min price:    {:.2}", info.min_price);
        return 0;
    }

    let Some(query) = args.query.as_deref() else {
        log::error!("No query given (use --info to show catalog metadata)");
        return 2;
    };

    let results = if args.fuzzy_only {
        service.search(query, Some(args.limit))
    } else {
        log::debug!("Parsed query: {:?}", service.classify(query).intent());
        service.smart_search(query, Some(args.limit))
    };

    if args.json {
        let cards: Vec<&Card> = results.iter().map(|card| &**card).collect();
        match serde_json::to_string_pretty(&cards) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize results: {}", e);
                return 1;
            }
        }
    } else if results.is_empty() {
        println!("No cards found for \"{}\"", query);
    } else {
        for card in &results {
            println!("{}", format_card_line(card));
        }
    }

    0
}

fn format_card_line(card: &Card) -> String {
    let price = match card.best_variant() {
        Some((variant, price)) => format!("${:.2} ({})", price.market, variant),
        None => "no price".to_string(),
    };
    format!(
        "{:<28} {:<28} {:>9}  {:<18} {}",
        card.name(),
        card.set_name(),
        card.number(),
        card.rarity(),
        price
    )
}
