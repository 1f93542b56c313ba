//! FarmGate marketplace CLI.
//!
//! Loads the reference price catalog and a snapshot of farmer listings at
//! startup, then prints one of:
//!
//! 1. **browse** → every catalog product with its seller count, lowest price and savings
//! 2. **product** → every farmer selling one product, with savings and ratings
//! 3. **savings** → the raw savings calculation for a price pair
//! 4. **catalog** → the reference price table itself

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use farmgate_common::aggregate::{aggregate, aggregate_category, seller_view};
use farmgate_common::currency::format_savings;
use farmgate_common::listing::Category;
use farmgate_common::savings::compute_savings;
use farmgate_common::search::search_products;
use farmgate_common::store::{ListingStore, MemoryStore};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use render::{BrowseReport, CatalogText, ProductDetail};

#[derive(Parser)]
#[command(name = "farmgate", about = "Compare farmer prices against market rates")]
struct Cli {
    /// Reference price table (JSON: category → product → price per kg).
    /// Defaults to the bundled market prices.
    #[arg(long, env = "FARMGATE_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Listings snapshot (JSON array of listings).
    #[arg(long, env = "FARMGATE_LISTINGS", global = true)]
    listings: Option<PathBuf>,

    /// Farmer ratings (JSON array of ratings).
    #[arg(long, env = "FARMGATE_RATINGS", global = true)]
    ratings: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog products with their sellers.
    Browse {
        /// Only this category (e.g. Vegetables, "Herbs & Spices").
        #[arg(long)]
        category: Option<Category>,

        /// Only products whose name contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show every farmer selling a product.
    Product {
        name: String,
    },
    /// Savings of a listing price against a reference price.
    Savings {
        price: f64,
        reference: f64,
    },
    /// Print the reference price table.
    Catalog,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let catalog = config::load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Catalog => emit(cli.json, &catalog, |t| CatalogText(t).to_string()),
        Command::Savings { price, reference } => {
            let savings = compute_savings(price, reference);
            emit(cli.json, &savings, |s| {
                let badge = format_savings(s);
                if badge.is_empty() {
                    "No savings.\n".to_string()
                } else {
                    format!("{badge}\n")
                }
            })
        }
        Command::Browse { category, search } => {
            let store = MemoryStore::from_listings(config::load_listings(cli.listings.as_deref())?);
            let agg = match category {
                Some(category) => {
                    aggregate_category(&catalog, category, &store.fetch_listings_by_category(category)?)
                }
                None => aggregate(&catalog, &store.fetch_all()?),
            };
            debug!(
                products = agg.products.len(),
                unlisted = agg.unlisted.len(),
                excluded = agg.excluded.len(),
                "aggregated listings"
            );
            let shown = search_products(&agg.products, search.as_deref().unwrap_or(""));
            let report = BrowseReport::new(shown, &agg);
            emit(cli.json, &report, BrowseReport::to_string)
        }
        Command::Product { name } => {
            let store = MemoryStore::from_listings(config::load_listings(cli.listings.as_deref())?);
            let ratings = config::load_ratings(cli.ratings.as_deref())?;
            let Some(view) = seller_view(&catalog, &name, &store.fetch_listings_by_name(&name)?)
            else {
                bail!("no product named {name:?} in the catalog or listings");
            };
            let detail = ProductDetail::new(&view, &ratings)?;
            emit(cli.json, &detail, ProductDetail::to_string)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
