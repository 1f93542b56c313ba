//! Startup inputs: the reference price table, the listings snapshot and farmer
//! ratings. Each is read once and handed to the commands explicitly.

use std::path::Path;

use anyhow::{Context, Result};
use farmgate_common::catalog::ReferencePriceTable;
use farmgate_common::listing::Listing;
use farmgate_common::rating::{MemoryRatings, Rating, RatingStore};
use tracing::{info, warn};

/// Catalog from `path`, or the bundled market prices.
pub fn load_catalog(path: Option<&Path>) -> Result<ReferencePriceTable> {
    let Some(path) = path else {
        return Ok(ReferencePriceTable::builtin());
    };
    let table = ReferencePriceTable::from_path(path)
        .with_context(|| format!("loading catalog from {}", path.display()))?;
    info!(path = %path.display(), products = table.len(), "catalog loaded");
    if table.is_empty() {
        warn!(path = %path.display(), "catalog is empty; list views will show no products");
    }
    Ok(table)
}

/// Listings snapshot (JSON array), or nothing.
pub fn load_listings(path: Option<&Path>) -> Result<Vec<Listing>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading listings from {}", path.display()))?;
    let listings: Vec<Listing> = serde_json::from_str(&json)
        .with_context(|| format!("parsing listings from {}", path.display()))?;
    info!(path = %path.display(), count = listings.len(), "listings loaded");
    Ok(listings)
}

/// Ratings (JSON array) replayed into an in-memory store. Invalid ratings are
/// skipped with a warning.
pub fn load_ratings(path: Option<&Path>) -> Result<MemoryRatings> {
    let store = MemoryRatings::new();
    let Some(path) = path else {
        return Ok(store);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading ratings from {}", path.display()))?;
    let ratings: Vec<Rating> = serde_json::from_str(&json)
        .with_context(|| format!("parsing ratings from {}", path.display()))?;
    for r in ratings {
        if let Err(e) = store.rate(&r.buyer, &r.farmer, r.stars, r.comment) {
            warn!(farmer = %r.farmer, buyer = %r.buyer, "skipping rating: {e}");
        }
    }
    Ok(store)
}
