//! Seller aggregation: folds listings from many farmers into one view per
//! product, keyed by [`GroupKey`].
//!
//! List views are catalog-first: every catalog product gets a view, even with no
//! sellers, and listings without a catalog counterpart are reported separately
//! as `unlisted`. The per-product seller view is listing-first and falls back to
//! the catalog.
//!
//! Variations keep the order the listings arrived in. Any sorting is up to the
//! caller.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CatalogEntry, ReferencePriceTable};
use crate::listing::{Category, Listing};
use crate::normalize::{fold, group_key, normalize, GroupKey};
use crate::savings::{compute_savings, Savings};

/// One logical product with every seller's offer of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub key: GroupKey,
    pub name: String,
    pub category: String,
    pub reference_price: f64,
    pub variations: Vec<Listing>,
}

impl ProductView {
    fn from_entry(key: GroupKey, entry: &CatalogEntry<'_>) -> Self {
        Self {
            key,
            name: entry.name.to_string(),
            category: entry.category.to_string(),
            reference_price: entry.price,
            variations: Vec::new(),
        }
    }

    /// Number of distinct farmers offering this product.
    pub fn seller_count(&self) -> usize {
        self.variations
            .iter()
            .map(|l| &l.seller)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn available(&self) -> impl Iterator<Item = &Listing> {
        self.variations.iter().filter(|l| l.is_available())
    }

    /// Cheapest available offer.
    pub fn lowest_price(&self) -> Option<f64> {
        self.available().map(|l| l.price).min_by(f64::total_cmp)
    }

    pub fn savings_for(&self, listing: &Listing) -> Savings {
        compute_savings(listing.price, self.reference_price)
    }

    /// Savings of the cheapest available offer.
    pub fn best_savings(&self) -> Savings {
        self.lowest_price()
            .map(|price| compute_savings(price, self.reference_price))
            .unwrap_or(Savings::NONE)
    }
}

/// Result of a list-view aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub products: Vec<ProductView>,
    /// Valid listings whose product is not in the catalog.
    pub unlisted: Vec<Listing>,
    /// Listings with a blank name or category.
    pub excluded: Vec<Listing>,
}

impl Aggregation {
    /// True when there are no catalog products to show.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products with at least one seller.
    pub fn with_sellers(&self) -> impl Iterator<Item = &ProductView> {
        self.products.iter().filter(|p| !p.variations.is_empty())
    }

    pub fn find(&self, key: &GroupKey) -> Option<&ProductView> {
        self.products.iter().find(|p| &p.key == key)
    }
}

/// Group `listings` under every product of the catalog.
///
/// An empty catalog yields no products; every keyable listing is then unlisted.
pub fn aggregate(table: &ReferencePriceTable, listings: &[Listing]) -> Aggregation {
    collect(table.entries(), listings.iter())
}

/// Like [`aggregate`], restricted to one category. Listings of other
/// categories are ignored. A listing belongs to the category when its raw
/// category parses to it, so label spellings such as `Herbs & Spices` are
/// kept and reported the same way [`aggregate`] reports them. Blank categories
/// are kept so they land in `excluded`.
pub fn aggregate_category(
    table: &ReferencePriceTable,
    category: Category,
    listings: &[Listing],
) -> Aggregation {
    let in_category = listings
        .iter()
        .filter(|l| l.category.trim().is_empty() || l.category_kind() == Some(category));
    collect(table.products_in(category.as_str()), in_category)
}

fn collect<'a, 'l>(
    entries: impl Iterator<Item = CatalogEntry<'a>>,
    listings: impl Iterator<Item = &'l Listing>,
) -> Aggregation {
    let mut out = Aggregation::default();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for entry in entries {
        let Some(key) = group_key(entry.name, entry.category) else {
            continue;
        };
        // Catalog names that fold to the same key: the first one wins.
        if index.contains_key(&key) {
            continue;
        }
        index.insert(key.clone(), out.products.len());
        out.products.push(ProductView::from_entry(key, &entry));
    }

    for listing in listings {
        match normalize(listing) {
            None => {
                debug!(listing = %listing.id, "excluding listing with blank name or category");
                out.excluded.push(listing.clone());
            }
            Some(key) => match index.get(&key) {
                Some(&i) => out.products[i].variations.push(listing.clone()),
                None => {
                    debug!(listing = %listing.id, %key, "listing has no catalog entry");
                    out.unlisted.push(listing.clone());
                }
            },
        }
    }

    out
}

/// Detail view for one product name: every farmer selling it.
///
/// The first live listing with a matching name decides the category; without
/// one, the catalog does. Name, category and reference price come from the
/// catalog when it knows the product, otherwise from the first listing.
/// Returns `None` when neither source knows the name.
pub fn seller_view(
    table: &ReferencePriceTable,
    name: &str,
    listings: &[Listing],
) -> Option<ProductView> {
    let wanted = fold(name);
    if wanted.is_empty() {
        return None;
    }

    let key = match listings
        .iter()
        .filter(|l| fold(&l.name) == wanted)
        .find_map(normalize)
    {
        Some(key) => key,
        None => {
            let entry = table.find_by_name(name)?;
            group_key(entry.name, entry.category)?
        }
    };

    let variations: Vec<Listing> = listings
        .iter()
        .filter(|l| normalize(l).as_ref() == Some(&key))
        .cloned()
        .collect();

    let catalog_entry = table
        .entries()
        .find(|e| group_key(e.name, e.category).as_ref() == Some(&key));

    match catalog_entry {
        Some(entry) => {
            let mut view = ProductView::from_entry(key, &entry);
            view.variations = variations;
            Some(view)
        }
        None => {
            let first = variations.first()?;
            debug!(%key, price = first.price, "no reference price, using first listing");
            Some(ProductView {
                name: first.name.trim().to_string(),
                category: first.category.trim().to_string(),
                reference_price: first.price,
                key,
                variations,
            })
        }
    }
}
