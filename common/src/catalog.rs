//! Reference price table: category → product name → market price per kg.
//!
//! Loaded once at startup (bundled or from a JSON file) and passed explicitly to
//! the aggregator. Category keys are the exact identifiers (`Vegetables`,
//! `Fruits`, `Grains`, `HerbsAndSpices`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::fold;

const MARKET_PRICES_JSON: &str = include_str!("market_prices.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid reference price {price} for {category}/{name}")]
    InvalidPrice {
        category: String,
        name: String,
        price: f64,
    },
    #[error("empty category or product name in catalog")]
    EmptyName,
}

/// One (category, product, price) triple of the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePriceTable {
    categories: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ReferencePriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The market price list shipped with the crate.
    pub fn builtin() -> Self {
        // Bundled file is checked by builtin_covers_every_category.
        Self::from_json_str(MARKET_PRICES_JSON).expect("bundled market prices are valid")
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let table: ReferencePriceTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Add or replace one price. Used to build tables in code.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Result<(), CatalogError> {
        let (category, name) = (category.into(), name.into());
        check_entry(&category, &name, price)?;
        self.categories.entry(category).or_default().insert(name, price);
        Ok(())
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for entry in self.entries() {
            check_entry(entry.category, entry.name, entry.price)?;
        }
        if self.categories.keys().any(|c| c.trim().is_empty()) {
            return Err(CatalogError::EmptyName);
        }
        Ok(())
    }

    /// Every (category, name, price) triple, categories and names in key order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.categories.iter().flat_map(|(category, products)| {
            products.iter().map(move |(name, price)| CatalogEntry {
                category: category.as_str(),
                name: name.as_str(),
                price: *price,
            })
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Products of one category. Matches the category key ignoring case.
    pub fn products_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = CatalogEntry<'a>> {
        let wanted = fold(category);
        self.entries().filter(move |e| fold(e.category) == wanted)
    }

    /// Reference price for a product. Exact keys first, then a trimmed,
    /// case-insensitive match.
    pub fn reference_price(&self, category: &str, name: &str) -> Option<f64> {
        if let Some(price) = self.categories.get(category).and_then(|p| p.get(name)) {
            return Some(*price);
        }
        let (category, name) = (fold(category), fold(name));
        self.entries()
            .find(|e| fold(e.category) == category && fold(e.name) == name)
            .map(|e| e.price)
    }

    /// First entry, in table order, whose product name matches. A name listed
    /// under several categories resolves to the first of them.
    pub fn find_by_name(&self, name: &str) -> Option<CatalogEntry<'_>> {
        let name = fold(name);
        self.entries().find(|e| fold(e.name) == name)
    }

    /// Number of products across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_entry(category: &str, name: &str, price: f64) -> Result<(), CatalogError> {
    if category.trim().is_empty() || name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::InvalidPrice {
            category: category.to_string(),
            name: name.to_string(),
            price,
        });
    }
    Ok(())
}
