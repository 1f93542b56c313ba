//! Reports for the list and seller views, as JSON or plain text.

use std::fmt;

use farmgate_common::aggregate::{Aggregation, ProductView};
use farmgate_common::catalog::ReferencePriceTable;
use farmgate_common::currency::{format_price, format_price_per_kg, format_savings};
use farmgate_common::identity::SellerId;
use farmgate_common::listing::{Category, ListingId, ListingStatus};
use farmgate_common::rating::{RatingError, RatingStore};
use farmgate_common::savings::Savings;
use serde::Serialize;

fn category_label(raw: &str) -> String {
    raw.parse::<Category>()
        .map(|c| c.label().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Serialize)]
pub struct ProductRow {
    pub name: String,
    pub category: String,
    pub reference_price: f64,
    pub sellers: usize,
    pub lowest_price: Option<f64>,
    pub best_savings: Savings,
}

impl From<&ProductView> for ProductRow {
    fn from(view: &ProductView) -> Self {
        Self {
            name: view.name.clone(),
            category: category_label(&view.category),
            reference_price: view.reference_price,
            sellers: view.seller_count(),
            lowest_price: view.lowest_price(),
            best_savings: view.best_savings(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnlistedRow {
    pub listing: ListingId,
    pub seller: SellerId,
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct BrowseReport {
    pub products: Vec<ProductRow>,
    pub unlisted: Vec<UnlistedRow>,
    pub excluded: usize,
}

impl BrowseReport {
    pub fn new<'a>(products: impl IntoIterator<Item = &'a ProductView>, agg: &Aggregation) -> Self {
        Self {
            products: products.into_iter().map(ProductRow::from).collect(),
            unlisted: agg
                .unlisted
                .iter()
                .map(|l| UnlistedRow {
                    listing: l.id.clone(),
                    seller: l.seller.clone(),
                    name: l.name.trim().to_string(),
                    category: category_label(l.category.trim()),
                    price: l.price,
                })
                .collect(),
            excluded: agg.excluded.len(),
        }
    }
}

impl fmt::Display for BrowseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.products.is_empty() {
            writeln!(f, "No products.")?;
        }
        let mut current: Option<&str> = None;
        for row in &self.products {
            if current != Some(row.category.as_str()) {
                writeln!(f, "{}", row.category)?;
                current = Some(row.category.as_str());
            }
            let offers = match (row.sellers, row.lowest_price) {
                (0, _) => "no sellers".to_string(),
                (_, None) => "sold out".to_string(),
                (1, Some(p)) => format!("1 seller, from {}", format_price_per_kg(p)),
                (n, Some(p)) => format!("{n} sellers, from {}", format_price_per_kg(p)),
            };
            writeln!(
                f,
                "  {:<16} market {:<12} {} {}",
                row.name,
                format_price_per_kg(row.reference_price),
                offers,
                format_savings(&row.best_savings)
            )?;
        }
        if !self.unlisted.is_empty() {
            writeln!(f, "Not in catalog:")?;
            for row in &self.unlisted {
                writeln!(
                    f,
                    "  {} ({}) by {} at {}",
                    row.name,
                    row.category,
                    row.seller,
                    format_price_per_kg(row.price)
                )?;
            }
        }
        if self.excluded > 0 {
            writeln!(f, "{} listing(s) skipped: missing name or category", self.excluded)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SellerOffer {
    pub listing: ListingId,
    pub seller: SellerId,
    pub seller_rating: f64,
    pub price: f64,
    pub quantity_kg: f64,
    pub status: ListingStatus,
    pub savings: Savings,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub name: String,
    pub category: String,
    pub reference_price: f64,
    pub offers: Vec<SellerOffer>,
}

impl ProductDetail {
    pub fn new(view: &ProductView, ratings: &impl RatingStore) -> Result<Self, RatingError> {
        let offers = view
            .variations
            .iter()
            .map(|l| {
                Ok::<_, RatingError>(SellerOffer {
                    listing: l.id.clone(),
                    seller: l.seller.clone(),
                    seller_rating: ratings.average_rating(&l.seller)?,
                    price: l.price,
                    quantity_kg: l.quantity_kg,
                    status: l.status,
                    savings: view.savings_for(l),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: view.name.clone(),
            category: category_label(&view.category),
            reference_price: view.reference_price,
            offers,
        })
    }
}

impl fmt::Display for ProductDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}), market price {}",
            self.name,
            self.category,
            format_price_per_kg(self.reference_price)
        )?;
        if self.offers.is_empty() {
            writeln!(f, "  No sellers yet.")?;
        }
        for offer in &self.offers {
            let status = match offer.status {
                ListingStatus::Available => "",
                ListingStatus::SoldOut => " [sold out]",
            };
            let rating = if offer.seller_rating > 0.0 {
                format!("{:.1}★", offer.seller_rating)
            } else {
                "unrated".to_string()
            };
            writeln!(
                f,
                "  {:<12} {:<8} {:>10} {:>7.1} kg {}{}",
                offer.seller.0,
                rating,
                format_price(offer.price),
                offer.quantity_kg,
                format_savings(&offer.savings),
                status
            )?;
        }
        Ok(())
    }
}

/// Plain-text rendering of the reference table, with display labels.
pub struct CatalogText<'a>(pub &'a ReferencePriceTable);

impl fmt::Display for CatalogText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in self.0.categories() {
            writeln!(f, "{}", category_label(category))?;
            for entry in self.0.products_in(category) {
                writeln!(f, "  {:<16} {}", entry.name, format_price_per_kg(entry.price))?;
            }
        }
        Ok(())
    }
}
