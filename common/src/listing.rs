use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::SellerId;

/// Unique listing identifier (assigned by the store, monotonically increasing).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Crop category. Serialized as the exact catalog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetables,
    Fruits,
    Grains,
    HerbsAndSpices,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Vegetables,
            Category::Fruits,
            Category::Grains,
            Category::HerbsAndSpices,
        ]
    }

    /// Identifier used as the catalog key and in stored listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Grains => "Grains",
            Category::HerbsAndSpices => "HerbsAndSpices",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::HerbsAndSpices => "Herbs & Spices",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts identifiers and display labels, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::all()
            .iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted)
            })
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    #[default]
    Available,
    SoldOut,
}

/// One farmer's offer of one product.
///
/// `category` keeps the raw string as it was stored so that grouping can
/// case-fold it; use [`Listing::category_kind`] for the typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller: SellerId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity_kg: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn category_kind(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }

    /// Apply an owner edit. Fields left `None` are untouched.
    pub fn apply(&mut self, patch: &ListingPatch, now: DateTime<Utc>) -> Result<(), ListingError> {
        patch.validate()?;
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity_kg {
            self.quantity_kg = quantity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ListingError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("price must be positive, got {0}")]
    InvalidPrice(f64),
    #[error("quantity must be non-negative, got {0}")]
    InvalidQuantity(f64),
}

fn check_price(price: f64) -> Result<(), ListingError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ListingError::InvalidPrice(price))
    }
}

fn check_quantity(quantity: f64) -> Result<(), ListingError> {
    if quantity.is_finite() && quantity >= 0.0 {
        Ok(())
    } else {
        Err(ListingError::InvalidQuantity(quantity))
    }
}

/// What a seller submits when creating a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub quantity_kg: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewListing {
    pub fn new(name: impl Into<String>, category: Category, price: f64, quantity_kg: f64) -> Self {
        Self {
            name: name.into(),
            category,
            price,
            quantity_kg,
            image: None,
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ListingError> {
        if self.name.trim().is_empty() {
            return Err(ListingError::EmptyName);
        }
        check_price(self.price)?;
        check_quantity(self.quantity_kg)
    }

    /// Build the stored listing. The name is trimmed; everything else is kept as given.
    pub fn into_listing(self, id: ListingId, seller: SellerId, now: DateTime<Utc>) -> Listing {
        Listing {
            id,
            seller,
            name: self.name.trim().to_string(),
            category: self.category.as_str().to_string(),
            price: self.price,
            quantity_kg: self.quantity_kg,
            image: self.image,
            description: self.description,
            status: ListingStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner edit to an existing listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPatch {
    pub price: Option<f64>,
    pub quantity_kg: Option<f64>,
    pub status: Option<ListingStatus>,
    pub description: Option<String>,
}

impl ListingPatch {
    pub fn validate(&self) -> Result<(), ListingError> {
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(quantity) = self.quantity_kg {
            check_quantity(quantity)?;
        }
        Ok(())
    }
}
