use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::identity::{BuyerId, SellerId};

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;

/// A buyer's star rating of a farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub farmer: SellerId,
    pub buyer: BuyerId,
    pub stars: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating must be between 1 and 5 stars, got {0}")]
    OutOfRange(u8),
    #[error("farmers cannot rate themselves")]
    SelfRating,
    #[error("rating store unavailable")]
    Unavailable,
}

pub trait RatingStore {
    /// Record a rating. A buyer's later rating of the same farmer replaces the earlier one.
    fn rate(
        &self,
        buyer: &BuyerId,
        farmer: &SellerId,
        stars: u8,
        comment: Option<String>,
    ) -> Result<Rating, RatingError>;

    /// Mean star rating, one decimal place. Zero for an unrated farmer.
    fn average_rating(&self, farmer: &SellerId) -> Result<f64, RatingError>;

    fn ratings_for(&self, farmer: &SellerId) -> Result<Vec<Rating>, RatingError>;
}

/// Mean of the given star values rounded to one decimal, or zero when empty.
pub fn average_stars(stars: impl IntoIterator<Item = u8>) -> f64 {
    let (sum, count) = stars
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), s| (sum + s as u32, count + 1));
    if count == 0 {
        return 0.0;
    }
    (sum as f64 * 10.0 / count as f64).round() / 10.0
}

#[derive(Debug, Default)]
pub struct MemoryRatings {
    ratings: RwLock<BTreeMap<(SellerId, BuyerId), Rating>>,
}

impl MemoryRatings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for MemoryRatings {
    fn rate(
        &self,
        buyer: &BuyerId,
        farmer: &SellerId,
        stars: u8,
        comment: Option<String>,
    ) -> Result<Rating, RatingError> {
        if !(MIN_STARS..=MAX_STARS).contains(&stars) {
            return Err(RatingError::OutOfRange(stars));
        }
        if buyer.0 == farmer.0 {
            return Err(RatingError::SelfRating);
        }
        let rating = Rating {
            farmer: farmer.clone(),
            buyer: buyer.clone(),
            stars,
            comment: comment.filter(|c| !c.trim().is_empty()),
            created_at: Utc::now(),
        };
        let mut ratings = self.ratings.write().map_err(|_| RatingError::Unavailable)?;
        let replaced = ratings
            .insert((farmer.clone(), buyer.clone()), rating.clone())
            .is_some();
        debug!(%farmer, %buyer, stars, replaced, "rating recorded");
        Ok(rating)
    }

    fn average_rating(&self, farmer: &SellerId) -> Result<f64, RatingError> {
        Ok(average_stars(
            self.ratings_for(farmer)?.into_iter().map(|r| r.stars),
        ))
    }

    fn ratings_for(&self, farmer: &SellerId) -> Result<Vec<Rating>, RatingError> {
        let ratings = self.ratings.read().map_err(|_| RatingError::Unavailable)?;
        Ok(ratings
            .iter()
            .filter(|((f, _), _)| f == farmer)
            .map(|(_, r)| r.clone())
            .collect())
    }
}
