//! Listing persistence seam.
//!
//! The hosted backend is reached through [`ListingStore`]; [`MemoryStore`] is the
//! in-process implementation used by the CLI and tests. Only the owning seller may
//! change or remove a listing.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use crate::identity::SellerId;
use crate::listing::{Category, Listing, ListingError, ListingId, ListingPatch, NewListing};
use crate::normalize::fold;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("listing {0} not found")]
    NotFound(ListingId),
    #[error("listing {id} is not owned by {seller}")]
    NotOwner { id: ListingId, seller: SellerId },
    #[error("invalid listing: {0}")]
    Invalid(#[from] ListingError),
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

pub trait ListingStore {
    fn fetch_listings_by_category(&self, category: Category) -> Result<Vec<Listing>, StoreError>;

    /// Listings whose trimmed name matches `name`, ignoring case.
    fn fetch_listings_by_name(&self, name: &str) -> Result<Vec<Listing>, StoreError>;

    fn fetch_all(&self) -> Result<Vec<Listing>, StoreError>;

    fn fetch_by_seller(&self, seller: &SellerId) -> Result<Vec<Listing>, StoreError>;

    fn insert(&self, seller: &SellerId, listing: NewListing) -> Result<Listing, StoreError>;

    fn update(
        &self,
        seller: &SellerId,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, StoreError>;

    fn delete(&self, seller: &SellerId, id: &ListingId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Insertion order is the order fetches return.
    listings: Vec<Listing>,
    next_id: u64,
}

impl MemoryState {
    fn owned_mut(&mut self, seller: &SellerId, id: &ListingId) -> Result<usize, StoreError> {
        let idx = self
            .listings
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if &self.listings[idx].seller != seller {
            return Err(StoreError::NotOwner {
                id: id.clone(),
                seller: seller.clone(),
            });
        }
        Ok(idx)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing snapshot, kept in the given order.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: listings.len() as u64,
                listings,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn filtered(&self, keep: impl Fn(&Listing) -> bool) -> Result<Vec<Listing>, StoreError> {
        Ok(self.read()?.listings.iter().filter(|l| keep(l)).cloned().collect())
    }
}

impl ListingStore for MemoryStore {
    fn fetch_listings_by_category(&self, category: Category) -> Result<Vec<Listing>, StoreError> {
        self.filtered(|l| l.category_kind() == Some(category))
    }

    fn fetch_listings_by_name(&self, name: &str) -> Result<Vec<Listing>, StoreError> {
        let wanted = fold(name);
        self.filtered(|l| fold(&l.name) == wanted)
    }

    fn fetch_all(&self) -> Result<Vec<Listing>, StoreError> {
        self.filtered(|_| true)
    }

    fn fetch_by_seller(&self, seller: &SellerId) -> Result<Vec<Listing>, StoreError> {
        self.filtered(|l| &l.seller == seller)
    }

    fn insert(&self, seller: &SellerId, listing: NewListing) -> Result<Listing, StoreError> {
        listing.validate()?;
        let mut state = self.write()?;
        // Snapshot ids may collide with generated ones; skip past them.
        let id = loop {
            state.next_id += 1;
            let candidate = ListingId(format!("l-{:06}", state.next_id));
            if !state.listings.iter().any(|l| l.id == candidate) {
                break candidate;
            }
        };
        let listing = listing.into_listing(id, seller.clone(), Utc::now());
        debug!(listing = %listing.id, %seller, name = %listing.name, "listing created");
        state.listings.push(listing.clone());
        Ok(listing)
    }

    fn update(
        &self,
        seller: &SellerId,
        id: &ListingId,
        patch: &ListingPatch,
    ) -> Result<Listing, StoreError> {
        let mut state = self.write()?;
        let idx = state.owned_mut(seller, id)?;
        let listing = &mut state.listings[idx];
        listing.apply(patch, Utc::now())?;
        debug!(listing = %id, %seller, "listing updated");
        Ok(listing.clone())
    }

    fn delete(&self, seller: &SellerId, id: &ListingId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let idx = state.owned_mut(seller, id)?;
        state.listings.remove(idx);
        debug!(listing = %id, %seller, "listing deleted");
        Ok(())
    }
}
