use chrono::Utc;

use farmgate_common::aggregate::{aggregate, aggregate_category, seller_view, Aggregation, ProductView};
use farmgate_common::catalog::ReferencePriceTable;
use farmgate_common::contact::{ContactBook, SavedContact};
use farmgate_common::identity::{
    BuyerId, IdentityProvider, SellerId, StaticIdentity, UserIdentity, UserRole,
};
use farmgate_common::listing::{Category, Listing, ListingId, ListingPatch, NewListing};
use farmgate_common::rating::{MemoryRatings, Rating, RatingError, RatingStore};
use farmgate_common::store::{ListingStore, MemoryStore, StoreError};

/// A farmer participant with a signed-in session.
pub struct Farmer {
    pub name: String,
    pub phone: String,
    pub session: StaticIdentity,
}

impl Farmer {
    pub fn new(id: &str, name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            session: StaticIdentity::signed_in(UserIdentity::new(id, name, UserRole::Farmer)),
        }
    }

    pub fn id(&self) -> SellerId {
        self.session
            .current_user()
            .and_then(|u| u.as_seller())
            .expect("farmer session is signed in as a farmer")
    }

    /// List a product and return the stored listing.
    pub fn add_listing(
        &self,
        store: &impl ListingStore,
        name: &str,
        category: Category,
        price: f64,
    ) -> Listing {
        store
            .insert(&self.id(), NewListing::new(name, category, price, 50.0))
            .unwrap_or_else(|e| panic!("{} could not list {name}: {e}", self.name))
    }

    pub fn edit_listing(
        &self,
        store: &impl ListingStore,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, StoreError> {
        store.update(&self.id(), id, &patch)
    }

    pub fn remove_listing(&self, store: &impl ListingStore, id: &ListingId) -> Result<(), StoreError> {
        store.delete(&self.id(), id)
    }
}

/// A buyer participant with a signed-in session and saved contacts.
pub struct Buyer {
    pub name: String,
    pub session: StaticIdentity,
    pub contacts: ContactBook,
}

impl Buyer {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            session: StaticIdentity::signed_in(UserIdentity::new(id, name, UserRole::Buyer)),
            contacts: ContactBook::new(),
        }
    }

    pub fn id(&self) -> BuyerId {
        self.session
            .current_user()
            .map(|u| u.as_buyer())
            .expect("buyer session is signed in")
    }

    pub fn save_contact(&mut self, farmer: &Farmer) -> bool {
        self.contacts.save(SavedContact {
            seller: farmer.id(),
            display_name: farmer.name.clone(),
            phone: Some(farmer.phone.clone()),
            saved_at: Utc::now(),
        })
    }

    pub fn rate(
        &self,
        ratings: &impl RatingStore,
        farmer: &Farmer,
        stars: u8,
    ) -> Result<Rating, RatingError> {
        ratings.rate(&self.id(), &farmer.id(), stars, None)
    }
}

/// Two farmers (Gary, Emma) and two buyers (Alice, Bob) sharing one store.
pub struct TestHarness {
    pub catalog: ReferencePriceTable,
    pub store: MemoryStore,
    pub ratings: MemoryRatings,
    pub gary: Farmer,
    pub emma: Farmer,
    pub alice: Buyer,
    pub bob: Buyer,
}

impl TestHarness {
    /// Harness over the bundled market prices.
    pub fn setup() -> Self {
        Self::with_catalog(ReferencePriceTable::builtin())
    }

    pub fn with_catalog(catalog: ReferencePriceTable) -> Self {
        crate::init_test_tracing();
        Self {
            catalog,
            store: MemoryStore::new(),
            ratings: MemoryRatings::new(),
            gary: Farmer::new("farmer-gary", "Gary", "+91 90000 00001"),
            emma: Farmer::new("farmer-emma", "Emma", "+91 90000 00002"),
            alice: Buyer::new("buyer-alice", "Alice"),
            bob: Buyer::new("buyer-bob", "Bob"),
        }
    }

    /// "All products" list view over the current store contents.
    pub fn browse(&self) -> Aggregation {
        let listings = self.store.fetch_all().expect("memory store is available");
        aggregate(&self.catalog, &listings)
    }

    pub fn browse_category(&self, category: Category) -> Aggregation {
        let listings = self
            .store
            .fetch_listings_by_category(category)
            .expect("memory store is available");
        aggregate_category(&self.catalog, category, &listings)
    }

    /// Seller page for one product name.
    pub fn product(&self, name: &str) -> Option<ProductView> {
        let listings = self
            .store
            .fetch_listings_by_name(name)
            .expect("memory store is available");
        seller_view(&self.catalog, name, &listings)
    }
}
