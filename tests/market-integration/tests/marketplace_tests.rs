use farmgate_common::listing::{Category, ListingPatch, ListingStatus};
use farmgate_common::normalize::group_key;
use farmgate_common::rating::{RatingError, RatingStore};
use farmgate_common::store::StoreError;
use farmgate_market_integration::harness::TestHarness;

/// Gary and Emma both list tomatoes; the buyer sees one product with two sellers.
#[test]
fn two_farmers_one_product() {
    let h = TestHarness::setup();
    h.gary.add_listing(&h.store, "Tomato", Category::Vegetables, 35.0);
    h.emma.add_listing(&h.store, "tomato", Category::Vegetables, 32.0);

    let agg = h.browse();
    let key = group_key("Tomato", "Vegetables").unwrap();
    let tomato = agg.find(&key).expect("tomato is in the bundled catalog");
    assert_eq!(tomato.seller_count(), 2);
    assert_eq!(tomato.lowest_price(), Some(32.0));
    // Gary listed first.
    assert_eq!(tomato.variations[0].seller, h.gary.id());
    assert_eq!(tomato.reference_price, 40.0);
    assert_eq!(tomato.best_savings().absolute, 8.0);
}

/// Every bundled product shows up even before anyone lists it.
#[test]
fn catalog_products_show_without_sellers() {
    let h = TestHarness::setup();
    let agg = h.browse();
    assert_eq!(agg.products.len(), h.catalog.len());
    assert_eq!(agg.with_sellers().count(), 0);
}

#[test]
fn category_browse_only_shows_that_category() {
    let h = TestHarness::setup();
    h.gary.add_listing(&h.store, "Mango", Category::Fruits, 100.0);
    h.emma.add_listing(&h.store, "Rice", Category::Grains, 50.0);

    let fruits = h.browse_category(Category::Fruits);
    assert!(fruits.products.iter().all(|p| p.category == "Fruits"));
    assert_eq!(fruits.with_sellers().count(), 1);
    assert!(fruits.unlisted.is_empty());
}

#[test]
fn only_the_owner_can_edit_or_remove() {
    let h = TestHarness::setup();
    let listing = h.gary.add_listing(&h.store, "Wheat", Category::Grains, 28.0);

    let patch = ListingPatch {
        price: Some(26.0),
        ..Default::default()
    };
    assert!(matches!(
        h.emma.edit_listing(&h.store, &listing.id, patch.clone()),
        Err(StoreError::NotOwner { .. })
    ));
    assert!(matches!(
        h.emma.remove_listing(&h.store, &listing.id),
        Err(StoreError::NotOwner { .. })
    ));

    let edited = h.gary.edit_listing(&h.store, &listing.id, patch).unwrap();
    assert_eq!(edited.price, 26.0);

    h.gary.remove_listing(&h.store, &listing.id).unwrap();
    let wheat = h.product("Wheat").expect("wheat is in the catalog");
    assert!(wheat.variations.is_empty());
}

/// Sold-out listings stay visible but no longer count toward the lowest price.
#[test]
fn sold_out_listing_stays_but_is_not_cheapest() {
    let h = TestHarness::setup();
    let cheap = h.gary.add_listing(&h.store, "Onion", Category::Vegetables, 20.0);
    h.emma.add_listing(&h.store, "Onion", Category::Vegetables, 28.0);

    h.gary
        .edit_listing(
            &h.store,
            &cheap.id,
            ListingPatch {
                status: Some(ListingStatus::SoldOut),
                ..Default::default()
            },
        )
        .unwrap();

    let onion = h.product("onion").unwrap();
    assert_eq!(onion.variations.len(), 2);
    assert_eq!(onion.lowest_price(), Some(28.0));
}

#[test]
fn seller_page_for_unlisted_product() {
    let h = TestHarness::setup();
    h.emma.add_listing(&h.store, "Dragon Fruit", Category::Fruits, 240.0);

    assert_eq!(h.browse().unlisted.len(), 1);
    let view = h.product("dragon fruit").expect("found via the live listing");
    assert_eq!(view.category, "Fruits");
    assert_eq!(view.reference_price, 240.0);
    assert!(h.product("Saffron").is_none());
}

#[test]
fn buyers_rate_farmers() {
    let h = TestHarness::setup();
    h.alice.rate(&h.ratings, &h.gary, 5).unwrap();
    h.bob.rate(&h.ratings, &h.gary, 4).unwrap();
    assert_eq!(h.ratings.average_rating(&h.gary.id()).unwrap(), 4.5);

    // Alice changes her mind; her earlier rating is replaced.
    h.alice.rate(&h.ratings, &h.gary, 3).unwrap();
    assert_eq!(h.ratings.average_rating(&h.gary.id()).unwrap(), 3.5);
    assert_eq!(h.ratings.average_rating(&h.emma.id()).unwrap(), 0.0);

    assert_eq!(
        h.alice.rate(&h.ratings, &h.emma, 0),
        Err(RatingError::OutOfRange(0))
    );
}

#[test]
fn buyers_save_contacts() {
    let mut h = TestHarness::setup();
    assert!(h.alice.save_contact(&h.gary));
    assert!(h.alice.save_contact(&h.emma));
    assert!(!h.alice.save_contact(&h.gary));

    assert_eq!(h.alice.contacts.len(), 2);
    assert!(h.alice.contacts.contains(&h.emma.id()));
    assert!(h.bob.contacts.is_empty());
}
