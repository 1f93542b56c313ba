//! Marketplace core for FarmGate: the reference price catalog, farmer
//! listings, grouping of listings into per-product seller views, and the
//! savings shown against market prices.

pub mod aggregate;
pub mod catalog;
pub mod contact;
pub mod currency;
pub mod identity;
pub mod listing;
pub mod normalize;
pub mod rating;
pub mod savings;
pub mod search;
pub mod store;
