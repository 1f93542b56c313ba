use std::sync::atomic::{AtomicU64, Ordering};

use crate::aggregate::ProductView;
use crate::normalize::fold;

/// Products whose name contains `query`, ignoring case. A blank query matches all.
pub fn search_products<'a>(products: &'a [ProductView], query: &str) -> Vec<&'a ProductView> {
    let needle = fold(query);
    products
        .iter()
        .filter(|p| needle.is_empty() || fold(&p.name).contains(&needle))
        .collect()
}

/// Tickets for overlapping searches. Take a ticket before fetching and only
/// render the result if its ticket is still the latest one issued.
#[derive(Debug, Default)]
pub struct QuerySequencer {
    latest: AtomicU64,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}
