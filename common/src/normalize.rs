use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// Identity under which listings from different farmers are merged:
/// `"{name}_{category}"`, both trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, Unicode lower-cased form used for every name and category comparison.
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Key for a product name and category. `None` if either is blank.
pub fn group_key(name: &str, category: &str) -> Option<GroupKey> {
    let (name, category) = (fold(name), fold(category));
    if name.is_empty() || category.is_empty() {
        return None;
    }
    Some(GroupKey(format!("{name}_{category}")))
}

pub fn normalize(listing: &Listing) -> Option<GroupKey> {
    group_key(&listing.name, &listing.category)
}
