use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::SellerId;

/// A farmer a buyer has saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedContact {
    pub seller: SellerId,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// One user's saved contacts, at most one entry per farmer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactBook {
    contacts: BTreeMap<SellerId, SavedContact>,
}

impl ContactBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a contact. Saving the same farmer again refreshes the details.
    /// Returns `true` if the farmer was not saved before.
    pub fn save(&mut self, contact: SavedContact) -> bool {
        self.contacts
            .insert(contact.seller.clone(), contact)
            .is_none()
    }

    pub fn remove(&mut self, seller: &SellerId) -> Option<SavedContact> {
        self.contacts.remove(seller)
    }

    pub fn contains(&self, seller: &SellerId) -> bool {
        self.contacts.contains_key(seller)
    }

    /// Contacts, most recently saved first.
    pub fn list(&self) -> Vec<&SavedContact> {
        let mut contacts: Vec<&SavedContact> = self.contacts.values().collect();
        contacts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
