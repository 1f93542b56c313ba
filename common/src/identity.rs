use std::fmt;

use serde::{Deserialize, Serialize};

/// A farmer's identity as issued by the auth provider. Opaque to the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

/// A buyer's identity as issued by the auth provider. Opaque to the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuyerId(pub String);

impl fmt::Display for SellerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BuyerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role a user can have in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Farmer,
    Buyer,
    Admin,
}

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
    pub role: UserRole,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// Seller identity, if this user may list products.
    pub fn as_seller(&self) -> Option<SellerId> {
        (self.role == UserRole::Farmer).then(|| SellerId(self.id.clone()))
    }

    /// Every signed-in user can buy, rate and save contacts.
    pub fn as_buyer(&self) -> BuyerId {
        BuyerId(self.id.clone())
    }
}

/// Source of the current session's user. Authentication itself happens elsewhere.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Fixed session, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<UserIdentity>);

impl StaticIdentity {
    pub fn signed_in(user: UserIdentity) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}
