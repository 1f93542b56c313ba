use serde::{Deserialize, Serialize};

/// How much cheaper a listing is than the reference price. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Savings {
    pub absolute: f64,
    /// Percentage of the reference price, one decimal place.
    pub percentage: f64,
}

impl Savings {
    pub const NONE: Savings = Savings {
        absolute: 0.0,
        percentage: 0.0,
    };

    pub fn has_savings(&self) -> bool {
        self.absolute > 0.0
    }
}

/// Round a value given in tenths half-up, returning it in units.
fn half_up_tenths(tenths: f64) -> f64 {
    (tenths + 0.5).floor() / 10.0
}

/// Savings of `listing_price` against `reference_price`.
///
/// A listing at or above the reference saves nothing, and a zero reference
/// yields a zero percentage.
pub fn compute_savings(listing_price: f64, reference_price: f64) -> Savings {
    if !listing_price.is_finite() || !reference_price.is_finite() {
        return Savings::NONE;
    }
    let absolute = (reference_price - listing_price).max(0.0);
    if absolute == 0.0 || reference_price <= 0.0 {
        return Savings {
            absolute,
            percentage: 0.0,
        };
    }
    // Multiply before dividing so exact halves such as 51/80 = 63.75% stay exact.
    let percentage = half_up_tenths(absolute * 1000.0 / reference_price).clamp(0.0, 100.0);
    Savings {
        absolute,
        percentage,
    }
}
