//! Shopping cart record.

use serde::{Deserialize, Serialize};

use super::{Commodity, Username};

/// A user's cart.
///
/// `commodities` holds copies of the commodity records as they were when the
/// cart was last written, not references into the commodity collection. A
/// cart is always written whole; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub username: Username,
    #[serde(default)]
    pub commodities: Vec<Commodity>,
}

impl Cart {
    /// An empty cart for a user who has never written one.
    #[must_use]
    pub const fn empty(username: Username) -> Self {
        Self {
            username,
            commodities: Vec::new(),
        }
    }

    /// Returns true if the cart holds no commodities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }
}
