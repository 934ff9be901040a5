//! Commodity record.

use serde::{Deserialize, Serialize};

use super::Price;

/// An item for sale. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: String,
    #[serde(default)]
    pub introduction: String,
    /// File name of the picture served under `/picture/{name}`.
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub price: Price,
}
