//! Comment record.

use serde::{Deserialize, Serialize};

use super::Username;

/// A user's remark on a commodity.
///
/// `commodity` refers to `Commodity::name` by value; nothing enforces that the
/// commodity exists, and nothing prevents several comments from the same user
/// on the same commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: Username,
    pub commodity: String,
    pub comment: String,
}
