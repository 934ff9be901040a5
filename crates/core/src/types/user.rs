//! User record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Username;

/// A registered account as stored in the `user` collection.
///
/// The password is stored as submitted. Never serialize this type into an
/// HTTP response directly.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub password: String,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub balance: Decimal,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("balance", &self.balance)
            .finish()
    }
}
