//! Bearer token records.

use serde::{Deserialize, Serialize};

use super::Username;

/// The signing secret on file for a user, stored in the `token` collection.
///
/// One document per username; registering again replaces it, which revokes
/// every token signed with the previous key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKey {
    pub username: Username,
    pub key: String,
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKey")
            .field("username", &self.username)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// The registration response body: `{"username": ..., "tokenstr": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub username: Username,
    #[serde(rename = "tokenstr")]
    pub token: String,
}
