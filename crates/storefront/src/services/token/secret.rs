//! Signing secret derivation.

use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bazaar_core::Username;
use secrecy::SecretString;

/// Produces the HMAC secret a user's tokens are signed with.
pub trait SecretDeriver: Send + Sync {
    /// Derive the signing secret for a registration.
    fn derive(&self, username: &Username, password: &str) -> SecretString;
}

/// Secret = username followed by password.
///
/// Deterministic and guessable by anyone who knows the credentials. Kept as
/// the default for compatibility with tokens issued by existing clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialConcat;

impl SecretDeriver for CredentialConcat {
    fn derive(&self, username: &Username, password: &str) -> SecretString {
        SecretString::from(format!("{}{password}", username.as_str()))
    }
}

/// Secret = 32 random bytes, base64url encoded, fresh for every issue.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSecret;

impl SecretDeriver for RandomSecret {
    fn derive(&self, _username: &Username, _password: &str) -> SecretString {
        let bytes: [u8; 32] = rand::random();
        SecretString::from(URL_SAFE_NO_PAD.encode(bytes))
    }
}

/// Configured choice of [`SecretDeriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretMode {
    /// [`CredentialConcat`]
    #[default]
    Credentials,
    /// [`RandomSecret`]
    Random,
}

impl SecretMode {
    /// Build the deriver for this mode.
    #[must_use]
    pub fn deriver(self) -> Arc<dyn SecretDeriver> {
        match self {
            Self::Credentials => Arc::new(CredentialConcat),
            Self::Random => Arc::new(RandomSecret),
        }
    }
}

impl FromStr for SecretMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(Self::Credentials),
            "random" => Ok(Self::Random),
            other => Err(format!("expected 'credentials' or 'random', got '{other}'")),
        }
    }
}
