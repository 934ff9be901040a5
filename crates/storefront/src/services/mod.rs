//! Business logic services for storefront.
//!
//! # Services
//!
//! - `token` - Bearer token issuing and verification for cart access

pub mod token;

pub use token::{
    CredentialConcat, RandomSecret, SecretDeriver, SecretMode, TokenAuthority, TokenError,
};
