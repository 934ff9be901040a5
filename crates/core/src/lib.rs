//! Bazaar Core - Shared domain types.
//!
//! This crate provides the records exchanged between the storefront's HTTP
//! layer and its document store:
//! - [`Commodity`] - an item for sale, keyed by name
//! - [`Comment`] - a user's remark on a commodity
//! - [`User`] - a registered account
//! - [`Cart`] - a user's cart holding commodity snapshots
//! - [`TokenKey`] / [`IssuedToken`] - bearer token bookkeeping
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Every record serializes with the same field names in JSON and in the
//! document store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
