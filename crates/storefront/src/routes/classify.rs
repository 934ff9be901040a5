//! Path classification for item URLs.
//!
//! The suffix after `/commodities/` or `/users/` names either an item or one
//! of its sub-resources. Classification is a substring pattern test, not a
//! segment parser: any suffix containing `<name>/comments` (or `<name>/cart`)
//! is a sub-resource, wherever the marker appears. `a/comments/b` is therefore
//! the comment list of `a`.

use std::sync::LazyLock;

use regex::Regex;

const COMMENTS_MARKER: &str = "/comments";
const CART_MARKER: &str = "/cart";

/// Matches a comments sub-resource anywhere in a commodity suffix.
static COMMENTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9%]+/comments").expect("Invalid regex"));

/// Matches a cart sub-resource anywhere in a user suffix.
static CART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9%]+/cart").expect("Invalid regex"));

/// What a `/commodities/{suffix}` request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommodityTarget {
    /// A single commodity.
    Item(String),
    /// The comments on a commodity.
    Comments(String),
}

/// What a `/users/{suffix}` request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserTarget {
    /// A single user.
    Item(String),
    /// The user's cart.
    Cart(String),
}

/// Classify a still percent-encoded commodity suffix.
#[must_use]
pub fn classify_commodity(suffix: &str) -> CommodityTarget {
    match sub_resource_owner(&COMMENTS_RE, COMMENTS_MARKER, suffix) {
        Some(name) => CommodityTarget::Comments(decode(name)),
        None => CommodityTarget::Item(decode(suffix)),
    }
}

/// Classify a still percent-encoded user suffix.
#[must_use]
pub fn classify_user(suffix: &str) -> UserTarget {
    match sub_resource_owner(&CART_RE, CART_MARKER, suffix) {
        Some(name) => UserTarget::Cart(decode(name)),
        None => UserTarget::Item(decode(suffix)),
    }
}

/// The text before the first matched marker, if the pattern matches.
fn sub_resource_owner<'a>(pattern: &Regex, marker: &str, suffix: &'a str) -> Option<&'a str> {
    let found = pattern.find(suffix)?;
    suffix.get(..found.end() - marker.len())
}

/// Percent-decode an identifier. Invalid UTF-8 is replaced, never rejected.
fn decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}
