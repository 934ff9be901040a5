//! Domain records for the storefront.

pub mod cart;
pub mod comment;
pub mod commodity;
pub mod price;
pub mod token;
pub mod user;
pub mod username;

pub use cart::Cart;
pub use comment::Comment;
pub use commodity::Commodity;
pub use price::{Price, PriceError};
pub use token::{IssuedToken, TokenKey};
pub use user::User;
pub use username::{Username, UsernameError};
