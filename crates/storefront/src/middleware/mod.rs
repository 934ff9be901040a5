//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (only when `BAZAAR_CORS_PERMISSIVE` is set)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (fills the span field, echoes the header)
//!
//! Bearer tokens are read by the cart handler itself, not by a layer.

pub mod auth;
pub mod request_id;

pub use auth::bearer_token;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
