//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{
    CartRepository, CommentRepository, CommodityRepository, DocumentStore, TokenKeyRepository,
    UserRepository,
};
use crate::services::{SecretDeriver, TokenAuthority};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the document store, the repositories built on it and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn DocumentStore>,
    secrets: Arc<dyn SecretDeriver>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The secret deriver is chosen by `config.token.secret`.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn DocumentStore>) -> Self {
        let secrets = config.token.secret.deriver();
        Self::with_secret_deriver(config, store, secrets)
    }

    /// Create a new application state with an explicit secret deriver.
    #[must_use]
    pub fn with_secret_deriver(
        config: StorefrontConfig,
        store: Arc<dyn DocumentStore>,
        secrets: Arc<dyn SecretDeriver>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                secrets,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Commodity repository.
    #[must_use]
    pub fn commodities(&self) -> CommodityRepository<'_> {
        CommodityRepository::new(self.store(), &self.config().collections.commodities)
    }

    /// Comment repository.
    #[must_use]
    pub fn comments(&self) -> CommentRepository<'_> {
        CommentRepository::new(self.store(), &self.config().collections.comments)
    }

    /// User repository.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.store(), &self.config().collections.users)
    }

    /// Cart repository.
    #[must_use]
    pub fn carts(&self) -> CartRepository<'_> {
        CartRepository::new(self.store(), &self.config().collections.carts)
    }

    /// Token authority backed by the token-key collection.
    #[must_use]
    pub fn tokens(&self) -> TokenAuthority<'_> {
        TokenAuthority::new(
            TokenKeyRepository::new(self.store(), &self.config().collections.tokens),
            self.inner.secrets.as_ref(),
            self.config().token.ttl,
        )
    }
}
