//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{PgCartStore, PgCatalogStore, PgCategoryStore, PgOrderStore, PgProfileStore};
use crate::services::{CartService, CheckoutService, UserLocks};

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    locks: UserLocks,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                locks: UserLocks::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn catalog(&self) -> PgCatalogStore {
        PgCatalogStore::new(self.inner.pool.clone())
    }

    #[must_use]
    pub fn categories(&self) -> PgCategoryStore {
        PgCategoryStore::new(self.inner.pool.clone())
    }

    #[must_use]
    pub fn profiles(&self) -> PgProfileStore {
        PgProfileStore::new(self.inner.pool.clone())
    }

    #[must_use]
    pub fn cart_service(&self) -> CartService<PgCatalogStore, PgCartStore> {
        CartService::new(
            self.catalog(),
            PgCartStore::new(self.inner.pool.clone()),
            self.inner.locks.clone(),
        )
    }

    #[must_use]
    pub fn checkout_service(
        &self,
    ) -> CheckoutService<PgCatalogStore, PgProfileStore, PgCartStore, PgOrderStore> {
        CheckoutService::new(
            self.catalog(),
            self.profiles(),
            PgCartStore::new(self.inner.pool.clone()),
            PgOrderStore::new(self.inner.pool.clone()),
            self.inner.locks.clone(),
        )
    }
}
