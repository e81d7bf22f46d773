//! `PostgreSQL` storage backend.
//!
//! One repository per entity, each implementing the matching contract in
//! [`crate::stores`]. All queries use the runtime sqlx API so the
//! workspace builds without a live database.
//!
//! # Tables
//!
//! - `categories`, `products` - catalog (read-only from the storefront)
//! - `profiles` - shipping identity, keyed on `user_id`
//! - `cart_items` - `(user_id, product_id, quantity)` rows
//! - `orders`, `order_line_items` - immutable checkout output
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run at startup.

pub mod carts;
pub mod catalog;
pub mod categories;
pub mod orders;
pub mod profiles;

pub use carts::PgCartStore;
pub use catalog::PgCatalogStore;
pub use categories::PgCategoryStore;
pub use orders::PgOrderStore;
pub use profiles::PgProfileStore;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
