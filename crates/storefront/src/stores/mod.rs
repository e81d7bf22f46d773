//! Storage contracts for the storefront.
//!
//! The checkout aggregator and cart service are written against these
//! traits rather than a concrete database, so the same logic runs over
//! the Postgres repositories in [`crate::db`] and the in-memory backend
//! in [`memory`] used by tests and local development.
//!
//! Every trait method performs one storage operation; multi-entity
//! coordination (and its failure handling) lives in the services.

pub mod memory;

use std::collections::BTreeMap;

use copperleaf_core::{CategoryId, OrderId, ProductId, UserId};
use thiserror::Error;

use crate::models::{Category, NewLineItem, NewOrder, Order, OrderLineItem, Product, ProductFilter, Profile};

/// Errors surfaced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced row does not exist.
    #[error("entity not found")]
    NotFound,

    /// Uniqueness or state conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data failed to decode into a domain value.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Read-only product catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogStore: Send + Sync {
    /// Look up a single product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Batched lookup for a set of product ids. Ids that do not resolve
    /// are simply absent from the result; callers decide whether that is
    /// an error.
    async fn get_many(
        &self,
        ids: &[ProductId],
    ) -> Result<BTreeMap<ProductId, Product>, StoreError>;

    /// Search products, applying only the filter fields that are present.
    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// All products in a category.
    async fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError>;
}

/// Read-only category listing.
#[allow(async_fn_in_trait)]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, StoreError>;
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;
}

/// Per-user shipping profiles.
#[allow(async_fn_in_trait)]
pub trait ProfileStore: Send + Sync {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Create or replace the user's profile. Keyed on user id, so the
    /// one-profile-per-user relationship is structural.
    async fn upsert(&self, profile: &Profile) -> Result<Profile, StoreError>;
}

/// Per-user cart rows: `(product_id, quantity)` pairs.
#[allow(async_fn_in_trait)]
pub trait CartStore: Send + Sync {
    /// Current cart contents in ascending product-id order. A user who
    /// never added anything gets an empty mapping, never an error.
    async fn get(&self, user_id: UserId) -> Result<BTreeMap<ProductId, i32>, StoreError>;

    /// Increment the entry's quantity by one, inserting it with quantity
    /// one if absent. Product existence is the caller's responsibility.
    async fn add_item(&self, user_id: UserId, product_id: ProductId) -> Result<(), StoreError>;

    /// Overwrite an existing entry's quantity. Fails with
    /// [`StoreError::NotFound`] when the entry does not exist. A quantity
    /// below one removes the entry (stored quantities are always >= 1).
    async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError>;

    /// Remove every entry for the user. Idempotent.
    async fn clear(&self, user_id: UserId) -> Result<(), StoreError>;
}

/// Durable orders and line items.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Send + Sync {
    /// Persist an order header and assign its id. Line items are created
    /// separately once the id exists.
    async fn create(&self, order: &NewOrder) -> Result<Order, StoreError>;

    /// Persist one line item and assign its id.
    async fn create_line_item(&self, line: &NewLineItem) -> Result<OrderLineItem, StoreError>;

    /// Line items for an order, ascending by id.
    async fn line_items(&self, order_id: OrderId) -> Result<Vec<OrderLineItem>, StoreError>;

    /// A user's orders, most recent first. Headers only.
    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;

    /// A single order header.
    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Remove an order and all of its line items. Idempotent; this is the
    /// aggregator's compensation for a checkout that failed after the
    /// header was written.
    async fn delete(&self, order_id: OrderId) -> Result<(), StoreError>;
}
