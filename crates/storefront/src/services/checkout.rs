//! Checkout aggregator: converts a cart into a persisted order.
//!
//! The conversion is the only multi-entity write in the system, and the
//! invariants here are strict:
//!
//! - The order header is written first so line items have an order id to
//!   reference.
//! - Line items are written in ascending product-id order, one per
//!   distinct product, snapshotting the current price and discount.
//! - The cart is cleared only after every line item is durable; never
//!   before, and never on a failed checkout.
//! - A failure after the header is written triggers a compensating
//!   delete of the partial order. If that delete also fails, the partial
//!   state is surfaced as [`CheckoutError::Inconsistent`] so operators
//!   can see it - it is never reported as success, and the cart stays
//!   untouched.
//!
//! The whole operation runs under the per-user lock, so two concurrent
//! checkouts for one user cannot both observe the same non-empty cart.

use chrono::Utc;
use copperleaf_core::{OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use crate::models::{CartItem, NewLineItem, NewOrder, Order};
use crate::stores::{CartStore, CatalogStore, OrderStore, ProfileStore, StoreError};

use super::UserLocks;

/// Checkout failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user has no shipping profile yet.
    #[error("user {0} has no profile; checkout requires one")]
    ProfileMissing(UserId),

    /// The cart has no entries.
    #[error("cart is empty for user {0}")]
    CartEmpty(UserId),

    /// A cart entry references a product that no longer resolves in the
    /// catalog. The whole checkout fails; silently skipping the entry
    /// would produce an order that does not match what the user saw.
    #[error("product {0} referenced by the cart no longer exists")]
    ProductUnavailable(ProductId),

    /// The order store may hold a partial order that could not be rolled
    /// back, or an order whose cart could not be cleared. Requires
    /// operator attention; never retried automatically.
    #[error("order {order_id} left in an inconsistent state: {reason}")]
    Inconsistent {
        order_id: OrderId,
        reason: String,
        source: StoreError,
    },

    /// Storage failed and the rollback restored a consistent state.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Order read-path failures.
#[derive(Debug, Error)]
pub enum OrderAccessError {
    /// No order with this id exists.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// The order exists but belongs to a different user.
    #[error("order {order_id} does not belong to user {user_id}")]
    Forbidden { order_id: OrderId, user_id: UserId },

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The order aggregator and order read paths.
#[derive(Debug, Clone)]
pub struct CheckoutService<C, P, K, O> {
    catalog: C,
    profiles: P,
    carts: K,
    orders: O,
    locks: UserLocks,
}

impl<C, P, K, O> CheckoutService<C, P, K, O>
where
    C: CatalogStore,
    P: ProfileStore,
    K: CartStore,
    O: OrderStore,
{
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(catalog: C, profiles: P, carts: K, orders: O, locks: UserLocks) -> Self {
        Self {
            catalog,
            profiles,
            carts,
            orders,
            locks,
        }
    }

    /// Convert the user's cart into a persisted order, then clear the
    /// cart. Returns the assembled order with its line items attached.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::ProfileMissing` / `CheckoutError::CartEmpty` /
    ///   `CheckoutError::ProductUnavailable` when a precondition fails;
    ///   nothing is persisted and the cart is untouched.
    /// - `CheckoutError::Store` when a write failed and the partial order
    ///   was rolled back; the cart is untouched.
    /// - `CheckoutError::Inconsistent` when a partial order could not be
    ///   rolled back, or the cart could not be cleared after the order
    ///   committed.
    #[instrument(skip(self))]
    pub async fn checkout(&self, user_id: UserId) -> Result<Order, CheckoutError> {
        let _guard = self.locks.acquire(user_id).await;

        let profile = self
            .profiles
            .get_by_user(user_id)
            .await?
            .ok_or(CheckoutError::ProfileMissing(user_id))?;

        let entries = self.carts.get(user_id).await?;
        if entries.is_empty() {
            return Err(CheckoutError::CartEmpty(user_id));
        }

        // One batched lookup; every cart entry must still resolve.
        let ids: Vec<ProductId> = entries.keys().copied().collect();
        let products = self.catalog.get_many(&ids).await?;
        let mut items = Vec::with_capacity(entries.len());
        for (product_id, quantity) in &entries {
            let product = products
                .get(product_id)
                .ok_or(CheckoutError::ProductUnavailable(*product_id))?;
            items.push(CartItem::new(product.clone(), *quantity));
        }

        // Header first: line items need the generated order id.
        let mut order = self
            .orders
            .create(&NewOrder {
                user_id,
                created_at: Utc::now(),
                address: profile.address.clone(),
                city: profile.city.clone(),
                state: profile.state.clone(),
                zip: profile.zip.clone(),
                shipping_amount: Decimal::ZERO,
            })
            .await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let line = NewLineItem {
                order_id: order.id,
                product_id: item.product.id,
                sales_price: item.product.price,
                quantity: item.quantity,
                discount: item.discount_percent,
            };
            match self.orders.create_line_item(&line).await {
                Ok(created) => lines.push(created),
                Err(err) => return Err(self.roll_back(order.id, err).await),
            }
        }

        // Every line item is durable; only now may the cart go away.
        if let Err(err) = self.carts.clear(user_id).await {
            tracing::error!(
                order_id = %order.id,
                user_id = %user_id,
                error = %err,
                "cart clear failed after order commit; cart and order store disagree"
            );
            return Err(CheckoutError::Inconsistent {
                order_id: order.id,
                reason: "order committed but the cart could not be cleared".to_owned(),
                source: err,
            });
        }

        order.line_items = lines;
        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            line_items = order.line_items.len(),
            total = %order.total(),
            "checkout completed"
        );
        Ok(order)
    }

    /// Compensate for a line-item write failure by deleting the partial
    /// order. The cart has not been touched at this point.
    async fn roll_back(&self, order_id: OrderId, cause: StoreError) -> CheckoutError {
        match self.orders.delete(order_id).await {
            Ok(()) => {
                tracing::warn!(
                    order_id = %order_id,
                    error = %cause,
                    "line item write failed; partial order rolled back"
                );
                CheckoutError::Store(cause)
            }
            Err(delete_err) => {
                tracing::error!(
                    order_id = %order_id,
                    error = %delete_err,
                    "rollback of partial order failed; manual cleanup required"
                );
                CheckoutError::Inconsistent {
                    order_id,
                    reason: format!("line item write failed ({cause}) and rollback also failed"),
                    source: delete_err,
                }
            }
        }
    }

    /// The user's orders, most recent first, with line items attached and
    /// products hydrated via one batched catalog lookup.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Store` if a storage read fails.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, CheckoutError> {
        let mut orders = self.orders.get_by_user(user_id).await?;
        for order in &mut orders {
            order.line_items = self.orders.line_items(order.id).await?;
        }
        self.hydrate_products(&mut orders).await?;
        Ok(orders)
    }

    /// A single order, verified to belong to the requesting user.
    ///
    /// # Errors
    ///
    /// Returns `OrderAccessError::NotFound` if the order does not exist
    /// and `OrderAccessError::Forbidden` if it belongs to someone else -
    /// the two cases are deliberately distinct.
    pub async fn order_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, OrderAccessError> {
        let mut order = self
            .orders
            .get_by_id(order_id)
            .await?
            .ok_or(OrderAccessError::NotFound(order_id))?;

        if order.user_id != user_id {
            return Err(OrderAccessError::Forbidden { order_id, user_id });
        }

        order.line_items = self.orders.line_items(order_id).await?;
        self.hydrate_products(std::slice::from_mut(&mut order)).await?;
        Ok(order)
    }

    /// Attach current products to every line item across a set of orders
    /// with a single batched catalog lookup. Products deleted since the
    /// order was placed stay absent; the snapshot fields on the line item
    /// are authoritative either way.
    async fn hydrate_products(&self, orders: &mut [Order]) -> Result<(), StoreError> {
        let mut ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|o| o.line_items.iter().map(|l| l.product_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(());
        }

        let products = self.catalog.get_many(&ids).await?;
        for line in orders
            .iter_mut()
            .flat_map(|o| o.line_items.iter_mut())
        {
            line.product = products.get(&line.product_id).cloned();
        }
        Ok(())
    }
}
