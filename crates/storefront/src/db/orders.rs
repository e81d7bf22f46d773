//! Order repository for database operations.
//!
//! Orders and their line items are immutable once written; the only
//! delete path is the checkout aggregator rolling back a partially
//! written order.

use copperleaf_core::{OrderId, UserId};
use sqlx::PgPool;

use crate::models::{NewLineItem, NewOrder, Order, OrderLineItem};
use crate::stores::{OrderStore, StoreError};

const ORDER_COLUMNS: &str =
    "id, user_id, created_at, address, city, state, zip, shipping_amount";
const LINE_ITEM_COLUMNS: &str = "id, order_id, product_id, sales_price, quantity, discount";

/// Repository for orders and their line items.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for PgOrderStore {
    async fn create(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let created = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, created_at, address, city, state, zip, shipping_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id)
        .bind(order.created_at)
        .bind(&order.address)
        .bind(&order.city)
        .bind(&order.state)
        .bind(&order.zip)
        .bind(order.shipping_amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn create_line_item(&self, line: &NewLineItem) -> Result<OrderLineItem, StoreError> {
        let created = sqlx::query_as::<_, OrderLineItem>(&format!(
            r"
            INSERT INTO order_line_items (order_id, product_id, sales_price, quantity, discount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LINE_ITEM_COLUMNS}
            "
        ))
        .bind(line.order_id)
        .bind(line.product_id)
        .bind(line.sales_price)
        .bind(line.quantity)
        .bind(line.discount)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn line_items(&self, order_id: OrderId) -> Result<Vec<OrderLineItem>, StoreError> {
        let lines = sqlx::query_as::<_, OrderLineItem>(&format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM order_line_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), StoreError> {
        // Line items cascade with the order row (see migrations).
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
