//! Shopping cart repository for database operations.

use std::collections::BTreeMap;

use copperleaf_core::{ProductId, UserId};
use sqlx::PgPool;

use crate::stores::{CartStore, StoreError};

#[derive(sqlx::FromRow)]
struct CartRow {
    product_id: ProductId,
    quantity: i32,
}

/// Repository for cart rows.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CartStore for PgCartStore {
    async fn get(&self, user_id: UserId) -> Result<BTreeMap<ProductId, i32>, StoreError> {
        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT product_id, quantity FROM cart_items WHERE user_id = $1 ORDER BY product_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| (r.product_id, r.quantity)).collect())
    }

    async fn add_item(&self, user_id: UserId, product_id: ProductId) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + 1
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        // Stored quantities are always >= 1; anything lower removes the row.
        let result = if quantity < 1 {
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query(
                "UPDATE cart_items SET quantity = $1 WHERE user_id = $2 AND product_id = $3",
            )
            .bind(quantity)
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
