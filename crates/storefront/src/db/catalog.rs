//! Catalog repository for database operations.

use std::collections::BTreeMap;

use copperleaf_core::{CategoryId, ProductId};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Product, ProductFilter};
use crate::stores::{CatalogStore, StoreError};

const PRODUCT_COLUMNS: &str =
    "id, name, price, category_id, description, color, stock, featured, image_url";

/// Repository for catalog reads.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for PgCatalogStore {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn get_many(
        &self,
        ids: &[ProductId],
    ) -> Result<BTreeMap<ProductId, Product>, StoreError> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));

        // Each predicate is added only when its filter value is present.
        let mut separator = " WHERE ";
        if let Some(category_id) = filter.category_id {
            query.push(separator).push("category_id = ").push_bind(category_id);
            separator = " AND ";
        }
        if let Some(min_price) = filter.min_price {
            query.push(separator).push("price >= ").push_bind(min_price);
            separator = " AND ";
        }
        if let Some(max_price) = filter.max_price {
            query.push(separator).push("price <= ").push_bind(max_price);
            separator = " AND ";
        }
        if let Some(color) = &filter.color {
            query.push(separator).push("color = ").push_bind(color.clone());
        }
        query.push(" ORDER BY id");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
