//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use copperleaf_core::ProductId;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{Product, ProductFilter};
use crate::state::AppState;
use crate::stores::CatalogStore;

/// `GET /products` - search the catalog.
///
/// Filter fields (`cat`, `min_price`, `max_price`, `color`) are all
/// optional; absent fields do not constrain the result.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().search(&filter).await?;
    Ok(Json(products))
}

/// `GET /products/{id}` - a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}
