//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use copperleaf_core::CategoryId;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{Category, Product};
use crate::state::AppState;
use crate::stores::{CatalogStore, CategoryStore};

/// `GET /categories` - all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.categories().list().await?;
    Ok(Json(categories))
}

/// `GET /categories/{id}` - a single category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    let category = state
        .categories()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    Ok(Json(category))
}

/// `GET /categories/{id}/products` - products in a category.
///
/// An unknown category id yields an empty list, matching a category that
/// exists but has no products.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().list_by_category(id).await?;
    Ok(Json(products))
}
