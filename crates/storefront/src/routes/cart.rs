//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use copperleaf_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Cart;
use crate::state::AppState;

/// Body for quantity updates.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: i32,
}

/// `GET /cart` - the current cart, hydrated with catalog data.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Cart>> {
    let cart = state.cart_service().view(user_id).await?;
    Ok(Json(cart))
}

/// `POST /cart/products/{product_id}` - add one unit, returning the
/// updated cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Cart>> {
    let service = state.cart_service();
    service.add_item(user_id, product_id).await?;
    Ok(Json(service.view(user_id).await?))
}

/// `PUT /cart/products/{product_id}` - overwrite an entry's quantity,
/// returning the updated cart. A quantity below one removes the entry.
#[instrument(skip(state))]
pub async fn update_quantity(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(product_id): Path<ProductId>,
    Json(form): Json<QuantityForm>,
) -> Result<Json<Cart>> {
    let service = state.cart_service();
    service
        .set_quantity(user_id, product_id, form.quantity)
        .await?;
    Ok(Json(service.view(user_id).await?))
}

/// `DELETE /cart` - remove everything from the cart.
#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<StatusCode> {
    state.cart_service().clear(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
