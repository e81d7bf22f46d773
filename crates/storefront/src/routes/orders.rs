//! Order route handlers, including checkout.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use copperleaf_core::OrderId;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::state::AppState;

/// `POST /orders` - convert the current cart into an order.
///
/// Requires a profile and a non-empty cart; on success the cart is empty
/// and the created order is returned with its line items.
#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state.checkout_service().checkout(user_id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - the current user's orders, most recent first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = state.checkout_service().orders_for_user(user_id).await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}` - a single order; owner only.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state
        .checkout_service()
        .order_for_user(user_id, order_id)
        .await?;
    Ok(Json(order))
}
