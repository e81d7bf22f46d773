//! HTTP route handlers for the storefront.
//!
//! All handlers speak JSON and return `Result<_, AppError>`. Identity
//! comes from the [`crate::middleware::CurrentUser`] extractor.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product search (cat, min_price, max_price, color)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category listing
//! GET  /categories/{id}        - Category detail
//! GET  /categories/{id}/products - Products in a category
//!
//! # Profile (requires identity)
//! GET  /profile                - Current user's profile
//! PUT  /profile                - Create or replace the profile
//!
//! # Cart (requires identity)
//! GET    /cart                       - Hydrated cart view
//! POST   /cart/products/{product_id} - Add one unit
//! PUT    /cart/products/{product_id} - Overwrite quantity
//! DELETE /cart                       - Clear the cart
//!
//! # Orders (requires identity)
//! POST /orders                 - Checkout: convert the cart into an order
//! GET  /orders                 - Order history, most recent first
//! GET  /orders/{id}            - Single order, owner only
//! ```

pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::search))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{id}", get(categories::show))
        .route("/categories/{id}/products", get(categories::products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route(
            "/cart/products/{product_id}",
            post(cart::add).put(cart::update_quantity),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::checkout).get(orders::index))
        .route("/orders/{id}", get(orders::show))
}

/// Create the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/profile", get(profile::show).put(profile::update))
        .merge(catalog_routes())
        .merge(cart_routes())
        .merge(order_routes())
        .with_state(state)
}
