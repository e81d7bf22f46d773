//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures
//! to Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Status mapping: precondition violations (empty cart, missing profile,
//! product deleted under the cart) are 400, missing entities 404,
//! ownership mismatches 403, and storage failures 500. A checkout that
//! left the stores mutually inconsistent is also 500 but logged and
//! captured distinctly so operators can tell partial-order corruption
//! apart from an ordinary database hiccup.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{CartError, CheckoutError, OrderAccessError};
use crate::stores::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order read failed.
    #[error("Order error: {0}")]
    OrderAccess(#[from] OrderAccessError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No resolved identity on the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(err) => match err {
                CartError::ProductNotFound(_) | CartError::NotInCart(_) => StatusCode::NOT_FOUND,
                CartError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::ProfileMissing(_)
                | CheckoutError::CartEmpty(_)
                | CheckoutError::ProductUnavailable(_) => StatusCode::BAD_REQUEST,
                CheckoutError::Inconsistent { .. } | CheckoutError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::OrderAccess(err) => match err {
                OrderAccessError::NotFound(_) => StatusCode::NOT_FOUND,
                OrderAccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
                OrderAccessError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether this is a server-side failure worth capturing.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Cart(CartError::Store(_))
                | Self::Checkout(CheckoutError::Store(_) | CheckoutError::Inconsistent { .. })
                | Self::OrderAccess(OrderAccessError::Store(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called once the request's identity is resolved so captured events
/// carry the affected user.
pub fn set_user_context(user_id: copperleaf_core::UserId) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperleaf_core::{OrderId, ProductId, UserId};

    #[test]
    fn precondition_failures_are_bad_requests() {
        assert_eq!(
            AppError::from(CheckoutError::CartEmpty(UserId::new(1))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CheckoutError::ProfileMissing(UserId::new(1))).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CheckoutError::ProductUnavailable(ProductId::new(9))).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn ownership_mismatch_is_forbidden_not_404() {
        let err = AppError::from(OrderAccessError::Forbidden {
            order_id: OrderId::new(99),
            user_id: UserId::new(1),
        });
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        assert_eq!(
            AppError::from(OrderAccessError::NotFound(OrderId::new(99))).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn inconsistent_checkout_is_a_distinct_server_error() {
        let err = AppError::from(CheckoutError::Inconsistent {
            order_id: OrderId::new(5),
            reason: "rollback failed".into(),
            source: crate::stores::StoreError::NotFound,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }

    #[test]
    fn cart_errors_map_to_not_found() {
        assert_eq!(
            AppError::from(CartError::ProductNotFound(ProductId::new(15))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CartError::NotInCart(ProductId::new(15))).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_errors_hide_details_from_clients() {
        let response =
            AppError::Checkout(CheckoutError::Store(StoreError::NotFound)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
