//! Application services.
//!
//! - [`locks`] - per-user serialization of cart and checkout activity
//! - [`cart`] - cart mutations and hydrated cart views
//! - [`checkout`] - the order aggregator: cart-to-order conversion and
//!   the order read paths

pub mod cart;
pub mod checkout;
pub mod locks;

pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService, OrderAccessError};
pub use locks::UserLocks;
