//! Domain models for the storefront.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod profile;

pub use cart::{Cart, CartItem};
pub use category::Category;
pub use order::{NewLineItem, NewOrder, Order, OrderLineItem};
pub use product::{Product, ProductFilter};
pub use profile::{Profile, ProfileUpdate};
