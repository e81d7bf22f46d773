//! Shopping cart models.
//!
//! The cart store persists only `(product_id, quantity)` pairs; these
//! types are the hydrated view returned to clients, with the current
//! product attached via a single batched catalog lookup.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Product;

/// A user's shopping cart hydrated with current catalog data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Cart total at current catalog prices.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// One cart entry with its product attached.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
    /// Discount fraction in `[0, 1]` applied to this line. There is no
    /// discount source yet, so this is always zero; checkout snapshots it
    /// into the line item either way.
    pub discount_percent: Decimal,
}

impl CartItem {
    /// Create a cart item with no discount.
    #[must_use]
    pub const fn new(product: Product, quantity: i32) -> Self {
        Self {
            product,
            quantity,
            discount_percent: Decimal::ZERO,
        }
    }

    /// Line total: price x quantity x (1 - discount).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity) * (Decimal::ONE - self.discount_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperleaf_core::{CategoryId, ProductId};

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            category_id: CategoryId::new(1),
            description: String::new(),
            color: String::new(),
            stock: 5,
            featured: false,
            image_url: String::new(),
        }
    }

    #[test]
    fn totals_sum_over_items() {
        let cart = Cart {
            items: vec![
                CartItem::new(product(1, Decimal::new(1000, 2)), 2),
                CartItem::new(product(2, Decimal::new(500, 2)), 1),
            ],
        };
        assert!(!cart.is_empty());
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Decimal::new(2500, 2));
    }

    #[test]
    fn line_total_applies_discount_fraction() {
        let mut item = CartItem::new(product(1, Decimal::new(1000, 2)), 3);
        assert_eq!(item.line_total(), Decimal::new(3000, 2));

        item.discount_percent = Decimal::new(25, 2); // 25% off
        assert_eq!(item.line_total(), Decimal::new(225_000, 4));
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
