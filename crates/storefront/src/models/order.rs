//! Order and order line item models.
//!
//! Orders are immutable once created: the address is a snapshot of the
//! profile at checkout time and each line item snapshots the product's
//! price and discount at checkout time. Later catalog or profile changes
//! never alter an existing order.

use chrono::{DateTime, Utc};
use copperleaf_core::{LineItemId, OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Product;

/// A persisted order header with its line items attached.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub shipping_amount: Decimal,
    /// Fetched separately by order id and attached by the read path.
    #[sqlx(skip)]
    pub line_items: Vec<OrderLineItem>,
}

impl Order {
    /// Order total: shipping plus every line item total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.shipping_amount
            + self
                .line_items
                .iter()
                .map(OrderLineItem::line_total)
                .sum::<Decimal>()
    }
}

/// An order header about to be persisted (no id yet).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub shipping_amount: Decimal,
}

/// A persisted order line item.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderLineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product price at the moment of checkout.
    pub sales_price: Decimal,
    pub quantity: i32,
    /// Discount fraction in `[0, 1]` at the moment of checkout.
    pub discount: Decimal,
    /// Current product attached for display; absent when the product has
    /// since been removed from the catalog.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl OrderLineItem {
    /// Line total: sales price x quantity x (1 - discount).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.sales_price * Decimal::from(self.quantity) * (Decimal::ONE - self.discount)
    }
}

/// A line item about to be persisted (no id yet).
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub sales_price: Decimal,
    pub quantity: i32,
    pub discount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, quantity: i32, discount: Decimal) -> OrderLineItem {
        OrderLineItem {
            id: LineItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            sales_price: price,
            quantity,
            discount,
            product: None,
        }
    }

    #[test]
    fn order_total_includes_shipping_and_discounts() {
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            created_at: Utc::now(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
            shipping_amount: Decimal::ZERO,
            line_items: vec![
                line(Decimal::new(1000, 2), 2, Decimal::ZERO),
                line(Decimal::new(500, 2), 1, Decimal::new(50, 2)),
            ],
        };
        // 2 x 10.00 + 1 x 5.00 x 0.5
        assert_eq!(order.total(), Decimal::new(225_000, 4));
    }
}
