//! Catalog product model and search filter.

use copperleaf_core::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// The catalog is read-only from the storefront's perspective; prices read
/// here are snapshotted into order line items at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub description: String,
    pub color: String,
    pub stock: i32,
    pub featured: bool,
    pub image_url: String,
}

/// Optional filters for a product search.
///
/// Every field is optional; a `None` field contributes no predicate to the
/// query. Field names match the public query parameters (`cat`,
/// `min_price`, `max_price`, `color`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(rename = "cat")]
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub color: Option<String>,
}

impl ProductFilter {
    /// True when no filter field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.color.is_none()
    }

    /// Whether a product matches every present filter field.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id
            && product.category_id != category_id
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(color) = &self.color
            && &product.color != color
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Decimal, category: i32, color: &str) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Widget".into(),
            price,
            category_id: CategoryId::new(category),
            description: String::new(),
            color: color.into(),
            stock: 10,
            featured: false,
            image_url: String::new(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&product(Decimal::new(999, 2), 3, "red")));
    }

    #[test]
    fn present_fields_each_restrict_the_match() {
        let filter = ProductFilter {
            category_id: Some(CategoryId::new(3)),
            min_price: Some(Decimal::new(5, 0)),
            max_price: Some(Decimal::new(20, 0)),
            color: Some("red".into()),
        };
        assert!(filter.matches(&product(Decimal::new(999, 2), 3, "red")));
        assert!(!filter.matches(&product(Decimal::new(999, 2), 4, "red")));
        assert!(!filter.matches(&product(Decimal::new(499, 2), 3, "red")));
        assert!(!filter.matches(&product(Decimal::new(2001, 2), 3, "red")));
        assert!(!filter.matches(&product(Decimal::new(999, 2), 3, "blue")));
    }
}
