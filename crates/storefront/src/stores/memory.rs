//! In-memory storage backend.
//!
//! Used by the test suite and handy for local development without a
//! database. The order store carries failure-injection knobs so the
//! checkout failure paths (mid-write line-item failure, failed rollback)
//! can be exercised deterministically.

use std::collections::BTreeMap;
use std::sync::Arc;

use copperleaf_core::{CategoryId, LineItemId, OrderId, ProductId, UserId};
use tokio::sync::RwLock;

use crate::models::{Category, NewLineItem, NewOrder, Order, OrderLineItem, Product, ProductFilter, Profile};

use super::{CartStore, CatalogStore, CategoryStore, OrderStore, ProfileStore, StoreError};

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    /// Remove a product, returning whether it existed.
    pub async fn remove(&self, id: ProductId) -> bool {
        self.products.write().await.remove(&id).is_some()
    }
}

impl CatalogStore for MemoryCatalog {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_many(
        &self,
        ids: &[ProductId],
    ) -> Result<BTreeMap<ProductId, Product>, StoreError> {
        let products = self.products.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn search(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }
}

/// In-memory category listing.
#[derive(Debug, Clone, Default)]
pub struct MemoryCategories {
    categories: Arc<RwLock<BTreeMap<CategoryId, Category>>>,
}

impl MemoryCategories {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, category: Category) {
        self.categories.write().await.insert(category.id, category);
    }
}

impl CategoryStore for MemoryCategories {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.categories.read().await.values().cloned().collect())
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }
}

/// In-memory profile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfiles {
    profiles: Arc<RwLock<BTreeMap<UserId, Profile>>>,
}

impl MemoryProfiles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfiles {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: &Profile) -> Result<Profile, StoreError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }
}

/// In-memory cart store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCarts {
    carts: Arc<RwLock<BTreeMap<UserId, BTreeMap<ProductId, i32>>>>,
}

impl MemoryCarts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryCarts {
    async fn get(&self, user_id: UserId) -> Result<BTreeMap<ProductId, i32>, StoreError> {
        Ok(self
            .carts
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_item(&self, user_id: UserId, product_id: ProductId) -> Result<(), StoreError> {
        let mut carts = self.carts.write().await;
        let entry = carts.entry(user_id).or_default().entry(product_id).or_insert(0);
        *entry += 1;
        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let mut carts = self.carts.write().await;
        let cart = carts.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        if !cart.contains_key(&product_id) {
            return Err(StoreError::NotFound);
        }
        if quantity < 1 {
            cart.remove(&product_id);
        } else {
            cart.insert(product_id, quantity);
        }
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), StoreError> {
        self.carts.write().await.remove(&user_id);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryOrdersInner {
    orders: BTreeMap<OrderId, Order>,
    lines: BTreeMap<LineItemId, OrderLineItem>,
    next_order_id: i32,
    next_line_id: i32,
    /// When set, `create_line_item` fails once this many line items have
    /// been written since the knob was set.
    line_failures_after: Option<usize>,
    lines_written: usize,
    fail_deletes: bool,
}

/// In-memory order store with failure injection for checkout tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrders {
    inner: Arc<RwLock<MemoryOrdersInner>>,
}

impl MemoryOrders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_line_item` fail after `n` successful writes.
    pub async fn fail_line_items_after(&self, n: usize) {
        let mut inner = self.inner.write().await;
        inner.line_failures_after = Some(n);
        inner.lines_written = 0;
    }

    /// Make `delete` fail, simulating a storage layer that cannot roll
    /// back a partially written order.
    pub async fn fail_deletes(&self, fail: bool) {
        self.inner.write().await.fail_deletes = fail;
    }

    /// Number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Number of persisted line items across all orders.
    pub async fn line_item_count(&self) -> usize {
        self.inner.read().await.lines.len()
    }
}

fn injected_failure() -> StoreError {
    StoreError::Conflict("injected storage failure".to_owned())
}

impl OrderStore for MemoryOrders {
    async fn create(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_order_id += 1;
        let created = Order {
            id: OrderId::new(inner.next_order_id),
            user_id: order.user_id,
            created_at: order.created_at,
            address: order.address.clone(),
            city: order.city.clone(),
            state: order.state.clone(),
            zip: order.zip.clone(),
            shipping_amount: order.shipping_amount,
            line_items: Vec::new(),
        };
        inner.orders.insert(created.id, created.clone());
        Ok(created)
    }

    async fn create_line_item(&self, line: &NewLineItem) -> Result<OrderLineItem, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(after) = inner.line_failures_after
            && inner.lines_written >= after
        {
            return Err(injected_failure());
        }
        if !inner.orders.contains_key(&line.order_id) {
            return Err(StoreError::NotFound);
        }
        inner.next_line_id += 1;
        inner.lines_written += 1;
        let created = OrderLineItem {
            id: LineItemId::new(inner.next_line_id),
            order_id: line.order_id,
            product_id: line.product_id,
            sales_price: line.sales_price,
            quantity: line.quantity,
            discount: line.discount,
            product: None,
        };
        inner.lines.insert(created.id, created.clone());
        Ok(created)
    }

    async fn line_items(&self, order_id: OrderId) -> Result<Vec<OrderLineItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .lines
            .values()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn get_by_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.inner.read().await.orders.get(&order_id).cloned())
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.fail_deletes {
            return Err(injected_failure());
        }
        inner.orders.remove(&order_id);
        inner.lines.retain(|_, line| line.order_id != order_id);
        Ok(())
    }
}
