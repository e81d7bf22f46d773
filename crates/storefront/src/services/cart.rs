//! Shopping cart service.
//!
//! Wraps the cart store with catalog validation and hydration. All
//! mutations take the per-user lock so they exclude an in-flight
//! checkout for the same user.

use copperleaf_core::{ProductId, UserId};
use thiserror::Error;
use tracing::instrument;

use crate::models::{Cart, CartItem};
use crate::stores::{CartStore, CatalogStore, StoreError};

use super::UserLocks;

/// Cart operation failures.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The product is not in the user's cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shopping cart operations for one storage backend pair.
#[derive(Debug, Clone)]
pub struct CartService<C, K> {
    catalog: C,
    carts: K,
    locks: UserLocks,
}

impl<C, K> CartService<C, K>
where
    C: CatalogStore,
    K: CartStore,
{
    /// Create a new cart service.
    #[must_use]
    pub const fn new(catalog: C, carts: K, locks: UserLocks) -> Self {
        Self {
            catalog,
            carts,
            locks,
        }
    }

    /// The user's cart hydrated with current catalog data.
    ///
    /// Products are resolved with a single batched lookup. Entries whose
    /// product has been removed from the catalog are omitted from the
    /// view; checkout, by contrast, rejects such carts outright.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if a storage read fails.
    pub async fn view(&self, user_id: UserId) -> Result<Cart, CartError> {
        let entries = self.carts.get(user_id).await?;
        let ids: Vec<ProductId> = entries.keys().copied().collect();
        let products = self.catalog.get_many(&ids).await?;

        let items = entries
            .iter()
            .filter_map(|(product_id, quantity)| {
                products
                    .get(product_id)
                    .map(|product| CartItem::new(product.clone(), *quantity))
            })
            .collect();

        Ok(Cart { items })
    }

    /// Add one unit of a product to the cart, inserting the entry with
    /// quantity one if it is new.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not
    /// resolve in the catalog.
    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: UserId, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.locks.acquire(user_id).await;

        if self.catalog.get(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        self.carts.add_item(user_id, product_id).await?;
        Ok(())
    }

    /// Overwrite the quantity of an existing cart entry. A quantity below
    /// one removes the entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not
    /// resolve in the catalog, `CartError::NotInCart` if there is no
    /// entry to update.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), CartError> {
        let _guard = self.locks.acquire(user_id).await;

        if self.catalog.get(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        self.carts
            .set_quantity(user_id, product_id, quantity)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CartError::NotInCart(product_id),
                other => CartError::Store(other),
            })
    }

    /// Remove everything from the user's cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` if the storage delete fails.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        let _guard = self.locks.acquire(user_id).await;
        self.carts.clear(user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copperleaf_core::CategoryId;
    use rust_decimal::Decimal;

    use crate::models::Product;
    use crate::stores::memory::{MemoryCarts, MemoryCatalog};

    fn product(id: i32, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price_cents, 2),
            category_id: CategoryId::new(1),
            description: String::new(),
            color: String::new(),
            stock: 5,
            featured: false,
            image_url: String::new(),
        }
    }

    async fn service() -> (CartService<MemoryCatalog, MemoryCarts>, MemoryCatalog) {
        let catalog = MemoryCatalog::new();
        catalog.insert(product(1, 1000)).await;
        catalog.insert(product(2, 500)).await;
        let service = CartService::new(catalog.clone(), MemoryCarts::new(), UserLocks::new());
        (service, catalog)
    }

    const USER: UserId = UserId::new(7);

    #[tokio::test]
    async fn add_inserts_then_increments() {
        let (service, _) = service().await;

        service.add_item(USER, ProductId::new(1)).await.expect("add");
        service.add_item(USER, ProductId::new(1)).await.expect("add again");
        service.add_item(USER, ProductId::new(2)).await.expect("add other");

        let cart = service.view(USER).await.expect("view");
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[1].quantity, 1);
        assert_eq!(cart.total(), Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn add_unknown_product_fails() {
        let (service, _) = service().await;

        let err = service
            .add_item(USER, ProductId::new(99))
            .await
            .expect_err("unknown product");
        assert!(matches!(err, CartError::ProductNotFound(id) if id == ProductId::new(99)));

        assert!(service.view(USER).await.expect("view").is_empty());
    }

    #[tokio::test]
    async fn set_quantity_overwrites_and_removes_at_zero() {
        let (service, _) = service().await;
        service.add_item(USER, ProductId::new(1)).await.expect("add");

        service
            .set_quantity(USER, ProductId::new(1), 5)
            .await
            .expect("set");
        assert_eq!(service.view(USER).await.expect("view").items[0].quantity, 5);

        service
            .set_quantity(USER, ProductId::new(1), 0)
            .await
            .expect("zero removes");
        assert!(service.view(USER).await.expect("view").is_empty());
    }

    #[tokio::test]
    async fn set_quantity_for_absent_entry_is_not_in_cart() {
        let (service, _) = service().await;

        let err = service
            .set_quantity(USER, ProductId::new(1), 3)
            .await
            .expect_err("nothing in cart");
        assert!(matches!(err, CartError::NotInCart(id) if id == ProductId::new(1)));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (service, _) = service().await;
        service.add_item(USER, ProductId::new(1)).await.expect("add");

        service.clear(USER).await.expect("clear");
        service.clear(USER).await.expect("clear empty cart");
        assert!(service.view(USER).await.expect("view").is_empty());
    }

    #[tokio::test]
    async fn view_omits_products_removed_from_catalog() {
        let (service, catalog) = service().await;
        service.add_item(USER, ProductId::new(1)).await.expect("add");
        service.add_item(USER, ProductId::new(2)).await.expect("add");

        catalog.remove(ProductId::new(1)).await;

        let cart = service.view(USER).await.expect("view");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product.id, ProductId::new(2));
    }

    #[tokio::test]
    async fn view_for_unknown_user_is_empty() {
        let (service, _) = service().await;
        let cart = service.view(UserId::new(1234)).await.expect("view");
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
