//! End-to-end checkout behavior over the in-memory backend.
//!
//! Exercises the full cart-to-order conversion: preconditions, price
//! snapshotting, cart clearing, rollback of partial orders, surfaced
//! inconsistency when rollback fails, and per-user serialization.

use chrono::Utc;
use copperleaf_core::{CategoryId, OrderId, ProductId, UserId};
use rust_decimal::Decimal;

use copperleaf_storefront::models::{Product, Profile};
use copperleaf_storefront::services::{
    CartService, CheckoutError, CheckoutService, OrderAccessError, UserLocks,
};
use copperleaf_storefront::stores::memory::{
    MemoryCarts, MemoryCatalog, MemoryOrders, MemoryProfiles,
};
use copperleaf_storefront::stores::{CartStore, ProfileStore};

const USER: UserId = UserId::new(7);
const OTHER_USER: UserId = UserId::new(8);

fn product(id: i32, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Decimal::new(price_cents, 2),
        category_id: CategoryId::new(1),
        description: String::new(),
        color: String::new(),
        stock: 10,
        featured: false,
        image_url: String::new(),
    }
}

fn profile(user_id: UserId) -> Profile {
    Profile {
        user_id,
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone: "555-0100".to_owned(),
        email: "ada@example.com".to_owned(),
        address: "12 Analytical Way".to_owned(),
        city: "London".to_owned(),
        state: "LDN".to_owned(),
        zip: "E1 6AN".to_owned(),
    }
}

struct Fixture {
    catalog: MemoryCatalog,
    carts: MemoryCarts,
    orders: MemoryOrders,
    checkout: CheckoutService<MemoryCatalog, MemoryProfiles, MemoryCarts, MemoryOrders>,
    cart_service: CartService<MemoryCatalog, MemoryCarts>,
}

/// Two products in the catalog, a profile for `USER`, empty cart.
async fn fixture() -> Fixture {
    let catalog = MemoryCatalog::new();
    catalog.insert(product(1, 1000)).await;
    catalog.insert(product(2, 500)).await;

    let profiles = MemoryProfiles::new();
    profiles.upsert(&profile(USER)).await.expect("seed profile");

    let carts = MemoryCarts::new();
    let orders = MemoryOrders::new();
    let locks = UserLocks::new();

    let checkout = CheckoutService::new(
        catalog.clone(),
        profiles,
        carts.clone(),
        orders.clone(),
        locks.clone(),
    );
    let cart_service = CartService::new(catalog.clone(), carts.clone(), locks);

    Fixture {
        catalog,
        carts,
        orders,
        checkout,
        cart_service,
    }
}

async fn seed_cart(fx: &Fixture) {
    // Product 1 twice, product 2 once.
    fx.carts.add_item(USER, ProductId::new(1)).await.expect("add");
    fx.carts.add_item(USER, ProductId::new(1)).await.expect("add");
    fx.carts.add_item(USER, ProductId::new(2)).await.expect("add");
}

#[tokio::test]
async fn checkout_requires_a_profile() {
    let fx = fixture().await;
    fx.carts
        .add_item(OTHER_USER, ProductId::new(1))
        .await
        .expect("add");

    let err = fx
        .checkout
        .checkout(OTHER_USER)
        .await
        .expect_err("no profile");
    assert!(matches!(err, CheckoutError::ProfileMissing(id) if id == OTHER_USER));

    // Nothing persisted, cart untouched.
    assert_eq!(fx.orders.order_count().await, 0);
    assert_eq!(fx.carts.get(OTHER_USER).await.expect("cart").len(), 1);
}

#[tokio::test]
async fn checkout_rejects_an_empty_cart() {
    let fx = fixture().await;

    for _ in 0..2 {
        let err = fx.checkout.checkout(USER).await.expect_err("empty cart");
        assert!(matches!(err, CheckoutError::CartEmpty(id) if id == USER));
    }
    assert_eq!(fx.orders.order_count().await, 0);
}

#[tokio::test]
async fn checkout_snapshots_prices_and_clears_the_cart() {
    let fx = fixture().await;
    seed_cart(&fx).await;

    let order = fx.checkout.checkout(USER).await.expect("checkout");

    // Line items in ascending product-id order, quantities preserved.
    assert_eq!(order.line_items.len(), 2);
    assert_eq!(order.line_items[0].product_id, ProductId::new(1));
    assert_eq!(order.line_items[0].quantity, 2);
    assert_eq!(order.line_items[0].sales_price, Decimal::new(1000, 2));
    assert_eq!(order.line_items[1].product_id, ProductId::new(2));
    assert_eq!(order.line_items[1].quantity, 1);

    // 2 x 10.00 + 1 x 5.00, no shipping, no discounts.
    assert_eq!(order.shipping_amount, Decimal::ZERO);
    assert_eq!(order.total(), Decimal::new(2500, 2));

    // Address copied from the profile at checkout time.
    assert_eq!(order.address, "12 Analytical Way");
    assert_eq!(order.city, "London");

    // Cart is empty only after the order is fully durable.
    assert!(fx.carts.get(USER).await.expect("cart").is_empty());
    assert_eq!(fx.orders.line_item_count().await, 2);
}

#[tokio::test]
async fn persisted_totals_survive_later_price_changes() {
    let fx = fixture().await;
    seed_cart(&fx).await;
    let order = fx.checkout.checkout(USER).await.expect("checkout");
    let total_at_checkout = order.total();

    // Reprice product 1 after the fact.
    fx.catalog.insert(product(1, 99_00)).await;

    let reread = fx
        .checkout
        .order_for_user(USER, order.id)
        .await
        .expect("reread");
    assert_eq!(reread.total(), total_at_checkout);
    assert_eq!(reread.line_items[0].sales_price, Decimal::new(1000, 2));

    // The hydrated product reflects the catalog's current state; the
    // snapshot fields stay authoritative.
    let hydrated = reread.line_items[0]
        .product
        .as_ref()
        .expect("hydrated product");
    assert_eq!(hydrated.price, Decimal::new(99_00, 2));
}

#[tokio::test]
async fn concurrent_checkouts_for_one_user_produce_one_order() {
    let fx = fixture().await;
    seed_cart(&fx).await;

    let (a, b) = tokio::join!(fx.checkout.checkout(USER), fx.checkout.checkout(USER));

    // Exactly one wins; the loser observes the emptied cart.
    let (ok, err) = match (a, b) {
        (Ok(order), Err(err)) | (Err(err), Ok(order)) => (order, err),
        other => panic!("expected exactly one success, got {other:?}"),
    };
    assert_eq!(ok.line_items.len(), 2);
    assert!(matches!(err, CheckoutError::CartEmpty(_)));
    assert_eq!(fx.orders.order_count().await, 1);
}

#[tokio::test]
async fn deleted_product_fails_the_whole_checkout() {
    let fx = fixture().await;
    seed_cart(&fx).await;
    fx.catalog.remove(ProductId::new(2)).await;

    let err = fx.checkout.checkout(USER).await.expect_err("gone product");
    assert!(matches!(err, CheckoutError::ProductUnavailable(id) if id == ProductId::new(2)));

    // No partial order, cart untouched.
    assert_eq!(fx.orders.order_count().await, 0);
    assert_eq!(fx.carts.get(USER).await.expect("cart").len(), 2);
}

#[tokio::test]
async fn line_item_failure_rolls_the_order_back() {
    let fx = fixture().await;
    seed_cart(&fx).await;
    fx.orders.fail_line_items_after(1).await;

    let err = fx.checkout.checkout(USER).await.expect_err("injected");
    assert!(matches!(err, CheckoutError::Store(_)));

    // The partial order and its first line item are gone; the cart is
    // intact so the user can retry.
    assert_eq!(fx.orders.order_count().await, 0);
    assert_eq!(fx.orders.line_item_count().await, 0);
    assert_eq!(fx.carts.get(USER).await.expect("cart").len(), 2);
}

#[tokio::test]
async fn failed_rollback_surfaces_as_inconsistent() {
    let fx = fixture().await;
    seed_cart(&fx).await;
    fx.orders.fail_line_items_after(1).await;
    fx.orders.fail_deletes(true).await;

    let err = fx.checkout.checkout(USER).await.expect_err("injected");
    let CheckoutError::Inconsistent { order_id, .. } = err else {
        panic!("expected Inconsistent, got {err:?}");
    };

    // The partial order is still there under the reported id, and the
    // cart was never cleared.
    assert!(
        fx.checkout
            .order_for_user(USER, order_id)
            .await
            .is_ok()
    );
    assert_eq!(fx.carts.get(USER).await.expect("cart").len(), 2);
}

#[tokio::test]
async fn orders_are_listed_most_recent_first() {
    let fx = fixture().await;

    for _ in 0..3 {
        seed_cart(&fx).await;
        fx.checkout.checkout(USER).await.expect("checkout");
    }

    let orders = fx.checkout.orders_for_user(USER).await.expect("list");
    assert_eq!(orders.len(), 3);
    assert!(orders.windows(2).all(|w| {
        w[0].created_at > w[1].created_at
            || (w[0].created_at == w[1].created_at && w[0].id > w[1].id)
    }));
    assert!(orders.iter().all(|o| o.line_items.len() == 2));
}

#[tokio::test]
async fn order_reads_distinguish_not_found_from_forbidden() {
    let fx = fixture().await;
    seed_cart(&fx).await;
    let order = fx.checkout.checkout(USER).await.expect("checkout");

    let err = fx
        .checkout
        .order_for_user(OTHER_USER, order.id)
        .await
        .expect_err("not the owner");
    assert!(matches!(
        err,
        OrderAccessError::Forbidden { order_id, user_id }
            if order_id == order.id && user_id == OTHER_USER
    ));

    let err = fx
        .checkout
        .order_for_user(USER, OrderId::new(9999))
        .await
        .expect_err("no such order");
    assert!(matches!(err, OrderAccessError::NotFound(id) if id == OrderId::new(9999)));
}

#[tokio::test]
async fn cart_mutations_and_checkout_share_the_user_lock() {
    let fx = fixture().await;
    seed_cart(&fx).await;

    // Racing a clear against checkout must leave either an order from
    // the full cart or no order at all, never an order from a half
    // cleared cart.
    let (checked_out, cleared) = tokio::join!(
        fx.checkout.checkout(USER),
        fx.cart_service.clear(USER)
    );
    cleared.expect("clear never fails here");

    match checked_out {
        Ok(order) => assert_eq!(order.line_items.len(), 2),
        Err(err) => {
            assert!(matches!(err, CheckoutError::CartEmpty(_)));
            assert_eq!(fx.orders.order_count().await, 0);
        }
    }
    assert!(fx.carts.get(USER).await.expect("cart").is_empty());
}

#[tokio::test]
async fn checkout_output_is_utc_stamped() {
    let fx = fixture().await;
    seed_cart(&fx).await;

    let before = Utc::now();
    let order = fx.checkout.checkout(USER).await.expect("checkout");
    let after = Utc::now();

    assert!(order.created_at >= before && order.created_at <= after);
}
