//! # Order Commit Demo
//!
//! Runs one storefront session against in-memory collections:
//! 1.  Seeds a small catalog and starts the [`OrderSystem`].
//! 2.  Checks out a cart online, then rings up a buy-now sale in the shop.
//! 3.  Moves the online order along and cancels it from the admin side.
//!
//! Settings come from `ORDER_COMMIT_*` variables or a `.env` file.

use async_trait::async_trait;
use collection_actor::tracing::setup_tracing;
use order_commit::commit::{Identity, LogNotifier, PaymentAuthorizer, PaymentError, StaticIdentity};
use order_commit::config::StoreConfig;
use order_commit::intent::{line_for, OrderIntent};
use order_commit::lifecycle::{OrderSystem, Seed};
use order_commit::model::{Channel, CheckoutDetails, OrderStatus, ProductCreate, VariantKey};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, Instrument};

/// Approves every charge and hands out sequential references.
#[derive(Default)]
struct DemoGateway {
    issued: AtomicU64,
}

#[async_trait]
impl PaymentAuthorizer for DemoGateway {
    async fn authorize(&self, amount: Decimal, payer: &Identity) -> Result<String, PaymentError> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        info!(%amount, payer = %payer.email, "Charging");
        Ok(format!("pay_demo_{n:04}"))
    }
}

fn checkout_form(name: &str, email: &str) -> CheckoutDetails {
    CheckoutDetails {
        fullname: name.to_string(),
        email: email.to_string(),
        contact: "9800000000".to_string(),
        street: "12 Lake Road".to_string(),
        city: "Pokhara".to_string(),
        state: "Gandaki".to_string(),
        zip: "33700".to_string(),
        country: "Nepal".to_string(),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = StoreConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting order commit demo");

    let system = OrderSystem::start(config, Seed::default(), Arc::new(LogNotifier));

    let tee = system
        .products
        .create_product(ProductCreate {
            product_id: Some("MP010".to_string()),
            name: "Plain Tee".to_string(),
            category: "T-Shirts".to_string(),
            mrp: dec!(600),
            sale_price: dec!(500),
            available_colors: BTreeSet::from(["Black".to_string(), "White".to_string()]),
            available_sizes: BTreeSet::from(["M".to_string(), "L".to_string()]),
            initial_stock: BTreeMap::from([
                (VariantKey::new("Black", "M").map_err(|e| e.to_string())?, 2),
                (VariantKey::new("White", "L").map_err(|e| e.to_string())?, 8),
            ]),
        })
        .await
        .map_err(|e| e.to_string())?;
    let mug = system
        .products
        .create_product(ProductCreate {
            name: "Enamel Mug".to_string(),
            category: "Accessories".to_string(),
            mrp: dec!(350),
            sale_price: dec!(300),
            initial_stock: BTreeMap::from([(VariantKey::default_variant(), 4)]),
            ..Default::default()
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(%tee, %mug, "Catalog seeded");

    let catalog = system.products.list_products().await.map_err(|e| e.to_string())?;
    let (Some(tee), Some(mug)) = (
        catalog.iter().find(|p| p.product_id == tee),
        catalog.iter().find(|p| p.product_id == mug),
    ) else {
        return Err("seeded products missing from the catalog".to_string());
    };

    let alice = Identity {
        uid: "uid_alice".to_string(),
        email: "alice@example.com".to_string(),
    };
    let gateway = DemoGateway::default();

    // Online checkout from the persisted cart
    let span = tracing::info_span!("cart_checkout", customer = %alice.uid);
    let online = async {
        system
            .carts
            .add_line(&alice.uid, line_for(tee, "Black", "M", 2))
            .await
            .map_err(|e| e.to_string())?;
        system
            .carts
            .add_line(&alice.uid, line_for(mug, "", "", 1))
            .await
            .map_err(|e| e.to_string())?;
        let lines = system.carts.lines(&alice.uid).await.map_err(|e| e.to_string())?;
        let intent = OrderIntent::from_cart(
            lines,
            Channel::Online,
            checkout_form("Alice", &alice.email),
        );
        system
            .orchestrator
            .checkout(&StaticIdentity(Some(alice.clone())), &gateway, &intent)
            .await
            .map_err(|e| e.user_message())
    }
    .instrument(span)
    .await?;
    info!(order_id = %online.order_id, total = %online.total, status = %online.status, "Online order placed");

    // The same variant is now sold out
    let again = OrderIntent::buy_now(
        line_for(tee, "Black", "M", 1),
        Channel::Online,
        checkout_form("Alice", &alice.email),
    );
    match system
        .orchestrator
        .checkout(&StaticIdentity(Some(alice.clone())), &gateway, &again)
        .await
    {
        Ok(order) => info!(order_id = %order.order_id, "Unexpectedly placed"),
        Err(e) => info!(message = %e.user_message(), "Checkout refused"),
    }

    // Counter sale
    let walk_in = Identity {
        uid: "uid_counter".to_string(),
        email: "counter@example.com".to_string(),
    };
    let sale = OrderIntent::buy_now(
        line_for(tee, "White", "L", 1),
        Channel::Shop,
        checkout_form("Walk-in", &walk_in.email),
    );
    match system
        .orchestrator
        .checkout(&StaticIdentity(Some(walk_in)), &gateway, &sale)
        .await
    {
        Ok(order) => info!(order_id = %order.order_id, status = %order.status, "Shop sale recorded"),
        Err(e) => error!(error = %e, "Shop sale failed"),
    }

    // Admin side
    let span = tracing::info_span!("admin", order_id = %online.order_id);
    async {
        system
            .orders
            .set_status(&online.order_id, OrderStatus::Packed)
            .await
            .map_err(|e| e.to_string())?;
        let cancellation = system
            .orders
            .cancel_order(&online.order_id, "customer request")
            .await
            .map_err(|e| e.to_string())?;
        info!(from = %cancellation.from, restocked = cancellation.restocked, "Order cancelled");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Let the projection catch up with the last events
    tokio::task::yield_now().await;
    let dashboard = system.dashboard.borrow().clone();
    info!(
        revenue = %dashboard.revenue,
        orders = ?dashboard.orders_by_status,
        low_stock = dashboard.low_stock.len(),
        "Dashboard"
    );

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
