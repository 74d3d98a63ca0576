use crate::clients::{CancelledClient, CartClient, CustomerClient, OrderClient, ProductClient};
use crate::commit::{CommitOrchestrator, Notifier};
use crate::config::StoreConfig;
use crate::events::{Dashboard, DashboardProjection, EventBus};
use crate::model::{CancelledOrder, Customer, Order, Product};
use crate::order_actor::OrderContext;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Documents the collections start with, e.g. loaded from an export.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub cancelled: Vec<CancelledOrder>,
}

/// The running order commit service.
///
/// # Architecture
///
/// Five collection actors plus the dashboard projection:
/// - **Products**: the variant stock ledger; publishes stock snapshots
/// - **Customers**: profiles, order links and address books
/// - **Carts**: persisted carts keyed by customer
/// - **Orders**: committed orders; reserves stock and links customers on create
/// - **Cancelled**: append-only cancellation records
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(StoreConfig::from_env()?, Seed::default(), Arc::new(LogNotifier));
///
/// let order = system.orchestrator.checkout(&identity, &gateway, &intent).await?;
/// system.orders.set_status(&order.order_id, OrderStatus::Packed).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub products: ProductClient,
    pub customers: CustomerClient,
    pub carts: CartClient,
    pub orders: OrderClient,
    pub cancelled: CancelledClient,
    pub orchestrator: CommitOrchestrator,
    pub events: EventBus,
    /// Latest dashboard snapshot.
    pub dashboard: watch::Receiver<Dashboard>,

    /// Actor tasks, joined on shutdown. The projection comes last: it stops once every
    /// publisher is gone.
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns every actor and wires their dependencies. Must be called inside a Tokio
    /// runtime.
    pub fn start(config: StoreConfig, seed: Seed, notifier: Arc<dyn Notifier>) -> Self {
        let buffer = config.channel_buffer;
        let events = EventBus::new(buffer);
        let projection =
            DashboardProjection::new(config.low_stock_threshold, &seed.products, &seed.orders);
        let (dashboard, projection_handle) = projection.spawn(events.subscribe());

        // 1. Create actors (no dependencies yet)
        let (product_actor, product_inner) = crate::product_actor::new(buffer, seed.products);
        let (customer_actor, customer_inner) = crate::customer_actor::new(buffer, seed.customers);
        let (cart_actor, cart_inner) = crate::cart_actor::new(buffer);
        let (cancelled_actor, cancelled_inner) = crate::cancelled_actor::new(buffer, seed.cancelled);
        let (order_actor, order_inner) = crate::order_actor::new(buffer, seed.orders);

        let products = ProductClient::new(product_inner);
        let customers = CustomerClient::new(customer_inner);
        let carts = CartClient::new(cart_inner);
        let cancelled = CancelledClient::new(cancelled_inner);
        let orders = OrderClient::new(order_inner, config.id_scheme());

        // 2. Start actors with injected context
        let product_handle = tokio::spawn(product_actor.run(events.clone()));
        let customer_handle = tokio::spawn(customer_actor.run(()));
        let cart_handle = tokio::spawn(cart_actor.run(()));
        let cancelled_handle = tokio::spawn(cancelled_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            products: products.clone(),
            customers: customers.clone(),
            cancelled: cancelled.clone(),
            events: events.clone(),
            policy: config.reserve_policy(),
            restock_on_cancel: config.restock_on_cancel,
        }));

        let orchestrator = CommitOrchestrator::new(
            products.clone(),
            customers.clone(),
            carts.clone(),
            orders.clone(),
            notifier,
            config.pricing(),
        );
        info!(?config, "Order system started");

        Self {
            products,
            customers,
            carts,
            orders,
            cancelled,
            orchestrator,
            events,
            dashboard,
            // Orders first: it holds clients of the others.
            handles: vec![
                order_handle,
                product_handle,
                customer_handle,
                cart_handle,
                cancelled_handle,
                projection_handle,
            ],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the actors' channels; each actor drains its queue
    /// and exits. Clones handed out elsewhere keep their actor alive, so they must be
    /// dropped first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if every task finished cleanly
    /// - `Err(String)` if any task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.orchestrator);
        drop(self.orders);
        drop(self.products);
        drop(self.customers);
        drop(self.carts);
        drop(self.cancelled);
        drop(self.events);
        drop(self.dashboard);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
