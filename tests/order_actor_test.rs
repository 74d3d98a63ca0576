use chrono::Utc;
use collection_actor::mock::{create_mock_client, MockClient};
use collection_actor::{
    ActorClient, FrameworkError, ResourceRequest, RevertOutcome, TransactionOutcome,
};
use order_commit::clients::{CancelledClient, CustomerClient, OrderClient, ProductClient};
use order_commit::customer_actor::CustomerActionResult;
use order_commit::events::{EventBus, StoreEvent};
use order_commit::model::{
    Address, CancelledOrder, Channel, CheckoutDetails, Customer, Customization, Order,
    OrderDraft, OrderLine, OrderStatus, Product, VariantKey,
};
use order_commit::order_actor::{IdScheme, OrderContext, OrderError, ReservePolicy};
use order_commit::product_actor::{ProductActionResult, ProductError};
use rust_decimal_macros::dec;
use std::time::Duration;

/// Real Order actor with mocked ledger, customer and cancellation collections.
///
/// The order's `on_create` is the commit step, so these tests script what the other
/// collections answer and check what the order actor does with it.
struct Harness {
    orders: OrderClient,
    events: EventBus,
    handle: tokio::task::JoinHandle<()>,
}

impl Harness {
    fn start(
        seed: Vec<Order>,
        products: &MockClient<Product>,
        customers: &MockClient<Customer>,
        cancelled: &MockClient<CancelledOrder>,
        restock_on_cancel: bool,
    ) -> Self {
        Self::start_with(
            seed,
            ProductClient::new(products.client()),
            customers,
            cancelled,
            fast_policy(),
            restock_on_cancel,
        )
    }

    fn start_with(
        seed: Vec<Order>,
        products: ProductClient,
        customers: &MockClient<Customer>,
        cancelled: &MockClient<CancelledOrder>,
        policy: ReservePolicy,
        restock_on_cancel: bool,
    ) -> Self {
        let (actor, inner) = order_commit::order_actor::new(16, seed);
        let events = EventBus::new(16);
        let handle = tokio::spawn(actor.run(OrderContext {
            products,
            customers: CustomerClient::new(customers.client()),
            cancelled: CancelledClient::new(cancelled.client()),
            events: events.clone(),
            policy,
            restock_on_cancel,
        }));
        Self {
            orders: OrderClient::new(inner, IdScheme::default()),
            events,
            handle,
        }
    }

    async fn stop(self) {
        drop(self.orders);
        self.handle.await.unwrap();
    }
}

fn fast_policy() -> ReservePolicy {
    ReservePolicy {
        attempts: 3,
        backoff: Duration::from_millis(1),
        timeout: Duration::from_millis(500),
    }
}

fn black_m() -> VariantKey {
    VariantKey::new("Black", "M").unwrap()
}

fn line(product_id: &str, quantity: u32) -> OrderLine {
    OrderLine {
        product_id: product_id.to_string(),
        name: "Plain Tee".to_string(),
        price: dec!(500),
        quantity,
        color: "Black".to_string(),
        size: "M".to_string(),
        image: String::new(),
        subtotal: dec!(500) * rust_decimal::Decimal::from(quantity),
        customization: None,
    }
}

fn checkout(payment_id: &str) -> CheckoutDetails {
    CheckoutDetails {
        fullname: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        city: "Pokhara".to_string(),
        payment_id: payment_id.to_string(),
        date: "2026-10-18".to_string(),
        ..Default::default()
    }
}

fn draft(payment_id: &str, lines: Vec<OrderLine>) -> OrderDraft {
    OrderDraft {
        customer_id: "uid_alice".to_string(),
        channel: Channel::Online,
        checkout: checkout(payment_id),
        lines,
        shipping_address: Address::default(),
        subtotal: dec!(1000),
        tax: dec!(50),
        shipping_fee: dec!(20),
        total: dec!(1070),
    }
}

fn stored(order_id: &str, status: OrderStatus) -> Order {
    Order {
        order_id: order_id.to_string(),
        customer_id: "uid_alice".to_string(),
        channel: Channel::Online,
        checkout: checkout(&format!("PAY-{order_id}")),
        lines: vec![line("MP010", 2)],
        shipping_address: Address::default(),
        subtotal: dec!(1000),
        tax: dec!(50),
        shipping_fee: dec!(20),
        total: dec!(1070),
        status,
        created_at: Utc::now(),
    }
}

fn reserved() -> ProductActionResult {
    ProductActionResult::Reserved {
        variant: black_m(),
        quantity: 2,
        remaining: 0,
    }
}

fn recorded() -> CustomerActionResult {
    CustomerActionResult::OrderRecorded {
        address_added: true,
    }
}

#[tokio::test]
async fn test_order_commit_reserves_then_links_customer() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let order = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .expect("order should commit");

    assert_eq!(order.order_id, "ORD0001");
    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.payment_reference(), "PAY-1");

    products.verify();
    customers.verify();
    cancelled.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_shop_order_starts_delivered() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-SHOP".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let mut shop = draft("PAY-SHOP", vec![line("MP010", 2)]);
    shop.channel = Channel::Shop;
    let order = harness.orders.place_order(shop).await.unwrap();

    assert_eq!(order.status, OrderStatus::Delivered);
    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_replayed_payment_is_a_duplicate() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Replayed(vec![reserved()]));
    // The failed attempt must not consume an order number.
    products
        .expect_transaction(Some("PAY-2".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let err = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::DuplicatePayment("PAY-1".into()));

    let order = harness
        .orders
        .place_order(draft("PAY-2", vec![line("MP010", 2)]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "ORD0001");

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_customer_failure_releases_reservation() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_err(FrameworkError::ActorClosed);
    products
        .expect_revert("PAY-1")
        .return_ok(RevertOutcome::Reverted(1));

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let err = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::PersistenceFailed(_)), "{err:?}");

    // Nothing was stored
    assert!(harness.orders.list().await.unwrap().is_empty());

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_insufficient_stock_is_not_retried() {
    let mut products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_err(FrameworkError::EntityError(Box::new(
            ProductError::InsufficientStock {
                product_id: "MP010".into(),
                variant: black_m(),
                requested: 2,
                available: 1,
            },
        )));

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let err = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InsufficientStock {
            product_id: "MP010".into(),
            variant: black_m(),
            requested: 2,
            available: 1,
        }
    );

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_err(FrameworkError::ActorClosed);
    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let order = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "ORD0001");

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_replay_after_lost_reply_is_success() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_err(FrameworkError::ActorDropped);
    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Replayed(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let result = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await;
    assert!(result.is_ok(), "{result:?}");

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_exhausted_retries_release_the_key() {
    let mut products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    for _ in 0..3 {
        products
            .expect_transaction(Some("PAY-1".into()))
            .return_err(FrameworkError::ActorClosed);
    }
    products
        .expect_revert("PAY-1")
        .return_ok(RevertOutcome::Tombstoned);

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let err = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OrderError::ReservationFailed { attempts: 3, .. }),
        "{err:?}"
    );

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_timed_out_reservation_is_released() {
    let (product_inner, mut receiver) = create_mock_client::<Product>(10);
    let customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();
    let policy = ReservePolicy {
        attempts: 1,
        backoff: Duration::from_millis(1),
        timeout: Duration::from_millis(20),
    };

    let harness = Harness::start_with(
        vec![],
        ProductClient::new(product_inner),
        &customers,
        &cancelled,
        policy,
        false,
    );
    let orders = harness.orders.clone();
    let task =
        tokio::spawn(async move { orders.place_order(draft("PAY-1", vec![line("MP010", 2)])).await });

    // Hold the reply so the attempt times out
    let held = match receiver.recv().await {
        Some(ResourceRequest::Transaction {
            key, respond_to, ..
        }) => {
            assert_eq!(key.as_deref(), Some("PAY-1"));
            respond_to
        }
        _ => panic!("Expected Transaction request"),
    };
    match receiver.recv().await {
        Some(ResourceRequest::Revert { key, respond_to }) => {
            assert_eq!(key, "PAY-1");
            respond_to.send(Ok(RevertOutcome::Tombstoned)).unwrap();
        }
        _ => panic!("Expected Revert request"),
    }

    let err = task.await.unwrap().unwrap_err();
    assert!(
        matches!(err, OrderError::ReservationFailed { attempts: 1, .. }),
        "{err:?}"
    );
    drop(held);
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_custom_orders_use_their_own_prefix() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let mut custom = line("MP010", 2);
    custom.customization = Some(Customization {
        kind: "logo".into(),
        asset_ref: "uploads/logo.png".into(),
        text: None,
    });
    let order = harness
        .orders
        .place_order(draft("PAY-1", vec![custom]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "CST0001");

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_numbering_resumes_after_seeded_orders() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());

    // One sequence across prefixes; ids without a number are skipped
    let seed = vec![
        stored("ORD0007", OrderStatus::Delivered),
        stored("CST0042", OrderStatus::Shipped),
        stored("legacy-99", OrderStatus::Delivered),
    ];
    let harness = Harness::start(seed, &products, &customers, &cancelled, false);
    let order = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap();
    assert_eq!(order.order_id, "ORD0043");

    products.verify();
    customers.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let cancelled = MockClient::<CancelledOrder>::new();

    let seed = vec![
        stored("ORD0001", OrderStatus::Delivered),
        stored("ORD0002", OrderStatus::Placed),
    ];
    let harness = Harness::start(seed, &products, &customers, &cancelled, false);

    let err = harness
        .orders
        .set_status("ORD0001", OrderStatus::Packed)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            order_id: "ORD0001".into(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Packed,
        }
    );

    let from = harness
        .orders
        .set_status("ORD0002", OrderStatus::Packed)
        .await
        .unwrap();
    assert_eq!(from, OrderStatus::Placed);

    // Cancelling needs the cancel action and a reason
    let err = harness
        .orders
        .set_status("ORD0002", OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::MissingReason);
    let err = harness.orders.cancel_order("ORD0002", "  ").await.unwrap_err();
    assert_eq!(err, OrderError::MissingReason);

    let order = harness.orders.get("ORD0002".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Packed);

    let err = harness
        .orders
        .set_status("ORD9999", OrderStatus::Packed)
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::NotFound("ORD9999".into()));

    products.verify();
    customers.verify();
    cancelled.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_cancel_writes_record_without_restock() {
    let products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let mut cancelled = MockClient::<CancelledOrder>::new();

    let expected = stored("ORD0001", OrderStatus::Cancelled);
    cancelled.expect_create().return_ok("ORD0001".into());
    cancelled
        .expect_get("ORD0001".into())
        .return_ok(Some(CancelledOrder {
            order: expected,
            reason: "customer request".into(),
            cancelled_at: Utc::now(),
        }));

    let harness = Harness::start(
        vec![stored("ORD0001", OrderStatus::Packed)],
        &products,
        &customers,
        &cancelled,
        false,
    );
    let cancellation = harness
        .orders
        .cancel_order("ORD0001", "customer request")
        .await
        .unwrap();

    assert_eq!(cancellation.from, OrderStatus::Packed);
    assert!(!cancellation.restocked);
    assert_eq!(cancellation.record.reason, "customer request");

    let order = harness.orders.get("ORD0001".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    // Terminal
    let err = harness
        .orders
        .cancel_order("ORD0001", "again")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));

    products.verify();
    cancelled.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_order_events_follow_store_order() {
    let mut products = MockClient::<Product>::new();
    let mut customers = MockClient::<Customer>::new();
    let mut cancelled = MockClient::<CancelledOrder>::new();

    products
        .expect_transaction(Some("PAY-1".into()))
        .return_ok(TransactionOutcome::Applied(vec![reserved()]));
    customers
        .expect_action("uid_alice".into())
        .return_ok(recorded());
    cancelled.expect_create().return_ok("ORD0001".into());
    cancelled
        .expect_get("ORD0001".into())
        .return_ok(Some(CancelledOrder {
            order: stored("ORD0001", OrderStatus::Cancelled),
            reason: "customer request".into(),
            cancelled_at: Utc::now(),
        }));

    let harness = Harness::start(vec![], &products, &customers, &cancelled, false);
    let mut events = harness.events.subscribe();

    let order = harness
        .orders
        .place_order(draft("PAY-1", vec![line("MP010", 2)]))
        .await
        .unwrap();
    // The event is out before place_order returns
    match events.try_recv().unwrap() {
        StoreEvent::OrderCommitted(committed) => assert_eq!(*committed, order),
        other => panic!("unexpected event {other:?}"),
    }

    harness
        .orders
        .set_status("ORD0001", OrderStatus::Packed)
        .await
        .unwrap();
    let err = harness
        .orders
        .set_status("ORD0001", OrderStatus::Placed)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
    harness
        .orders
        .cancel_order("ORD0001", "customer request")
        .await
        .unwrap();

    // The refused transition published nothing
    for (from, to) in [
        (OrderStatus::Placed, OrderStatus::Packed),
        (OrderStatus::Packed, OrderStatus::Cancelled),
    ] {
        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::OrderStatusChanged {
                order_id: "ORD0001".into(),
                from,
                to,
            }
        );
    }
    assert!(events.try_recv().is_err());

    products.verify();
    customers.verify();
    cancelled.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_failed_record_leaves_order_untouched() {
    let products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let mut cancelled = MockClient::<CancelledOrder>::new();

    cancelled
        .expect_create()
        .return_err(FrameworkError::ActorClosed);

    let harness = Harness::start(
        vec![stored("ORD0001", OrderStatus::Placed)],
        &products,
        &customers,
        &cancelled,
        false,
    );
    let err = harness
        .orders
        .cancel_order("ORD0001", "customer request")
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::CancellationFailed(_)), "{err:?}");

    let order = harness.orders.get("ORD0001".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Placed);

    cancelled.verify();
    harness.stop().await;
}

#[tokio::test]
async fn test_cancel_restocks_seeded_order_when_enabled() {
    let mut products = MockClient::<Product>::new();
    let customers = MockClient::<Customer>::new();
    let mut cancelled = MockClient::<CancelledOrder>::new();

    // Not in this ledger's journal: the lines are put back directly.
    products
        .expect_revert("PAY-ORD0001")
        .return_ok(RevertOutcome::Tombstoned);
    products.expect_transaction(None).return_ok(TransactionOutcome::Applied(vec![
        ProductActionResult::Restocked {
            variant: black_m(),
            quantity: 2,
            now: 2,
        },
    ]));
    cancelled.expect_create().return_ok("ORD0001".into());
    cancelled
        .expect_get("ORD0001".into())
        .return_ok(Some(CancelledOrder {
            order: stored("ORD0001", OrderStatus::Cancelled),
            reason: "damaged".into(),
            cancelled_at: Utc::now(),
        }));

    let harness = Harness::start(
        vec![stored("ORD0001", OrderStatus::Shipped)],
        &products,
        &customers,
        &cancelled,
        true,
    );
    let cancellation = harness
        .orders
        .cancel_order("ORD0001", "damaged")
        .await
        .unwrap();
    assert!(cancellation.restocked);

    products.verify();
    cancelled.verify();
    harness.stop().await;
}
