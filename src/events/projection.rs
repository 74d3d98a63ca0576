use super::StoreEvent;
use crate::model::{Order, OrderStatus, Product, VariantKey};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A variant at or below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStock {
    pub product_id: String,
    pub variant: VariantKey,
    pub available: u32,
}

/// What the admin dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    /// Sum of order totals, cancelled orders excluded.
    pub revenue: Decimal,
    pub stock: BTreeMap<String, BTreeMap<VariantKey, u32>>,
    pub low_stock: Vec<LowStock>,
}

/// Folds [`StoreEvent`]s into a [`Dashboard`].
pub struct DashboardProjection {
    orders: HashMap<String, (OrderStatus, Decimal)>,
    stock: BTreeMap<String, BTreeMap<VariantKey, u32>>,
    low_stock_threshold: u32,
}

impl DashboardProjection {
    /// Starts from the documents the collections were seeded with.
    pub fn new(low_stock_threshold: u32, products: &[Product], orders: &[Order]) -> Self {
        Self {
            orders: orders
                .iter()
                .map(|o| (o.order_id.clone(), (o.status, o.total)))
                .collect(),
            stock: products
                .iter()
                .map(|p| (p.product_id.clone(), p.stock_by_variant.clone()))
                .collect(),
            low_stock_threshold,
        }
    }

    pub fn apply(&mut self, event: &StoreEvent) {
        match event {
            StoreEvent::OrderCommitted(order) => {
                self.orders
                    .insert(order.order_id.clone(), (order.status, order.total));
            }
            StoreEvent::OrderStatusChanged { order_id, to, .. } => {
                match self.orders.get_mut(order_id) {
                    Some((status, _)) => *status = *to,
                    None => warn!(%order_id, "Status change for an order the dashboard never saw"),
                }
            }
            StoreEvent::StockChanged {
                product_id, levels, ..
            } => {
                self.stock.insert(product_id.clone(), levels.clone());
            }
        }
    }

    pub fn snapshot(&self) -> Dashboard {
        let mut orders_by_status = BTreeMap::new();
        let mut revenue = Decimal::ZERO;
        for (status, total) in self.orders.values() {
            *orders_by_status.entry(*status).or_insert(0) += 1;
            if *status != OrderStatus::Cancelled {
                revenue = revenue.saturating_add(*total);
            }
        }

        let low_stock = self
            .stock
            .iter()
            .flat_map(|(product_id, levels)| {
                levels
                    .iter()
                    .filter(|(_, available)| **available <= self.low_stock_threshold)
                    .map(move |(variant, available)| LowStock {
                        product_id: product_id.clone(),
                        variant: variant.clone(),
                        available: *available,
                    })
            })
            .collect();

        Dashboard {
            orders_by_status,
            revenue,
            stock: self.stock.clone(),
            low_stock,
        }
    }

    /// Runs the projection until the bus closes, publishing a snapshot after every
    /// event.
    pub fn spawn(
        mut self,
        mut events: broadcast::Receiver<StoreEvent>,
    ) -> (watch::Receiver<Dashboard>, JoinHandle<()>) {
        let (sender, receiver) = watch::channel(self.snapshot());
        let handle = tokio::spawn(async move {
            info!("Dashboard projection started");
            loop {
                match events.recv().await {
                    Ok(event) => {
                        self.apply(&event);
                        debug!(?event, "Dashboard updated");
                        sender.send_replace(self.snapshot());
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Dashboard fell behind; some events were dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            info!("Dashboard projection stopped");
        });
        (receiver, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn black_m() -> VariantKey {
        VariantKey::new("Black", "M").unwrap()
    }

    #[test]
    fn test_revenue_excludes_cancelled_orders() {
        let mut projection = DashboardProjection::new(5, &[], &[]);
        projection.orders.insert("ORD0001".into(), (OrderStatus::Placed, dec!(1385)));
        projection.orders.insert("ORD0002".into(), (OrderStatus::Packed, dec!(520)));

        projection.apply(&StoreEvent::OrderStatusChanged {
            order_id: "ORD0002".into(),
            from: OrderStatus::Packed,
            to: OrderStatus::Cancelled,
        });

        let dashboard = projection.snapshot();
        assert_eq!(dashboard.revenue, dec!(1385));
        assert_eq!(dashboard.orders_by_status.get(&OrderStatus::Cancelled), Some(&1));
        assert_eq!(dashboard.orders_by_status.get(&OrderStatus::Placed), Some(&1));
    }

    #[test]
    fn test_stock_snapshot_replaces_levels() {
        let mut projection = DashboardProjection::new(1, &[], &[]);
        projection.apply(&StoreEvent::StockChanged {
            product_id: "MP010".into(),
            levels: BTreeMap::from([(black_m(), 4)]),
            total: 4,
        });
        assert!(projection.snapshot().low_stock.is_empty());

        projection.apply(&StoreEvent::StockChanged {
            product_id: "MP010".into(),
            levels: BTreeMap::from([(black_m(), 1)]),
            total: 1,
        });
        let dashboard = projection.snapshot();
        assert_eq!(dashboard.stock["MP010"][&black_m()], 1);
        assert_eq!(
            dashboard.low_stock,
            vec![LowStock {
                product_id: "MP010".into(),
                variant: black_m(),
                available: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_spawned_projection_publishes_and_stops_on_close() {
        let (sender, receiver) = broadcast::channel(8);
        let (mut dashboard, handle) = DashboardProjection::new(5, &[], &[]).spawn(receiver);

        sender
            .send(StoreEvent::StockChanged {
                product_id: "MP010".into(),
                levels: BTreeMap::from([(black_m(), 9)]),
                total: 9,
            })
            .unwrap();
        dashboard.changed().await.unwrap();
        assert_eq!(dashboard.borrow().stock["MP010"][&black_m()], 9);

        drop(sender);
        handle.await.unwrap();
    }
}
