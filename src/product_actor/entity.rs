//! ActorEntity trait implementation for the Product domain type.
//!
//! The product actor is the Variant Stock Ledger: `stockByVariant` and its derived
//! `totalStock` are only ever written here, by [`ProductAction`]s, and the total is
//! recomputed after every mutation.

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::events::{EventBus, StoreEvent};
use crate::model::{Product, ProductCreate, ProductUpdate, VariantKey};
use async_trait::async_trait;
use collection_actor::ActorEntity;

const CATALOG_PREFIX: &str = "MP";

#[async_trait]
impl ActorEntity for Product {
    type Id = String;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = EventBus;
    type Error = ProductError;

    fn id(&self) -> &String {
        &self.product_id
    }

    fn allocate_id(seq: u64, params: &ProductCreate) -> String {
        match &params.product_id {
            Some(id) => id.trim().to_string(),
            None => format!("{CATALOG_PREFIX}{seq:03}"),
        }
    }

    fn sequence_of(id: &String) -> Option<u64> {
        let digits = id.strip_prefix(CATALOG_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Creates a new Product from creation parameters.
    ///
    /// Products either declare both colours and sizes or neither; a product without
    /// variants stocks the single `Default-Free` variant.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, Self::Error> {
        if id.is_empty() {
            return Err(ProductError::InvalidProduct("empty product id".into()));
        }
        if params.name.trim().is_empty() {
            return Err(ProductError::InvalidProduct(format!("{id} has no name")));
        }
        if params.available_colors.is_empty() != params.available_sizes.is_empty() {
            return Err(ProductError::InvalidProduct(format!(
                "{id} must declare both colours and sizes, or neither"
            )));
        }
        for color in &params.available_colors {
            for size in &params.available_sizes {
                VariantKey::new(color, size)?;
            }
        }

        let mut product = Product {
            product_id: id,
            name: params.name,
            category: params.category,
            mrp: params.mrp,
            sale_price: params.sale_price,
            available_colors: params.available_colors,
            available_sizes: params.available_sizes,
            stock_by_variant: Default::default(),
            total_stock: 0,
        };
        for (variant, quantity) in params.initial_stock {
            if !product.declares(&variant) {
                return Err(ProductError::UnknownVariant {
                    product_id: product.product_id,
                    variant,
                });
            }
            product.stock_by_variant.insert(variant, quantity);
        }
        product.recompute_total();
        Ok(product)
    }

    async fn on_update(
        &mut self,
        update: ProductUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ProductError::InvalidProduct(format!(
                    "{} has no name",
                    self.product_id
                )));
            }
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(mrp) = update.mrp {
            self.mrp = mrp;
        }
        if let Some(sale_price) = update.sale_price {
            self.sale_price = sale_price;
        }
        Ok(())
    }

    async fn on_committed(&self, _previous: Option<&Self>, events: &Self::Context) {
        events.publish(StoreEvent::StockChanged {
            product_id: self.product_id.clone(),
            levels: self.stock_by_variant.clone(),
            total: self.total_stock,
        });
    }

    /// Handles stock actions.
    ///
    /// # Actions
    /// - `Reserve`: checked decrement; never clamps
    /// - `Restock`: checked increment of a declared variant
    /// - `SetQuantity`: absolute count for a declared variant
    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &Self::Context,
    ) -> Result<ProductActionResult, Self::Error> {
        match action {
            ProductAction::Reserve { variant, quantity } => {
                if quantity == 0 {
                    return Err(self.invalid_quantity(variant, quantity));
                }
                let available = self.available(&variant);
                let Some(remaining) = available.checked_sub(quantity) else {
                    return Err(ProductError::InsufficientStock {
                        product_id: self.product_id.clone(),
                        variant,
                        requested: quantity,
                        available,
                    });
                };
                self.stock_by_variant.insert(variant.clone(), remaining);
                self.recompute_total();
                Ok(ProductActionResult::Reserved {
                    variant,
                    quantity,
                    remaining,
                })
            }
            ProductAction::Restock { variant, quantity } => {
                self.ensure_declared(&variant)?;
                let now = match self.available(&variant).checked_add(quantity) {
                    Some(now) if quantity > 0 => now,
                    _ => return Err(self.invalid_quantity(variant, quantity)),
                };
                self.stock_by_variant.insert(variant.clone(), now);
                self.recompute_total();
                Ok(ProductActionResult::Restocked {
                    variant,
                    quantity,
                    now,
                })
            }
            ProductAction::SetQuantity { variant, quantity } => {
                self.ensure_declared(&variant)?;
                let previous = self.stock_by_variant.insert(variant.clone(), quantity);
                self.recompute_total();
                Ok(ProductActionResult::QuantitySet {
                    variant,
                    previous: previous.unwrap_or(0),
                    now: quantity,
                })
            }
        }
    }

    fn compensation(result: &ProductActionResult) -> Option<ProductAction> {
        match result {
            ProductActionResult::Reserved {
                variant, quantity, ..
            } => Some(ProductAction::Restock {
                variant: variant.clone(),
                quantity: *quantity,
            }),
            _ => None,
        }
    }
}

impl Product {
    fn ensure_declared(&self, variant: &VariantKey) -> Result<(), ProductError> {
        if self.declares(variant) {
            Ok(())
        } else {
            Err(ProductError::UnknownVariant {
                product_id: self.product_id.clone(),
                variant: variant.clone(),
            })
        }
    }

    fn invalid_quantity(&self, variant: VariantKey, quantity: u32) -> ProductError {
        ProductError::InvalidQuantity {
            product_id: self.product_id.clone(),
            variant,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::{BTreeMap, BTreeSet};

    fn black_m() -> VariantKey {
        VariantKey::new("Black", "M").unwrap()
    }

    fn tee() -> Product {
        let params = ProductCreate {
            product_id: Some("MP010".into()),
            name: "Plain Tee".into(),
            category: "T-Shirts".into(),
            mrp: dec!(599),
            sale_price: dec!(499),
            available_colors: BTreeSet::from(["Black".to_string(), "White".to_string()]),
            available_sizes: BTreeSet::from(["M".to_string(), "L".to_string()]),
            initial_stock: BTreeMap::from([(black_m(), 2)]),
        };
        Product::from_create_params("MP010".into(), params).unwrap()
    }

    fn assert_ledger_consistent(product: &Product) {
        let sum: u64 = product.stock_by_variant.values().map(|q| u64::from(*q)).sum();
        assert_eq!(product.total_stock, sum);
    }

    #[tokio::test]
    async fn test_reserve_decrements_and_recomputes_total() {
        let bus = EventBus::new(4);
        let mut product = tee();

        let result = product
            .handle_action(
                ProductAction::Reserve {
                    variant: black_m(),
                    quantity: 2,
                },
                &bus,
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            ProductActionResult::Reserved {
                variant: black_m(),
                quantity: 2,
                remaining: 0
            }
        );
        assert_eq!(product.total_stock, 0);
        assert_ledger_consistent(&product);
    }

    #[tokio::test]
    async fn test_reserve_rejects_rather_than_clamps() {
        let bus = EventBus::new(4);
        let mut product = tee();

        let err = product
            .handle_action(
                ProductAction::Reserve {
                    variant: black_m(),
                    quantity: 3,
                },
                &bus,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProductError::InsufficientStock {
                product_id: "MP010".into(),
                variant: black_m(),
                requested: 3,
                available: 2
            }
        );
    }

    #[tokio::test]
    async fn test_missing_variant_counts_as_zero() {
        let bus = EventBus::new(4);
        let mut product = tee();
        let white_l = VariantKey::new("White", "L").unwrap();
        assert_eq!(product.available(&white_l), 0);

        let err = product
            .handle_action(
                ProductAction::Reserve {
                    variant: white_l,
                    quantity: 1,
                },
                &bus,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::InsufficientStock { available: 0, .. }));
    }

    #[tokio::test]
    async fn test_restock_and_set_quantity_need_declared_variant() {
        let bus = EventBus::new(4);
        let mut product = tee();
        let red_m = VariantKey::new("Red", "M").unwrap();

        let err = product
            .handle_action(
                ProductAction::Restock {
                    variant: red_m,
                    quantity: 5,
                },
                &bus,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::UnknownVariant { .. }));

        let white_l = VariantKey::new("White", "L").unwrap();
        product
            .handle_action(
                ProductAction::Restock {
                    variant: white_l.clone(),
                    quantity: 5,
                },
                &bus,
            )
            .await
            .unwrap();
        let result = product
            .handle_action(
                ProductAction::SetQuantity {
                    variant: white_l,
                    quantity: 1,
                },
                &bus,
            )
            .await
            .unwrap();
        assert!(matches!(result, ProductActionResult::QuantitySet { previous: 5, now: 1, .. }));
        assert_eq!(product.total_stock, 3);
        assert_ledger_consistent(&product);
    }

    #[tokio::test]
    async fn test_zero_quantities_are_invalid() {
        let bus = EventBus::new(4);
        let mut product = tee();
        for action in [
            ProductAction::Reserve {
                variant: black_m(),
                quantity: 0,
            },
            ProductAction::Restock {
                variant: black_m(),
                quantity: 0,
            },
        ] {
            let err = product.handle_action(action, &bus).await.unwrap_err();
            assert!(matches!(err, ProductError::InvalidQuantity { quantity: 0, .. }));
        }
    }

    #[test]
    fn test_compensation_of_reserve_is_restock() {
        let reserved = ProductActionResult::Reserved {
            variant: black_m(),
            quantity: 2,
            remaining: 0,
        };
        assert_eq!(
            Product::compensation(&reserved),
            Some(ProductAction::Restock {
                variant: black_m(),
                quantity: 2
            })
        );
        let corrected = ProductActionResult::QuantitySet {
            variant: black_m(),
            previous: 2,
            now: 5,
        };
        assert_eq!(Product::compensation(&corrected), None);
    }

    #[test]
    fn test_product_without_variants_stocks_default() {
        let params = ProductCreate {
            name: "Tote Bag".into(),
            initial_stock: BTreeMap::from([(VariantKey::default_variant(), 7)]),
            ..Default::default()
        };
        let product = Product::from_create_params(Product::allocate_id(4, &params), params).unwrap();
        assert_eq!(product.product_id, "MP004");
        assert_eq!(product.total_stock, 7);
        assert_eq!(Product::sequence_of(&product.product_id), Some(4));
    }

    #[test]
    fn test_half_declared_variants_are_rejected() {
        let params = ProductCreate {
            name: "Cap".into(),
            available_colors: BTreeSet::from(["Red".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            Product::from_create_params("MP001".into(), params),
            Err(ProductError::InvalidProduct(_))
        ));
    }

    #[tokio::test]
    async fn test_committed_state_is_published() {
        let bus = EventBus::new(4);
        let mut events = bus.subscribe();
        let product = tee();

        product.on_committed(None, &bus).await;

        match events.recv().await.unwrap() {
            StoreEvent::StockChanged {
                product_id, total, ..
            } => {
                assert_eq!(product_id, "MP010");
                assert_eq!(total, 2);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
