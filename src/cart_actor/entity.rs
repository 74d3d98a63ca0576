//! ActorEntity trait implementation for the Cart domain type.

use super::actions::{CartAction, CartActionResult};
use super::error::CartError;
use crate::model::{Cart, CartCreate};
use async_trait::async_trait;
use collection_actor::ActorEntity;

#[async_trait]
impl ActorEntity for Cart {
    type Id = String;
    type Create = CartCreate;
    type Update = ();
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = ();
    type Error = CartError;

    fn id(&self) -> &String {
        &self.customer_id
    }

    fn allocate_id(_seq: u64, params: &CartCreate) -> String {
        params.customer_id.clone()
    }

    fn from_create_params(id: String, _params: CartCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_id: id,
            lines: Vec::new(),
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        _ctx: &Self::Context,
    ) -> Result<CartActionResult, Self::Error> {
        match action {
            CartAction::Add(line) => {
                if line.quantity == 0 {
                    return Err(CartError::InvalidQuantity(0));
                }
                match self.lines.iter().position(|l| l.same_item(&line)) {
                    Some(index) => {
                        let existing = &mut self.lines[index];
                        existing.quantity = existing
                            .quantity
                            .checked_add(line.quantity)
                            .ok_or(CartError::InvalidQuantity(line.quantity))?;
                        Ok(CartActionResult::Added {
                            index,
                            quantity: existing.quantity,
                        })
                    }
                    None => {
                        let quantity = line.quantity;
                        self.lines.push(line);
                        Ok(CartActionResult::Added {
                            index: self.lines.len() - 1,
                            quantity,
                        })
                    }
                }
            }
            CartAction::SetQuantity { index, quantity } => {
                if quantity == 0 {
                    return Err(CartError::InvalidQuantity(0));
                }
                let len = self.lines.len();
                let line = self
                    .lines
                    .get_mut(index)
                    .ok_or(CartError::NoSuchLine { index, len })?;
                line.quantity = quantity;
                Ok(CartActionResult::QuantitySet { index, quantity })
            }
            CartAction::Remove { index } => {
                if index >= self.lines.len() {
                    return Err(CartError::NoSuchLine {
                        index,
                        len: self.lines.len(),
                    });
                }
                Ok(CartActionResult::Removed(self.lines.remove(index)))
            }
            CartAction::Clear => {
                let removed = self.lines.len();
                self.lines.clear();
                Ok(CartActionResult::Cleared { removed })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartLine, Customization};
    use rust_decimal_macros::dec;

    fn tee(color: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: "MP010".into(),
            name: "Plain Tee".into(),
            image: String::new(),
            selected_color: color.into(),
            selected_size: "M".into(),
            quantity,
            unit_price: dec!(500),
            customization: None,
        }
    }

    fn empty() -> Cart {
        Cart::from_create_params(
            "uid-1".into(),
            CartCreate {
                customer_id: "uid-1".into(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_identical_lines_merge() {
        let mut cart = empty();
        cart.handle_action(CartAction::Add(tee("Black", 1)), &()).await.unwrap();
        let merged = cart
            .handle_action(CartAction::Add(tee("Black", 2)), &())
            .await
            .unwrap();
        cart.handle_action(CartAction::Add(tee("White", 1)), &()).await.unwrap();

        assert_eq!(merged, CartActionResult::Added { index: 0, quantity: 3 });
        assert_eq!(cart.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_customised_line_stays_separate() {
        let mut cart = empty();
        cart.handle_action(CartAction::Add(tee("Black", 1)), &()).await.unwrap();
        let mut custom = tee("Black", 1);
        custom.customization = Some(Customization {
            kind: "logo".into(),
            asset_ref: "uploads/logo.png".into(),
            text: None,
        });
        cart.handle_action(CartAction::Add(custom), &()).await.unwrap();

        assert_eq!(cart.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_quantities_and_bad_indexes_rejected() {
        let mut cart = empty();
        assert_eq!(
            cart.handle_action(CartAction::Add(tee("Black", 0)), &()).await,
            Err(CartError::InvalidQuantity(0))
        );
        cart.handle_action(CartAction::Add(tee("Black", 1)), &()).await.unwrap();
        assert_eq!(
            cart.handle_action(CartAction::SetQuantity { index: 0, quantity: 0 }, &())
                .await,
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(
            cart.handle_action(CartAction::Remove { index: 3 }, &()).await,
            Err(CartError::NoSuchLine { index: 3, len: 1 })
        );
    }

    #[tokio::test]
    async fn test_clear_reports_removed_lines() {
        let mut cart = empty();
        cart.handle_action(CartAction::Add(tee("Black", 1)), &()).await.unwrap();
        cart.handle_action(CartAction::Add(tee("White", 1)), &()).await.unwrap();

        let cleared = cart.handle_action(CartAction::Clear, &()).await.unwrap();
        assert_eq!(cleared, CartActionResult::Cleared { removed: 2 });
        assert!(cart.lines.is_empty());
    }
}
