//! ActorEntity trait implementation for the Customer domain type.

use super::error::CustomerError;
use crate::model::{Address, Customer, CustomerCreate, CustomerUpdate};
use async_trait::async_trait;
use collection_actor::ActorEntity;

/// Custom actions for Customer entities.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerAction {
    /// Links an order to the customer and files its billing address.
    RecordOrder { order_id: String, billing: Address },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerActionResult {
    /// `address_added` is false when the address book already had a matching entry.
    OrderRecorded { address_added: bool },
}

#[async_trait]
impl ActorEntity for Customer {
    type Id = String;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = CustomerAction;
    type ActionResult = CustomerActionResult;
    type Context = ();
    type Error = CustomerError;

    fn id(&self) -> &String {
        &self.uid
    }

    fn allocate_id(_seq: u64, params: &CustomerCreate) -> String {
        params.uid.clone()
    }

    fn from_create_params(id: String, params: CustomerCreate) -> Result<Self, Self::Error> {
        if id.trim().is_empty() {
            return Err(CustomerError::ValidationError("empty uid".into()));
        }
        Ok(Self {
            uid: id,
            email: params.email,
            addresses: Vec::new(),
            order_ids: Vec::new(),
        })
    }

    async fn on_update(
        &mut self,
        update: CustomerUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(email) = update.email {
            self.email = email;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CustomerAction,
        _ctx: &Self::Context,
    ) -> Result<CustomerActionResult, Self::Error> {
        match action {
            CustomerAction::RecordOrder { order_id, billing } => {
                if !self.order_ids.contains(&order_id) {
                    self.order_ids.push(order_id);
                }
                let known = self.addresses.iter().any(|a| a.matches(&billing));
                if !known {
                    self.addresses.push(billing);
                }
                Ok(CustomerActionResult::OrderRecorded {
                    address_added: !known,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing(city: &str) -> Address {
        Address {
            fullname: "Asha Rao".into(),
            city: city.into(),
            country: "India".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_address_appended_only_when_new() {
        let mut customer = Customer::from_create_params(
            "uid-1".into(),
            CustomerCreate {
                uid: "uid-1".into(),
                email: "asha@example.com".into(),
            },
        )
        .unwrap();

        let first = customer
            .handle_action(
                CustomerAction::RecordOrder {
                    order_id: "ORD0001".into(),
                    billing: billing("Pune"),
                },
                &(),
            )
            .await
            .unwrap();
        let second = customer
            .handle_action(
                CustomerAction::RecordOrder {
                    order_id: "ORD0002".into(),
                    billing: billing("PUNE"),
                },
                &(),
            )
            .await
            .unwrap();

        assert_eq!(first, CustomerActionResult::OrderRecorded { address_added: true });
        assert_eq!(second, CustomerActionResult::OrderRecorded { address_added: false });
        assert_eq!(customer.addresses.len(), 1);
        assert_eq!(customer.order_ids, vec!["ORD0001", "ORD0002"]);
    }
}
