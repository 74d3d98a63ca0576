//! # Generic Client
//!
//! The generic client for talking to a collection actor.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, RevertOutcome, TransactionOutcome};
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// A type-safe async handle on a `ResourceActor<T>`. Every method sends one request over
/// the actor's mpsc channel and awaits the answer on a oneshot channel.
///
/// * **Cloneable**: holds only a sender.
/// * **Generic**: works with any entity that implements `ActorEntity`.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Every document in the collection, in no particular order.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Runs `steps` all-or-nothing inside one actor turn.
    ///
    /// With a `key`, a repeated call returns [`TransactionOutcome::Replayed`] without
    /// touching the collection, and a key that was reverted is refused with
    /// [`FrameworkError::Revoked`].
    pub async fn transaction(
        &self,
        key: Option<String>,
        steps: Vec<(T::Id, T::Action)>,
    ) -> Result<TransactionOutcome<T::ActionResult>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Transaction {
            key,
            steps,
            respond_to,
        })
        .await
    }

    /// Compensates the transaction journalled under `key`.
    pub async fn revert(&self, key: impl Into<String>) -> Result<RevertOutcome, FrameworkError> {
        let key = key.into();
        self.request(|respond_to| ResourceRequest::Revert { key, respond_to })
            .await
    }
}
