//! # Generic Messages
//!
//! Requests sent from a [`ResourceClient`](crate::ResourceClient) to a
//! [`ResourceActor`](crate::ResourceActor), and the outcomes of the multi-document
//! operations.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Result of a successful transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome<R> {
    /// The steps ran now and their effects were written.
    Applied(Vec<R>),
    /// The idempotency key had already been applied; nothing was written and the
    /// journalled results are returned.
    Replayed(Vec<R>),
}

impl<R> TransactionOutcome<R> {
    pub fn results(&self) -> &[R] {
        match self {
            TransactionOutcome::Applied(results) | TransactionOutcome::Replayed(results) => {
                results
            }
        }
    }

    pub fn into_results(self) -> Vec<R> {
        match self {
            TransactionOutcome::Applied(results) | TransactionOutcome::Replayed(results) => {
                results
            }
        }
    }

    pub fn is_replay(&self) -> bool {
        matches!(self, TransactionOutcome::Replayed(_))
    }
}

/// Result of reverting a transaction key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The journalled steps were compensated; the count is the number of
    /// compensating actions applied.
    Reverted(usize),
    /// The key had been reverted before.
    AlreadyReverted,
    /// The key was never applied. It is now refused if it shows up later.
    Tombstoned,
}

/// Internal message type sent to the actor to request operations.
///
/// The CRUD variants cover the document lifecycle. `Action` runs one custom
/// operation on one document, `Transaction` runs several, possibly on different
/// documents, all-or-nothing, and `Revert` compensates a keyed transaction.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Transaction {
        key: Option<String>,
        steps: Vec<(T::Id, T::Action)>,
        respond_to: Response<TransactionOutcome<T::ActionResult>>,
    },
    Revert {
        key: String,
        respond_to: Response<RevertOutcome>,
    },
}
