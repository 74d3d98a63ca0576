//! # ActorEntity Trait
//!
//! The contract a document type implements to live inside a [`ResourceActor`](crate::ResourceActor).
//! Associated types pin down the id, the create/update payloads, the custom actions and
//! their results, the injected context and the entity's error type, so a `ProductCreate`
//! can never be sent to the order collection.
//!
//! # Provided Methods (Hooks)
//! Only [`ActorEntity::id`], [`ActorEntity::allocate_id`],
//! [`ActorEntity::from_create_params`], [`ActorEntity::on_update`] and
//! [`ActorEntity::handle_action`] are required. The remaining hooks default to doing
//! nothing.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any document type must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they can call other actors. The `Context` is handed to `run()`
/// rather than `new()`, which lets actors depend on each other's clients without a
/// construction-order problem.
///
/// # Staged writes
/// `on_update` and `handle_action` always run against a clone of the stored document.
/// The clone replaces the stored value only when the hook returns `Ok`, so a hook that
/// mutates `self` and then fails leaves the collection unchanged.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing document-specific operations (e.g. `Reserve`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions. Results are journalled for
    /// idempotent transactions, hence `Clone`.
    type ActionResult: Clone + Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per collection rather than one per action; clients recover it with
    /// [`FrameworkError::into_entity_error`](crate::FrameworkError::into_entity_error).
    type Error: std::error::Error + Send + Sync + 'static;

    /// The id under which the document is stored.
    fn id(&self) -> &Self::Id;

    /// Chooses the id for a new document.
    ///
    /// `seq` is the collection's next sequence number. It only advances when a document
    /// is actually inserted, so sequence-derived ids have no gaps. Documents with an
    /// externally assigned id simply ignore it.
    fn allocate_id(seq: u64, params: &Self::Create) -> Self::Id;

    /// Extracts the sequence number encoded in an id, if the id scheme has one.
    ///
    /// Used when seeding an actor with existing documents so the sequence resumes after
    /// the highest number already issued.
    fn sequence_of(_id: &Self::Id) -> Option<u64> {
        None
    }

    /// Construct the full entity from the id and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is inserted.
    /// An error here means the document is never stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed. Returning an error vetoes the
    /// delete, which is how append-only collections refuse removal.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when a new state of this document is written to the store.
    ///
    /// `previous` is the state it replaces, `None` for a newly created document. The
    /// actor is still in the same turn, so hooks observe commits in store order.
    async fn on_committed(&self, _previous: Option<&Self>, _ctx: &Self::Context) {}

    // --- Action Handler (Async) ---

    /// Handle a custom document-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// The action that undoes an applied action, derived from its result.
    ///
    /// Used by `Revert` to roll back a journalled transaction. Actions without a
    /// compensation are left in place.
    fn compensation(_result: &Self::ActionResult) -> Option<Self::Action> {
        None
    }
}
