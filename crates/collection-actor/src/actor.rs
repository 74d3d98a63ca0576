//! # Collection Actor
//!
//! The `ResourceActor` owns one collection of documents and processes every request
//! for it sequentially. Because a single task is the only writer, a read-check-write
//! inside one message turn cannot interleave with another writer. That property is what
//! the multi-document [`ResourceRequest::Transaction`] builds on.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, RevertOutcome, TransactionOutcome};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// What a transaction key did to the collection.
#[derive(Debug)]
enum JournalEntry<T: ActorEntity> {
    Applied(Vec<(T::Id, T::ActionResult)>),
    Reverted,
}

const MAX_ID_ATTEMPTS: usize = 8;

type Staged<T> = (
    HashMap<<T as ActorEntity>::Id, T>,
    Vec<(<T as ActorEntity>::Id, <T as ActorEntity>::ActionResult)>,
);

/// The actor that owns a collection of documents.
///
/// # Concurrency Model
/// Each collection runs in its own Tokio task and handles one message at a time, so the
/// `store` needs no `Mutex`. Hooks may `await` other actors; while they do, this
/// collection queues its own incoming messages.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` (or `with_records()` to preload documents)
///    returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// ## Operations
///
/// * **Create**: allocates an id from the sequence (regenerating it on a collision),
///   rejects duplicates, runs `on_create`, inserts, then advances the sequence.
/// * **Get / List**: clones out of the store.
/// * **Update / Action**: run against a clone; the clone is written back on success.
/// * **Delete**: `on_delete` may veto.
/// * **Transaction**: stages every step on clones, writes all of them or none, and
///   journals the results under the optional idempotency key.
/// * **Revert**: applies the compensations of a journalled key in reverse order.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    journal: HashMap<String, JournalEntry<T>>,
    next_seq: u64,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates an empty collection actor and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is
    /// full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            journal: HashMap::new(),
            next_seq: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates a collection actor preloaded with existing documents.
    ///
    /// The id sequence resumes after the highest [`ActorEntity::sequence_of`] among the
    /// records, or starts at 1 when none carries a sequence.
    pub fn with_records(
        buffer_size: usize,
        records: impl IntoIterator<Item = T>,
    ) -> (Self, ResourceClient<T>) {
        let (mut actor, client) = Self::new(buffer_size);
        for record in records {
            if let Some(seq) = T::sequence_of(record.id()) {
                actor.next_seq = actor.next_seq.max(seq.saturating_add(1));
            }
            actor.store.insert(record.id().clone(), record);
        }
        (actor, client)
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let (seq, id) = self.allocate(&params);
                    if self.store.contains_key(&id) {
                        warn!(entity_type, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, %id, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    item.on_committed(None, &context).await;
                    self.store.insert(id.clone(), item);
                    self.next_seq = seq.saturating_add(1);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut item = current.clone();
                    if let Err(e) = item.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    item.on_committed(self.store.get(&id), &context).await;
                    self.store.insert(id.clone(), item.clone());
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete refused");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = match stage(&self.store, vec![(id.clone(), action)], &context).await
                    {
                        Ok((staged, mut applied)) => {
                            self.commit(staged, &context).await;
                            info!(entity_type, %id, "Action ok");
                            applied
                                .pop()
                                .map(|(_, result)| result)
                                .ok_or_else(|| FrameworkError::NotFound(id.to_string()))
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            Err(e)
                        }
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Transaction {
                    key,
                    steps,
                    respond_to,
                } => {
                    debug!(entity_type, ?key, steps = steps.len(), "Transaction");
                    if let Some(key) = &key {
                        match self.journal.get(key) {
                            Some(JournalEntry::Applied(done)) => {
                                info!(entity_type, %key, "Transaction replayed");
                                let results = done.iter().map(|(_, r)| r.clone()).collect();
                                let _ = respond_to.send(Ok(TransactionOutcome::Replayed(results)));
                                continue;
                            }
                            Some(JournalEntry::Reverted) => {
                                warn!(entity_type, %key, "Transaction key revoked");
                                let _ = respond_to.send(Err(FrameworkError::Revoked(key.clone())));
                                continue;
                            }
                            None => {}
                        }
                    }

                    match stage(&self.store, steps, &context).await {
                        Ok((staged, applied)) => {
                            let touched = staged.len();
                            self.commit(staged, &context).await;
                            let results = applied.iter().map(|(_, r)| r.clone()).collect();
                            if let Some(key) = key {
                                self.journal.insert(key, JournalEntry::Applied(applied));
                            }
                            info!(entity_type, touched, "Transaction committed");
                            let _ = respond_to.send(Ok(TransactionOutcome::Applied(results)));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Transaction aborted");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ResourceRequest::Revert { key, respond_to } => {
                    debug!(entity_type, %key, "Revert");
                    let outcome = match self.journal.remove(&key) {
                        Some(JournalEntry::Applied(done)) => {
                            let steps: Vec<_> = done
                                .iter()
                                .rev()
                                .filter_map(|(id, result)| {
                                    T::compensation(result).map(|action| (id.clone(), action))
                                })
                                .collect();
                            let count = steps.len();
                            match stage(&self.store, steps, &context).await {
                                Ok((staged, _)) => {
                                    self.commit(staged, &context).await;
                                    self.journal.insert(key.clone(), JournalEntry::Reverted);
                                    info!(entity_type, %key, count, "Reverted");
                                    Ok(RevertOutcome::Reverted(count))
                                }
                                Err(e) => {
                                    error!(entity_type, %key, error = %e, "Revert failed");
                                    self.journal.insert(key.clone(), JournalEntry::Applied(done));
                                    Err(e)
                                }
                            }
                        }
                        Some(JournalEntry::Reverted) => {
                            self.journal.insert(key.clone(), JournalEntry::Reverted);
                            Ok(RevertOutcome::AlreadyReverted)
                        }
                        None => {
                            info!(entity_type, %key, "Tombstoned");
                            self.journal.insert(key.clone(), JournalEntry::Reverted);
                            Ok(RevertOutcome::Tombstoned)
                        }
                    };
                    let _ = respond_to.send(outcome);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Picks the id for a new document. A sequence-derived id that collides with a
    /// stored one is regenerated from the following sequence numbers, a bounded number
    /// of times. Ids that ignore the sequence collide immediately.
    fn allocate(&self, params: &T::Create) -> (u64, T::Id) {
        let mut seq = self.next_seq;
        let mut id = T::allocate_id(seq, params);
        for _ in 1..MAX_ID_ATTEMPTS {
            if !self.store.contains_key(&id) {
                break;
            }
            let next = T::allocate_id(seq.saturating_add(1), params);
            if next == id {
                break;
            }
            seq += 1;
            id = next;
        }
        (seq, id)
    }

    async fn commit(&mut self, staged: HashMap<T::Id, T>, context: &T::Context) {
        for (id, item) in staged {
            item.on_committed(self.store.get(&id), context).await;
            self.store.insert(id, item);
        }
    }
}

/// Applies `steps` to clones of the affected documents.
///
/// A later step on the same id sees the earlier step's effect. The first failing step
/// aborts the whole batch and nothing is returned for writing.
async fn stage<T: ActorEntity>(
    store: &HashMap<T::Id, T>,
    steps: Vec<(T::Id, T::Action)>,
    context: &T::Context,
) -> Result<Staged<T>, FrameworkError> {
    let mut staged: HashMap<T::Id, T> = HashMap::new();
    let mut applied = Vec::with_capacity(steps.len());

    for (id, action) in steps {
        let item = match staged.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let current = store
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                entry.insert(current)
            }
        };
        let result = item
            .handle_action(action, context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        applied.push((id, result));
    }

    Ok((staged, applied))
}
