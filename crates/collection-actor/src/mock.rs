//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from
//! a queue of expectations instead of a running actor. Tests of code that *uses* a
//! client (an order's `on_create`, the checkout orchestrator) can then script
//! success, failure and replays without standing up the other collections.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None, answers are scripted | Real documents |
//! | **Use Case** | Logic *around* the client | The actor itself, full flows |
//! | **Error Injection** | `return_err` | Needs the right state |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut products = MockClient::<Product>::new();
//! products
//!     .expect_transaction(Some("PAY-1".into()))
//!     .return_err(FrameworkError::ActorClosed);
//!
//! let result = reserve(&products.client(), "PAY-1").await;
//! assert!(result.is_err());
//! products.verify();
//! ```
//!
//! Expectations are consumed in order. A request of the wrong kind, or with an id or key
//! other than the expected one, is answered with [`FrameworkError::ActorDropped`] and
//! recorded, and [`MockClient::verify`] then panics listing every mismatch.
//!
//! ## Low-level helpers
//!
//! [`create_mock_client`] returns a client and the raw receiver, for tests that want to
//! inspect request payloads before answering them.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, RevertOutcome, TransactionOutcome};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the scripted answer.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
    Transaction {
        key: Option<String>,
        response: Result<TransactionOutcome<T::ActionResult>, FrameworkError>,
    },
    Revert {
        key: String,
        response: Result<RevertOutcome, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Get { id, .. } => format!("get({id})"),
            Expectation::List { .. } => "list()".to_string(),
            Expectation::Create { .. } => "create(..)".to_string(),
            Expectation::Update { id, .. } => format!("update({id})"),
            Expectation::Delete { id, .. } => format!("delete({id})"),
            Expectation::Action { id, .. } => format!("action({id})"),
            Expectation::Transaction { key, .. } => format!("transaction({key:?})"),
            Expectation::Revert { key, .. } => format!("revert({key})"),
        }
    }
}

fn describe_request<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { params, .. } => format!("create({params:?})"),
        ResourceRequest::Get { id, .. } => format!("get({id})"),
        ResourceRequest::List { .. } => "list()".to_string(),
        ResourceRequest::Update { id, .. } => format!("update({id})"),
        ResourceRequest::Delete { id, .. } => format!("delete({id})"),
        ResourceRequest::Action { id, action, .. } => format!("action({id}, {action:?})"),
        ResourceRequest::Transaction { key, steps, .. } => {
            format!("transaction({key:?}, {} steps)", steps.len())
        }
        ResourceRequest::Revert { key, .. } => format!("revert({key})"),
    }
}

struct MockState<T: ActorEntity> {
    expectations: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type Shared<T> = Arc<Mutex<MockState<T>>>;

fn lock<T: ActorEntity>(state: &Shared<T>) -> MutexGuard<'_, MockState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    state: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio
    /// runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let state: Shared<T> = Arc::new(Mutex::new(MockState {
            expectations: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let task_state = state.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&task_state).expectations.pop_front();
                if let Err(mismatch) = answer(request, expectation) {
                    lock(&task_state).mismatches.push(mismatch);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            state,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn push(&self, expectation: Expectation<T>) {
        lock(&self.state).expectations.push_back(expectation);
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, Option<T>> {
        ExpectationBuilder::new(self, move |response| Expectation::Get { id, response })
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<'_, T, Vec<T>> {
        ExpectationBuilder::new(self, |response| Expectation::List { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<'_, T, T::Id> {
        ExpectationBuilder::new(self, |response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T> {
        ExpectationBuilder::new(self, move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, ()> {
        ExpectationBuilder::new(self, move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<'_, T, T::ActionResult> {
        ExpectationBuilder::new(self, move |response| Expectation::Action { id, response })
    }

    pub fn expect_transaction(
        &mut self,
        key: Option<String>,
    ) -> ExpectationBuilder<'_, T, TransactionOutcome<T::ActionResult>> {
        ExpectationBuilder::new(self, move |response| Expectation::Transaction {
            key,
            response,
        })
    }

    pub fn expect_revert(
        &mut self,
        key: impl Into<String>,
    ) -> ExpectationBuilder<'_, T, RevertOutcome> {
        let key = key.into();
        ExpectationBuilder::new(self, move |response| Expectation::Revert { key, response })
    }

    /// Panics unless every expectation was consumed by a matching request.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.mismatches.is_empty() {
            panic!("Unexpected requests: {}", state.mismatches.join("; "));
        }
        if !state.expectations.is_empty() {
            let remaining: Vec<_> = state.expectations.iter().map(|e| e.describe()).collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                remaining.len(),
                remaining.join(", ")
            );
        }
    }
}

/// Builder finishing one expectation with its scripted answer.
pub struct ExpectationBuilder<'a, T: ActorEntity, R> {
    mock: &'a MockClient<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'a>,
}

impl<'a, T: ActorEntity, R> ExpectationBuilder<'a, T, R> {
    fn new(
        mock: &'a MockClient<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'a,
    ) -> Self {
        Self {
            mock,
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.mock.push((self.build)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.mock.push((self.build)(Err(error)));
    }
}

fn reply<R>(respond_to: oneshot::Sender<Result<R, FrameworkError>>, response: Result<R, FrameworkError>) {
    let _ = respond_to.send(response);
}

fn check<I: PartialEq + std::fmt::Debug>(label: &str, expected: &I, actual: &I) -> Result<(), String> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!("{label}: expected {expected:?}, got {actual:?}"))
    }
}

/// Answers one request from one expectation. A mismatch drops the responder, which the
/// caller sees as [`FrameworkError::ActorDropped`].
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Result<(), String> {
    let Some(expectation) = expectation else {
        return Err(format!("{} with no expectation left", describe_request(&request)));
    };

    match (request, expectation) {
        (ResourceRequest::Get { id, respond_to }, Expectation::Get { id: want, response }) => {
            check("get", &want, &id)?;
            reply(respond_to, response);
        }
        (ResourceRequest::List { respond_to }, Expectation::List { response }) => {
            reply(respond_to, response);
        }
        (ResourceRequest::Create { respond_to, .. }, Expectation::Create { response }) => {
            reply(respond_to, response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Expectation::Update { id: want, response },
        ) => {
            check("update", &want, &id)?;
            reply(respond_to, response);
        }
        (ResourceRequest::Delete { id, respond_to }, Expectation::Delete { id: want, response }) => {
            check("delete", &want, &id)?;
            reply(respond_to, response);
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Expectation::Action { id: want, response },
        ) => {
            check("action", &want, &id)?;
            reply(respond_to, response);
        }
        (
            ResourceRequest::Transaction {
                key, respond_to, ..
            },
            Expectation::Transaction {
                key: want,
                response,
            },
        ) => {
            check("transaction", &want, &key)?;
            reply(respond_to, response);
        }
        (
            ResourceRequest::Revert { key, respond_to },
            Expectation::Revert {
                key: want,
                response,
            },
        ) => {
            check("revert", &want, &key)?;
            reply(respond_to, response);
        }
        (request, expectation) => {
            return Err(format!(
                "{} while expecting {}",
                describe_request(&request),
                expectation.describe()
            ));
        }
    }
    Ok(())
}

// =============================================================================
// LOW-LEVEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests off the receiver, asserts on their
/// payloads and answers through the enclosed responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Transaction request
#[allow(clippy::type_complexity)]
pub async fn expect_transaction<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    Option<String>,
    Vec<(T::Id, T::Action)>,
    oneshot::Sender<Result<TransactionOutcome<T::ActionResult>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Transaction {
            key,
            steps,
            respond_to,
        }) => Some((key, steps, respond_to)),
        _ => None,
    }
}
