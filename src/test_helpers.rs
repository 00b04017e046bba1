// Test helpers for driving fetch views deterministically

use crate::services::{FetchCapability, FetchError, OnComplete, SharedCapability};
use parking_lot::Mutex;
use std::sync::Arc;

enum Behavior<R> {
    Resolve(R),
    Fail(FetchError),
    Silent,
    Defer,
}

/// Fake capability for tests. Records every options value it is invoked
/// with and completes according to its mode, synchronously unless deferred.
pub struct FakeCapability<O, R> {
    behavior: Arc<Behavior<R>>,
    calls: Arc<Mutex<Vec<O>>>,
    deferred: Arc<Mutex<Vec<Option<OnComplete<R>>>>>,
}

impl<O, R> Clone for FakeCapability<O, R> {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            calls: self.calls.clone(),
            deferred: self.deferred.clone(),
        }
    }
}

impl<O, R> FakeCapability<O, R> {
    fn with_behavior(behavior: Behavior<R>) -> Self {
        Self {
            behavior: Arc::new(behavior),
            calls: Arc::new(Mutex::new(Vec::new())),
            deferred: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Completes every invocation with `value` before `invoke` returns.
    pub fn resolving(value: R) -> Self {
        Self::with_behavior(Behavior::Resolve(value))
    }

    /// Fails every invocation with `error` before `invoke` returns.
    pub fn failing(error: FetchError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    /// Never calls back.
    pub fn silent() -> Self {
        Self::with_behavior(Behavior::Silent)
    }

    /// Holds completions until the test fires them with [`complete`](Self::complete).
    pub fn deferred() -> Self {
        Self::with_behavior(Behavior::Defer)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Completions held by a deferred fake that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.deferred.lock().iter().filter(|slot| slot.is_some()).count()
    }

    /// Fires the completion of the `index`-th invocation (zero-based).
    /// Returns false if there is no such invocation or it already fired.
    pub fn complete(&self, index: usize, outcome: Result<R, FetchError>) -> bool {
        let on_complete = self
            .deferred
            .lock()
            .get_mut(index)
            .and_then(Option::take);
        match on_complete {
            Some(on_complete) => {
                on_complete(outcome);
                true
            }
            None => false,
        }
    }
}

impl<O: Clone, R> FakeCapability<O, R> {
    pub fn calls(&self) -> Vec<O> {
        self.calls.lock().clone()
    }
}

impl<O, R> FakeCapability<O, R>
where
    O: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn shared(&self) -> SharedCapability<O, R> {
        Arc::new(self.clone())
    }
}

impl<O, R> FetchCapability<O, R> for FakeCapability<O, R>
where
    O: Send,
    R: Clone + Send + Sync,
{
    fn invoke(&self, options: O, on_complete: OnComplete<R>) {
        self.calls.lock().push(options);
        match self.behavior.as_ref() {
            Behavior::Resolve(value) => on_complete(Ok(value.clone())),
            Behavior::Fail(error) => on_complete(Err(error.clone())),
            Behavior::Silent => {}
            Behavior::Defer => self.deferred.lock().push(Some(on_complete)),
        }
    }
}
