//! Single-assignment result cell
//!
//! A [`Future`] starts `Pending` and completes exactly once, either
//! `Succeeded` with a [`Value`] or `Failed` with an [`Error`]. The first
//! completion wins; later attempts are dropped and reported only through
//! the `false` return of [`Future::success`] / [`Future::fault`].
//!
//! ## Subscribers
//!
//! Handlers registered while pending run synchronously, in subscription
//! order, on the thread that completes the future. A handler registered
//! after completion runs immediately if it matches the outcome and is
//! discarded otherwise.
//!
//! ## Contracts
//!
//! A contract may be attached while pending. A successful value is bound
//! against it before being stored; a value the contract rejects completes
//! the future as failed with the binding error.
//!
//! ## Async interop
//!
//! [`Future::wait`] returns a `std::future::Future` so a runtime value can
//! be awaited from any executor. Any number of waiters may be outstanding.

use crate::contract::{coerce, relationship, Contract, Relationship};
use crate::error::{Error, Result};
use crate::value::Value;
use parking_lot::Mutex;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// Handler invoked with the successful value
pub type SuccessHandler = Box<dyn FnOnce(&Value) + Send>;

/// Handler invoked with the fault
pub type ErrorHandler = Box<dyn FnOnce(&Error) + Send>;

/// A subscription to one of the two completion events.
pub enum Subscriber {
    /// Runs when the future succeeds
    Success(SuccessHandler),
    /// Runs when the future fails
    Error(ErrorHandler),
}

impl Subscriber {
    /// Subscribe to success
    pub fn success<F: FnOnce(&Value) + Send + 'static>(f: F) -> Self {
        Subscriber::Success(Box::new(f))
    }

    /// Subscribe to failure
    pub fn error<F: FnOnce(&Error) + Send + 'static>(f: F) -> Self {
        Subscriber::Error(Box::new(f))
    }
}

/// Lifecycle state of a [`Future`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FutureState {
    /// Not completed yet
    Pending,
    /// Completed with a value
    Succeeded,
    /// Completed with a fault
    Failed,
}

impl fmt::Display for FutureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FutureState::Pending => f.write_str("pending"),
            FutureState::Succeeded => f.write_str("succeeded"),
            FutureState::Failed => f.write_str("failed"),
        }
    }
}

enum Outcome {
    Pending,
    Succeeded(Value),
    Failed(Error),
}

struct Inner {
    outcome: Outcome,
    contract: Option<Contract>,
    on_success: Vec<SuccessHandler>,
    on_error: Vec<ErrorHandler>,
    wakers: Vec<Waker>,
}

struct Shared {
    name: Box<str>,
    inner: Mutex<Inner>,
}

/// Single-assignment cell for a value that may not exist yet.
///
/// Cloning shares the cell.
#[derive(Clone)]
pub struct Future {
    shared: Arc<Shared>,
}

impl Future {
    /// Pending future with a generic name
    pub fn new() -> Self {
        Self::named("future")
    }

    /// Pending future with a debuggable name
    pub fn named(name: impl Into<String>) -> Self {
        Future {
            shared: Arc::new(Shared {
                name: name.into().into_boxed_str(),
                inner: Mutex::new(Inner {
                    outcome: Outcome::Pending,
                    contract: None,
                    on_success: Vec::new(),
                    on_error: Vec::new(),
                    wakers: Vec::new(),
                }),
            }),
        }
    }

    /// Future already succeeded with `value`
    pub fn resolved(value: Value) -> Self {
        let f = Self::named("resolved");
        f.success(value);
        f
    }

    /// Future already failed with `error`
    pub fn failed(error: Error) -> Self {
        let f = Self::named("failed");
        f.fault(error);
        f
    }

    /// Debuggable name
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> FutureState {
        match self.shared.inner.lock().outcome {
            Outcome::Pending => FutureState::Pending,
            Outcome::Succeeded(_) => FutureState::Succeeded,
            Outcome::Failed(_) => FutureState::Failed,
        }
    }

    /// Whether the future has succeeded or failed
    pub fn is_completed(&self) -> bool {
        self.state() != FutureState::Pending
    }

    /// Stored value, if succeeded
    pub fn result(&self) -> Option<Value> {
        match &self.shared.inner.lock().outcome {
            Outcome::Succeeded(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Stored fault, if failed
    pub fn error(&self) -> Option<Error> {
        match &self.shared.inner.lock().outcome {
            Outcome::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Completed outcome, or `None` while pending
    pub fn outcome(&self) -> Option<Result<Value>> {
        match &self.shared.inner.lock().outcome {
            Outcome::Pending => None,
            Outcome::Succeeded(v) => Some(Ok(v.clone())),
            Outcome::Failed(e) => Some(Err(e.clone())),
        }
    }

    /// Attached contract, if any
    pub fn contract(&self) -> Option<Contract> {
        self.shared.inner.lock().contract.clone()
    }

    /// Complete with a value.
    ///
    /// Returns `true` if this call completed the future. The value is bound
    /// against the attached contract first; a rejected value fails the
    /// future instead and this call returns whatever the fault returned.
    pub fn success(&self, value: Value) -> bool {
        let contract = {
            let inner = self.shared.inner.lock();
            if !matches!(inner.outcome, Outcome::Pending) {
                self.dropped("success");
                return false;
            }
            inner.contract.clone()
        };

        let value = match contract {
            Some(contract) => match coerce(value, &contract) {
                Ok(v) => v,
                Err(e) => return self.fault(e),
            },
            None => value,
        };

        let (handlers, wakers) = {
            let mut inner = self.shared.inner.lock();
            if !matches!(inner.outcome, Outcome::Pending) {
                self.dropped("success");
                return false;
            }
            inner.outcome = Outcome::Succeeded(value.clone());
            inner.on_error.clear();
            (
                std::mem::take(&mut inner.on_success),
                std::mem::take(&mut inner.wakers),
            )
        };

        tracing::trace!(target: "vireo::future", future = %self.name(), "succeeded");
        for handler in handlers {
            handler(&value);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    /// Complete with a fault.
    ///
    /// Returns `true` if this call completed the future.
    pub fn fault(&self, error: Error) -> bool {
        let (handlers, wakers) = {
            let mut inner = self.shared.inner.lock();
            if !matches!(inner.outcome, Outcome::Pending) {
                drop(inner);
                self.dropped("fault");
                return false;
            }
            inner.outcome = Outcome::Failed(error.clone());
            inner.on_success.clear();
            (
                std::mem::take(&mut inner.on_error),
                std::mem::take(&mut inner.wakers),
            )
        };

        tracing::trace!(target: "vireo::future", future = %self.name(), %error, "failed");
        for handler in handlers {
            handler(&error);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }

    fn dropped(&self, kind: &'static str) {
        tracing::trace!(
            target: "vireo::future",
            future = %self.name(),
            kind,
            "completion dropped, future already completed"
        );
    }

    /// Subscribe to a completion event.
    pub fn on(&self, subscriber: Subscriber) {
        let mut inner = self.shared.inner.lock();
        match (&inner.outcome, subscriber) {
            (Outcome::Pending, Subscriber::Success(h)) => inner.on_success.push(h),
            (Outcome::Pending, Subscriber::Error(h)) => inner.on_error.push(h),
            (Outcome::Succeeded(v), Subscriber::Success(h)) => {
                let v = v.clone();
                drop(inner);
                h(&v);
            }
            (Outcome::Failed(e), Subscriber::Error(h)) => {
                let e = e.clone();
                drop(inner);
                h(&e);
            }
            _ => {}
        }
    }

    /// Subscribe to success
    pub fn on_success<F: FnOnce(&Value) + Send + 'static>(&self, f: F) {
        self.on(Subscriber::success(f));
    }

    /// Subscribe to failure
    pub fn on_error<F: FnOnce(&Error) + Send + 'static>(&self, f: F) {
        self.on(Subscriber::error(f));
    }

    /// Forward this future's eventual outcome into `other`.
    ///
    /// Does nothing if `other` is already completed or is this future.
    pub fn route(&self, other: &Future) {
        if other.is_completed() || self.ptr_eq(other) {
            return;
        }
        let target = other.clone();
        self.on_success(move |v| {
            target.success(v.clone());
        });
        let target = other.clone();
        self.on_error(move |e| {
            target.fault(e.clone());
        });
    }

    /// Attach or narrow the contract the eventual value must satisfy.
    ///
    /// An existing contract that accepts the new one is replaced by it; one
    /// that is already narrower is kept; an unrelated one is a binding
    /// failure.
    pub fn set_contract(&self, contract: Contract) -> Result<()> {
        let mut inner = self.shared.inner.lock();
        match &inner.contract {
            None => inner.contract = Some(contract),
            Some(existing) => match relationship(existing, &contract) {
                Relationship::Equal | Relationship::Superset => inner.contract = Some(contract),
                Relationship::Subset => {}
                Relationship::Unrelated => return Err(Error::binding(contract, existing)),
            },
        }
        Ok(())
    }

    /// Awaitable view of the eventual outcome.
    pub fn wait(&self) -> Wait {
        Wait {
            future: self.clone(),
        }
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Default for Future {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Future {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Future({}, {})", self.name(), self.state())
    }
}

/// Awaitable returned by [`Future::wait`].
pub struct Wait {
    future: Future,
}

impl std::future::Future for Wait {
    type Output = Result<Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.future.shared.inner.lock();
        match &inner.outcome {
            Outcome::Succeeded(v) => Poll::Ready(Ok(v.clone())),
            Outcome::Failed(e) => Poll::Ready(Err(e.clone())),
            Outcome::Pending => {
                inner.wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
