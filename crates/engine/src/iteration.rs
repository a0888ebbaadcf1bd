//! Iteration (`repeat`)
//!
//! A repeat runs its body once per step. Each step hands the body a control
//! record:
//!
//! | Member | Meaning |
//! |--------|---------|
//! | `index` | zero-based step number |
//! | `continue(v)` | emit `v` and schedule the next step |
//! | `break(v)` | emit `v` and finish |
//!
//! Void emissions are skipped. On `break` the emitted values are aggregated
//! into the repeat's result: without an aggregator they form a vector in
//! emission order, with one they are folded left to right starting from
//! the first emission. Every step after the first runs as a scheduler task,
//! so a long repeat never grows the stack and honours suspension.
//!
//! A body that returns without calling either control leaves the repeat
//! pending.

use crate::dispatch::invoke;
use crate::lift::{lift, lift_all};
use crate::runtime::Runtime;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};
use vireo_core::{Callable, Error, Future, Record, Result, Signature, Value};

/// Lifecycle of an [`Iteration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationState {
    /// Steps are still being scheduled
    Running,
    /// `break` was called or the body failed
    Finished,
}

struct Progress {
    state: IterationState,
    index: i64,
    emitted: Vec<Value>,
}

struct Shared {
    rt: Runtime,
    body: Value,
    aggregator: Option<Value>,
    result: Future,
    progress: Mutex<Progress>,
}

/// State of one running repeat.
#[derive(Clone)]
pub struct Iteration {
    shared: Arc<Shared>,
}

/// Start repeating `body`, returning a future of the aggregated emissions.
///
/// `body` and `aggregator` may themselves be pending; the repeat starts
/// once both are concrete. A void aggregator means none.
pub fn repeat(rt: &Runtime, body: Value, aggregator: Option<Value>) -> Result<Value> {
    let aggregator = aggregator.unwrap_or(Value::Void);
    lift(rt, "repeat", [body, aggregator], |rt, [body, aggregator]| {
        let aggregator = (!aggregator.is_void()).then_some(aggregator);
        let iteration = Iteration::start(rt, body, aggregator);
        Ok(Value::Future(iteration.result()))
    })
}

impl Iteration {
    /// Create the iteration and schedule its first step.
    pub fn start(rt: &Runtime, body: Value, aggregator: Option<Value>) -> Self {
        let iteration = Iteration {
            shared: Arc::new(Shared {
                rt: rt.clone(),
                body,
                aggregator,
                result: Future::named("repeat"),
                progress: Mutex::new(Progress {
                    state: IterationState::Running,
                    index: 0,
                    emitted: Vec::new(),
                }),
            }),
        };
        debug!(target: "vireo::repeat", "started");
        iteration.schedule(0);
        iteration
    }

    /// Future completed with the aggregated result
    pub fn result(&self) -> Future {
        self.shared.result.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> IterationState {
        self.shared.progress.lock().state
    }

    /// Number of the step currently running
    pub fn index(&self) -> i64 {
        self.shared.progress.lock().index
    }

    /// Emit `value` and schedule the next step.
    ///
    /// Returns false if the iteration has already finished.
    pub fn continue_with(&self, value: Value) -> bool {
        let index = {
            let mut progress = self.shared.progress.lock();
            if progress.state == IterationState::Finished {
                return false;
            }
            if !value.is_void() {
                progress.emitted.push(value);
            }
            progress.index += 1;
            progress.index
        };
        trace!(target: "vireo::repeat", index, "continue");
        self.schedule(index);
        true
    }

    /// Emit `value`, finish, and aggregate into the result.
    ///
    /// Returns false if the iteration has already finished.
    pub fn break_with(&self, value: Value) -> bool {
        let (index, emitted) = {
            let mut progress = self.shared.progress.lock();
            if progress.state == IterationState::Finished {
                return false;
            }
            if !value.is_void() {
                progress.emitted.push(value);
            }
            progress.state = IterationState::Finished;
            (progress.index, std::mem::take(&mut progress.emitted))
        };
        debug!(target: "vireo::repeat", steps = index + 1, emitted = emitted.len(), "finished");

        let result = &self.shared.result;
        match self.aggregate(emitted) {
            Ok(Value::Future(pending)) => pending.route(result),
            Ok(value) => {
                result.success(value);
            }
            Err(e) => {
                result.fault(e);
            }
        }
        true
    }

    fn fail(&self, error: Error) {
        {
            let mut progress = self.shared.progress.lock();
            if progress.state == IterationState::Finished {
                return;
            }
            progress.state = IterationState::Finished;
        }
        debug!(target: "vireo::repeat", error = %error, "body failed");
        self.shared.result.fault(error);
    }

    fn aggregate(&self, emitted: Vec<Value>) -> Result<Value> {
        let rt = &self.shared.rt;
        let Some(aggregator) = &self.shared.aggregator else {
            return lift_all(rt, "repeat", emitted, |_, items| Ok(Value::Vector(items)));
        };
        let mut items = emitted.into_iter();
        let Some(mut acc) = items.next() else {
            return Ok(Value::Void);
        };
        for item in items {
            acc = invoke(rt, aggregator.clone(), vec![acc, item])?;
        }
        Ok(acc)
    }

    fn schedule(&self, index: i64) {
        let iteration = self.clone();
        let submitted = self
            .shared
            .rt
            .scheduler()
            .submit(format!("repeat #{}", index), move || iteration.step());
        if let Err(e) = submitted {
            self.fail(e);
        }
    }

    fn step(&self) {
        let index = {
            let progress = self.shared.progress.lock();
            if progress.state == IterationState::Finished {
                return;
            }
            progress.index
        };

        let control = Record::named([
            ("index", Value::Int(index)),
            ("continue", Value::Callable(self.control("continue", Iteration::continue_with))),
            ("break", Value::Callable(self.control("break", Iteration::break_with))),
        ]);

        match invoke(&self.shared.rt, self.shared.body.clone(), vec![Value::Record(control)]) {
            Ok(Value::Future(pending)) => {
                let iteration = self.clone();
                pending.on_error(move |e| iteration.fail(e.clone()));
            }
            Ok(_) => {}
            Err(e) => self.fail(e),
        }
    }

    fn control(&self, name: &str, transition: fn(&Iteration, Value) -> bool) -> Callable {
        let iteration = self.clone();
        Callable::new(name, Signature::new(Vec::new()), move |args| {
            let value = args.into_iter().next().unwrap_or(Value::Void);
            transition(&iteration, value);
            Ok(Value::Void)
        })
    }
}

impl std::fmt::Debug for Iteration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let progress = self.shared.progress.lock();
        f.debug_struct("Iteration")
            .field("state", &progress.state)
            .field("index", &progress.index)
            .field("emitted", &progress.emitted.len())
            .finish()
    }
}
