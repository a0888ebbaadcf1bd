//! Continuation scheduler with suspend/resume buffering.
//!
//! Continuations are closures submitted under a debuggable name. They run
//! either on a fixed pool of worker threads or, with zero workers, on the
//! caller of [`Scheduler::drain`].
//!
//! While the scheduler is suspended every continuation that would otherwise
//! run is parked in a buffer instead. [`Scheduler::resume`] replays the
//! buffer on the calling thread, most recently parked first.

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, trace};
use vireo_core::{Error, Future, Result, Value};

/// Handler replacing the default fault propagation of [`Scheduler::enqueue`].
pub type FaultHandler = Box<dyn FnOnce(Error) -> Result<Value> + Send>;

/// Scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker threads; zero runs continuations on the caller of `drain`
    pub workers: usize,
    /// Keep descriptive task names; otherwise every task is named "task"
    pub task_names: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            workers: 0,
            task_names: true,
        }
    }
}

/// Scheduler metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Continuations waiting to run
    pub queue_depth: usize,
    /// Continuations parked while suspended
    pub buffered: usize,
    /// Continuations currently running
    pub in_flight: usize,
    /// Continuations finished since creation, panicked ones included
    pub tasks_completed: u64,
    /// Number of worker threads
    pub worker_count: usize,
}

struct Task {
    name: String,
    work: Box<dyn FnOnce() + Send>,
}

struct QueueState {
    ready: VecDeque<Task>,
    suspended: bool,
    buffer: Vec<Task>,
}

struct SchedulerInner {
    queue: Mutex<QueueState>,
    work_ready: Condvar,
    drain_cond: Condvar,
    shutdown: AtomicBool,
    in_flight: AtomicUsize,
    tasks_completed: AtomicU64,
    config: SchedulerConfig,
}

struct Workers {
    inner: Arc<SchedulerInner>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for Workers {
    fn drop(&mut self) {
        shutdown(&self.inner, &self.handles);
    }
}

/// Defers and executes continuations.
///
/// Cloning shares the scheduler. Worker threads are joined when the last
/// clone is dropped, or earlier by [`Scheduler::shutdown`].
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
    workers: Arc<Workers>,
}

impl Scheduler {
    /// Create a scheduler.
    ///
    /// Workers are named `vireo-worker-0`, `vireo-worker-1`, etc.
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let inner = new_inner(config);
        let workers = Arc::new(Workers {
            inner: Arc::clone(&inner),
            handles: Mutex::new(Vec::with_capacity(config.workers)),
        });
        for i in 0..config.workers {
            let inner_clone = Arc::clone(&inner);
            let handle = std::thread::Builder::new()
                .name(format!("vireo-worker-{}", i))
                .spawn(move || worker_loop(&inner_clone))
                .map_err(|e| Error::external(format!("failed to spawn worker thread: {}", e)))?;
            workers.handles.lock().push(handle);
        }

        Ok(Scheduler { inner, workers })
    }

    /// Scheduler without worker threads.
    pub fn inline() -> Self {
        let inner = new_inner(SchedulerConfig::default());
        let workers = Arc::new(Workers {
            inner: Arc::clone(&inner),
            handles: Mutex::new(Vec::new()),
        });
        Scheduler { inner, workers }
    }

    /// Settings this scheduler was built with
    pub fn config(&self) -> SchedulerConfig {
        self.inner.config
    }

    /// Submit a fire-and-forget continuation.
    ///
    /// Fails once the scheduler has been shut down.
    pub fn submit(&self, name: impl Into<String>, work: impl FnOnce() + Send + 'static) -> Result<()> {
        submit(&self.inner, name.into(), Box::new(work))
    }

    /// Run `action` against `target` as a continuation and return its result.
    ///
    /// A pending future target defers the action until it succeeds. If the
    /// target fails, `on_fault` runs instead, or the fault is copied into
    /// the result. A future returned by the action is routed into the
    /// result rather than stored as a value.
    pub fn enqueue<A>(
        &self,
        name: impl Into<String>,
        target: Value,
        action: A,
        on_fault: Option<FaultHandler>,
    ) -> Future
    where
        A: FnOnce(Value) -> Result<Value> + Send + 'static,
    {
        let name = name.into();
        let result = Future::named(name.clone());

        let target = match target {
            Value::Future(target) => target,
            value => {
                let res = result.clone();
                let task_name = name.clone();
                let submitted = submit(
                    &self.inner,
                    name,
                    Box::new(move || settle(&res, run_guarded(&task_name, || action(value)))),
                );
                if let Err(e) = submitted {
                    result.fault(e);
                }
                return result;
            }
        };

        let inner = Arc::clone(&self.inner);
        let res = result.clone();
        let task_name = name.clone();
        target.on_success(move |value| {
            let value = value.clone();
            let fut = res.clone();
            let submitted = submit(
                &inner,
                task_name.clone(),
                Box::new(move || settle(&fut, run_guarded(&task_name, || action(value)))),
            );
            if let Err(e) = submitted {
                res.fault(e);
            }
        });

        let inner = Arc::clone(&self.inner);
        let res = result.clone();
        target.on_error(move |error| {
            let error = error.clone();
            let Some(handler) = on_fault else {
                res.fault(error);
                return;
            };
            let fut = res.clone();
            let task_name = format!("{} (fault)", name);
            let submitted = submit(
                &inner,
                task_name.clone(),
                Box::new(move || settle(&fut, run_guarded(&task_name, || handler(error)))),
            );
            if let Err(e) = submitted {
                res.fault(e);
            }
        });

        result
    }

    /// Park every continuation that would run from now on.
    ///
    /// Returns false if already suspended.
    pub fn suspend(&self) -> bool {
        let mut state = self.inner.queue.lock();
        if state.suspended {
            return false;
        }
        state.suspended = true;
        debug!(target: "vireo::scheduler", buffered = state.buffer.len(), "suspended");
        true
    }

    /// Leave the suspended state and run the buffer on this thread, most
    /// recently parked first.
    ///
    /// Returns false if not suspended.
    pub fn resume(&self) -> bool {
        {
            let mut state = self.inner.queue.lock();
            if !state.suspended {
                return false;
            }
            state.suspended = false;
            debug!(target: "vireo::scheduler", buffered = state.buffer.len(), "resumed");
        }
        self.inner.work_ready.notify_all();

        loop {
            let task = {
                let mut state = self.inner.queue.lock();
                // a replayed continuation may suspend again
                if state.suspended {
                    break;
                }
                state.buffer.pop()
            };
            match task {
                Some(task) => run_task(&self.inner, task),
                None => break,
            }
        }
        true
    }

    /// Run up to `n` buffered continuations on this thread, most recently
    /// parked first, while staying suspended.
    ///
    /// Returns false if not suspended.
    pub fn resume_n(&self, n: usize) -> bool {
        if !self.is_suspended() {
            return false;
        }
        for _ in 0..n {
            let task = self.inner.queue.lock().buffer.pop();
            match task {
                Some(task) => {
                    trace!(target: "vireo::scheduler", task = %task.name, "stepping");
                    run_task(&self.inner, task);
                }
                None => break,
            }
        }
        true
    }

    /// Whether continuations are currently being parked
    pub fn is_suspended(&self) -> bool {
        self.inner.queue.lock().suspended
    }

    /// Names of parked continuations, oldest first
    pub fn buffered_task_names(&self) -> Vec<String> {
        self.inner
            .queue
            .lock()
            .buffer
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    /// Number of continuations currently running
    pub fn count(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Run or wait for every ready continuation.
    ///
    /// Without workers the ready queue runs on this thread until empty,
    /// continuations submitted along the way included. With workers this
    /// blocks until the queue is empty and nothing is in flight. Parked
    /// continuations are left in the buffer either way.
    ///
    /// Must not be called from inside a continuation when workers are in use.
    pub fn drain(&self) {
        if self.inner.config.workers == 0 {
            while let Some(task) = next_ready(&self.inner) {
                run_task(&self.inner, task);
            }
            return;
        }

        let mut state = self.inner.queue.lock();
        while !state.ready.is_empty() || self.inner.in_flight.load(Ordering::Acquire) > 0 {
            self.inner.drain_cond.wait(&mut state);
        }
    }

    /// Return a snapshot of scheduler metrics.
    pub fn stats(&self) -> SchedulerStats {
        let state = self.inner.queue.lock();
        SchedulerStats {
            queue_depth: state.ready.len(),
            buffered: state.buffer.len(),
            in_flight: self.inner.in_flight.load(Ordering::Relaxed),
            tasks_completed: self.inner.tasks_completed.load(Ordering::Relaxed),
            worker_count: self.inner.config.workers,
        }
    }

    /// Stop accepting continuations and join the workers.
    ///
    /// Ready continuations run before this returns. Idempotent.
    pub fn shutdown(&self) {
        if self.inner.config.workers == 0 && !self.inner.shutdown.load(Ordering::Acquire) {
            self.drain();
        }
        shutdown(&self.inner, &self.workers.handles);
    }

    /// Whether [`Scheduler::shutdown`] has run
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.inner.config)
            .field("stats", &self.stats())
            .finish()
    }
}

fn new_inner(config: SchedulerConfig) -> Arc<SchedulerInner> {
    Arc::new(SchedulerInner {
        queue: Mutex::new(QueueState {
            ready: VecDeque::new(),
            suspended: false,
            buffer: Vec::new(),
        }),
        work_ready: Condvar::new(),
        drain_cond: Condvar::new(),
        shutdown: AtomicBool::new(false),
        in_flight: AtomicUsize::new(0),
        tasks_completed: AtomicU64::new(0),
        config,
    })
}

fn submit(inner: &SchedulerInner, name: String, work: Box<dyn FnOnce() + Send>) -> Result<()> {
    if inner.shutdown.load(Ordering::Acquire) {
        return Err(Error::external("scheduler is shut down"));
    }
    let name = if inner.config.task_names {
        name
    } else {
        "task".to_string()
    };
    let task = Task { name, work };

    {
        let mut state = inner.queue.lock();
        trace!(target: "vireo::scheduler", task = %task.name, suspended = state.suspended, "submitted");
        if state.suspended {
            state.buffer.push(task);
            return Ok(());
        }
        state.ready.push_back(task);
    }

    inner.work_ready.notify_one();
    Ok(())
}

/// Pop the next ready continuation, parking any popped while suspended.
fn next_ready(inner: &SchedulerInner) -> Option<Task> {
    let mut state = inner.queue.lock();
    while let Some(task) = state.ready.pop_front() {
        if state.suspended {
            state.buffer.push(task);
            continue;
        }
        return Some(task);
    }
    None
}

fn shutdown(inner: &SchedulerInner, handles: &Mutex<Vec<JoinHandle<()>>>) {
    inner.shutdown.store(true, Ordering::Release);

    // Notify under the queue lock so a worker between its shutdown check
    // and its wait cannot miss the wakeup.
    {
        let _state = inner.queue.lock();
        inner.work_ready.notify_all();
    }

    let current = std::thread::current().id();
    let mut handles = handles.lock();
    for handle in handles.drain(..) {
        if handle.thread().id() == current {
            continue;
        }
        let _ = handle.join();
    }
}

/// Decrements `in_flight` and notifies drain waiters on drop, so a
/// panicking continuation cannot leave the count inflated.
struct InFlightGuard<'a> {
    inner: &'a SchedulerInner,
}

impl<'a> Drop for InFlightGuard<'a> {
    fn drop(&mut self) {
        let prev = self.inner.in_flight.fetch_sub(1, Ordering::Release);
        self.inner.tasks_completed.fetch_add(1, Ordering::Relaxed);

        if prev == 1 {
            let state = self.inner.queue.lock();
            if state.ready.is_empty() {
                self.inner.drain_cond.notify_all();
            }
        }
    }
}

fn run_task(inner: &SchedulerInner, task: Task) {
    inner.in_flight.fetch_add(1, Ordering::Release);
    let _guard = InFlightGuard { inner };

    if let Err(payload) = catch_unwind(AssertUnwindSafe(task.work)) {
        error!(
            target: "vireo::scheduler",
            task = %task.name,
            "continuation panicked: {}",
            Error::from_panic(payload.as_ref())
        );
    }
}

fn worker_loop(inner: &SchedulerInner) {
    loop {
        let task = {
            let mut state = inner.queue.lock();
            loop {
                if let Some(task) = state.ready.pop_front() {
                    if state.suspended {
                        state.buffer.push(task);
                        continue;
                    }
                    // counted before the lock is released so drain never
                    // observes an empty queue with the task unaccounted for
                    inner.in_flight.fetch_add(1, Ordering::Release);
                    break task;
                }
                // parked tasks leave the queue without running
                if inner.in_flight.load(Ordering::Acquire) == 0 {
                    inner.drain_cond.notify_all();
                }
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                inner.work_ready.wait(&mut state);
            }
        };

        let _guard = InFlightGuard { inner };
        if let Err(payload) = catch_unwind(AssertUnwindSafe(task.work)) {
            error!(
                target: "vireo::scheduler",
                task = %task.name,
                "continuation panicked: {}",
                Error::from_panic(payload.as_ref())
            );
        }
    }
}

/// Run a continuation body, turning a panic into a fault.
fn run_guarded<F>(name: &str, body: F) -> Result<Value>
where
    F: FnOnce() -> Result<Value>,
{
    catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        let fault = Error::from_panic(payload.as_ref());
        error!(target: "vireo::scheduler", task = %name, %fault, "continuation panicked");
        Err(fault)
    })
}

/// Complete `result` from a continuation outcome, routing returned futures.
fn settle(result: &Future, outcome: Result<Value>) {
    match outcome {
        Ok(Value::Future(inner)) => inner.route(result),
        Ok(value) => {
            result.success(value);
        }
        Err(e) => {
            result.fault(e);
        }
    }
}
