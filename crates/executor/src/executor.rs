//! The Executor - single entry point to the Vireo engine.
//!
//! The Executor walks an [`Expr`] tree and routes each node to the matching
//! engine operation. It holds a runtime handle and an evaluation mode and
//! nothing else; all deferred work lives in the runtime's scheduler.

use crate::Expr;
use tracing::{debug, trace};
use vireo_concurrency::FaultHandler;
use vireo_core::{Error, Future, Result, Value};
use vireo_engine::{
    bind, binary, get_index, get_member, invoke, repeat, set_index, set_member, unary, Runtime,
};

/// How faults are reported during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Every fault is reported
    Checked,
    /// Binding failures and void references evaluate to void, including
    /// those that arrive later on deferred results
    Unchecked,
}

/// Expression evaluator.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use vireo_executor::{BinaryOp, Executor, Expr, Runtime};
///
/// let executor = Executor::new(Runtime::new());
/// let sum = executor.eval_value(&Expr::binary(
///     BinaryOp::Add,
///     Expr::literal(2),
///     Expr::literal(3),
/// ))?;
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    rt: Runtime,
    mode: EvalMode,
}

impl Executor {
    /// Executor whose mode follows the runtime's `checked` setting.
    pub fn new(rt: Runtime) -> Self {
        let mode = if rt.config().checked {
            EvalMode::Checked
        } else {
            EvalMode::Unchecked
        };
        Self { rt, mode }
    }

    /// Executor with an explicit mode.
    pub fn with_mode(rt: Runtime, mode: EvalMode) -> Self {
        Self { rt, mode }
    }

    /// Evaluate to a future.
    ///
    /// A synchronous result comes back as an already-completed future.
    pub fn eval(&self, expr: &Expr) -> Future {
        match self.eval_value(expr) {
            Ok(Value::Future(f)) => f,
            Ok(value) => Future::resolved(value),
            Err(e) => Future::failed(e),
        }
    }

    /// Evaluate synchronously.
    ///
    /// The result is a [`Value::Future`] when evaluation had to defer.
    pub fn eval_value(&self, expr: &Expr) -> Result<Value> {
        self.eval_in(expr, self.mode)
    }

    /// Evaluate several expressions in order.
    ///
    /// Results are in the same order as the inputs; a fault in one does not
    /// stop the rest.
    pub fn eval_many(&self, exprs: &[Expr]) -> Vec<Result<Value>> {
        exprs.iter().map(|expr| self.eval_value(expr)).collect()
    }

    /// Runtime this executor evaluates against
    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    /// Default evaluation mode
    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    /// Evaluate `expr` in `mode`.
    ///
    /// Children are evaluated first, each under its own filtering; the
    /// leniency of `mode` applies only to what this node's own operation
    /// produces. A mode switch hands its subtree over to the new mode
    /// and is never filtered by the enclosing one.
    fn eval_in(&self, expr: &Expr, mode: EvalMode) -> Result<Value> {
        let rt = &self.rt;
        let out = match expr {
            Expr::Unchecked(inner) => return self.eval_in(inner, EvalMode::Unchecked),
            Expr::Checked(inner) => return self.eval_in(inner, EvalMode::Checked),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Unary { op, operand } => {
                let v = self.eval_in(operand, mode)?;
                unary(rt, *op, v)
            }
            Expr::Binary { op, left, right } => {
                let l = self.eval_in(left, mode)?;
                let r = self.eval_in(right, mode)?;
                binary(rt, *op, l, r)
            }
            Expr::Member { target, name } => {
                let t = self.eval_in(target, mode)?;
                get_member(rt, t, name)
            }
            Expr::SetMember {
                target,
                name,
                value,
            } => {
                let t = self.eval_in(target, mode)?;
                let v = self.eval_in(value, mode)?;
                set_member(rt, t, name, v)
            }
            Expr::Index { target, index } => {
                let t = self.eval_in(target, mode)?;
                let i = self.eval_in(index, mode)?;
                get_index(rt, t, i)
            }
            Expr::SetIndex {
                target,
                index,
                value,
            } => {
                let t = self.eval_in(target, mode)?;
                let i = self.eval_in(index, mode)?;
                let v = self.eval_in(value, mode)?;
                set_index(rt, t, i, v)
            }
            Expr::Invoke { callee, args } => {
                let callee = self.eval_in(callee, mode)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_in(arg, mode))
                    .collect::<Result<Vec<_>>>()?;
                invoke(rt, callee, args)
            }
            Expr::Bind { value, contract } => {
                let v = self.eval_in(value, mode)?;
                let c = self.eval_in(contract, mode)?;
                bind(rt, v, c)
            }
            Expr::Repeat { body, aggregator } => {
                let body = self.eval_in(body, mode)?;
                let aggregator = aggregator
                    .as_ref()
                    .map(|agg| self.eval_in(agg, mode))
                    .transpose()?;
                repeat(rt, body, aggregator)
            }
            Expr::Sequence(exprs) => {
                let mut last = Value::Void;
                for expr in exprs {
                    last = self.eval_in(expr, mode)?;
                }
                Ok(last)
            }
        };

        match mode {
            EvalMode::Checked => out,
            EvalMode::Unchecked => self.lenient(expr, out),
        }
    }

    /// Replace suppressible faults with void, now or when they arrive.
    fn lenient(&self, expr: &Expr, out: Result<Value>) -> Result<Value> {
        match out {
            Err(e) if e.is_lenient_suppressible() => {
                debug!(target: "vireo::executor", expr = expr.name(), error = %e, "fault suppressed");
                Ok(Value::Void)
            }
            Ok(Value::Future(f)) => match f.outcome() {
                Some(Err(e)) if e.is_lenient_suppressible() => {
                    debug!(target: "vireo::executor", expr = expr.name(), error = %e, "fault suppressed");
                    Ok(Value::Void)
                }
                Some(_) => Ok(Value::Future(f)),
                None => {
                    trace!(target: "vireo::executor", expr = expr.name(), "deferred under unchecked");
                    let on_fault: FaultHandler = Box::new(suppress);
                    let guarded = self.rt.scheduler().enqueue(
                        "unchecked",
                        Value::Future(f),
                        Ok,
                        Some(on_fault),
                    );
                    Ok(Value::Future(guarded))
                }
            },
            other => other,
        }
    }
}

fn suppress(error: Error) -> Result<Value> {
    if error.is_lenient_suppressible() {
        debug!(target: "vireo::executor", error = %error, "deferred fault suppressed");
        Ok(Value::Void)
    } else {
        Err(error)
    }
}
