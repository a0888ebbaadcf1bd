//! Pending-operand lifting
//!
//! Every operation runs through one combinator. Operands are scanned left
//! to right:
//!
//! - a completed future is replaced by its value
//! - a failed future fails the operation with the same fault
//! - the first pending future defers the whole operation: a continuation
//!   re-runs the lift once that operand resolves, and the caller gets a
//!   future for the eventual result immediately
//!
//! Only when every operand is concrete does the operation itself run.
//! Re-running the lift after each resolution lets operations with several
//! pending operands wait for them one at a time.

use crate::runtime::Runtime;
use std::sync::Arc;
use vireo_core::{Error, Future, Result, Value};

type ArrayOp<const N: usize> = Arc<dyn Fn(&Runtime, [Value; N]) -> Result<Value> + Send + Sync>;
type VecOp = Arc<dyn Fn(&Runtime, Vec<Value>) -> Result<Value> + Send + Sync>;

enum Scan {
    Ready,
    Pending(usize, Future),
    Failed(Error),
}

fn scan(operands: &mut [Value]) -> Scan {
    for (i, operand) in operands.iter_mut().enumerate() {
        loop {
            let outcome = match operand {
                Value::Future(f) => f.outcome().ok_or_else(|| f.clone()),
                _ => break,
            };
            match outcome {
                Err(pending) => return Scan::Pending(i, pending),
                Ok(Err(e)) => return Scan::Failed(e),
                Ok(Ok(v)) => *operand = v,
            }
        }
    }
    Scan::Ready
}

/// Run `op` over a fixed number of operands once they are all concrete.
pub fn lift<const N: usize, F>(rt: &Runtime, name: &str, operands: [Value; N], op: F) -> Result<Value>
where
    F: Fn(&Runtime, [Value; N]) -> Result<Value> + Send + Sync + 'static,
{
    lift_array(rt, name, operands, Arc::new(op))
}

fn lift_array<const N: usize>(
    rt: &Runtime,
    name: &str,
    mut operands: [Value; N],
    op: ArrayOp<N>,
) -> Result<Value> {
    match scan(&mut operands) {
        Scan::Ready => op(rt, operands),
        Scan::Failed(e) => Err(e),
        Scan::Pending(i, pending) => {
            tracing::trace!(target: "vireo::dispatch", op = name, operand = i, "deferred");
            let runtime = rt.clone();
            let task = name.to_string();
            let result = rt.scheduler().enqueue(
                name,
                Value::Future(pending),
                move |resolved| {
                    let mut operands = operands;
                    operands[i] = resolved;
                    lift_array(&runtime, &task, operands, op)
                },
                None,
            );
            Ok(Value::Future(result))
        }
    }
}

/// Run `op` over any number of operands once they are all concrete.
pub fn lift_all<F>(rt: &Runtime, name: &str, operands: Vec<Value>, op: F) -> Result<Value>
where
    F: Fn(&Runtime, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
{
    lift_vec(rt, name, operands, Arc::new(op))
}

fn lift_vec(rt: &Runtime, name: &str, mut operands: Vec<Value>, op: VecOp) -> Result<Value> {
    match scan(&mut operands) {
        Scan::Ready => op(rt, operands),
        Scan::Failed(e) => Err(e),
        Scan::Pending(i, pending) => {
            tracing::trace!(target: "vireo::dispatch", op = name, operand = i, "deferred");
            let runtime = rt.clone();
            let task = name.to_string();
            let result = rt.scheduler().enqueue(
                name,
                Value::Future(pending),
                move |resolved| {
                    let mut operands = operands;
                    operands[i] = resolved;
                    lift_vec(&runtime, &task, operands, op)
                },
                None,
            );
            Ok(Value::Future(result))
        }
    }
}
