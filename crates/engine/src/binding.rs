//! Binding with deferral
//!
//! Extends the pure [`coerce`](vireo_core::coerce) with the one case that
//! needs a scheduler: a contract that is itself still pending. The binding
//! is then re-attempted once the contract resolves and the caller gets a
//! future for the bound value.

use crate::runtime::Runtime;
use vireo_core::{coerce, contract_of, Contract, Error, Result, Value};

/// Bind `value` against the contract held by `contract`.
///
/// `contract` must be a contract value or a future of one. A pending value
/// is not waited for; its attached contract is narrowed instead.
pub fn bind(rt: &Runtime, value: Value, contract: Value) -> Result<Value> {
    match contract {
        Value::Contract(c) => coerce(value, &c),
        Value::Future(f) => match f.outcome() {
            Some(Ok(resolved)) => bind(rt, value, resolved),
            Some(Err(e)) => Err(e),
            None => {
                let runtime = rt.clone();
                let deferred = rt.scheduler().enqueue(
                    "bind",
                    Value::Future(f),
                    move |resolved| bind(&runtime, value, resolved),
                    None,
                );
                Ok(Value::Future(deferred))
            }
        },
        other => Err(Error::binding(Contract::contract(), contract_of(&other))),
    }
}
