//! Callables as operands, and invocation.
//!
//! Composition never runs anything eagerly except default instances for
//! dropped parameters, which are computed when the new callable is built
//! so that a contract without a default fails at composition time.

use super::contract::count;
use super::BinaryOp;
use crate::lift::lift;
use crate::runtime::Runtime;
use vireo_core::{
    coerce, contract_of, default_instance, Callable, Contract, Error, Record, Result, Signature,
    Value,
};

/// Invoke `callee` with concrete arguments.
pub(super) fn call(callee: Value, args: Vec<Value>) -> Result<Value> {
    match callee {
        Value::Callable(f) => call_native(&f, args),
        Value::Contract(c) => construct(&c, args),
        Value::Void => Err(Error::void_reference("invoked void")),
        other => Err(Error::unsupported("invoke", other.type_name())),
    }
}

/// Bind the leading arguments against the signature and run the body.
///
/// Arguments past the declared arity are passed through unbound.
fn call_native(f: &Callable, args: Vec<Value>) -> Result<Value> {
    let sig = f.signature();
    if args.len() < sig.arity() {
        return Err(Error::arity(sig.arity(), args.len()));
    }
    let mut bound = Vec::with_capacity(args.len());
    for (i, arg) in args.into_iter().enumerate() {
        match sig.params.get(i) {
            Some(param) => bound.push(coerce(arg, param)?),
            None => bound.push(arg),
        }
    }
    let out = f.call(bound)?;
    if sig.one_way {
        Ok(Value::Void)
    } else {
        Ok(out)
    }
}

/// Invoking a contract constructs an instance of it.
fn construct(contract: &Contract, mut args: Vec<Value>) -> Result<Value> {
    match args.len() {
        0 => default_instance(contract),
        1 => coerce(args.remove(0), contract),
        _ => {
            let value = match contract {
                Contract::Record(_) => Value::Record(Record::tuple(args)),
                _ => Value::Vector(args),
            };
            coerce(value, contract)
        }
    }
}

pub(super) fn binary(rt: &Runtime, op: BinaryOp, f: Callable, right: Value) -> Result<Value> {
    match (op, right) {
        (BinaryOp::Add, Value::Callable(g)) => Ok(Value::Callable(join(rt, f, g))),
        (BinaryOp::Add, other) => Err(Error::binding("callable", contract_of(&other))),
        (BinaryOp::Shr, Value::Callable(g)) => Ok(Value::Callable(pipe(rt, f, g))),
        (BinaryOp::Shl, n) => drop_front(f, count(n)?).map(Value::Callable),
        (BinaryOp::Shr, n) => drop_back(f, count(n)?).map(Value::Callable),
        (op, other) => Err(Error::unsupported(
            op.name(),
            format!("callable and {}", other.type_name()),
        )),
    }
}

/// `f + g`: parameters concatenated, both invoked, results as a tuple.
fn join(rt: &Runtime, f: Callable, g: Callable) -> Callable {
    let name = format!("{}+{}", f.name(), g.name());
    let signature = f.signature().concat(g.signature());
    let rt = rt.clone();
    Callable::new(name, signature, move |mut args| {
        let split = f.signature().arity().min(args.len());
        let rest = args.split_off(split);
        let left = call_native(&f, args)?;
        let right = call_native(&g, rest)?;
        lift(&rt, "join", [left, right], |_, [a, b]| {
            Ok(Value::Record(Record::tuple([a, b])))
        })
    })
}

/// `f >> g`: the result of `f` becomes the only argument of `g`.
fn pipe(rt: &Runtime, f: Callable, g: Callable) -> Callable {
    let name = format!("{}>>{}", f.name(), g.name());
    let signature = Signature {
        params: f.signature().params.clone(),
        one_way: g.signature().one_way,
    };
    let rt = rt.clone();
    Callable::new(name, signature, move |args| {
        let out = call_native(&f, args)?;
        super::invoke(&rt, Value::Callable(g.clone()), vec![out])
    })
}

fn defaults(params: &[Contract]) -> Result<Vec<Value>> {
    params.iter().map(default_instance).collect()
}

/// `f << n`: the first `n` parameters receive their default instances.
fn drop_front(f: Callable, n: usize) -> Result<Callable> {
    let sig = f.signature();
    let n = n.min(sig.arity());
    let filled = defaults(&sig.params[..n])?;
    let name = format!("{}<<{}", f.name(), n);
    let signature = sig.drop_front(n);
    Ok(Callable::new(name, signature, move |args| {
        let mut full = filled.clone();
        full.extend(args);
        f.call(full)
    }))
}

/// `f >> n`: the last `n` parameters receive their default instances.
fn drop_back(f: Callable, n: usize) -> Result<Callable> {
    let sig = f.signature();
    let keep = sig.arity() - n.min(sig.arity());
    let filled = defaults(&sig.params[keep..])?;
    let name = format!("{}>>{}", f.name(), n);
    let signature = sig.drop_back(n);
    Ok(Callable::new(name, signature, move |mut args| {
        let extra = args.split_off(keep.min(args.len()));
        args.extend(filled.iter().cloned());
        args.extend(extra);
        f.call(args)
    }))
}
