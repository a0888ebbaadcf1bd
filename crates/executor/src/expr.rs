//! Expression tree evaluated by the [`Executor`](crate::Executor).
//!
//! Expressions are the instruction set of the runtime: every operation the
//! engine offers has exactly one variant here. They are built directly by
//! an embedding front end; there is no parser in this crate.

use vireo_core::Value;
use vireo_engine::{BinaryOp, UnaryOp};

/// An evaluable expression.
///
/// # Variants
///
/// | Variant | Engine operation |
/// |---------|------------------|
/// | `Literal` | none, the value itself |
/// | `Unary` / `Binary` | `unary` / `binary` |
/// | `Member` / `SetMember` | `get_member` / `set_member` |
/// | `Index` / `SetIndex` | `get_index` / `set_index` |
/// | `Invoke` | `invoke` |
/// | `Bind` | `bind` |
/// | `Repeat` | `repeat` |
/// | `Unchecked` / `Checked` | switch the evaluation mode for a subtree |
/// | `Sequence` | evaluate in order, keep the last result |
#[derive(Debug, Clone)]
pub enum Expr {
    /// A constant
    Literal(Value),

    /// Unary operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// Binary operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand, which selects the implementation
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// Read a named member
    Member {
        /// Container
        target: Box<Expr>,
        /// Member name
        name: String,
    },

    /// Write a named member; evaluates to the updated container
    SetMember {
        /// Container
        target: Box<Expr>,
        /// Member name
        name: String,
        /// New value
        value: Box<Expr>,
    },

    /// Read by index
    Index {
        /// Container
        target: Box<Expr>,
        /// Position, or member name on records
        index: Box<Expr>,
    },

    /// Write by index; evaluates to the updated container
    SetIndex {
        /// Container
        target: Box<Expr>,
        /// Position, or member name on records
        index: Box<Expr>,
        /// New value
        value: Box<Expr>,
    },

    /// Call a callable or construct from a contract
    Invoke {
        /// Callable or contract
        callee: Box<Expr>,
        /// Arguments, evaluated left to right
        args: Vec<Expr>,
    },

    /// Bind a value against a contract
    Bind {
        /// Value to bind
        value: Box<Expr>,
        /// Contract (or a future of one)
        contract: Box<Expr>,
    },

    /// Repeat a body until it breaks
    Repeat {
        /// Callable receiving the control record
        body: Box<Expr>,
        /// Optional fold over the emitted values
        aggregator: Option<Box<Expr>>,
    },

    /// Evaluate with binding failures and void references replaced by void
    Unchecked(Box<Expr>),

    /// Evaluate with every fault reported
    Checked(Box<Expr>),

    /// Evaluate in order; the last result is the result
    Sequence(Vec<Expr>),
}

impl Expr {
    /// Constant expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Unary operator expression
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Binary operator expression
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Member read
    pub fn member(target: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(target),
            name: name.into(),
        }
    }

    /// Member write
    pub fn set_member(target: Expr, name: impl Into<String>, value: Expr) -> Self {
        Expr::SetMember {
            target: Box::new(target),
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Index read
    pub fn index(target: Expr, index: Expr) -> Self {
        Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    /// Index write
    pub fn set_index(target: Expr, index: Expr, value: Expr) -> Self {
        Expr::SetIndex {
            target: Box::new(target),
            index: Box::new(index),
            value: Box::new(value),
        }
    }

    /// Invocation
    pub fn invoke(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Invoke {
            callee: Box::new(callee),
            args,
        }
    }

    /// Binding
    pub fn bind(value: Expr, contract: Expr) -> Self {
        Expr::Bind {
            value: Box::new(value),
            contract: Box::new(contract),
        }
    }

    /// Repeat
    pub fn repeat(body: Expr, aggregator: Option<Expr>) -> Self {
        Expr::Repeat {
            body: Box::new(body),
            aggregator: aggregator.map(Box::new),
        }
    }

    /// Unchecked region
    pub fn unchecked(inner: Expr) -> Self {
        Expr::Unchecked(Box::new(inner))
    }

    /// Checked region
    pub fn checked(inner: Expr) -> Self {
        Expr::Checked(Box::new(inner))
    }

    /// Variant name, used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Unary { .. } => "unary",
            Expr::Binary { .. } => "binary",
            Expr::Member { .. } => "member",
            Expr::SetMember { .. } => "set_member",
            Expr::Index { .. } => "index",
            Expr::SetIndex { .. } => "set_index",
            Expr::Invoke { .. } => "invoke",
            Expr::Bind { .. } => "bind",
            Expr::Repeat { .. } => "repeat",
            Expr::Unchecked(_) => "unchecked",
            Expr::Checked(_) => "checked",
            Expr::Sequence(_) => "sequence",
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}
