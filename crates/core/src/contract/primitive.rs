//! Primitive contracts
//!
//! A primitive is an opaque identity marker. Two primitives are the same
//! contract exactly when their ids match; names are for display only.
//!
//! ## Built-in Primitives
//!
//! | Primitive | Id | Parent |
//! |-----------|----|--------|
//! | any | 0 | - |
//! | void | 1 | - |
//! | boolean | 2 | - |
//! | float | 3 | - |
//! | integer | 4 | float |
//! | string | 5 | - |
//! | contract | 6 | - |
//!
//! Further primitives are allocated by a
//! [`ContractRegistry`](super::ContractRegistry) starting at
//! [`FIRST_USER_ID`]. A primitive may name a parent; the parent chain forms
//! the nominal part of the relationship algebra (a parent is a superset of
//! its descendants).

use once_cell::sync::Lazy;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Id of the universal `any` primitive
pub const ANY_ID: u32 = 0;
/// Id of the `void` primitive
pub const VOID_ID: u32 = 1;
/// Id of the `boolean` primitive
pub const BOOLEAN_ID: u32 = 2;
/// Id of the `float` primitive
pub const FLOAT_ID: u32 = 3;
/// Id of the `integer` primitive
pub const INTEGER_ID: u32 = 4;
/// Id of the `string` primitive
pub const STRING_ID: u32 = 5;
/// Id of the `contract` primitive (the contract of contract values)
pub const CONTRACT_ID: u32 = 6;
/// First id handed out to registry-defined primitives
pub const FIRST_USER_ID: u32 = 64;

/// Opaque identity marker.
///
/// Cloning is cheap; all clones share identity.
#[derive(Clone)]
pub struct Primitive(Arc<PrimitiveInner>);

struct PrimitiveInner {
    id: u32,
    name: String,
    parent: Option<Primitive>,
}

struct Builtins {
    any: Primitive,
    void: Primitive,
    boolean: Primitive,
    float: Primitive,
    integer: Primitive,
    string: Primitive,
    contract: Primitive,
}

static BUILTINS: Lazy<Builtins> = Lazy::new(|| {
    let float = Primitive::new(FLOAT_ID, "float", None);
    Builtins {
        any: Primitive::new(ANY_ID, "any", None),
        void: Primitive::new(VOID_ID, "void", None),
        boolean: Primitive::new(BOOLEAN_ID, "boolean", None),
        integer: Primitive::new(INTEGER_ID, "integer", Some(float.clone())),
        float,
        string: Primitive::new(STRING_ID, "string", None),
        contract: Primitive::new(CONTRACT_ID, "contract", None),
    }
});

impl Primitive {
    pub(crate) fn new(id: u32, name: impl Into<String>, parent: Option<Primitive>) -> Self {
        Primitive(Arc::new(PrimitiveInner {
            id,
            name: name.into(),
            parent,
        }))
    }

    /// The universal primitive: superset of every contract
    pub fn any() -> Self {
        BUILTINS.any.clone()
    }

    /// Contract of the "no value" sentinel
    pub fn void() -> Self {
        BUILTINS.void.clone()
    }

    /// Booleans
    pub fn boolean() -> Self {
        BUILTINS.boolean.clone()
    }

    /// Floating point numbers (parent of integer)
    pub fn float() -> Self {
        BUILTINS.float.clone()
    }

    /// Integers
    pub fn integer() -> Self {
        BUILTINS.integer.clone()
    }

    /// Strings
    pub fn string() -> Self {
        BUILTINS.string.clone()
    }

    /// Contract of first-class contract values
    pub fn contract() -> Self {
        BUILTINS.contract.clone()
    }

    /// All built-in primitives, `any` first
    pub fn builtins() -> Vec<Primitive> {
        vec![
            Self::any(),
            Self::void(),
            Self::boolean(),
            Self::float(),
            Self::integer(),
            Self::string(),
            Self::contract(),
        ]
    }

    /// Identity of this primitive
    pub fn id(&self) -> u32 {
        self.0.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Direct parent in the nominal hierarchy
    pub fn parent(&self) -> Option<&Primitive> {
        self.0.parent.as_ref()
    }

    /// Whether this is the universal `any` primitive
    pub fn is_any(&self) -> bool {
        self.0.id == ANY_ID
    }

    /// Whether this is a built-in primitive
    pub fn is_builtin(&self) -> bool {
        self.0.id < FIRST_USER_ID
    }

    /// Whether `self` appears strictly above `other` in `other`'s parent chain
    pub fn is_ancestor_of(&self, other: &Primitive) -> bool {
        let mut cursor = other.parent();
        while let Some(p) = cursor {
            if p == self {
                return true;
            }
            cursor = p.parent();
        }
        false
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.0.name, self.0.id)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
