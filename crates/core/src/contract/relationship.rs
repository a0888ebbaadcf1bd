//! Contract relationship algebra
//!
//! [`relationship`] classifies how two contracts relate structurally. It is
//! a pure, total function and the single source of truth for binding and
//! every coercion decision made by dispatch.
//!
//! ## Laws
//!
//! - **Reflexive**: `relationship(a, a) == Equal` for every contract.
//! - **Inverse-consistent**: `relationship(a, b) == relationship(b, a).inverse()`.
//! - **Universal**: `any` is a superset of every other contract.
//!
//! ## Rule Precedence
//!
//! Both operand orders are checked at every step so the laws hold by
//! construction:
//!
//! 1. structural equality (after collapsing double complements)
//! 2. `any` on either side
//! 3. union on either side
//! 4. complement on either side
//! 5. same-variant structural rules (primitive, vector, signature, record)
//! 6. anything else is `Unrelated`

use super::{Contract, Field, Signature};
use serde::{Deserialize, Serialize};

/// Structural subtyping classification of `a` relative to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// Same set of values
    Equal,
    /// `a` is strictly more specific than `b`
    Subset,
    /// `a` is strictly more general than `b`
    Superset,
    /// Neither contains the other
    Unrelated,
}

impl Relationship {
    /// Classification of `b` relative to `a`.
    pub const fn inverse(self) -> Self {
        match self {
            Relationship::Subset => Relationship::Superset,
            Relationship::Superset => Relationship::Subset,
            other => other,
        }
    }

    /// Fold another positional result into an accumulated direction.
    ///
    /// `Equal` is neutral; agreeing directions are kept; anything opposing
    /// or unrelated collapses to `Unrelated`.
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Relationship::Equal, r) | (r, Relationship::Equal) => r,
            (Relationship::Subset, Relationship::Subset) => Relationship::Subset,
            (Relationship::Superset, Relationship::Superset) => Relationship::Superset,
            _ => Relationship::Unrelated,
        }
    }

    /// `Equal` or `Superset`: the left side accepts everything the right does
    pub const fn accepts(self) -> bool {
        matches!(self, Relationship::Equal | Relationship::Superset)
    }

    /// `Equal` or `Subset`: the left side fits inside the right
    pub const fn fits(self) -> bool {
        matches!(self, Relationship::Equal | Relationship::Subset)
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Relationship::Equal => "equal",
            Relationship::Subset => "subset",
            Relationship::Superset => "superset",
            Relationship::Unrelated => "unrelated",
        };
        f.write_str(name)
    }
}

/// Compute the relationship of `a` relative to `b`.
pub fn relationship(a: &Contract, b: &Contract) -> Relationship {
    let a = collapse(a);
    let b = collapse(b);

    if a == b {
        return Relationship::Equal;
    }
    if a.is_any() {
        return Relationship::Superset;
    }
    if b.is_any() {
        return Relationship::Subset;
    }

    match (a, b) {
        (Contract::Union(a1, a2), _) => union_relationship(a, a1, a2, b),
        (_, Contract::Union(b1, b2)) => union_relationship(b, b1, b2, a).inverse(),
        (Contract::Complement(x), Contract::Complement(y)) => relationship(x, y),
        (Contract::Complement(x), _) => complement_relationship(x, b),
        (_, Contract::Complement(y)) => complement_relationship(y, a).inverse(),
        (Contract::Primitive(p), Contract::Primitive(q)) => {
            if p == q {
                Relationship::Equal
            } else if p.is_ancestor_of(q) {
                Relationship::Superset
            } else if q.is_ancestor_of(p) {
                Relationship::Subset
            } else {
                Relationship::Unrelated
            }
        }
        (
            Contract::Vector {
                element: e1,
                length: n1,
            },
            Contract::Vector {
                element: e2,
                length: n2,
            },
        ) => vector_relationship(e1, *n1, e2, *n2),
        (Contract::Signature(s), Contract::Signature(t)) => signature_relationship(s, t),
        (Contract::Record(f), Contract::Record(g)) => record_relationship(f, g),
        _ => Relationship::Unrelated,
    }
}

/// Strip complement pairs: `~~a` is `a` wherever it was constructed.
fn collapse(c: &Contract) -> &Contract {
    match c {
        Contract::Complement(inner) => match &**inner {
            Contract::Complement(base) => collapse(base),
            _ => c,
        },
        _ => c,
    }
}

/// `union` (with branches `first`, `second`) relative to `other`.
///
/// The union accepts `other` if some branch does (for a union `other`, if
/// it accepts every branch of `other`); it fits inside `other` only if
/// every branch does.
fn union_relationship(
    union: &Contract,
    first: &Contract,
    second: &Contract,
    other: &Contract,
) -> Relationship {
    let accepts = match other {
        Contract::Union(o1, o2) => {
            relationship(union, o1).accepts() && relationship(union, o2).accepts()
        }
        _ => relationship(first, other).accepts() || relationship(second, other).accepts(),
    };
    let fits = relationship(first, other).fits() && relationship(second, other).fits();

    match (accepts, fits) {
        (true, true) => Relationship::Equal,
        (true, false) => Relationship::Superset,
        (false, true) => Relationship::Subset,
        (false, false) => Relationship::Unrelated,
    }
}

/// `~base` relative to a non-complement `other`.
///
/// The complement inverts its operand's comparison against the same
/// target: whatever is unrelated to `base` lies in its complement, and
/// whatever overlaps `base` does not.
fn complement_relationship(base: &Contract, other: &Contract) -> Relationship {
    match relationship(base, other) {
        Relationship::Unrelated => Relationship::Superset,
        _ => Relationship::Unrelated,
    }
}

fn vector_relationship(e1: &Contract, n1: usize, e2: &Contract, n2: usize) -> Relationship {
    match relationship(e1, e2) {
        Relationship::Equal => match n1.cmp(&n2) {
            std::cmp::Ordering::Equal => Relationship::Equal,
            // the longer vector is the more specific one
            std::cmp::Ordering::Greater => Relationship::Subset,
            std::cmp::Ordering::Less => Relationship::Superset,
        },
        Relationship::Subset if n1 >= n2 => Relationship::Subset,
        Relationship::Superset if n2 >= n1 => Relationship::Superset,
        _ => Relationship::Unrelated,
    }
}

fn signature_relationship(s: &Signature, t: &Signature) -> Relationship {
    if s.params.len() != t.params.len() || s.one_way != t.one_way {
        return Relationship::Unrelated;
    }
    let mut acc = Relationship::Equal;
    for (p, q) in s.params.iter().zip(&t.params) {
        acc = acc.combine(relationship(p, q));
        if acc == Relationship::Unrelated {
            break;
        }
    }
    acc
}

fn record_relationship(f: &[Field], g: &[Field]) -> Relationship {
    let left: Vec<Option<&str>> = f.iter().map(|field| field.name.as_deref()).collect();
    let right: Vec<Option<&str>> = g.iter().map(|field| field.name.as_deref()).collect();
    let pairing = pair_fields(&left, &right);

    let mut acc = Relationship::Equal;
    for &(i, j) in &pairing.pairs {
        acc = acc.combine(relationship(&f[i].contract, &g[j].contract));
        if acc == Relationship::Unrelated {
            return acc;
        }
    }

    match (pairing.unpaired_left > 0, pairing.unpaired_right > 0) {
        (true, true) => Relationship::Unrelated,
        // extra fields make the left record a structural refinement
        (true, false) => acc.combine(Relationship::Subset),
        (false, true) => acc.combine(Relationship::Superset),
        (false, false) => acc,
    }
}

/// Correspondence between the fields of two records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPairing {
    /// `(left index, right index)` pairs, in left order
    pub pairs: Vec<(usize, usize)>,
    /// Left fields with no counterpart
    pub unpaired_left: usize,
    /// Right fields with no counterpart
    pub unpaired_right: usize,
}

impl FieldPairing {
    /// Left index paired with the given right index
    pub fn left_for(&self, right: usize) -> Option<usize> {
        self.pairs.iter().find(|&&(_, j)| j == right).map(|&(i, _)| i)
    }
}

/// Pair record fields.
///
/// A name occurring on both sides pairs the k-th occurrence on the left with
/// the k-th on the right. Remaining fields pair by position when at least
/// one side of that position is unnamed. The rule is symmetric: swapping the
/// arguments swaps every pair.
pub fn pair_fields(left: &[Option<&str>], right: &[Option<&str>]) -> FieldPairing {
    let mut left_used = vec![false; left.len()];
    let mut right_used = vec![false; right.len()];
    let mut pairs = Vec::new();

    for (i, name) in left.iter().enumerate() {
        let Some(name) = name else { continue };
        let found = right
            .iter()
            .enumerate()
            .position(|(j, other)| !right_used[j] && *other == Some(*name));
        if let Some(j) = found {
            left_used[i] = true;
            right_used[j] = true;
            pairs.push((i, j));
        }
    }

    for i in 0..left.len().min(right.len()) {
        if left_used[i] || right_used[i] {
            continue;
        }
        if left[i].is_none() || right[i].is_none() {
            left_used[i] = true;
            right_used[i] = true;
            pairs.push((i, i));
        }
    }

    pairs.sort_unstable();
    FieldPairing {
        pairs,
        unpaired_left: left_used.iter().filter(|used| !**used).count(),
        unpaired_right: right_used.iter().filter(|used| !**used).count(),
    }
}
