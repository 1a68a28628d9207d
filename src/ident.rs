//! Variable identifiers.
//!
//! A [`VarId`] names a free variable in an expression. Callers building
//! expressions from two different front ends -- one that hands out
//! interned string names, one that hands out dense integer indices --
//! should be able to share a single `Expression` type, so `VarId` wraps
//! either behind one equality- and hash-comparable interface rather than
//! forcing a generic parameter through the whole IR.

use core::fmt;
use std::sync::Arc;

/// An opaque variable identifier, string- or integer-backed.
#[derive(Clone, Eq)]
pub enum VarId {
    /// A name-backed identifier (e.g. surface-syntax variables).
    Name(Arc<str>),
    /// An integer-backed identifier (e.g. dense SSA value numbers).
    Index(u64),
}

impl VarId {
    /// Builds a name-backed identifier.
    pub fn name(s: impl Into<Arc<str>>) -> Self {
        VarId::Name(s.into())
    }

    /// Builds an integer-backed identifier.
    pub fn index(i: u64) -> Self {
        VarId::Index(i)
    }
}

impl PartialEq for VarId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VarId::Name(a), VarId::Name(b)) => a == b,
            (VarId::Index(a), VarId::Index(b)) => a == b,
            _ => false,
        }
    }
}

impl std::hash::Hash for VarId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            VarId::Name(s) => s.hash(state),
            VarId::Index(i) => i.hash(state),
        }
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarId::Name(s) => write!(f, "{s}"),
            VarId::Index(i) => write!(f, "%{i}"),
        }
    }
}
