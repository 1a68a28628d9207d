//! Structural fingerprints used to reject non-matches in O(1).
//!
//! A [`Signature`] packs three 64-bit lanes describing an expression's
//! (or directive's) shape and operator placement near the root. Matching
//! still has to walk the tree to be sure, but `can_match` lets the
//! simplifier skip that walk for the overwhelming majority of
//! rule/expression pairs that could never line up.

use crate::op::Op;

/// A compressed structural fingerprint: three 64-bit lanes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Signature(pub u64, pub u64, pub u64);

fn op_code(op: Op) -> u64 {
    // Stable small integer per operator, used only to spread signature
    // bits; must not be confused with any on-the-wire encoding.
    op as u64
}

impl Signature {
    /// Signature of a constant: the low 24 bytes of its value, which for
    /// our 64-bit-max values is just the whole payload in lane 0.
    pub fn of_const(value: u64) -> Signature {
        Signature(value, 0, 0)
    }

    /// Signature of a free variable: deliberately all-zero, since a
    /// pattern that needs to match "any expression here" must not
    /// require any particular bit of the candidate's signature.
    pub fn of_var() -> Signature {
        Signature(0, 0, 0)
    }

    /// Signature of a unary operator node, from its operand's signature.
    pub fn of_unary(op: Op, rhs: Signature) -> Signature {
        Signature(op_code(op) << 56, rhs.0, rhs.1)
    }

    /// Signature of a binary operator node, from both operands' signatures.
    ///
    /// This always packs `lhs` and `rhs` in the order given; for a
    /// commutative `op`, callers that need to test a candidate against a
    /// pattern regardless of operand order (the matcher itself explores
    /// both pairings, §4.3) must build the signature both ways and accept
    /// either -- see `can_match_commutative` in `simplifier.rs`. There is
    /// no operand order this function could canonicalize to on its own: a
    /// match variable's signature is the neutral all-zero placeholder
    /// ([`Signature::of_var`]) regardless of what it binds to, so sorting
    /// by signature value here would not agree between a rule's pattern
    /// and the candidate expression it matches.
    pub fn of_binary(op: Op, lhs: Signature, rhs: Signature) -> Signature {
        Signature(
            lhs.0 | (op_code(op) << 48),
            lhs.1 | (rhs.0 << 32),
            lhs.2 | (rhs.1 >> 32),
        )
    }

    /// `true` iff every bit `self` requires is present in `candidate`:
    /// a necessary (not sufficient) condition for a structural match.
    pub fn can_match(&self, candidate: &Signature) -> bool {
        (candidate.0 & self.0) == self.0
            && (candidate.1 & self.1) == self.1
            && (candidate.2 & self.2) == self.2
    }
}
