//! The directive IR: patterns and replacements that drive rewriting.
//!
//! A [`Directive`] mirrors the shape of [`crate::expr::Expr`] -- constant,
//! leaf, unary, binary -- but its leaves can be match variables carrying a
//! [`MatchingType`] constraint, and its internal nodes can carry a
//! [`MetaOp`] instead of an ordinary [`Op`]. One tree type serves both the
//! `from` (pattern) and `to` (replacement) half of a [`crate::rules::Rule`].

use crate::bitvector::BitVector;
use crate::op::Op;
use crate::signature::Signature;
use std::sync::Arc;

/// The constraint a match variable imposes on whatever expression it binds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MatchingType {
    /// Accepts any expression.
    Any,
    /// Must be a `Var` node.
    Variable,
    /// Must be a `Const` node.
    Constant,
    /// Must be a unary or binary operator node.
    Expression,
    /// Must have a nonzero unknown mask (not fully known).
    NonConstant,
    /// Must be a `Var` or `Const` node (not an operator).
    NonExpression,
}

impl MatchingType {
    /// `true` if `candidate` (by its shape bits) satisfies this constraint.
    /// Operator-ness and const-ness are cheap to check without touching
    /// the candidate's value; `NonConstant` additionally needs the
    /// known-bits lattice.
    pub fn accepts(&self, is_var: bool, is_const: bool, is_op: bool, unknown_mask_nonzero: bool) -> bool {
        match self {
            MatchingType::Any => true,
            MatchingType::Variable => is_var,
            MatchingType::Constant => is_const,
            MatchingType::Expression => is_op,
            MatchingType::NonConstant => unknown_mask_nonzero,
            MatchingType::NonExpression => is_var || is_const,
        }
    }
}

/// Meta-operators: directive-only nodes that control translation rather
/// than describing a value directly computed from children. See
/// `translator.rs` for their evaluation semantics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum MetaOp {
    Simplify,
    TrySimplify,
    OrAlso,
    Iff,
    MaskUnknown,
    MaskOne,
    MaskZero,
    Unreachable,
    Warning,
}

/// Either an ordinary operator or a meta-operator, attached to a directive
/// operator node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DirectiveOp {
    /// An ordinary [`Op`] from the expression operator table.
    Ordinary(Op),
    /// A translation-only [`MetaOp`].
    Meta(MetaOp),
}

/// A directive tree node: pattern-matchable on the `from` side of a rule,
/// or translated to an [`crate::expr::Expr`] on the `to` side.
#[derive(Clone)]
pub enum Directive {
    /// A match variable bound during matching and looked up during
    /// translation.
    MatchVar {
        /// Rule-author-facing name, used only for diagnostics.
        name: Arc<str>,
        /// Dense index into the symbol table; unique within one rule.
        lookup_index: usize,
        /// Constraint the bound expression must satisfy.
        constraint: MatchingType,
    },
    /// A directive-level constant, matched exactly (after width masking)
    /// and translated directly. Its stored width is irrelevant; only
    /// `value()` matters, since the same rule is reused at every target
    /// width (see [`Directive::AllOnes`] for the one constant whose
    /// *value* is itself width-dependent).
    Const(BitVector),
    /// The all-ones value of the target width -- i.e. `-1` in two's
    /// complement. Unlike `Const`, this can't be pre-computed once at
    /// rule-authoring time because its value depends on the width the
    /// rule is matched at.
    AllOnes,
    /// An operator node, ordinary or meta. `priority` controls the order
    /// operands are translated in (descending), so a translation likely
    /// to fail is tried first.
    Op {
        /// The operator, ordinary or meta.
        op: DirectiveOp,
        /// The left-hand operand, or `None` for a unary node.
        lhs: Option<Box<Directive>>,
        /// The right-hand (or, for a unary node, only) operand.
        rhs: Box<Directive>,
        /// Translation order relative to sibling operands (descending).
        priority: i32,
    },
}

impl Directive {
    /// A match-variable leaf.
    pub fn var(name: impl Into<Arc<str>>, lookup_index: usize, constraint: MatchingType) -> Directive {
        Directive::MatchVar { name: name.into(), lookup_index, constraint }
    }

    /// A constant leaf.
    pub fn constant(v: BitVector) -> Directive {
        Directive::Const(v)
    }

    /// The all-ones-of-target-width leaf.
    pub fn all_ones() -> Directive {
        Directive::AllOnes
    }

    /// A unary operator node.
    pub fn unary(op: Op, rhs: Directive) -> Directive {
        Directive::Op { op: DirectiveOp::Ordinary(op), lhs: None, rhs: Box::new(rhs), priority: 0 }
    }

    /// A binary operator node, with an explicit translation priority
    /// (higher runs first).
    pub fn binary_p(op: Op, lhs: Directive, rhs: Directive, priority: i32) -> Directive {
        Directive::Op { op: DirectiveOp::Ordinary(op), lhs: Some(Box::new(lhs)), rhs: Box::new(rhs), priority }
    }

    /// A binary operator node with default priority `0`.
    pub fn binary(op: Op, lhs: Directive, rhs: Directive) -> Directive {
        Self::binary_p(op, lhs, rhs, 0)
    }

    /// A meta-operator node taking one operand.
    pub fn meta1(meta: MetaOp, x: Directive) -> Directive {
        Directive::Op { op: DirectiveOp::Meta(meta), lhs: None, rhs: Box::new(x), priority: 0 }
    }

    /// A meta-operator node taking two operands.
    pub fn meta2(meta: MetaOp, a: Directive, b: Directive) -> Directive {
        Directive::Op { op: DirectiveOp::Meta(meta), lhs: Some(Box::new(a)), rhs: Box::new(b), priority: 0 }
    }

    /// This node's own translation priority: operands with higher
    /// priority are translated first when translating their parent's
    /// children, so a translation likely to fail runs before one that
    /// does real work. Leaves have no failure mode worth reordering
    /// around and report `0`.
    pub fn priority(&self) -> i32 {
        match self {
            Directive::Op { priority, .. } => *priority,
            _ => 0,
        }
    }

    /// Structural signature of this pattern, used for the rule-table
    /// pre-filter. Meta-operator nodes and match variables under `Any`
    /// contribute no required bits (they match anything), matching the
    /// "necessary, not sufficient" nature of `can_match`.
    pub fn signature(&self) -> Signature {
        match self {
            Directive::MatchVar { .. } => Signature::of_var(),
            Directive::Const(v) => Signature::of_const(v.value()),
            // Width-dependent value: can't contribute required bits
            // without knowing the candidate's width up front.
            Directive::AllOnes => Signature::of_var(),
            Directive::Op { op: DirectiveOp::Ordinary(op), lhs, rhs, .. } => match lhs {
                Some(lhs) => Signature::of_binary(*op, lhs.signature(), rhs.signature()),
                None => Signature::of_unary(*op, rhs.signature()),
            },
            // A meta-operator doesn't correspond to any candidate shape;
            // its signature must not constrain the candidate.
            Directive::Op { op: DirectiveOp::Meta(_), .. } => Signature::of_var(),
        }
    }
}
