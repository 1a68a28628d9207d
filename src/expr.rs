//! The expression IR: an immutable, structurally-shared tree over
//! constants, variables, and unary/binary operators.
//!
//! Every node is reference-counted and memoises its derived fields
//! (`width`, `depth`, `complexity`, `known_one`/`known_zero`, `signature`,
//! `hash`) at construction time, so structural equality of two `Expr`s
//! implies identical derived fields without recomputing anything -- the
//! tree is built bottom-up and each constructor only ever looks at its
//! immediate children's already-memoised fields.

use crate::bitvector::{mask, BitVector, KnownBits};
use crate::error::Error;
use crate::ident::VarId;
use crate::op::{Arity, Op};
use crate::signature::Signature;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Default bound on expression depth; see `Simplifier`'s `max_depth`
/// config for how to override it for a given driver.
pub const DEFAULT_MAX_DEPTH: u32 = 1024;

/// A shared, immutable expression node.
///
/// Cheap to clone (bumps a refcount); structural equality and hashing are
/// defined over the full tree shape via the memoised `hash` field plus a
/// full recursive comparison on hash collision.
#[derive(Clone)]
pub struct Expr(pub(crate) Rc<ExprNode>);

pub(crate) struct ExprNode {
    pub(crate) kind: ExprKind,
    pub(crate) width: u32,
    pub(crate) depth: u32,
    pub(crate) complexity: u32,
    pub(crate) known: KnownBits,
    pub(crate) signature: Signature,
    pub(crate) hash: u64,
    /// Set once this exact node has been produced as a simplifier output;
    /// never set at construction time. See `simplifier.rs` step 1.
    pub(crate) simplify_hint: Cell<bool>,
}

pub(crate) enum ExprKind {
    Const(BitVector),
    Var(VarId),
    Unary(Op, Expr),
    Binary(Op, Expr, Expr),
}

impl Expr {
    /// Bit-width of the value this expression produces.
    pub fn width(&self) -> u32 {
        self.0.width
    }

    /// `0` for leaves, `1 + max(children depth)` otherwise.
    pub fn depth(&self) -> u32 {
        self.0.depth
    }

    /// Minimisation target: `0` for constants, `1` for variables,
    /// `1 + sum(children) + operator weight` for operators.
    pub fn complexity(&self) -> u32 {
        self.0.complexity
    }

    /// Per-bit ternary abstraction of this expression's value.
    pub fn known(&self) -> KnownBits {
        self.0.known
    }

    /// Bits provably `1`.
    pub fn known_one(&self) -> u64 {
        self.0.known.known_one
    }

    /// Bits provably `0`.
    pub fn known_zero(&self) -> u64 {
        self.0.known.known_zero
    }

    /// Bits about which nothing is known.
    pub fn unknown_mask(&self) -> u64 {
        self.0.known.unknown_mask()
    }

    /// Structural fingerprint used for the O(1) matcher pre-filter.
    pub fn signature(&self) -> Signature {
        self.0.signature
    }

    /// Structural content hash.
    pub fn struct_hash(&self) -> u64 {
        self.0.hash
    }

    /// Whether this node is already known-simplified (set only by the
    /// simplifier on its own outputs).
    pub fn simplify_hint(&self) -> bool {
        self.0.simplify_hint.get()
    }

    pub(crate) fn set_simplify_hint(&self) {
        self.0.simplify_hint.set(true);
    }

    /// `true` if this is a `Const` node.
    pub fn is_const(&self) -> bool {
        matches!(self.0.kind, ExprKind::Const(_))
    }

    /// `true` if this is a `Var` node.
    pub fn is_var(&self) -> bool {
        matches!(self.0.kind, ExprKind::Var(_))
    }

    /// `true` if this is a `Unary` or `Binary` node.
    pub fn is_op(&self) -> bool {
        matches!(self.0.kind, ExprKind::Unary(..) | ExprKind::Binary(..))
    }

    /// The constant value, if this is a `Const` node.
    pub fn as_const(&self) -> Option<BitVector> {
        match &self.0.kind {
            ExprKind::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// The variable identifier, if this is a `Var` node.
    pub fn as_var(&self) -> Option<&VarId> {
        match &self.0.kind {
            ExprKind::Var(id) => Some(id),
            _ => None,
        }
    }

    /// The operator, if this is an operator node.
    pub fn op(&self) -> Option<Op> {
        match &self.0.kind {
            ExprKind::Unary(op, _) => Some(*op),
            ExprKind::Binary(op, _, _) => Some(*op),
            _ => None,
        }
    }

    /// The single operand, if this is a `Unary` node.
    pub fn unary_operand(&self) -> Option<&Expr> {
        match &self.0.kind {
            ExprKind::Unary(_, rhs) => Some(rhs),
            _ => None,
        }
    }

    /// The operand pair, if this is a `Binary` node.
    pub fn binary_operands(&self) -> Option<(&Expr, &Expr)> {
        match &self.0.kind {
            ExprKind::Binary(_, lhs, rhs) => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// Structural equality: same shape, same operators, same variable
    /// identifiers, same constant values -- independent of which `Rc`
    /// allocation backs each side.
    pub fn struct_eq(&self, other: &Expr) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.0.hash != other.0.hash || self.0.width != other.0.width {
            return false;
        }
        match (&self.0.kind, &other.0.kind) {
            (ExprKind::Const(a), ExprKind::Const(b)) => a == b,
            (ExprKind::Var(a), ExprKind::Var(b)) => a == b,
            (ExprKind::Unary(oa, ra), ExprKind::Unary(ob, rb)) => oa == ob && ra.struct_eq(rb),
            (ExprKind::Binary(oa, la, ra), ExprKind::Binary(ob, lb, rb)) => {
                oa == ob && la.struct_eq(lb) && ra.struct_eq(rb)
            }
            _ => false,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.struct_eq(other)
    }
}
impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ExprKind::Const(v) => write!(f, "{v:?}"),
            ExprKind::Var(id) => write!(f, "{id:?}:i{}", self.0.width),
            ExprKind::Unary(op, rhs) => write!(f, "({op:?} {rhs:?})"),
            ExprKind::Binary(op, lhs, rhs) => write!(f, "({op:?} {lhs:?} {rhs:?})"),
        }
    }
}

fn hash_u64(mut x: u64) -> u64 {
    // Splitmix64 finalizer; fast, decent avalanche, no dependency needed
    // for what's purely an internal memo key.
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

fn mix(a: u64, b: u64) -> u64 {
    hash_u64(a ^ hash_u64(b).rotate_left(17))
}

/// Builds a constant expression.
pub fn build_constant(value: u64, width: u32) -> Result<Expr, Error> {
    if !(1..=64).contains(&width) {
        return Err(Error::InvalidWidth(width));
    }
    let v = BitVector::new(value, width);
    let hash = mix(0x9e37_79b9_7f4a_7c15, mix(v.value(), width as u64));
    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Const(v),
        width,
        depth: 0,
        complexity: 0,
        known: KnownBits::exact(&v),
        signature: Signature::of_const(v.value()),
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds a variable expression.
pub fn build_variable(id: VarId, width: u32) -> Result<Expr, Error> {
    if !(1..=64).contains(&width) {
        return Err(Error::InvalidWidth(width));
    }
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    std::hash::Hash::hash(&id, &mut hasher);
    let id_hash = std::hash::Hasher::finish(&hasher);
    let hash = mix(0x1234_5678_9abc_def0, mix(id_hash, width as u64));
    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Var(id),
        width,
        depth: 0,
        complexity: 1,
        known: KnownBits::unknown(width),
        signature: Signature::of_var(),
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds a unary-operator expression, bounded by [`DEFAULT_MAX_DEPTH`].
pub fn build_unary(op: Op, rhs: Expr) -> Result<Expr, Error> {
    build_unary_bounded(op, rhs, DEFAULT_MAX_DEPTH)
}

/// Like [`build_unary`] but with an explicit depth bound.
pub fn build_unary_bounded(op: Op, rhs: Expr, max_depth: u32) -> Result<Expr, Error> {
    assert_eq!(op.arity(), Arity::Unary, "{op:?} is not a unary operator");
    let depth = rhs.depth() + 1;
    if depth > max_depth {
        return Err(Error::DepthExceeded { depth, max: max_depth });
    }
    let width = rhs.width();
    let known = op.eval_bits_unary(rhs.known(), width);
    let complexity = 1 + rhs.complexity() + op.weight();
    let signature = Signature::of_unary(op, rhs.signature());
    let hash = mix(op as u64, rhs.struct_hash());

    // Constant-fold fully-known operands eagerly; this keeps `Const`
    // nodes canonical so the matcher's constant-pattern rule (`known_one`
    // comparison) never has to look through a redundant operator.
    if let Some(c) = rhs.as_const() {
        let v = op.eval_unary(&c, width);
        return build_constant(v.value(), width);
    }

    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Unary(op, rhs),
        width,
        depth,
        complexity,
        known,
        signature,
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds a binary-operator expression, bounded by [`DEFAULT_MAX_DEPTH`].
///
/// `op` must not be [`Op::If`] or [`Op::BitSelect`] -- use
/// [`build_if`]/[`build_bitselect`] for those, since they need to build
/// the `Pair` glue node.
pub fn build_expression(op: Op, lhs: Expr, rhs: Expr) -> Result<Expr, Error> {
    build_binary_bounded(op, lhs, rhs, DEFAULT_MAX_DEPTH)
}

/// Like [`build_expression`] but with an explicit depth bound.
pub fn build_binary_bounded(op: Op, lhs: Expr, rhs: Expr, max_depth: u32) -> Result<Expr, Error> {
    assert_eq!(op.arity(), Arity::Binary, "{op:?} is not a binary operator");
    assert!(!matches!(op, Op::If | Op::BitSelect), "use build_if/build_bitselect");

    let is_shift = matches!(op, Op::Lshl | Op::Lshr | Op::Ashr | Op::Rol | Op::Ror);
    let is_cast = matches!(op, Op::Cast | Op::UCast);
    if !is_shift && !is_cast && op != Op::Pair && lhs.width() != rhs.width() {
        return Err(Error::WidthMismatch { lhs: lhs.width(), rhs: rhs.width() });
    }

    let depth = lhs.depth().max(rhs.depth()) + 1;
    if depth > max_depth {
        return Err(Error::DepthExceeded { depth, max: max_depth });
    }

    let width = if matches!(op, Op::Eq | Op::Ne | Op::LtU | Op::LtS | Op::LeU | Op::LeS | Op::GeU | Op::GeS | Op::GtU | Op::GtS) {
        1
    } else if is_cast {
        rhs.as_const().map(|c| c.value() as u32).unwrap_or(lhs.width())
    } else {
        lhs.width()
    };

    if let (Some(a), Some(b)) = (lhs.as_const(), rhs.as_const()) {
        let v = op.eval_binary(&a, &b, None);
        return build_constant(v.value(), width);
    }

    let known = op.eval_bits_binary(lhs.known(), rhs.known(), width);
    let complexity = 1 + lhs.complexity() + rhs.complexity() + op.weight();
    let signature = Signature::of_binary(op, lhs.signature(), rhs.signature());
    let hash = mix(op as u64, mix(lhs.struct_hash(), rhs.struct_hash()));

    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Binary(op, lhs, rhs),
        width,
        depth,
        complexity,
        known,
        signature,
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds the glue node pairing a ternary operator's second and third
/// logical operands, requiring equal widths.
pub fn build_pair(a: Expr, b: Expr) -> Result<Expr, Error> {
    if a.width() != b.width() {
        return Err(Error::WidthMismatch { lhs: a.width(), rhs: b.width() });
    }
    let width = a.width();
    let depth = a.depth().max(b.depth()) + 1;
    let complexity = a.complexity() + b.complexity();
    let signature = Signature::of_binary(Op::Pair, a.signature(), b.signature());
    let hash = mix(Op::Pair as u64, mix(a.struct_hash(), b.struct_hash()));
    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Binary(Op::Pair, a, b),
        width,
        depth,
        complexity,
        known: KnownBits::unknown(width),
        signature,
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds `If(cond, then, else)`, encoded as `Binary(If, cond, Pair(then, else))`.
pub fn build_if(cond: Expr, then: Expr, els: Expr) -> Result<Expr, Error> {
    if cond.width() != 1 {
        return Err(Error::InvalidWidth(cond.width()));
    }
    if then.width() != els.width() {
        return Err(Error::WidthMismatch { lhs: then.width(), rhs: els.width() });
    }
    let width = then.width();
    if let Some(c) = cond.as_const() {
        return Ok(if c.is_zero() { els } else { then });
    }
    let pair = build_pair(then, els)?;
    let depth = cond.depth().max(pair.depth()) + 1;
    let complexity = 1 + cond.complexity() + pair.complexity() + Op::If.weight();
    let signature = Signature::of_binary(Op::If, cond.signature(), pair.signature());
    let hash = mix(Op::If as u64, mix(cond.struct_hash(), pair.struct_hash()));
    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Binary(Op::If, cond, pair),
        width,
        depth,
        complexity,
        known: KnownBits::unknown(width),
        signature,
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Builds `BitSelect(mask, a, b)`, encoded as `Binary(BitSelect, mask, Pair(a, b))`:
/// result bit `i` is `a`'s bit when `mask`'s bit `i` is set, else `b`'s.
pub fn build_bitselect(sel: Expr, a: Expr, b: Expr) -> Result<Expr, Error> {
    if sel.width() != a.width() || a.width() != b.width() {
        return Err(Error::WidthMismatch { lhs: sel.width(), rhs: a.width() });
    }
    let width = sel.width();
    if let (Some(m), Some(av), Some(bv)) = (sel.as_const(), a.as_const(), b.as_const()) {
        let v = (av.value() & m.value()) | (bv.value() & !m.value() & mask(width));
        return build_constant(v, width);
    }
    let pair = build_pair(a, b)?;
    let depth = sel.depth().max(pair.depth()) + 1;
    let complexity = 1 + sel.complexity() + pair.complexity() + Op::BitSelect.weight();
    let signature = Signature::of_binary(Op::BitSelect, sel.signature(), pair.signature());
    let hash = mix(Op::BitSelect as u64, mix(sel.struct_hash(), pair.struct_hash()));
    Ok(Expr(Rc::new(ExprNode {
        kind: ExprKind::Binary(Op::BitSelect, sel, pair),
        width,
        depth,
        complexity,
        known: KnownBits::unknown(width),
        signature,
        hash,
        simplify_hint: Cell::new(false),
    })))
}

/// Produces an equal-value expression at `new_width`, sign- or
/// zero-extending / truncating as needed.
pub fn resize(expr: &Expr, new_width: u32, sign_extend: bool) -> Result<Expr, Error> {
    if new_width == expr.width() {
        return Ok(expr.clone());
    }
    if let Some(c) = expr.as_const() {
        let v = c.resize(new_width, sign_extend);
        return build_constant(v.value(), new_width);
    }
    let width_const = build_constant(new_width as u64, 64)?;
    let op = if sign_extend { Op::Cast } else { Op::UCast };
    build_expression(op, expr.clone(), width_const)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ident::VarId;

    #[test]
    fn constants_fold_eagerly_under_a_unary_op() {
        let c = build_constant(5, 8).unwrap();
        let negated = build_unary(Op::Neg, c).unwrap();
        assert!(negated.is_const());
        assert_eq!(negated.as_const().unwrap().value(), (-5i8) as u8 as u64);
    }

    #[test]
    fn constants_fold_eagerly_under_a_binary_op() {
        let a = build_constant(3, 8).unwrap();
        let b = build_constant(4, 8).unwrap();
        let sum = build_expression(Op::Add, a, b).unwrap();
        assert!(sum.is_const());
        assert_eq!(sum.as_const().unwrap().value(), 7);
    }

    #[test]
    fn build_if_short_circuits_on_a_known_condition() {
        let then = build_variable(VarId::name("a"), 8).unwrap();
        let els = build_variable(VarId::name("b"), 8).unwrap();
        let true_cond = build_constant(1, 1).unwrap();
        let taken = build_if(true_cond, then.clone(), els.clone()).unwrap();
        assert!(taken.struct_eq(&then));

        let false_cond = build_constant(0, 1).unwrap();
        let not_taken = build_if(false_cond, then, els.clone()).unwrap();
        assert!(not_taken.struct_eq(&els));
    }

    #[test]
    fn build_if_with_unknown_condition_builds_an_if_node() {
        let cond = build_variable(VarId::name("c"), 1).unwrap();
        let then = build_constant(1, 8).unwrap();
        let els = build_constant(2, 8).unwrap();
        let e = build_if(cond, then, els).unwrap();
        assert_eq!(e.op(), Some(Op::If));
        assert_eq!(e.width(), 8);
    }

    #[test]
    fn build_bitselect_folds_when_all_operands_are_constant() {
        let sel = build_constant(0b1010, 4).unwrap();
        let a = build_constant(0b1111, 4).unwrap();
        let b = build_constant(0b0000, 4).unwrap();
        let e = build_bitselect(sel, a, b).unwrap();
        assert_eq!(e.as_const().unwrap().value(), 0b1010);
    }

    #[test]
    fn resize_is_a_no_op_at_the_same_width() {
        let v = build_variable(VarId::name("x"), 16).unwrap();
        let resized = resize(&v, 16, true).unwrap();
        assert!(resized.struct_eq(&v));
    }

    #[test]
    fn resize_up_then_down_round_trips_a_constant() {
        let v = build_constant(0x7f, 8).unwrap();
        let widened = resize(&v, 32, true).unwrap();
        let narrowed = resize(&widened, 8, true).unwrap();
        assert_eq!(narrowed.as_const().unwrap().value(), 0x7f);
    }

    #[test]
    fn structurally_equal_expressions_share_derived_fields() {
        let a = build_expression(
            Op::Add,
            build_variable(VarId::name("x"), 8).unwrap(),
            build_constant(1, 8).unwrap(),
        )
        .unwrap();
        let b = build_expression(
            Op::Add,
            build_variable(VarId::name("x"), 8).unwrap(),
            build_constant(1, 8).unwrap(),
        )
        .unwrap();
        assert!(a.struct_eq(&b));
        assert_eq!(a.struct_hash(), b.struct_hash());
        assert_eq!(a.complexity(), b.complexity());
    }

    #[test]
    fn width_mismatch_is_rejected_for_ordinary_binary_ops() {
        let a = build_variable(VarId::name("x"), 8).unwrap();
        let b = build_variable(VarId::name("y"), 16).unwrap();
        assert!(build_expression(Op::Add, a, b).is_err());
    }

    #[test]
    fn depth_bound_is_enforced() {
        let mut e = build_variable(VarId::name("x"), 8).unwrap();
        for i in 0..5 {
            match build_unary_bounded(Op::Not, e.clone(), 3) {
                Ok(next) => e = next,
                Err(err) => {
                    assert!(i >= 3);
                    assert!(matches!(err, Error::DepthExceeded { .. }));
                    return;
                }
            }
        }
        panic!("expected depth bound to be hit");
    }
}
