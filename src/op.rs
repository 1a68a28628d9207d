//! The closed operator enumeration and its evaluators.
//!
//! Every operator Cranelift-style IRs would split across a handful of
//! generated opcode tables is, here, a single closed `enum` plus a static
//! table of metadata -- arity, commutativity, associativity, and the two
//! evaluators (`eval` over constants, `eval_bits` over known-bit lattices).
//! See `cost.rs` in the egraph optimizer for the analogous
//! match-on-opcode-return-a-number shape this is modeled on.

use crate::bitvector::{BitVector, KnownBits};
use core::cmp::Ordering;

/// An operator drawn from the closed set the simplifier understands.
///
/// `Pair` is not user-facing: it is the glue node used to encode the third
/// operand of a ternary operator (`If`, `BitSelect`) as the right-hand
/// child of a binary expression node, since the expression tree has no
/// ternary node shape (see `DESIGN.md` for why).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum Op {
    // Unary
    Not,
    Neg,
    Cast,
    UCast,
    Popcnt,
    Lzcnt,
    // Binary bitwise
    And,
    Or,
    Xor,
    // Binary arithmetic
    Add,
    Sub,
    MulU,
    MulS,
    DivU,
    DivS,
    ModU,
    ModS,
    // Shifts / rotates
    Lshl,
    Lshr,
    Ashr,
    Rol,
    Ror,
    // Comparisons
    LtU,
    LtS,
    LeU,
    LeS,
    Eq,
    Ne,
    GeU,
    GeS,
    GtU,
    GtS,
    // Min/Max
    MaxU,
    MaxS,
    MinU,
    MinS,
    // Ternary (via `Pair` rhs)
    If,
    BitSelect,
    // Glue
    Pair,
}

/// Arity of an operator: how many `Expression` children it has. Ternary
/// operators report arity 2, the third logical operand living inside the
/// `Pair` glue node on the rhs -- see [`Op`]'s docs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
    /// One `Expression` child.
    Unary,
    /// Two `Expression` children.
    Binary,
}

impl Op {
    /// Node arity as stored in the expression tree.
    pub fn arity(&self) -> Arity {
        match self {
            Op::Not | Op::Neg | Op::Popcnt | Op::Lzcnt => Arity::Unary,
            // Cast/UCast are binary: lhs is the operand, rhs is a constant
            // naming the target width (see `expr::resize`).
            _ => Arity::Binary,
        }
    }

    /// `true` if swapping the two operands of a binary op yields an
    /// equal-valued expression.
    pub fn is_commutative(&self) -> bool {
        matches!(
            self,
            Op::And | Op::Or | Op::Xor | Op::Add | Op::MulU | Op::MulS | Op::Eq | Op::Ne
                | Op::MaxU | Op::MaxS | Op::MinU | Op::MinS
        )
    }

    /// `true` if repeated application can be flattened/reordered freely,
    /// i.e. `(a op b) op c == a op (b op c)`.
    pub fn is_associative(&self) -> bool {
        matches!(self, Op::And | Op::Or | Op::Xor | Op::Add | Op::MulU | Op::MulS)
    }

    /// Relative weight contributed to `complexity` beyond the sum of a
    /// node's children. Heavier operators bias the simplifier away from
    /// introducing them unless they remove more structure than they add.
    pub fn weight(&self) -> u32 {
        match self {
            Op::Not | Op::Neg | Op::And | Op::Or | Op::Xor | Op::Add | Op::Sub => 1,
            Op::Cast | Op::UCast | Op::Eq | Op::Ne => 1,
            Op::LtU | Op::LtS | Op::LeU | Op::LeS | Op::GeU | Op::GeS | Op::GtU | Op::GtS => 1,
            Op::Lshl | Op::Lshr | Op::Ashr | Op::Rol | Op::Ror => 1,
            Op::MulU | Op::MulS => 3,
            Op::DivU | Op::DivS | Op::ModU | Op::ModS => 4,
            Op::Popcnt | Op::Lzcnt => 2,
            Op::MaxU | Op::MaxS | Op::MinU | Op::MinS => 2,
            Op::If => 2,
            Op::BitSelect => 3,
            Op::Pair => 0,
        }
    }

    /// Result width given operand widths, for the non-exceptional case
    /// where result width is inherited from the left-hand operand.
    /// Casts, comparisons and ternary operators are exceptions handled by
    /// the expression builder directly (see `expr.rs`).
    pub fn inherits_lhs_width(&self) -> bool {
        !matches!(self, Op::Cast | Op::UCast | Op::Eq | Op::Ne
            | Op::LtU | Op::LtS | Op::LeU | Op::LeS | Op::GeU | Op::GeS | Op::GtU | Op::GtS
            | Op::If | Op::BitSelect)
    }

    /// Evaluate a unary operator over a fully-known operand.
    pub fn eval_unary(&self, rhs: &BitVector, _result_width: u32) -> BitVector {
        match self {
            Op::Not => rhs.not(),
            Op::Neg => rhs.neg(),
            Op::Popcnt => rhs.popcnt(),
            Op::Lzcnt => rhs.lzcnt(),
            _ => unreachable!("{self:?} is not unary"),
        }
    }

    /// Evaluate a binary operator over fully-known operands. `rhs` for a
    /// ternary op is the already-evaluated `Pair` (see `Op::Pair`).
    pub fn eval_binary(&self, lhs: &BitVector, rhs: &BitVector, pair_rhs: Option<&BitVector>) -> BitVector {
        match self {
            Op::Cast => lhs.resize(rhs.value() as u32, true),
            Op::UCast => lhs.resize(rhs.value() as u32, false),
            Op::And => lhs.and(rhs),
            Op::Or => lhs.or(rhs),
            Op::Xor => lhs.xor(rhs),
            Op::Add => lhs.add(rhs),
            Op::Sub => lhs.sub(rhs),
            Op::MulU | Op::MulS => lhs.mul(rhs),
            Op::DivU => lhs.udiv(rhs),
            Op::DivS => lhs.sdiv(rhs),
            Op::ModU => lhs.urem(rhs),
            Op::ModS => lhs.srem(rhs),
            Op::Lshl => lhs.lshl(rhs),
            Op::Lshr => lhs.lshr(rhs),
            Op::Ashr => lhs.ashr(rhs),
            Op::Rol => lhs.rol(rhs),
            Op::Ror => lhs.ror(rhs),
            Op::LtU => BitVector::from_bool(lhs.cmp_unsigned(rhs) == Ordering::Less),
            Op::LtS => BitVector::from_bool(lhs.cmp_signed(rhs) == Ordering::Less),
            Op::LeU => BitVector::from_bool(lhs.cmp_unsigned(rhs) != Ordering::Greater),
            Op::LeS => BitVector::from_bool(lhs.cmp_signed(rhs) != Ordering::Greater),
            Op::Eq => BitVector::from_bool(lhs == rhs),
            Op::Ne => BitVector::from_bool(lhs != rhs),
            Op::GeU => BitVector::from_bool(lhs.cmp_unsigned(rhs) != Ordering::Less),
            Op::GeS => BitVector::from_bool(lhs.cmp_signed(rhs) != Ordering::Less),
            Op::GtU => BitVector::from_bool(lhs.cmp_unsigned(rhs) == Ordering::Greater),
            Op::GtS => BitVector::from_bool(lhs.cmp_signed(rhs) == Ordering::Greater),
            Op::MaxU => if lhs.cmp_unsigned(rhs) == Ordering::Less { *rhs } else { *lhs },
            Op::MaxS => if lhs.cmp_signed(rhs) == Ordering::Less { *rhs } else { *lhs },
            Op::MinU => if lhs.cmp_unsigned(rhs) == Ordering::Greater { *rhs } else { *lhs },
            Op::MinS => if lhs.cmp_signed(rhs) == Ordering::Greater { *rhs } else { *lhs },
            Op::If | Op::BitSelect => {
                let _ = pair_rhs;
                unreachable!("{self:?} is evaluated specially by the expression builder")
            }
            Op::Pair => unreachable!("Pair has no value of its own"),
            Op::Not | Op::Neg | Op::Popcnt | Op::Lzcnt => {
                unreachable!("{self:?} is not binary")
            }
        }
    }

    /// Forward known-bit propagation for a unary operator.
    pub fn eval_bits_unary(&self, rhs: KnownBits, result_width: u32) -> KnownBits {
        match self {
            Op::Not => KnownBits {
                known_one: rhs.known_zero & crate::bitvector::mask(rhs.width),
                known_zero: rhs.known_one & crate::bitvector::mask(rhs.width),
                width: rhs.width,
            },
            _ => KnownBits::unknown(result_width),
        }
    }

    /// Known-bit propagation through a cast/resize, shared by both the
    /// unary evaluator's callers and `eval_bits_binary`.
    pub fn eval_bits_cast(sign_extend: bool, rhs: KnownBits, result_width: u32) -> KnownBits {
        if result_width >= rhs.width {
            let hi = !crate::bitvector::mask(rhs.width) & crate::bitvector::mask(result_width);
            if !sign_extend {
                return KnownBits { known_one: rhs.known_one, known_zero: rhs.known_zero | hi, width: result_width };
            }
            let sign_mask = 1u64 << (rhs.width - 1);
            if rhs.known_one & sign_mask != 0 {
                KnownBits { known_one: rhs.known_one | hi, known_zero: rhs.known_zero, width: result_width }
            } else if rhs.known_zero & sign_mask != 0 {
                KnownBits { known_one: rhs.known_one, known_zero: rhs.known_zero | hi, width: result_width }
            } else {
                KnownBits { known_one: rhs.known_one, known_zero: rhs.known_zero, width: result_width }
            }
        } else {
            let m = crate::bitvector::mask(result_width);
            KnownBits { known_one: rhs.known_one & m, known_zero: rhs.known_zero & m, width: result_width }
        }
    }

    /// Forward known-bit propagation for a binary operator. Conservative
    /// (returns "nothing known") for operators where precise bit-level
    /// reasoning isn't worth the complexity -- soundness only requires
    /// under-approximation, never over-claiming.
    pub fn eval_bits_binary(&self, lhs: KnownBits, rhs: KnownBits, width: u32) -> KnownBits {
        match self {
            Op::Cast => Op::eval_bits_cast(true, lhs, width),
            Op::UCast => Op::eval_bits_cast(false, lhs, width),
            Op::And => KnownBits {
                known_one: lhs.known_one & rhs.known_one,
                known_zero: (lhs.known_zero | rhs.known_zero) & crate::bitvector::mask(width),
                width,
            },
            Op::Or => KnownBits {
                known_one: (lhs.known_one | rhs.known_one) & crate::bitvector::mask(width),
                known_zero: lhs.known_zero & rhs.known_zero,
                width,
            },
            Op::Xor => {
                let both_known = lhs.unknown_mask() == 0 && rhs.unknown_mask() == 0;
                if both_known {
                    let v = lhs.known_one ^ rhs.known_one;
                    KnownBits { known_one: v, known_zero: !v & crate::bitvector::mask(width), width }
                } else {
                    KnownBits::unknown(width)
                }
            }
            _ => KnownBits::unknown(width),
        }
    }
}
