//! Join rules fold syntactically-separate like terms back together --
//! the complement of `pack`. These always strictly decrease complexity.

use crate::bitvector::BitVector;
use crate::directive::Directive;
use crate::op::Op;
use crate::rules::{lit, v, Rule};

pub(crate) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("add_neg_self", Directive::binary(Op::Add, v(0), Directive::unary(Op::Neg, v(0))), lit(0)),
        Rule::new("and_not_self", Directive::binary(Op::And, v(0), Directive::unary(Op::Not, v(0))), lit(0)),
        Rule::new(
            "or_not_self",
            Directive::binary(Op::Or, v(0), Directive::unary(Op::Not, v(0))),
            Directive::all_ones(),
        ),
        Rule::new(
            "xor_not_self",
            Directive::binary(Op::Xor, v(0), Directive::unary(Op::Not, v(0))),
            Directive::all_ones(),
        ),
        // `x + x` is exactly `x << 1`, and a shift by a known small
        // constant is cheaper than an add under the weights in `op.rs`.
        Rule::new("add_self", Directive::binary(Op::Add, v(0), v(0)), Directive::binary(Op::Lshl, v(0), lit(1))),
        // Same identity for the constant multiplier 2; `MulU` is weighted
        // heavier than a shift, so this is a strict decrease too.
        Rule::new(
            "mulu_two",
            Directive::binary(Op::MulU, v(0), Directive::constant(BitVector::new(2, 64))),
            Directive::binary(Op::Lshl, v(0), lit(1)),
        ),
    ]
}
