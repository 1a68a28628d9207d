//! Pack rules normalize a shape so a later rule's pattern can see
//! straight through it.
//!
//! Folding a negated comparison into its direct counterpart, or an
//! absorbed operand out of a nested `And`/`Or`, both strictly decrease
//! complexity on their own and are registered as ordinary rules.
//! `sub_as_add_neg` is the one genuine non-decreasing pack rule here: it
//! doesn't shrink anything by itself, but rewriting `a - b` into
//! `a + (-b)` exposes an `Add` shape that a join rule (like `add_self`
//! or `add_neg_self`) can then collapse when `b` happens to already be
//! `a` or `-a`.

use crate::directive::Directive;
use crate::op::Op;
use crate::rules::{v, Rule};

pub(crate) fn rules() -> Vec<Rule> {
    let not = |op, lhs, rhs| Directive::unary(Op::Not, Directive::binary(op, lhs, rhs));
    vec![
        Rule::new("not_eq", not(Op::Eq, v(0), v(1)), Directive::binary(Op::Ne, v(0), v(1))),
        Rule::new("not_ne", not(Op::Ne, v(0), v(1)), Directive::binary(Op::Eq, v(0), v(1))),
        Rule::new("not_ltu", not(Op::LtU, v(0), v(1)), Directive::binary(Op::GeU, v(0), v(1))),
        Rule::new("not_lts", not(Op::LtS, v(0), v(1)), Directive::binary(Op::GeS, v(0), v(1))),
        Rule::new("not_leu", not(Op::LeU, v(0), v(1)), Directive::binary(Op::GtU, v(0), v(1))),
        Rule::new("not_les", not(Op::LeS, v(0), v(1)), Directive::binary(Op::GtS, v(0), v(1))),
        Rule::new("not_geu", not(Op::GeU, v(0), v(1)), Directive::binary(Op::LtU, v(0), v(1))),
        Rule::new("not_ges", not(Op::GeS, v(0), v(1)), Directive::binary(Op::LtS, v(0), v(1))),
        Rule::new("not_gtu", not(Op::GtU, v(0), v(1)), Directive::binary(Op::LeU, v(0), v(1))),
        Rule::new("not_gts", not(Op::GtS, v(0), v(1)), Directive::binary(Op::LeS, v(0), v(1))),
        // `(a & b) | a` and `a | (a & b)` both expose `a` as a bare leaf
        // on the outer op's other side; the matcher explores both
        // operand orderings of a commutative op, so one rule form each
        // covers both textual variants.
        Rule::new(
            "or_and_absorption",
            Directive::binary(Op::Or, Directive::binary(Op::And, v(0), v(1)), v(0)),
            v(0),
        ),
        Rule::new(
            "and_or_absorption",
            Directive::binary(Op::And, Directive::binary(Op::Or, v(0), v(1)), v(0)),
            v(0),
        ),
        Rule::non_decreasing(
            "sub_as_add_neg",
            Directive::binary(Op::Sub, v(0), v(1)),
            Directive::binary(Op::Add, v(0), Directive::unary(Op::Neg, v(1))),
        ),
    ]
}
