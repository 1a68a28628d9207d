//! Rules over comparisons and the `If` ternary.
//!
//! Constant-folding `If` on a literal condition happens for free at
//! construction time (see `expr::build_if`); the rules here cover the
//! cases that need a real match -- reflexive comparisons and an `If`
//! whose branches turn out to be the same expression.

use crate::directive::Directive;
use crate::op::Op;
use crate::rules::{lit, v, Rule};

pub(crate) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("eq_self", Directive::binary(Op::Eq, v(0), v(0)), lit(1)),
        Rule::new("ne_self", Directive::binary(Op::Ne, v(0), v(0)), lit(0)),
        Rule::new("ltu_self", Directive::binary(Op::LtU, v(0), v(0)), lit(0)),
        Rule::new("lts_self", Directive::binary(Op::LtS, v(0), v(0)), lit(0)),
        Rule::new("leu_self", Directive::binary(Op::LeU, v(0), v(0)), lit(1)),
        Rule::new("les_self", Directive::binary(Op::LeS, v(0), v(0)), lit(1)),
        Rule::new("geu_self", Directive::binary(Op::GeU, v(0), v(0)), lit(1)),
        Rule::new("ges_self", Directive::binary(Op::GeS, v(0), v(0)), lit(1)),
        Rule::new("gtu_self", Directive::binary(Op::GtU, v(0), v(0)), lit(0)),
        Rule::new("gts_self", Directive::binary(Op::GtS, v(0), v(0)), lit(0)),
        // `If(_, a, a)` -- both branches the same expression, regardless
        // of the (possibly side-effect-free, unevaluated) condition.
        Rule::new(
            "if_same_branches",
            Directive::binary(Op::If, v(0), Directive::binary(Op::Pair, v(1), v(1))),
            v(1),
        ),
    ]
}
