//! Identity elements, absorbing elements, and involutions -- the rules
//! that hold regardless of what the operands mean.

use crate::directive::Directive;
use crate::op::Op;
use crate::rules::{lit, v, Rule};

pub(crate) fn rules() -> Vec<Rule> {
    vec![
        Rule::new("add_zero", Directive::binary(Op::Add, v(0), lit(0)), v(0)),
        Rule::new("sub_zero", Directive::binary(Op::Sub, v(0), lit(0)), v(0)),
        Rule::new("sub_self", Directive::binary(Op::Sub, v(0), v(0)), lit(0)),
        Rule::new("mul_one", Directive::binary(Op::MulU, v(0), lit(1)), v(0)),
        Rule::new("mul_zero", Directive::binary(Op::MulU, v(0), lit(0)), lit(0)),
        Rule::new("and_self", Directive::binary(Op::And, v(0), v(0)), v(0)),
        Rule::new("or_self", Directive::binary(Op::Or, v(0), v(0)), v(0)),
        Rule::new("xor_self", Directive::binary(Op::Xor, v(0), v(0)), lit(0)),
        Rule::new("and_zero", Directive::binary(Op::And, v(0), lit(0)), lit(0)),
        Rule::new("and_all_ones", Directive::binary(Op::And, v(0), Directive::all_ones()), v(0)),
        Rule::new("or_all_ones", Directive::binary(Op::Or, v(0), Directive::all_ones()), Directive::all_ones()),
        Rule::new("or_zero", Directive::binary(Op::Or, v(0), lit(0)), v(0)),
        Rule::new("xor_zero", Directive::binary(Op::Xor, v(0), lit(0)), v(0)),
        Rule::new("xor_all_ones", Directive::binary(Op::Xor, v(0), Directive::all_ones()), Directive::unary(Op::Not, v(0))),
        Rule::new("not_not", Directive::unary(Op::Not, Directive::unary(Op::Not, v(0))), v(0)),
        Rule::new("neg_neg", Directive::unary(Op::Neg, Directive::unary(Op::Neg, v(0))), v(0)),
        Rule::new("divu_one", Directive::binary(Op::DivU, v(0), lit(1)), v(0)),
        Rule::new("divs_one", Directive::binary(Op::DivS, v(0), lit(1)), v(0)),
        Rule::new("lshl_zero", Directive::binary(Op::Lshl, v(0), lit(0)), v(0)),
        Rule::new("lshr_zero", Directive::binary(Op::Lshr, v(0), lit(0)), v(0)),
        Rule::new("ashr_zero", Directive::binary(Op::Ashr, v(0), lit(0)), v(0)),
        Rule::new("rol_zero", Directive::binary(Op::Rol, v(0), lit(0)), v(0)),
        Rule::new("ror_zero", Directive::binary(Op::Ror, v(0), lit(0)), v(0)),
        Rule::new("maxu_self", Directive::binary(Op::MaxU, v(0), v(0)), v(0)),
        Rule::new("maxs_self", Directive::binary(Op::MaxS, v(0), v(0)), v(0)),
        Rule::new("minu_self", Directive::binary(Op::MinU, v(0), v(0)), v(0)),
        Rule::new("mins_self", Directive::binary(Op::MinS, v(0), v(0)), v(0)),
    ]
}
