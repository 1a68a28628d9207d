//! The backtracking pattern matcher.
//!
//! `match_directive` walks a [`Directive`] pattern against an
//! [`Expr`] target, threading a set of candidate [`SymbolTable`]s
//! through the recursion. Commutative binary operators fork the set by
//! cloning each surviving table and exploring both operand pairings;
//! every other node shape narrows the set in place. The result is the
//! (possibly empty) set of tables under which the pattern matches.

use crate::directive::{Directive, DirectiveOp};
use crate::expr::Expr;
use crate::op::Op;
use crate::symbol_table::SymbolTable;

/// Matches `pattern` against `target`, starting from one empty table.
/// Meta-operator nodes have no matching semantics (they only appear on
/// the `to` side of a rule) and are rejected defensively.
pub fn match_pattern(pattern: &Directive, target: &Expr) -> Vec<SymbolTable> {
    match_all(pattern, target, vec![SymbolTable::new()])
}

fn match_all(pattern: &Directive, target: &Expr, tables: Vec<SymbolTable>) -> Vec<SymbolTable> {
    if tables.is_empty() {
        return tables;
    }
    match pattern {
        Directive::Const(v) => tables
            .into_iter()
            .filter(|_| target.is_const() && target.known_one() == v.value() & crate::bitvector::mask(target.width()))
            .collect(),
        Directive::AllOnes => tables
            .into_iter()
            .filter(|_| target.is_const() && target.known_one() == crate::bitvector::mask(target.width()))
            .collect(),
        Directive::MatchVar { lookup_index, constraint, .. } => tables
            .into_iter()
            .filter_map(|mut t| t.bind(*lookup_index, target, *constraint).then_some(t))
            .collect(),
        Directive::Op { op: DirectiveOp::Meta(_), .. } => Vec::new(),
        Directive::Op { op: DirectiveOp::Ordinary(op), lhs, rhs, .. } => {
            match_op(*op, lhs.as_deref(), rhs, target, tables)
        }
    }
}

fn match_op(
    op: Op,
    lhs: Option<&Directive>,
    rhs: &Directive,
    target: &Expr,
    tables: Vec<SymbolTable>,
) -> Vec<SymbolTable> {
    let Some(target_op) = target.op() else { return Vec::new() };
    if target_op != op {
        return Vec::new();
    }
    match lhs {
        None => {
            let Some(operand) = target.unary_operand() else { return Vec::new() };
            match_all(rhs, operand, tables)
        }
        Some(lhs_pat) => {
            let Some((t_lhs, t_rhs)) = target.binary_operands() else { return Vec::new() };
            if !op.is_commutative() {
                let tables = match_all(lhs_pat, t_lhs, tables);
                match_all(rhs, t_rhs, tables)
            } else {
                // Explore both operand pairings; clone the incoming set
                // before taking the second branch so each branch starts
                // from the same candidate tables.
                let straight = {
                    let tables = match_all(lhs_pat, t_lhs, tables.clone());
                    match_all(rhs, t_rhs, tables)
                };
                let swapped = {
                    let tables = match_all(lhs_pat, t_rhs, tables);
                    match_all(rhs, t_lhs, tables)
                };
                straight.into_iter().chain(swapped).collect()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directive::{Directive, MatchingType};
    use crate::expr;
    use crate::ident::VarId;

    #[test]
    fn commutative_operator_matches_both_operand_orderings() {
        let x = expr::build_variable(VarId::name("x"), 8).unwrap();
        let zero = expr::build_constant(0, 8).unwrap();
        let lhs_zero = expr::build_expression(Op::Add, zero.clone(), x.clone()).unwrap();
        let rhs_zero = expr::build_expression(Op::Add, x, zero).unwrap();

        let pattern = Directive::binary(
            Op::Add,
            Directive::var("x", 0, MatchingType::Any),
            Directive::constant(crate::bitvector::BitVector::new(0, 8)),
        );

        // `build_expression` already folds `x + 0` eagerly only when both
        // sides are constant, so these stay as real `Add` nodes to match.
        assert_eq!(match_pattern(&pattern, &lhs_zero).len(), 1);
        assert_eq!(match_pattern(&pattern, &rhs_zero).len(), 1);
    }

    #[test]
    fn non_commutative_operator_does_not_match_swapped_operands() {
        let x = expr::build_variable(VarId::name("x"), 8).unwrap();
        let one = expr::build_constant(1, 8).unwrap();
        let sub = expr::build_expression(Op::Sub, x, one.clone()).unwrap();

        let pattern = Directive::binary(
            Op::Sub,
            Directive::constant(crate::bitvector::BitVector::new(1, 8)),
            Directive::var("x", 0, MatchingType::Any),
        );
        assert!(match_pattern(&pattern, &sub).is_empty());
        let _ = one;
    }

    #[test]
    fn constant_constraint_rejects_a_variable() {
        let x = expr::build_variable(VarId::name("x"), 8).unwrap();
        let pattern = Directive::var("c", 0, MatchingType::Constant);
        assert!(match_pattern(&pattern, &x).is_empty());
    }

    #[test]
    fn constant_constraint_accepts_a_constant() {
        let c = expr::build_constant(42, 8).unwrap();
        let pattern = Directive::var("c", 0, MatchingType::Constant);
        let tables = match_pattern(&pattern, &c);
        assert_eq!(tables.len(), 1);
        assert!(tables[0].get(0).unwrap().struct_eq(&c));
    }

    #[test]
    fn repeated_match_variable_requires_structural_equality() {
        let x = expr::build_variable(VarId::name("x"), 8).unwrap();
        let y = expr::build_variable(VarId::name("y"), 8).unwrap();
        let xor_same = expr::build_expression(Op::Xor, x.clone(), x.clone()).unwrap();
        let xor_diff = expr::build_expression(Op::Xor, x, y).unwrap();

        let v0 = Directive::var("v", 0, MatchingType::Any);
        let pattern = Directive::binary(Op::Xor, v0.clone(), v0);
        // `Xor` is commutative, so both operand orderings succeed and
        // both produce the same binding -- the matcher doesn't dedupe.
        assert!(!match_pattern(&pattern, &xor_same).is_empty());
        assert!(match_pattern(&pattern, &xor_diff).is_empty());
    }
}
