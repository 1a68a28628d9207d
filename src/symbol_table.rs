//! Match-variable bindings produced during one match attempt.
//!
//! A [`SymbolTable`] is a small fixed-capacity array, cheap to clone,
//! since the matcher clones the current table every time it needs to
//! explore a second branch (the two operand orderings of a commutative
//! operator). Capacity is generous relative to any rule actually
//! authored; see [`CAPACITY`].

use crate::directive::MatchingType;
use crate::expr::Expr;

/// Dense capacity of match-variable slots per attempt. The spec requires
/// at least 12; rules in this corpus never use more than a handful, so a
/// flat array beats a hash map here.
pub const CAPACITY: usize = 16;

/// A single match attempt's variable bindings.
#[derive(Clone)]
pub struct SymbolTable {
    slots: [Option<Expr>; CAPACITY],
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    /// An empty table, the seed the matcher starts every attempt from.
    pub fn new() -> Self {
        SymbolTable { slots: core::array::from_fn(|_| None) }
    }

    /// Attempts to bind slot `index` to `expr` under `constraint`.
    /// Succeeds if the slot is empty and `expr` satisfies the
    /// constraint, or if it is already bound to a structurally-identical
    /// expression.
    pub fn bind(&mut self, index: usize, expr: &Expr, constraint: MatchingType) -> bool {
        match &self.slots[index] {
            Some(existing) => existing.struct_eq(expr),
            None => {
                let ok = constraint.accepts(
                    expr.is_var(),
                    expr.is_const(),
                    expr.is_op(),
                    expr.unknown_mask() != 0,
                );
                if ok {
                    self.slots[index] = Some(expr.clone());
                }
                ok
            }
        }
    }

    /// The expression bound to `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Expr> {
        self.slots[index].as_ref()
    }
}
