//! Translates a matched directive back into an expression.
//!
//! Given the [`SymbolTable`] a successful match produced, [`translate`]
//! walks the rule's `to` directive and builds the replacement
//! [`Expr`]. Meta-operators (`Simplify`, `OrAlso`, ...) are evaluated
//! here rather than in the matcher, since they only ever make sense on
//! the replacement side of a rule.

use crate::directive::{Directive, DirectiveOp, MetaOp};
use crate::error::Error;
use crate::expr::{self, Expr};
use crate::op::Op;
use crate::simplifier::{Simplifier, SimplifierState};
use crate::symbol_table::SymbolTable;

/// Why a translation attempt failed. Always recoverable: the caller (the
/// simplifier driver) just moves on to the next rule.
#[derive(Debug, Clone)]
pub enum Failure {
    /// A match variable had no binding in the symbol table.
    UnboundVar(String),
    /// The `Unreachable` meta-directive was reached: a rule author's
    /// assertion that this shape should never arise.
    Unreachable,
    /// A nested `simplify` call exceeded the join-depth limit.
    JoinDepthExceeded,
    /// The condition of an `Iff` did not simplify to a known boolean.
    IffUndetermined,
    /// The condition of an `Iff` simplified to `false`.
    IffFalse,
    /// Expression construction failed (width mismatch, depth exceeded, ...).
    Construction(Error),
    /// A cast/unsigned-cast directive's rhs did not translate to a constant.
    CastTargetNotConstant,
    /// Both branches of an `OrAlso` failed.
    BothFailed,
}

impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Failure::Construction(e)
    }
}

/// Translates `directive` under bindings `symtab` into an expression,
/// evaluating any meta-operators it contains. `target_width` is used by
/// bare directive-constant leaves with no inherent width context.
pub fn translate(
    simplifier: &Simplifier,
    state: &mut SimplifierState,
    directive: &Directive,
    symtab: &SymbolTable,
    target_width: u32,
) -> Result<Expr, Failure> {
    match directive {
        Directive::MatchVar { name, lookup_index, .. } => symtab
            .get(*lookup_index)
            .cloned()
            .ok_or_else(|| Failure::UnboundVar(name.to_string())),
        // A directive constant carries its own width from rule authoring;
        // it's normalized to the call site's target width if that
        // differs (e.g. a `0` literal reused across rule instantiations
        // at different widths).
        Directive::Const(v) => Ok(expr::build_constant(v.value(), target_width)?),
        Directive::AllOnes => Ok(expr::build_constant(crate::bitvector::mask(target_width), target_width)?),
        Directive::Op { op: DirectiveOp::Meta(meta), lhs, rhs, .. } => {
            translate_meta(simplifier, state, *meta, lhs.as_deref(), rhs, symtab, target_width)
        }
        Directive::Op { op: DirectiveOp::Ordinary(op), lhs, rhs, .. } => {
            translate_ordinary(simplifier, state, *op, lhs.as_deref(), rhs, symtab, target_width)
        }
    }
}

fn translate_ordinary(
    simplifier: &Simplifier,
    state: &mut SimplifierState,
    op: Op,
    lhs: Option<&Directive>,
    rhs: &Directive,
    symtab: &SymbolTable,
    target_width: u32,
) -> Result<Expr, Failure> {
    match lhs {
        None => {
            let operand = translate(simplifier, state, rhs, symtab, target_width)?;
            Ok(expr::build_unary(op, operand)?)
        }
        Some(lhs_dir) if matches!(op, Op::Cast | Op::UCast) => {
            let operand = translate(simplifier, state, lhs_dir, symtab, target_width)?;
            let target = translate(simplifier, state, rhs, symtab, target_width)?;
            let width_const = target.as_const().ok_or(Failure::CastTargetNotConstant)?;
            Ok(expr::resize(&operand, width_const.value() as u32, op == Op::Cast)?)
        }
        Some(lhs_dir) => {
            // Translate in descending-priority order so a likely-to-fail
            // operand is attempted before one that does real work.
            let (first, second, first_is_lhs) = if lhs_dir.priority() >= rhs.priority() {
                (lhs_dir, rhs, true)
            } else {
                (rhs, lhs_dir, false)
            };
            let first_expr = translate(simplifier, state, first, symtab, target_width)?;
            let second_expr = translate(simplifier, state, second, symtab, first_expr.width())?;
            let (l, r) = if first_is_lhs { (first_expr, second_expr) } else { (second_expr, first_expr) };
            Ok(expr::build_expression(op, l, r)?)
        }
    }
}

fn translate_meta(
    simplifier: &Simplifier,
    state: &mut SimplifierState,
    meta: MetaOp,
    lhs: Option<&Directive>,
    rhs: &Directive,
    symtab: &SymbolTable,
    target_width: u32,
) -> Result<Expr, Failure> {
    match meta {
        MetaOp::Simplify => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            if x.simplify_hint() {
                return Ok(x);
            }
            simplifier.simplify_nested(state, &x).ok_or(Failure::JoinDepthExceeded)
        }
        MetaOp::TrySimplify => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            if x.simplify_hint() {
                return Ok(x);
            }
            Ok(simplifier.simplify_nested(state, &x).unwrap_or(x))
        }
        MetaOp::OrAlso => {
            let a = lhs.expect("OrAlso has two operands");
            match translate(simplifier, state, a, symtab, target_width) {
                Ok(v) => Ok(v),
                Err(_) => translate(simplifier, state, rhs, symtab, target_width).map_err(|_| Failure::BothFailed),
            }
        }
        MetaOp::Iff => {
            let cond_dir = lhs.expect("Iff has two operands");
            // The condition has no inherent width of its own (it's
            // typically a bare directive constant like `1`); it inherits
            // the surrounding translation's target width rather than
            // being pinned to a boolean's width 1.
            let cond = translate(simplifier, state, cond_dir, symtab, target_width)?;
            let cond = simplifier.simplify_nested(state, &cond).ok_or(Failure::JoinDepthExceeded)?;
            match cond.as_const() {
                Some(c) if !c.is_zero() => translate(simplifier, state, rhs, symtab, target_width),
                Some(_) => Err(Failure::IffFalse),
                None => Err(Failure::IffUndetermined),
            }
        }
        MetaOp::MaskUnknown => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            Ok(expr::build_constant(x.unknown_mask(), x.width())?)
        }
        MetaOp::MaskOne => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            Ok(expr::build_constant(x.known_one(), x.width())?)
        }
        MetaOp::MaskZero => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            Ok(expr::build_constant(x.known_zero(), x.width())?)
        }
        MetaOp::Unreachable => Err(Failure::Unreachable),
        MetaOp::Warning => {
            let x = translate(simplifier, state, rhs, symtab, target_width)?;
            log::warn!("rule translation hit a `Warning` directive: {x:?}");
            Ok(x)
        }
    }
}
