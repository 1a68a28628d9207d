//! A directive-driven rewrite simplifier for fixed-width bit-vector
//! expressions.
//!
//! Build an [`Expr`] with the `build_*` constructors in [`expr`], then
//! call [`Simplifier::simplify`] to reduce it to a fixed point under the
//! static rule corpus in [`rules`]. Rules are authored as [`Directive`]
//! pattern/replacement pairs, matched against candidate expressions by
//! [`matcher::match_pattern`] and pre-filtered in O(1) by
//! [`signature::Signature`].
//!
//! ```
//! use bv_rewrite::{expr, ident::VarId, simplifier::Simplifier};
//!
//! let x = expr::build_variable(VarId::name("x"), 32).unwrap();
//! let zero = expr::build_constant(0, 32).unwrap();
//! let add = expr::build_expression(bv_rewrite::op::Op::Add, x.clone(), zero).unwrap();
//!
//! let simplifier = Simplifier::default();
//! let simplified = simplifier.simplify(&add);
//! assert!(simplified.struct_eq(&x));
//! ```

#![warn(missing_docs)]

pub mod bitvector;
pub mod directive;
pub mod error;
pub mod expr;
mod fx;
pub mod ident;
pub mod matcher;
pub mod op;
pub mod rules;
pub mod signature;
pub mod simplifier;
pub mod symbol_table;
pub mod translator;

pub use bitvector::BitVector;
pub use directive::Directive;
pub use error::Error;
pub use expr::Expr;
pub use ident::VarId;
pub use op::Op;
pub use simplifier::Simplifier;
