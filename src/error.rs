//! Error types surfaced across expression construction and translation.
//!
//! Failures inside rule application are recoverable control flow (the
//! driver just tries the next rule) and never reach these types; see
//! `simplifier.rs`. These variants are for the few things that are
//! genuinely fatal to the caller: malformed construction requests.

use thiserror::Error;

/// Errors raised while building or resizing an [`crate::expr::Expr`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `width` was not in `1..=64`.
    #[error("bit-vector width {0} out of range (expected 1..=64)")]
    InvalidWidth(u32),
    /// The two operands of a non-shift, non-cast binary operator had
    /// different widths.
    #[error("operand width mismatch: lhs is {lhs} bits, rhs is {rhs} bits")]
    WidthMismatch {
        /// Left-hand operand width.
        lhs: u32,
        /// Right-hand operand width.
        rhs: u32,
    },
    /// A construction would exceed the configured maximum expression depth.
    #[error("expression depth {depth} exceeds the configured maximum {max}")]
    DepthExceeded {
        /// Depth the new node would have.
        depth: u32,
        /// Configured maximum.
        max: u32,
    },
}
