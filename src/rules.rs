//! The rule corpus: the static library of `(from, to)` directive pairs
//! that drives rewriting.
//!
//! Rules are grouped into families matching the ones the simplification
//! passes of most optimizing compilers converge on: universal algebraic
//! identities, boolean/comparison simplifications, "pack" rules that
//! normalize a shape so a later rule's pattern can see through it, and
//! "join" rules that fold syntactically-separate like terms back
//! together. `corpus()` concatenates all of them into the flat list the
//! simplifier pre-filters by signature.

use crate::bitvector::BitVector;
use crate::directive::{Directive, MatchingType};
use crate::signature::Signature;

pub mod boolean;
pub mod join;
pub mod pack;
pub mod universal;

/// One `(pattern, replacement)` rewrite rule.
pub struct Rule {
    /// Rule-author-facing name, used in logs and test failure messages.
    pub name: &'static str,
    /// The pattern matched against a candidate expression.
    pub from: Directive,
    /// The replacement translated under the match's bindings.
    pub to: Directive,
    /// The signature pre-filter derived from `from`.
    pub signature: Signature,
    /// Whether the driver should discard a translated replacement whose
    /// complexity does not strictly improve on the matched expression.
    /// `false` for rules that exist purely to expose a shape for a
    /// subsequent rule within the same translation (see `pack`).
    pub require_complexity_decrease: bool,
}

impl Rule {
    fn new(name: &'static str, from: Directive, to: Directive) -> Rule {
        let signature = from.signature();
        Rule { name, from, to, signature, require_complexity_decrease: true }
    }

    fn non_decreasing(name: &'static str, from: Directive, to: Directive) -> Rule {
        let signature = from.signature();
        Rule { name, from, to, signature, require_complexity_decrease: false }
    }
}

/// Shorthand for an any-constrained match variable at lookup slot `i`.
pub(crate) fn v(i: usize) -> Directive {
    Directive::var("x", i, MatchingType::Any)
}

/// Shorthand for a literal directive constant. The stored width is a
/// placeholder (see [`Directive::Const`]'s docs); only the value matters.
pub(crate) fn lit(value: u64) -> Directive {
    Directive::constant(BitVector::new(value, 64))
}

/// The full rule corpus, built once and shared by every [`crate::simplifier::Simplifier`].
pub fn corpus() -> &'static [Rule] {
    use std::sync::OnceLock;
    static CORPUS: OnceLock<Vec<Rule>> = OnceLock::new();
    CORPUS.get_or_init(|| {
        let mut rules = Vec::new();
        rules.extend(universal::rules());
        rules.extend(boolean::rules());
        rules.extend(pack::rules());
        rules.extend(join::rules());
        rules
    })
}
