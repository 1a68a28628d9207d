//! The fixed-point simplifier driver.
//!
//! [`Simplifier::simplify`] walks an expression bottom-up, constant-folds
//! whatever the known-bits lattice already nails down, and then tries
//! every rule whose signature survives the [`crate::signature::Signature`]
//! pre-filter against the node. A rule that matches and whose replacement
//! strictly decreases complexity (or is explicitly exempted, see
//! [`crate::rules::Rule::require_complexity_decrease`]) wins; its
//! translation is recursively simplified to a fixed point before being
//! cached and returned. Per-thread state (the memo cache and the
//! join-depth counter) lives in a `thread_local!`, created lazily on first
//! use and dropped with the thread, mirroring the lifecycle of Cranelift's
//! per-compilation incremental-cache context.

use crate::directive::Directive;
use crate::error::Error;
use crate::expr::{self, Expr};
use crate::fx::FxHashMap;
use crate::matcher;
use crate::op::Op;
use crate::rules::{self, Rule};
use crate::signature::Signature;
use crate::translator;
use std::cell::RefCell;
use std::collections::VecDeque;

/// A predicate a [`Simplifier::try_transform`] candidate must pass,
/// alongside the matched expression it would replace. The rule corpus's
/// own "complexity strictly decreases" gate ([`complexity_decreases`]) is
/// the one named by the spec; callers may supply others.
pub type Filter<'a> = &'a dyn Fn(&Expr, &Expr) -> bool;

/// A ready-made [`Filter`]: rejects a candidate that doesn't strictly
/// lower complexity relative to the expression it would replace, the
/// same gate [`Rule::require_complexity_decrease`] applies to corpus rules.
pub fn complexity_decreases(expr: &Expr, candidate: &Expr) -> bool {
    candidate.complexity() < expr.complexity()
}

/// Tunables for a [`Simplifier`]. `Default` matches the values this corpus
/// has been tuned against; override for tests that want a tiny cache or a
/// shallower join-depth limit.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Memo cache entries kept before a pruning pass runs.
    pub cache_capacity: usize,
    /// Entries left in the cache immediately after a pruning pass. Kept
    /// below `cache_capacity` so pruning isn't triggered again on the
    /// very next insertion.
    pub prune_retain: usize,
    /// Maximum nesting of `simplify`-inside-a-rule-translation calls
    /// (triggered by the `Simplify`/`TrySimplify`/`Iff` meta-operators)
    /// before translation gives up on that rule.
    pub join_depth_limit: u32,
    /// Maximum expression tree depth a rebuilt node may reach.
    pub max_expr_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        let cache_capacity = 65_536;
        Config {
            cache_capacity,
            prune_retain: cache_capacity * 65 / 100,
            join_depth_limit: 20,
            max_expr_depth: expr::DEFAULT_MAX_DEPTH,
        }
    }
}

/// A memoised simplification result, keyed by the original expression's
/// structural identity.
#[derive(Clone)]
struct CacheEntry {
    result: Expr,
}

/// Counters for observability; cheap enough to keep unconditionally,
/// read via [`SimplifierState::stats`] (tests and `log::trace!` callers
/// read these to judge whether the pre-filter is earning its keep).
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    /// Nodes the driver visited, including cache hits.
    pub nodes_visited: u64,
    /// Memo cache hits.
    pub cache_hits: u64,
    /// Memo cache misses.
    pub cache_misses: u64,
    /// Rule translations accepted (won the lowest-complexity vote at some node).
    pub rules_applied: u64,
}

/// One worker's simplification state: the memo cache, its insertion
/// order (for FIFO pruning), the current join-depth, and running stats.
/// Lazily created per-thread and torn down when the thread exits; see
/// [`Simplifier::simplify`] and [`Simplifier::swap_state`].
#[derive(Default)]
pub struct SimplifierState {
    cache: FxHashMap<Expr, CacheEntry>,
    order: VecDeque<Expr>,
    join_depth: u32,
    stats: Stats,
}

impl SimplifierState {
    /// A fresh, empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observability counters accumulated so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Current memo cache size.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops all cached entries and resets counters, keeping the state
    /// object (and its allocation) alive.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
        self.join_depth = 0;
        self.stats = Stats::default();
    }
}

thread_local! {
    static STATE: RefCell<SimplifierState> = RefCell::new(SimplifierState::new());
}

/// Rebuilds an operator node from already-simplified children.
///
/// `Pair`, `If`, and `BitSelect` need special handling: a `Pair` is never
/// folded by the generic constant-folding path (it has no value of its
/// own, see [`Op::Pair`]), and `If`/`BitSelect` must be reconstructed
/// through [`expr::build_if`]/[`expr::build_bitselect`] -- not a plain
/// binary rebuild -- so a now-constant condition or selector still
/// short-circuits.
fn rebuild(op: Op, lhs: Expr, rhs: Expr, max_depth: u32) -> Result<Expr, Error> {
    match op {
        Op::Pair => expr::build_pair(lhs, rhs),
        Op::If => {
            let (then, els) = rhs.binary_operands().expect("an If node's rhs is always a Pair");
            expr::build_if(lhs, then.clone(), els.clone())
        }
        Op::BitSelect => {
            let (a, b) = rhs.binary_operands().expect("a BitSelect node's rhs is always a Pair");
            expr::build_bitselect(lhs, a.clone(), b.clone())
        }
        _ => expr::build_binary_bounded(op, lhs, rhs, max_depth),
    }
}

/// Whether `rule_signature`'s pre-filter could possibly admit `expr`.
///
/// Checking `rule_signature.can_match(&expr.signature())` alone misses a
/// commutative rule whose pattern happens to carry its constrained
/// operand on the opposite side from `expr`'s: the matcher (§4.3)
/// explores both operand pairings for a commutative op, but a single
/// [`Signature`] only reflects one concrete placement, and there is no
/// operand order `Signature::of_binary` could canonicalize to that both
/// a pattern and its candidate would agree on (see its doc comment). So a
/// commutative root op is also checked against the operand-swapped
/// signature before being rejected.
fn can_match_commutative(rule_signature: &Signature, expr: &Expr) -> bool {
    if rule_signature.can_match(&expr.signature()) {
        return true;
    }
    let Some(op) = expr.op().filter(|op| op.is_commutative()) else {
        return false;
    };
    let Some((lhs, rhs)) = expr.binary_operands() else {
        return false;
    };
    let swapped = Signature::of_binary(op, rhs.signature(), lhs.signature());
    rule_signature.can_match(&swapped)
}

/// The simplifier: an immutable rule corpus plus a [`Config`]. Cheap to
/// construct -- the corpus is a `'static` slice shared by every instance
/// -- so it's fine to build one per call site rather than threading a
/// singleton through the program.
pub struct Simplifier {
    config: Config,
    rules: &'static [Rule],
}

impl Default for Simplifier {
    fn default() -> Self {
        Simplifier::new(Config::default())
    }
}

impl Simplifier {
    /// Builds a simplifier over the static rule corpus with the given config.
    pub fn new(config: Config) -> Self {
        Simplifier { config, rules: rules::corpus() }
    }

    /// The config this simplifier was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Simplifies `expr` to a fixed point, using this thread's lazily
    /// created memo cache.
    pub fn simplify(&self, expr: &Expr) -> Expr {
        STATE.with(|cell| {
            let mut state = cell.borrow_mut();
            self.simplify_inner(&mut state, expr)
        })
    }

    /// Like [`Simplifier::simplify`] but callable from within a rule
    /// translation (the `Simplify`/`TrySimplify`/`Iff` meta-operators),
    /// bounded by [`Config::join_depth_limit`]. Returns `None` once the
    /// limit is hit, so the caller can fall back to an unsimplified
    /// operand or abandon the rule.
    pub fn simplify_nested(&self, state: &mut SimplifierState, expr: &Expr) -> Option<Expr> {
        if state.join_depth >= self.config.join_depth_limit {
            return None;
        }
        state.join_depth += 1;
        let result = self.simplify_inner(state, expr);
        state.join_depth -= 1;
        Some(result)
    }

    /// One-shot rewrite with a caller-supplied directive pair, for a rule
    /// not in the static corpus: matches `from` against `expr` (exploring
    /// both operand orderings when `expr`'s operator is commutative, same
    /// as a corpus rule), translates `to` under each surviving binding,
    /// and returns the lowest-complexity candidate whose width matches
    /// `expr`'s and that passes every filter in `filters` — or `None` if
    /// nothing survives matching, translation, or filtering.
    pub fn try_transform(
        &self,
        expr: &Expr,
        from: &Directive,
        to: &Directive,
        filters: &[Filter],
    ) -> Option<Expr> {
        STATE.with(|cell| {
            let mut state = cell.borrow_mut();
            let mut best: Option<Expr> = None;
            for table in matcher::match_pattern(from, expr) {
                let Ok(candidate) = translator::translate(self, &mut state, to, &table, expr.width()) else {
                    continue;
                };
                if candidate.width() != expr.width() {
                    continue;
                }
                if filters.iter().any(|filter| !filter(expr, &candidate)) {
                    continue;
                }
                let improves = best.as_ref().map_or(true, |b| candidate.complexity() < b.complexity());
                if improves {
                    best = Some(candidate);
                }
            }
            best
        })
    }

    /// Swaps in a fresh (or previously saved) per-thread state, returning
    /// whatever was installed before. Lets a long-running worker reset
    /// its cache between unrelated jobs, or a test isolate its cache
    /// from other tests on the same thread.
    pub fn swap_state(&self, new_state: SimplifierState) -> SimplifierState {
        STATE.with(|cell| std::mem::replace(&mut *cell.borrow_mut(), new_state))
    }

    fn simplify_inner(&self, state: &mut SimplifierState, expr: &Expr) -> Expr {
        state.stats.nodes_visited += 1;

        if expr.simplify_hint() {
            return expr.clone();
        }
        if let Some(entry) = state.cache.get(expr) {
            state.stats.cache_hits += 1;
            return entry.result.clone();
        }
        state.stats.cache_misses += 1;

        if !expr.is_const() {
            if let Some(c) = expr.known().as_const() {
                if let Ok(folded) = expr::build_constant(c.value(), c.width()) {
                    folded.set_simplify_hint();
                    self.cache_insert(state, expr.clone(), folded.clone());
                    return folded;
                }
            }
        }

        let rebuilt = self.simplify_children(state, expr);

        let result = match self.try_rules(state, &rebuilt) {
            // A non-decreasing ("pack") rule's translation can come back
            // worse if nothing downstream collapsed the shape it exposed
            // -- fall back to the rebuilt original rather than regress.
            Some(translated) => {
                let simplified = self.simplify_inner(state, &translated);
                if simplified.complexity() <= rebuilt.complexity() {
                    simplified
                } else {
                    rebuilt
                }
            }
            None => rebuilt,
        };
        result.set_simplify_hint();
        self.cache_insert(state, expr.clone(), result.clone());
        result
    }

    fn simplify_children(&self, state: &mut SimplifierState, expr: &Expr) -> Expr {
        if let Some(operand) = expr.unary_operand() {
            let op = expr.op().expect("a node with a unary operand has an operator");
            let new_operand = self.simplify_inner(state, operand);
            if new_operand.struct_eq(operand) {
                return expr.clone();
            }
            return expr::build_unary_bounded(op, new_operand, self.config.max_expr_depth).unwrap_or_else(|_| expr.clone());
        }
        if let Some((lhs, rhs)) = expr.binary_operands() {
            let op = expr.op().expect("a node with binary operands has an operator");
            let new_lhs = self.simplify_inner(state, lhs);
            let new_rhs = self.simplify_inner(state, rhs);
            if new_lhs.struct_eq(lhs) && new_rhs.struct_eq(rhs) {
                return expr.clone();
            }
            return rebuild(op, new_lhs, new_rhs, self.config.max_expr_depth).unwrap_or_else(|_| expr.clone());
        }
        expr.clone()
    }

    /// Tries every signature-compatible rule against `expr`, returning the
    /// lowest-complexity accepted translation, if any.
    fn try_rules(&self, state: &mut SimplifierState, expr: &Expr) -> Option<Expr> {
        if !expr.is_op() {
            return None;
        }
        let mut best: Option<Expr> = None;
        for rule in self.rules {
            if !can_match_commutative(&rule.signature, expr) {
                continue;
            }
            for table in matcher::match_pattern(&rule.from, expr) {
                let Ok(candidate) = translator::translate(self, state, &rule.to, &table, expr.width()) else {
                    continue;
                };
                if candidate.width() != expr.width() {
                    continue;
                }
                if rule.require_complexity_decrease && candidate.complexity() >= expr.complexity() {
                    continue;
                }
                log::trace!("rule `{}` matched, candidate complexity {}", rule.name, candidate.complexity());
                let improves = best.as_ref().map_or(true, |b| candidate.complexity() < b.complexity());
                if improves {
                    state.stats.rules_applied += 1;
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn cache_insert(&self, state: &mut SimplifierState, key: Expr, result: Expr) {
        if state.cache.insert(key.clone(), CacheEntry { result }).is_none() {
            state.order.push_back(key);
        }
        if state.cache.len() > self.config.cache_capacity {
            self.prune(state);
        }
    }

    fn prune(&self, state: &mut SimplifierState) {
        while state.cache.len() > self.config.prune_retain {
            let Some(oldest) = state.order.pop_front() else { break };
            state.cache.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr;
    use crate::ident::VarId;

    fn var(name: &str, width: u32) -> Expr {
        expr::build_variable(VarId::name(name), width).unwrap()
    }

    #[test]
    fn add_zero_simplifies_to_the_operand() {
        let simplifier = Simplifier::default();
        let x = var("x", 32);
        let e = expr::build_expression(Op::Add, x.clone(), expr::build_constant(0, 32).unwrap()).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&x));
    }

    #[test]
    fn sub_self_simplifies_to_zero() {
        let simplifier = Simplifier::default();
        let x = var("x", 16);
        let e = expr::build_expression(Op::Sub, x.clone(), x).unwrap();
        assert_eq!(simplifier.simplify(&e).as_const().unwrap().value(), 0);
    }

    #[test]
    fn double_not_cancels() {
        let simplifier = Simplifier::default();
        let x = var("x", 8);
        let e = expr::build_unary(Op::Not, expr::build_unary(Op::Not, x.clone()).unwrap()).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&x));
    }

    #[test]
    fn and_self_simplifies_to_the_operand() {
        let simplifier = Simplifier::default();
        let x = var("x", 8);
        let e = expr::build_expression(Op::And, x.clone(), x.clone()).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&x));
    }

    #[test]
    fn mulu_two_fires_regardless_of_which_side_carries_the_constant() {
        // `mulu_two`'s pattern is `MulU(v0, Const(2))`; a commutative op's
        // pre-filter signature must still admit the operand-swapped
        // candidate `MulU(Const(2), x)`, since the matcher itself explores
        // both pairings.
        let simplifier = Simplifier::default();
        let x = var("x", 32);
        let two = expr::build_constant(2, 32).unwrap();
        let expected = expr::build_expression(Op::Lshl, x.clone(), expr::build_constant(1, 32).unwrap()).unwrap();

        let const_on_rhs = expr::build_expression(Op::MulU, x.clone(), two.clone()).unwrap();
        assert!(simplifier.simplify(&const_on_rhs).struct_eq(&expected));

        let const_on_lhs = expr::build_expression(Op::MulU, two, x).unwrap();
        assert!(simplifier.simplify(&const_on_lhs).struct_eq(&expected));
    }

    #[test]
    fn mul_one_fires_when_the_other_operand_is_an_expression_not_a_bare_variable() {
        // `mul_one`'s pattern is `MulU(v0, Const(1))`; the pre-filter must
        // not assume the non-constant operand's own signature sorts
        // before or after the constant's -- a match variable's signature
        // is always the zero placeholder regardless of what it binds to.
        let simplifier = Simplifier::default();
        let x = var("x", 8);
        let neg_x = expr::build_unary(Op::Neg, x.clone()).unwrap();
        let one = expr::build_constant(1, 8).unwrap();
        let e = expr::build_expression(Op::MulU, neg_x.clone(), one).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&neg_x));
    }

    #[test]
    fn try_transform_applies_a_caller_supplied_rule_not_in_the_corpus() {
        // `x | x -> x` isn't in the corpus (the corpus only has the `And`
        // form, `and_self`); try_transform should still apply it as a
        // one-shot rewrite given the directive pair directly.
        let simplifier = Simplifier::default();
        let x = var("x", 16);
        let from = Directive::binary(Op::Or, crate::rules::v(0), crate::rules::v(0));
        let to = crate::rules::v(0);
        let e = expr::build_expression(Op::Or, x.clone(), x.clone()).unwrap();

        let result = simplifier.try_transform(&e, &from, &to, &[]);
        assert!(result.unwrap().struct_eq(&x));
    }

    #[test]
    fn try_transform_rejects_a_candidate_that_fails_a_filter() {
        let simplifier = Simplifier::default();
        let x = var("x", 16);
        let from = Directive::binary(Op::Or, crate::rules::v(0), crate::rules::v(0));
        let to = Directive::binary(Op::Or, crate::rules::v(0), crate::rules::v(0));
        let e = expr::build_expression(Op::Or, x.clone(), x).unwrap();

        // `to` just rebuilds the same shape, so complexity never strictly
        // decreases; the filter should reject every candidate.
        assert!(simplifier.try_transform(&e, &from, &to, &[&complexity_decreases]).is_none());
    }

    #[test]
    fn try_transform_returns_none_when_the_pattern_does_not_match() {
        let simplifier = Simplifier::default();
        let x = var("x", 16);
        let from = Directive::binary(Op::And, crate::rules::v(0), crate::rules::v(0));
        let to = crate::rules::v(0);
        let e = expr::build_expression(Op::Or, x.clone(), x).unwrap();
        assert!(simplifier.try_transform(&e, &from, &to, &[]).is_none());
    }

    #[test]
    fn constant_arithmetic_distributes_through_a_variable_multiply() {
        let simplifier = Simplifier::default();
        let y = var("y", 8);
        // (5 + 3) * (y + 0)
        let five_plus_three =
            expr::build_expression(Op::Add, expr::build_constant(5, 8).unwrap(), expr::build_constant(3, 8).unwrap())
                .unwrap();
        let y_plus_zero = expr::build_expression(Op::Add, y.clone(), expr::build_constant(0, 8).unwrap()).unwrap();
        let e = expr::build_expression(Op::MulU, five_plus_three, y_plus_zero).unwrap();

        let expected = expr::build_expression(Op::MulU, expr::build_constant(8, 8).unwrap(), y).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&expected));
    }

    #[test]
    fn if_with_a_condition_that_simplifies_to_true_takes_the_then_branch() {
        let simplifier = Simplifier::default();
        let x = var("x", 8);
        // Eq(x, x) isn't folded at construction time (only constant
        // operands fold eagerly), so the `If` only short-circuits once
        // the simplifier reduces the condition to a literal `1`.
        let cond = expr::build_expression(Op::Eq, x.clone(), x).unwrap();
        let then = expr::build_constant(10, 8).unwrap();
        let els = expr::build_constant(20, 8).unwrap();
        let e = expr::build_if(cond, then.clone(), els).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&then));
    }

    #[test]
    fn if_with_a_condition_that_simplifies_to_false_takes_the_else_branch() {
        let simplifier = Simplifier::default();
        let x = var("x", 8);
        let cond = expr::build_expression(Op::Ne, x.clone(), x).unwrap();
        let then = expr::build_constant(10, 8).unwrap();
        let els = expr::build_constant(20, 8).unwrap();
        let e = expr::build_if(cond, then, els.clone()).unwrap();
        assert!(simplifier.simplify(&e).struct_eq(&els));
    }

    #[test]
    fn second_simplification_of_the_same_expression_hits_the_cache() {
        let simplifier = Simplifier::default();
        let saved = simplifier.swap_state(SimplifierState::new());
        let _ = simplifier.swap_state(saved);

        let x = var("x", 8);
        let e = expr::build_expression(Op::Add, x, expr::build_constant(0, 8).unwrap()).unwrap();

        let _ = simplifier.simplify(&e);
        let after_first = simplifier.swap_state(SimplifierState::new());
        let rules_after_first = after_first.stats().rules_applied;
        assert!(rules_after_first > 0);

        let _ = simplifier.swap_state(after_first);
        let _ = simplifier.simplify(&e);
        let after_second = simplifier.swap_state(SimplifierState::new());
        assert_eq!(after_second.stats().rules_applied, rules_after_first);
        assert!(after_second.stats().cache_hits > 0);
    }

    #[test]
    fn cache_pruning_keeps_the_cache_within_capacity() {
        let simplifier = Simplifier::new(Config { cache_capacity: 16, prune_retain: 8, ..Config::default() });
        let _ = simplifier.swap_state(SimplifierState::new());

        let x = var("x", 32);
        for i in 0..64u64 {
            let e = expr::build_expression(Op::Add, x.clone(), expr::build_constant(i, 32).unwrap()).unwrap();
            let _ = simplifier.simplify(&e);
        }
        let state = simplifier.swap_state(SimplifierState::new());
        assert!(state.cache_len() <= 16);
    }

    #[test]
    fn join_depth_limit_stops_unbounded_nested_simplify_recursion() {
        let simplifier = Simplifier::new(Config { join_depth_limit: 0, ..Config::default() });
        let mut state = SimplifierState::new();
        let x = var("x", 8);
        assert!(simplifier.simplify_nested(&mut state, &x).is_none());
    }
}

#[cfg(test)]
mod proptest_invariants {
    use super::*;
    use crate::expr::{self, Expr};
    use crate::ident::VarId;
    use proptest::prelude::*;

    const WIDTH: u32 = 8;

    fn arb_leaf() -> BoxedStrategy<Expr> {
        prop_oneof![
            (0u64..256).prop_map(|v| expr::build_constant(v, WIDTH).unwrap()),
            Just(expr::build_variable(VarId::name("x"), WIDTH).unwrap()),
            Just(expr::build_variable(VarId::name("y"), WIDTH).unwrap()),
        ]
        .boxed()
    }

    fn arb_expr(depth: u32) -> BoxedStrategy<Expr> {
        if depth == 0 {
            return arb_leaf();
        }
        let smaller = arb_expr(depth - 1);
        let unary = (prop_oneof![Just(Op::Not), Just(Op::Neg)], smaller.clone())
            .prop_map(|(op, rhs)| expr::build_unary(op, rhs).unwrap());
        // `Eq` and the other comparisons return a 1-bit result, which
        // would break width-matching at the next recursion level up, so
        // only width-preserving ops are composed here.
        let binary_op =
            prop_oneof![Just(Op::Add), Just(Op::Sub), Just(Op::And), Just(Op::Or), Just(Op::Xor), Just(Op::MulU),];
        let binary = (binary_op, smaller.clone(), smaller)
            .prop_map(|(op, lhs, rhs)| expr::build_expression(op, lhs, rhs).unwrap());
        prop_oneof![arb_leaf(), unary, binary].boxed()
    }

    proptest! {
        #[test]
        fn simplification_is_idempotent(e in arb_expr(3)) {
            let simplifier = Simplifier::default();
            let _ = simplifier.swap_state(SimplifierState::new());
            let once = simplifier.simplify(&e);
            let twice = simplifier.simplify(&once);
            prop_assert!(once.struct_eq(&twice));
        }

        #[test]
        fn simplification_preserves_width(e in arb_expr(3)) {
            let simplifier = Simplifier::default();
            let _ = simplifier.swap_state(SimplifierState::new());
            prop_assert_eq!(simplifier.simplify(&e).width(), e.width());
        }

        #[test]
        fn simplification_never_increases_complexity(e in arb_expr(3)) {
            let simplifier = Simplifier::default();
            let _ = simplifier.swap_state(SimplifierState::new());
            let simplified = simplifier.simplify(&e);
            prop_assert!(simplified.complexity() <= e.complexity());
        }

        #[test]
        fn signature_prefilter_never_rejects_a_true_match(e in arb_expr(3)) {
            for rule in crate::rules::corpus() {
                let matched = !crate::matcher::match_pattern(&rule.from, &e).is_empty();
                if matched {
                    prop_assert!(can_match_commutative(&rule.signature, &e));
                }
            }
        }

        #[test]
        fn a_fully_known_expression_simplifies_to_its_known_constant(e in arb_expr(3)) {
            if let Some(known) = e.known().as_const() {
                let simplifier = Simplifier::default();
                let _ = simplifier.swap_state(SimplifierState::new());
                let simplified = simplifier.simplify(&e);
                prop_assert_eq!(simplified.as_const().map(|c| c.value()), Some(known.value()));
            }
        }

        #[test]
        fn resize_up_then_down_round_trips_a_constant(v in 0u64..256, sign_extend in any::<bool>()) {
            let c = expr::build_constant(v, 8).unwrap();
            let widened = expr::resize(&c, 32, sign_extend).unwrap();
            let narrowed = expr::resize(&widened, 8, sign_extend).unwrap();
            prop_assert_eq!(narrowed.as_const().unwrap().value(), v);
        }
    }
}
