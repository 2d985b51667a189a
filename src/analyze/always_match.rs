// Always-match analysis
//
//  Copyright (C) 2024 The PEGC Contributors.
//
//  This file is part of PEGC.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Determine which expressions are guaranteed to succeed.
//!
//! An expression _always matches_ if it succeeds on any input,
//!   possibly consuming nothing.
//! This is a conservative approximation:
//!   an expression that is reported not to always match may still do so.
//!
//! | Kind                                        | Always matches          |
//! |---------------------------------------------|-------------------------|
//! | `literal`                                   | iff empty               |
//! | `class`                                     | iff empty and inverted  |
//! | `any`, `optional`, `zero_or_more`, `action` | yes                     |
//! | `one_or_more`, predicates, `labeled_param`  | no                      |
//! | `sequence`                                  | iff all elements do     |
//! | `choice`                                    | iff any alternative does|
//! | `named`, `labeled`, `picked`, `text`, `simple_and`, `simple_not` | iff inner does |
//! | `rule_ref`                                  | iff target rule does    |
//!
//! `any` is considered to always match even though it fails at the end of
//!   the input;
//!     this affects only which rules report failures.
//!
//! Recursion
//! =========
//! Rules may be mutually recursive,
//!   so deferring to an inner expression or a referenced rule consumes a
//!   [`Budget`] carried along the path from the rule being analyzed.
//! Siblings of a sequence or choice each receive their own copy of the
//!   budget.
//! Once [`ALWAYS_MATCH_RECURSION_LIMIT`] levels have been consumed,
//!   the expression is assumed not to always match.
//!
//! The result for each rule is memoized once computed.
//! A rule cut off by the bound is memoized as not always matching until
//!   the enclosing computation of that same rule completes and replaces
//!   it.
//! Every child is visited even when its parent's result does not depend on
//!   it,
//!     so that every expression in the grammar receives a result.

use super::trace::{AnalysisTrace, DefaultTrace};
use crate::{
    global::ALWAYS_MATCH_RECURSION_LIMIT,
    grammar::{Expr, ExprId, Grammar, RuleId},
    visit::Visit,
};
use fixedbitset::FixedBitSet;

/// Always-match attribute of every expression and rule of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlwaysMatch {
    exprs: FixedBitSet,
    rules: FixedBitSet,
}

impl AlwaysMatch {
    /// Whether the expression `id` always matches.
    pub fn expr(&self, id: ExprId) -> bool {
        self.exprs.contains(id.index())
    }

    /// Whether the body of `rule` always matches.
    pub fn rule(&self, rule: RuleId) -> bool {
        self.rules.contains(rule.index())
    }
}

/// Compute the always-match attribute for every expression and rule of
///   `g`.
pub fn compute_always_match(g: &Grammar) -> AlwaysMatch {
    compute_always_match_traced(g, DefaultTrace::default())
}

/// Compute the always-match attribute using the provided trace.
pub fn compute_always_match_traced<T: AnalysisTrace>(
    g: &Grammar,
    trace: T,
) -> AlwaysMatch {
    let mut pass = AlwaysMatchPass {
        exprs: FixedBitSet::with_capacity(g.expr_count()),
        rules: vec![None; g.rule_count()],
        trace,
    };

    for (rule, _) in g.rules() {
        pass.visit_rule(g, rule, &mut Budget::default());
    }

    let mut rules = FixedBitSet::with_capacity(g.rule_count());
    pass.rules
        .iter()
        .enumerate()
        .filter(|(_, memo)| **memo == Some(true))
        .for_each(|(i, _)| rules.insert(i));

    AlwaysMatch {
        exprs: pass.exprs,
        rules,
    }
}

/// Recursion depth consumed along the current path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Budget(u8);

impl Budget {
    /// Consume one level of recursion,
    ///   or [`None`] if doing so would reach
    ///   [`ALWAYS_MATCH_RECURSION_LIMIT`].
    fn defer(self) -> Option<Self> {
        let depth = self.0 + 1;
        (depth < ALWAYS_MATCH_RECURSION_LIMIT).then_some(Self(depth))
    }
}

struct AlwaysMatchPass<T: AnalysisTrace> {
    exprs: FixedBitSet,

    /// Memoized rule results.
    rules: Vec<Option<bool>>,

    trace: T,
}

impl<T: AnalysisTrace> AlwaysMatchPass<T> {
    /// Visit `id` with its own copy of the budget.
    fn visit_with(&mut self, g: &Grammar, id: ExprId, budget: Budget) -> bool {
        let mut budget = budget;
        self.visit(g, id, &mut budget)
    }

    /// Defer to the result of `inner` after consuming a level of
    ///   recursion.
    fn defer(&mut self, g: &Grammar, inner: ExprId, budget: Budget) -> bool {
        match budget.defer() {
            Some(mut deeper) => self.visit(g, inner, &mut deeper),
            None => false,
        }
    }
}

impl<T: AnalysisTrace> Visit for AlwaysMatchPass<T> {
    type Ctx = Budget;
    type Output = bool;

    fn visit(&mut self, g: &Grammar, id: ExprId, budget: &mut Budget) -> bool {
        use Expr::*;

        let budget = *budget;

        let result = match g.expr(id) {
            Literal { value, .. } => value.is_empty(),
            Class(class) => class.parts.is_empty() && class.inverted,
            Any => true,

            Optional(inner) | ZeroOrMore(inner) | Action { inner, .. } => {
                self.visit_with(g, *inner, budget);
                true
            }

            OneOrMore(inner) => {
                self.visit_with(g, *inner, budget);
                false
            }

            // Not short-circuiting,
            //   since every element must be visited.
            Sequence(elements) => elements.iter().fold(true, |all, el| {
                let matches = self.visit_with(g, *el, budget);
                matches && all
            }),

            Choice(alternatives) => {
                alternatives.iter().fold(false, |any, alt| {
                    let matches = self.visit_with(g, *alt, budget);
                    matches || any
                })
            }

            Named { inner, .. }
            | Labeled { inner, .. }
            | Picked(inner)
            | Text(inner)
            | SimpleAnd(inner)
            | SimpleNot(inner) => self.defer(g, *inner, budget),

            SemanticAnd(_)
            | SemanticNot(_)
            | ParameterAnd(_)
            | ParameterNot(_)
            | LabeledParam { .. } => false,

            RuleRef(rref) => {
                let mut budget = budget;
                self.visit_rule(g, rref.target(), &mut budget)
            }
        };

        self.exprs.set(id.index(), result);
        result
    }

    fn visit_rule(
        &mut self,
        g: &Grammar,
        rule: RuleId,
        budget: &mut Budget,
    ) -> bool {
        if let Some(memo) = self.rules[rule.index()] {
            return memo;
        }

        let result = match budget.defer() {
            Some(mut deeper) => {
                let body = g.rule(rule).body();
                self.visit(g, body, &mut deeper)
            }
            None => {
                self.trace.trace_cutoff(g, rule);
                false
            }
        };

        // May replace a result memoized by a cutoff further down this
        //   same path.
        self.rules[rule.index()] = Some(result);
        self.trace.trace_always_match(g, rule, result);

        result
    }
}
