// Failure-reporting analysis
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

//! Determine which rules must record match failures.
//!
//! Recording the furthest failure position and what was expected there is
//!   only useful for failures that the user could ever observe.
//! A failure is observable only if it propagates to an entry point of the
//!   grammar,
//!     and so failure reporting is enabled only for rules that are
//!     reachable from an entry point through references whose failure is
//!     not masked.
//!
//! A failure is masked beneath:
//!
//!   - `named` expressions,
//!       which report their display name in place of their contents;
//!   - `simple_and` and `simple_not`,
//!       which never report what they looked ahead for; and
//!   - `optional` and `zero_or_more`,
//!       which succeed regardless of their inner expression.
//!
//! Rules that always match
//!   (see [`super::always_match`])
//!   are never descended into,
//!     since they cannot fail.
//!
//! The references that survive masking form a [`FailureGraph`].
//! Entry points report failures unconditionally,
//!   and the attribute is propagated along edges of the graph until no
//!   more rules can be marked.

use super::{
    always_match::AlwaysMatch,
    trace::{AnalysisTrace, DefaultTrace},
};
use crate::{
    global::RuleIdSize,
    grammar::{Expr, ExprId, Grammar, RuleId},
    visit::{walk, Visit},
};
use fixedbitset::FixedBitSet;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use std::collections::VecDeque;

/// Failure-reporting attribute of every rule of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportsFailure {
    rules: FixedBitSet,
}

impl ReportsFailure {
    /// Whether `rule` must record its match failures.
    pub fn rule(&self, rule: RuleId) -> bool {
        self.rules.contains(rule.index())
    }

    /// Rules that report failures,
    ///   in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.ones().map(|i| RuleId::new(i as RuleIdSize))
    }
}

/// References between rules whose failures are observable by the
///   referencing rule.
///
/// Node `i` of the graph is [`RuleId`] `i`.
/// Each edge is weighted by the `rule_ref` expression responsible for it,
///   so a rule referenced more than once by the same rule has more than
///   one edge.
#[derive(Debug, Clone)]
pub struct FailureGraph {
    graph: DiGraph<RuleId, ExprId, RuleIdSize>,
}

impl FailureGraph {
    /// Build the graph of observable references of every rule of `g`.
    pub fn new(g: &Grammar) -> Self {
        let mut graph =
            DiGraph::with_capacity(g.rule_count(), g.rule_count());

        for (id, _) in g.rules() {
            graph.add_node(id);
        }

        let mut refs = Vec::new();

        for (from, _) in g.rules() {
            refs.clear();
            ObservableRefs.visit_rule(g, from, &mut refs);

            for (to, via) in refs.iter() {
                graph.add_edge(Self::node(from), Self::node(*to), *via);
            }
        }

        Self { graph }
    }

    fn node(rule: RuleId) -> NodeIndex<RuleIdSize> {
        NodeIndex::new(rule.index())
    }

    /// Rules whose failures are observable by `rule`,
    ///   with the `rule_ref` expression referencing each.
    pub fn references(
        &self,
        rule: RuleId,
    ) -> impl Iterator<Item = (RuleId, ExprId)> + '_ {
        self.graph
            .edges(Self::node(rule))
            .map(|edge| (self.graph[edge.target()], *edge.weight()))
    }

    /// Propagate the failure-reporting attribute from the entry points of
    ///   `g`.
    pub fn propagate<T: AnalysisTrace>(
        &self,
        g: &Grammar,
        always_match: &AlwaysMatch,
        mut trace: T,
    ) -> ReportsFailure {
        let mut rules = FixedBitSet::with_capacity(g.rule_count());
        let mut worklist = VecDeque::new();

        for rule in g.entry_rules() {
            if !rules.put(rule.index()) {
                trace.trace_seed(g, rule);
                worklist.push_back(rule);
            }
        }

        while let Some(rule) = worklist.pop_front() {
            if always_match.rule(rule) {
                continue;
            }

            for (target, via) in self.references(rule) {
                if !rules.put(target.index()) {
                    trace.trace_reports_failure(
                        g,
                        target,
                        rule,
                        g.expr_span(via),
                    );
                    worklist.push_back(target);
                }
            }
        }

        ReportsFailure { rules }
    }
}

/// Compute the failure-reporting attribute for every rule of `g`.
pub fn compute_reports_failure(
    g: &Grammar,
    always_match: &AlwaysMatch,
) -> ReportsFailure {
    FailureGraph::new(g).propagate(g, always_match, DefaultTrace::default())
}

/// Collects references whose failures are not masked.
struct ObservableRefs;

impl Visit for ObservableRefs {
    type Ctx = Vec<(RuleId, ExprId)>;
    type Output = ();

    fn visit(&mut self, g: &Grammar, id: ExprId, refs: &mut Self::Ctx) {
        use Expr::*;

        match g.expr(id) {
            Named { .. }
            | SimpleAnd(_)
            | SimpleNot(_)
            | Optional(_)
            | ZeroOrMore(_) => (),

            RuleRef(rref) => refs.push((rref.target(), id)),

            _ => walk(self, g, id, refs),
        }
    }
}

#[cfg(test)]
mod test;
