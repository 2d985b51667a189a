// Grammar abstract syntax tree
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

//! Grammar abstract syntax tree.
//!
//! A [`Grammar`] is an ordered sequence of [`Rule`]s whose bodies are
//!   trees of [`Expr`]s.
//! Grammar source is parsed by a system external to this crate,
//!   which constructs the tree bottom-up using a [`GrammarBuilder`]:
//!
//! ```
//! use pegc::grammar::{Expr, GrammarBuilder};
//! use pegc::span::UNKNOWN_SPAN as S;
//!
//! let mut b = GrammarBuilder::new();
//!
//! let a = b.expr(Expr::literal("a"), S);
//! let opt_a = b.expr(Expr::Optional(a), S);
//! b.rule("Start", vec![], opt_a, S);
//!
//! let grammar = b.finish().unwrap();
//! assert_eq!(1, grammar.rule_count());
//! ```
//!
//! Once built,
//!   the tree is never restructured.
//! Attributes derived by analysis
//!   (see [`crate::analyze`])
//!   are stored in side tables indexed by [`RuleId`] and [`ExprId`]
//!   rather than on the nodes themselves.

mod error;
mod expr;

pub use error::{EntryKind, GrammarError};
pub use expr::{ArgValue, CharClass, ClassPart, Expr, ExprTy, RuleArg, RuleRef};

use crate::{
    global::{ExprIdSize, RuleIdSize},
    span::Span,
};
use fxhash::FxHashMap;
use std::fmt::Display;

/// Dense index of a [`Rule`] within its [`Grammar`].
///
/// Rule identifiers are assigned in declaration order,
///   and so are stable for the lifetime of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(RuleIdSize);

impl RuleId {
    pub(crate) const fn new(index: RuleIdSize) -> Self {
        Self(index)
    }

    /// Index suitable for side tables of length
    ///   [`Grammar::rule_count`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Dense index of an [`Expr`] within its [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(ExprIdSize);

impl ExprId {
    pub(crate) const fn new(index: ExprIdSize) -> Self {
        Self(index)
    }

    /// Index suitable for side tables of length
    ///   [`Grammar::expr_count`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expr#{}", self.0)
    }
}

/// How the value of a rule parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// The callee receives its own copy of the value.
    Value,

    /// The callee receives a shared cell that it may mutate,
    ///   making the new value visible to the caller after return.
    Reference,
}

/// A declared parameter of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

impl Param {
    pub fn value<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Value,
        }
    }

    pub fn reference<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Reference,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.kind == ParamKind::Reference
    }
}

/// A named production of a [`Grammar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    params: Vec<Param>,
    body: ExprId,
    span: Span,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Parameters passed by reference,
    ///   in declaration order.
    pub fn ref_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| p.is_reference())
    }

    pub fn has_ref_params(&self) -> bool {
        self.ref_params().next().is_some()
    }

    pub fn body(&self) -> ExprId {
        self.body
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A grammar whose rule references have all been resolved.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<Rule>,
    exprs: Vec<(Expr, Span)>,
    index: FxHashMap<String, RuleId>,
    start_rules: Vec<RuleId>,
    stream_rules: Vec<RuleId>,
}

impl Grammar {
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::new(i as RuleIdSize), rule))
    }

    /// Look up a rule by its identifier.
    ///
    /// Identifiers are only ever produced by the grammar that owns them,
    ///   so this will panic only if an identifier is used with a grammar
    ///   other than the one that produced it.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()].0
    }

    pub fn expr_span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].1
    }

    /// Look up a rule by name.
    pub fn lookup(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// Rules that may be used as eager entry points.
    pub fn start_rules(&self) -> &[RuleId] {
        &self.start_rules
    }

    /// Rules that may be used as lazy streaming entry points.
    pub fn stream_rules(&self) -> &[RuleId] {
        &self.stream_rules
    }

    /// All entry points,
    ///   start rules first.
    ///
    /// A rule that is both a start and a stream rule will be yielded
    ///   twice.
    pub fn entry_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.start_rules
            .iter()
            .chain(self.stream_rules.iter())
            .copied()
    }

    pub fn is_start(&self, id: RuleId) -> bool {
        self.start_rules.contains(&id)
    }

    pub fn is_stream(&self, id: RuleId) -> bool {
        self.stream_rules.contains(&id)
    }
}

/// Construct a [`Grammar`] bottom-up.
///
/// Expressions must be created before the expressions and rules that
///   contain them.
/// Rule references may name rules that have not yet been declared;
///   they are resolved by [`GrammarBuilder::finish`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    exprs: Vec<(Expr, Span)>,
    start_names: Vec<String>,
    stream_names: Vec<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expression to the tree.
    ///
    /// To reference a rule,
    ///   use [`GrammarBuilder::rule_ref`].
    pub fn expr(&mut self, expr: Expr, span: Span) -> ExprId {
        let id = ExprId::new(self.exprs.len() as ExprIdSize);
        self.exprs.push((expr, span));
        id
    }

    /// Add a reference to the rule `name`,
    ///   binding `args` to its parameters.
    pub fn rule_ref<N: Into<String>>(
        &mut self,
        name: N,
        args: Vec<RuleArg>,
        span: Span,
    ) -> ExprId {
        self.expr(Expr::RuleRef(RuleRef::new(name.into(), args)), span)
    }

    /// Declare a rule.
    ///
    /// Rules are identified in declaration order.
    pub fn rule<N: Into<String>>(
        &mut self,
        name: N,
        params: Vec<Param>,
        body: ExprId,
        span: Span,
    ) -> RuleId {
        let id = RuleId::new(self.rules.len() as RuleIdSize);

        self.rules.push(Rule {
            name: name.into(),
            params,
            body,
            span,
        });

        id
    }

    /// Permit the rule `name` to be used as an eager entry point.
    ///
    /// If no start rules are declared,
    ///   the first rule of the grammar will be the sole start rule.
    pub fn allow_start<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.start_names.push(name.into());
        self
    }

    /// Permit the rule `name` to be used as a lazy streaming entry point.
    pub fn allow_stream<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.stream_names.push(name.into());
        self
    }

    /// Resolve all rule references and entry points,
    ///   producing an immutable [`Grammar`].
    ///
    /// The first error encountered is returned.
    pub fn finish(self) -> Result<Grammar, GrammarError> {
        let Self {
            rules,
            mut exprs,
            start_names,
            stream_names,
        } = self;

        let mut index = FxHashMap::<String, RuleId>::default();
        index.reserve(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let id = RuleId::new(i as RuleIdSize);

            if let Some(first) = index.insert(rule.name.clone(), id) {
                return Err(GrammarError::DuplicateRule {
                    name: rule.name.clone(),
                    first: rules[first.index()].span,
                    redefined: rule.span,
                });
            }
        }

        for (expr, span) in exprs.iter_mut() {
            if let Expr::RuleRef(rref) = expr {
                match index.get(rref.name()) {
                    Some(target) => rref.resolve(*target),
                    None => {
                        return Err(GrammarError::UnresolvedRule {
                            name: rref.name().to_string(),
                            span: *span,
                        })
                    }
                }
            }
        }

        let resolve_entries = |names: Vec<String>, kind| {
            names
                .into_iter()
                .map(|name| match index.get(&name) {
                    Some(id) => Ok(*id),
                    None => Err(GrammarError::UnknownEntryRule { name, kind }),
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let mut start_rules = resolve_entries(start_names, EntryKind::Start)?;
        let stream_rules = resolve_entries(stream_names, EntryKind::Stream)?;

        if start_rules.is_empty() && !rules.is_empty() {
            start_rules.push(RuleId::new(0));
        }

        Ok(Grammar {
            rules,
            exprs,
            index,
            start_rules,
            stream_rules,
        })
    }
}
