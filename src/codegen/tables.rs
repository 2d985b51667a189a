// Expectation and action tables
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

//! Indexed tables emitted alongside rule bodies.
//!
//! Failure sites refer to what was expected by index into an
//!   [`ExpectationTable`] rather than re-deriving a description,
//!     so that the furthest-failure record can merge expectations cheaply.
//! Semantic actions are likewise hoisted into an [`ActionTable`] and
//!   invoked positionally with the labeled values in scope.
//!
//! Indices are assigned in first-encounter order over rules in declaration
//!   order and a pre-order walk of each rule body.

use super::escape::{escape_class_char, stringify};
use crate::{
    grammar::{CharClass, ClassPart, Expr, ExprId, Grammar, RuleId},
    visit::{walk, Visit},
};
use fxhash::FxHashMap;
use std::fmt::{self, Display};

/// A description of what was expected at a failure site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expectation {
    Literal { value: String, ignore_case: bool },
    Class(CharClass),
    Any,

    /// Display name of a `named` expression.
    Other(String),
}

impl Expectation {
    /// Expectation described by `expr`,
    ///   if any.
    pub fn of(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Literal { value, ignore_case } => Some(Self::Literal {
                value: value.clone(),
                ignore_case: *ignore_case,
            }),
            Expr::Class(class) => Some(Self::Class(class.clone())),
            Expr::Any => Some(Self::Any),
            Expr::Named { name, .. } => Some(Self::Other(name.clone())),
            _ => None,
        }
    }
}

impl Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value, ignore_case } => {
                write!(f, "{}", stringify(value))?;
                if *ignore_case {
                    write!(f, "i")?;
                }
                Ok(())
            }

            Self::Class(CharClass {
                parts,
                inverted,
                ignore_case,
            }) => {
                write!(f, "[")?;
                if *inverted {
                    write!(f, "^")?;
                }

                for part in parts {
                    match part {
                        ClassPart::Char(c) => {
                            write!(f, "{}", escape_class_char(*c))?
                        }
                        ClassPart::Range(start, end) => write!(
                            f,
                            "{}-{}",
                            escape_class_char(*start),
                            escape_class_char(*end),
                        )?,
                    }
                }

                write!(f, "]")?;
                if *ignore_case {
                    write!(f, "i")?;
                }
                Ok(())
            }

            Self::Any => write!(f, "any character"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Deduplicated table of [`Expectation`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationTable {
    entries: Vec<Expectation>,
    index: FxHashMap<Expectation, usize>,
    by_expr: FxHashMap<ExprId, usize>,
}

impl ExpectationTable {
    /// Collect the expectations of every `literal`, `class`, `any`, and
    ///   `named` expression of `g`.
    pub fn new(g: &Grammar) -> Self {
        let mut table = Self::default();
        ExpectationCollector.visit_grammar(g, &mut table);
        table
    }

    /// Intern `exp`,
    ///   returning its index.
    ///
    /// Equal expectations share a single index.
    pub fn intern(&mut self, exp: Expectation) -> usize {
        if let Some(index) = self.index.get(&exp) {
            return *index;
        }

        let index = self.entries.len();
        self.entries.push(exp.clone());
        self.index.insert(exp, index);
        index
    }

    /// Index of the expectation of `expr`,
    ///   if it has one.
    pub fn index_of(&self, expr: ExprId) -> Option<usize> {
        self.by_expr.get(&expr).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Expectation> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Expectation)> {
        self.entries.iter().enumerate()
    }
}

struct ExpectationCollector;

impl Visit for ExpectationCollector {
    type Ctx = ExpectationTable;
    type Output = ();

    fn visit(&mut self, g: &Grammar, id: ExprId, table: &mut Self::Ctx) {
        if let Some(exp) = Expectation::of(g.expr(id)) {
            let index = table.intern(exp);
            table.by_expr.insert(id, index);
        }

        walk(self, g, id, table)
    }
}

/// A semantic action hoisted out of its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The `action` expression.
    pub expr: ExprId,

    /// Rule owning the action.
    pub rule: RuleId,

    pub code: String,

    /// Names of the labeled values in scope,
    ///   in the order in which they are passed to the action.
    pub params: Vec<String>,
}

/// Table of every [`Action`] of a grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTable {
    entries: Vec<Action>,
    by_expr: FxHashMap<ExprId, usize>,
}

impl ActionTable {
    pub fn new(g: &Grammar) -> Self {
        let mut table = Self::default();
        let mut collector = ActionCollector::default();

        for (rule, _) in g.rules() {
            collector.rule = rule;
            collector.visit_rule(g, rule, &mut table);
        }

        table
    }

    pub fn index_of(&self, expr: ExprId) -> Option<usize> {
        self.by_expr.get(&expr).copied()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Action)> {
        self.entries.iter().enumerate()
    }
}

/// Label introduced into the scope of following sequence elements by
///   `expr`,
///     if any.
fn introduced_label(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Labeled { label, .. } | Expr::LabeledParam { label, .. } => {
            Some(label)
        }
        _ => None,
    }
}

/// Collects actions along with the labels in scope of each.
///
/// The scope holds the parameters of the current rule followed by the
///   labels of the preceding elements of each enclosing sequence.
struct ActionCollector {
    rule: RuleId,
    scope: Vec<String>,
}

impl Default for ActionCollector {
    fn default() -> Self {
        Self {
            rule: RuleId::new(0),
            scope: Vec::new(),
        }
    }
}

impl Visit for ActionCollector {
    type Ctx = ActionTable;
    type Output = ();

    fn visit_rule(
        &mut self,
        g: &Grammar,
        rule: RuleId,
        table: &mut ActionTable,
    ) {
        let rule = g.rule(rule);

        self.scope.clear();
        self.scope.extend(rule.params().iter().map(|p| p.name.clone()));

        self.visit(g, rule.body(), table)
    }

    fn visit(&mut self, g: &Grammar, id: ExprId, table: &mut ActionTable) {
        match g.expr(id) {
            Expr::Sequence(elements) => {
                let mark = self.scope.len();

                for el in elements {
                    self.visit(g, *el, table);

                    if let Some(label) = introduced_label(g.expr(*el)) {
                        self.scope.push(label.to_string());
                    }
                }

                self.scope.truncate(mark);
            }

            Expr::Action { inner, code } => {
                let mut params = self.scope.clone();

                match g.expr(*inner) {
                    Expr::Sequence(elements) => params.extend(
                        elements
                            .iter()
                            .filter_map(|el| introduced_label(g.expr(*el)))
                            .map(ToString::to_string),
                    ),
                    other => params.extend(
                        introduced_label(other).map(ToString::to_string),
                    ),
                }

                table.by_expr.insert(id, table.entries.len());
                table.entries.push(Action {
                    expr: id,
                    rule: self.rule,
                    code: code.clone(),
                    params,
                });

                self.visit(g, *inner, table)
            }

            _ => walk(self, g, id, table),
        }
    }
}

#[cfg(test)]
mod test;
