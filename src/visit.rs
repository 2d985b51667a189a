// Grammar expression traversal
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

//! Traversal of grammar expression trees.
//!
//! Every pass over a grammar is a [`Visit`] implementation that handles
//!   only the expression kinds it is interested in,
//!     deferring to [`walk`] for everything else.
//! [`walk`] performs a structural traversal:
//!
//!   - Wrapper expressions
//!       (those with a single inner expression,
//!         such as [`Expr::Optional`])
//!       visit their inner expression and yield its output;
//!   - [`Expr::Sequence`] and [`Expr::Choice`] visit each of their
//!       children in order and yield [`Default::default`]; and
//!   - Leaves yield [`Default::default`].
//!
//! [`Expr::RuleRef`] is a leaf:
//!   the default walk never crosses into the referenced rule.
//! Passes that need to follow references do so explicitly via
//!   [`Visit::visit_rule`].
//!
//! The context [`Visit::Ctx`] is threaded unchanged through the default
//!   walk,
//!     allowing a pass to accumulate state without storing it on the
//!     visitor itself.

use crate::grammar::{Expr, ExprId, Grammar, RuleId};

/// A pass over grammar expressions.
///
/// See the [module-level documentation](self) for more information.
pub trait Visit {
    /// Accumulator threaded through the traversal.
    type Ctx;

    /// Result of visiting an expression.
    type Output: Default;

    /// Visit the expression `id`.
    ///
    /// The default implementation is the structural [`walk`].
    /// Implementations should call [`walk`] for any kind that they do not
    ///   handle themselves.
    fn visit(
        &mut self,
        g: &Grammar,
        id: ExprId,
        cx: &mut Self::Ctx,
    ) -> Self::Output {
        walk(self, g, id, cx)
    }

    /// Visit the body of `rule`.
    fn visit_rule(
        &mut self,
        g: &Grammar,
        rule: RuleId,
        cx: &mut Self::Ctx,
    ) -> Self::Output {
        self.visit(g, g.rule(rule).body(), cx)
    }

    /// Visit every rule of the grammar in declaration order,
    ///   discarding their output.
    fn visit_grammar(&mut self, g: &Grammar, cx: &mut Self::Ctx) {
        for (id, _) in g.rules() {
            self.visit_rule(g, id, cx);
        }
    }
}

/// Structural traversal of the expression `id`.
///
/// See the [module-level documentation](self) for more information.
pub fn walk<V: Visit + ?Sized>(
    v: &mut V,
    g: &Grammar,
    id: ExprId,
    cx: &mut V::Ctx,
) -> V::Output {
    use Expr::*;

    match g.expr(id) {
        Sequence(children) | Choice(children) => {
            for child in children {
                v.visit(g, *child, cx);
            }

            Default::default()
        }

        Labeled { inner, .. }
        | Named { inner, .. }
        | Action { inner, .. }
        | Picked(inner)
        | Text(inner)
        | SimpleAnd(inner)
        | SimpleNot(inner)
        | Optional(inner)
        | ZeroOrMore(inner)
        | OneOrMore(inner) => v.visit(g, *inner, cx),

        Literal { .. }
        | Class(_)
        | Any
        | SemanticAnd(_)
        | SemanticNot(_)
        | ParameterAnd(_)
        | ParameterNot(_)
        | LabeledParam { .. }
        | RuleRef(_) => Default::default(),
    }
}

#[cfg(test)]
mod test;
