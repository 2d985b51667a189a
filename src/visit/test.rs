// Tests for grammar expression traversal
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

use super::*;
use crate::{
    grammar::{ExprTy, GrammarBuilder},
    span::dummy::*,
};

/// Records the kind of every expression visited,
///   handling nothing itself.
struct Recorder;

impl Visit for Recorder {
    type Ctx = Vec<ExprTy>;
    type Output = ();

    fn visit(&mut self, g: &Grammar, id: ExprId, cx: &mut Self::Ctx) {
        cx.push(g.expr(id).ty());
        walk(self, g, id, cx)
    }
}

/// Yields the length of the first literal found,
///   handling only literals.
struct LiteralLen;

impl Visit for LiteralLen {
    type Ctx = ();
    type Output = Option<usize>;

    fn visit(&mut self, g: &Grammar, id: ExprId, cx: &mut ()) -> Self::Output {
        match g.expr(id) {
            Expr::Literal { value, .. } => Some(value.len()),
            _ => walk(self, g, id, cx),
        }
    }
}

// Start = ("ab" / R)* &. ; R = "r"+
fn grammar() -> (Grammar, ExprId, ExprId) {
    let mut b = GrammarBuilder::new();

    let lit = b.expr(Expr::literal("ab"), S1);
    let rref = b.rule_ref("R", vec![], S2);
    let choice = b.expr(Expr::Choice(vec![lit, rref]), S3);
    let star = b.expr(Expr::ZeroOrMore(choice), S4);
    let any = b.expr(Expr::Any, S5);
    let and = b.expr(Expr::SimpleAnd(any), S6);
    let seq = b.expr(Expr::Sequence(vec![star, and]), S7);
    b.rule("Start", vec![], seq, S8);

    let r = b.expr(Expr::literal("r"), S9);
    let plus = b.expr(Expr::OneOrMore(r), S10);
    b.rule("R", vec![], plus, S11);

    (b.finish().unwrap(), seq, star)
}

#[test]
fn default_walk_visits_in_pre_order_without_following_refs() {
    let (g, _, _) = grammar();
    let start = g.lookup("Start").unwrap();

    let mut seen = vec![];
    Recorder.visit_rule(&g, start, &mut seen);

    use ExprTy::*;
    assert_eq!(
        vec![
            Sequence, ZeroOrMore, Choice, Literal, RuleRef, SimpleAnd, Any
        ],
        seen,
    );
}

#[test]
fn visit_grammar_visits_each_rule_in_order() {
    let (g, _, _) = grammar();

    let mut seen = vec![];
    Recorder.visit_grammar(&g, &mut seen);

    assert_eq!(Some(&ExprTy::OneOrMore), seen.get(7));
    assert_eq!(9, seen.len());
}

#[test]
fn wrapper_yields_inner_output() {
    let (g, _, star) = grammar();
    let r = g.lookup("R").unwrap();

    // `"r"+` yields its inner literal.
    assert_eq!(Some(1), LiteralLen.visit_rule(&g, r, &mut ()));

    // Wrapper around a choice yields the choice's default output.
    assert_eq!(None, LiteralLen.visit(&g, star, &mut ()));
}

#[test]
fn sequence_yields_default_output() {
    let (g, seq, _) = grammar();

    assert_eq!(None, LiteralLen.visit(&g, seq, &mut ()));
}
