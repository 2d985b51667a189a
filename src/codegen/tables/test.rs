// Tests for expectation and action tables
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
    grammar::{GrammarBuilder, Param},
    span::dummy::*,
};

#[test]
fn expectation_descriptions() {
    assert_eq!("\"if\"", Expectation::of(&Expr::literal("if")).unwrap().to_string());

    assert_eq!(
        "\"a\\\"b\"i",
        Expectation::Literal {
            value: "a\"b".into(),
            ignore_case: true,
        }
        .to_string(),
    );

    assert_eq!(
        "[^_a-z\\]]i",
        Expectation::Class(CharClass {
            parts: vec![
                ClassPart::Char('_'),
                ClassPart::Range('a', 'z'),
                ClassPart::Char(']'),
            ],
            inverted: true,
            ignore_case: true,
        })
        .to_string(),
    );

    assert_eq!("any character", Expectation::Any.to_string());
    assert_eq!("identifier", Expectation::Other("identifier".into()).to_string());
}

#[test]
fn expectations_are_deduplicated_in_encounter_order() {
    let mut b = GrammarBuilder::new();

    // A = "x" [0-9] "x"
    // B = id:("x" / .)
    let x1 = b.expr(Expr::literal("x"), S1);
    let digit = b.expr(Expr::class([('0', '9')]), S2);
    let x2 = b.expr(Expr::literal("x"), S3);
    let seq = b.expr(Expr::Sequence(vec![x1, digit, x2]), S4);
    b.rule("A", vec![], seq, S5);

    let x3 = b.expr(Expr::literal("x"), S6);
    let any = b.expr(Expr::Any, S7);
    let choice = b.expr(Expr::Choice(vec![x3, any]), S8);
    let named = b.expr(
        Expr::Named {
            name: "id".into(),
            inner: choice,
        },
        S9,
    );
    b.rule("B", vec![], named, S10);

    let g = b.finish().unwrap();
    let sut = ExpectationTable::new(&g);

    assert_eq!(4, sut.len());

    assert_eq!(Some(0), sut.index_of(x1));
    assert_eq!(Some(1), sut.index_of(digit));
    assert_eq!(Some(0), sut.index_of(x2));

    // The name precedes the expectations within it.
    assert_eq!(Some(2), sut.index_of(named));
    assert_eq!(Some(0), sut.index_of(x3));
    assert_eq!(Some(3), sut.index_of(any));

    assert_eq!(None, sut.index_of(seq));
    assert_eq!(None, sut.index_of(choice));

    assert_eq!(
        vec!["\"x\"", "[0-9]", "id", "any character"],
        sut.iter().map(|(_, exp)| exp.to_string()).collect::<Vec<_>>(),
    );
}

#[test]
fn interned_expectation_shares_index() {
    let mut sut = ExpectationTable::default();

    assert_eq!(0, sut.intern(Expectation::Any));
    assert_eq!(1, sut.intern(Expectation::Other("a".into())));
    assert_eq!(0, sut.intern(Expectation::Any));
    assert_eq!(Some(&Expectation::Other("a".into())), sut.get(1));
    assert_eq!(None, sut.get(2));
}

#[test]
fn action_scope_includes_params_and_preceding_labels() {
    let mut b = GrammarBuilder::new();

    // R(depth, ref seen) = a:"a" (b:"b" { inner }) c:"c" { outer }
    let a_lit = b.expr(Expr::literal("a"), S1);
    let a = b.expr(
        Expr::Labeled {
            label: "a".into(),
            inner: a_lit,
        },
        S2,
    );

    let b_lit = b.expr(Expr::literal("b"), S3);
    let b_lab = b.expr(
        Expr::Labeled {
            label: "b".into(),
            inner: b_lit,
        },
        S4,
    );
    let inner_act = b.expr(
        Expr::Action {
            inner: b_lab,
            code: "inner".into(),
        },
        S5,
    );

    let c_lit = b.expr(Expr::literal("c"), S6);
    let c = b.expr(
        Expr::Labeled {
            label: "c".into(),
            inner: c_lit,
        },
        S7,
    );

    let seq = b.expr(Expr::Sequence(vec![a, inner_act, c]), S8);
    let outer_act = b.expr(
        Expr::Action {
            inner: seq,
            code: "outer".into(),
        },
        S9,
    );

    let r = b.rule(
        "R",
        vec![Param::value("depth"), Param::reference("seen")],
        outer_act,
        S10,
    );

    let g = b.finish().unwrap();
    let sut = ActionTable::new(&g);

    assert_eq!(2, sut.len());

    // Pre-order places the outer action first.
    assert_eq!(Some(0), sut.index_of(outer_act));
    assert_eq!(Some(1), sut.index_of(inner_act));

    assert_eq!(
        Some(&Action {
            expr: outer_act,
            rule: r,
            code: "outer".into(),
            params: vec!["depth", "seen", "a", "c"]
                .into_iter()
                .map(String::from)
                .collect(),
        }),
        sut.get(0),
    );

    // `c` follows and so is not in scope.
    assert_eq!(
        vec!["depth", "seen", "a", "b"],
        sut.get(1).unwrap().params,
    );
}

#[test]
fn action_scope_is_per_rule() {
    let mut b = GrammarBuilder::new();

    // A(x) = p:$x { one }
    // B = .  { two }
    let lp = b.expr(
        Expr::LabeledParam {
            label: "p".into(),
            param: "x".into(),
        },
        S1,
    );
    let one = b.expr(
        Expr::Action {
            inner: lp,
            code: "one".into(),
        },
        S2,
    );
    let a = b.rule("A", vec![Param::value("x")], one, S3);

    let any = b.expr(Expr::Any, S4);
    let two = b.expr(
        Expr::Action {
            inner: any,
            code: "two".into(),
        },
        S5,
    );
    let r = b.rule("B", vec![], two, S6);

    let g = b.finish().unwrap();
    let sut = ActionTable::new(&g);

    let (_, first) = sut.iter().next().unwrap();
    assert_eq!(a, first.rule);
    assert_eq!(vec!["x", "p"], first.params);

    assert_eq!(r, sut.get(1).unwrap().rule);
    assert!(sut.get(1).unwrap().params.is_empty());
}
