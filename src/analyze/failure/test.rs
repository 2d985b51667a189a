// Tests for failure-reporting analysis
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
    analyze::{always_match::compute_always_match, trace::VoidTrace},
    grammar::GrammarBuilder,
    span::dummy::*,
};

fn sut(g: &Grammar) -> ReportsFailure {
    compute_reports_failure(g, &compute_always_match(g))
}

fn reporting(g: &Grammar) -> Vec<&str> {
    sut(g).iter().map(|id| g.rule(id).name()).collect()
}

#[test]
fn optional_masks_reachable_rule() {
    // Start = C "a"
    // C = B? "c"
    // B = "b"
    let mut b = GrammarBuilder::new();

    let to_c = b.rule_ref("C", vec![], S1);
    let a = b.expr(Expr::literal("a"), S2);
    let start = b.expr(Expr::Sequence(vec![to_c, a]), S3);
    b.rule("Start", vec![], start, S4);

    let to_b = b.rule_ref("B", vec![], S5);
    let opt = b.expr(Expr::Optional(to_b), S6);
    let c = b.expr(Expr::literal("c"), S7);
    let c_body = b.expr(Expr::Sequence(vec![opt, c]), S8);
    b.rule("C", vec![], c_body, S9);

    let b_body = b.expr(Expr::literal("b"), S10);
    b.rule("B", vec![], b_body, S11);

    let g = b.finish().unwrap();

    assert_eq!(vec!["Start", "C"], reporting(&g));
}

#[test]
fn masking_expressions_stop_propagation() {
    let maskers: [fn(ExprId) -> Expr; 5] = [
        |inner| Expr::Named {
            name: "thing".into(),
            inner,
        },
        Expr::SimpleAnd,
        Expr::SimpleNot,
        Expr::Optional,
        Expr::ZeroOrMore,
    ];

    for mask in maskers {
        // Start = <mask>(Inner) "x" ; Inner = "i"
        let mut b = GrammarBuilder::new();
        let rref = b.rule_ref("Inner", vec![], S1);
        let masked = b.expr(mask(rref), S2);
        let x = b.expr(Expr::literal("x"), S3);
        let seq = b.expr(Expr::Sequence(vec![masked, x]), S4);
        b.rule("Start", vec![], seq, S5);
        let i = b.expr(Expr::literal("i"), S6);
        b.rule("Inner", vec![], i, S7);
        let g = b.finish().unwrap();

        assert_eq!(vec!["Start"], reporting(&g));
    }
}

#[test]
fn transparent_expressions_propagate() {
    // Start = l:(Inner)+ ; Inner = $"i"
    let mut b = GrammarBuilder::new();
    let rref = b.rule_ref("Inner", vec![], S1);
    let plus = b.expr(Expr::OneOrMore(rref), S2);
    let labeled = b.expr(
        Expr::Labeled {
            label: "l".into(),
            inner: plus,
        },
        S3,
    );
    b.rule("Start", vec![], labeled, S4);
    let i = b.expr(Expr::literal("i"), S5);
    let text = b.expr(Expr::Text(i), S6);
    b.rule("Inner", vec![], text, S7);
    let g = b.finish().unwrap();

    assert_eq!(vec!["Start", "Inner"], reporting(&g));
}

#[test]
fn always_matching_rule_is_not_descended() {
    // Start = Mid ; Mid = Leaf / "" ; Leaf = "l"
    let mut b = GrammarBuilder::new();
    let to_mid = b.rule_ref("Mid", vec![], S1);
    b.rule("Start", vec![], to_mid, S2);
    let to_leaf = b.rule_ref("Leaf", vec![], S3);
    let empty = b.expr(Expr::literal(""), S4);
    let choice = b.expr(Expr::Choice(vec![to_leaf, empty]), S5);
    b.rule("Mid", vec![], choice, S6);
    let l = b.expr(Expr::literal("l"), S7);
    b.rule("Leaf", vec![], l, S8);
    let g = b.finish().unwrap();

    // `Start` always matches because `Mid` does,
    //   so nothing beneath it is ever observed failing.
    assert_eq!(vec!["Start"], reporting(&g));
}

#[test]
fn entry_rules_report_even_if_always_matching() {
    let mut b = GrammarBuilder::new();
    let any = b.expr(Expr::Any, S1);
    let star = b.expr(Expr::ZeroOrMore(any), S2);
    b.rule("Start", vec![], star, S3);
    let x = b.expr(Expr::literal("x"), S4);
    b.rule("Stream", vec![], x, S5);
    b.allow_start("Start").allow_stream("Stream");
    let g = b.finish().unwrap();

    assert_eq!(vec!["Start", "Stream"], reporting(&g));
}

#[test]
fn unreachable_rule_does_not_report() {
    let mut b = GrammarBuilder::new();
    let x = b.expr(Expr::literal("x"), S1);
    b.rule("Start", vec![], x, S2);
    let y = b.expr(Expr::literal("y"), S3);
    b.rule("Orphan", vec![], y, S4);
    let g = b.finish().unwrap();

    assert_eq!(vec!["Start"], reporting(&g));
}

#[test]
fn propagation_is_transitive_through_cycles() {
    // Start = A ; A = "a" B ; B = "b" A / "b"
    let mut b = GrammarBuilder::new();
    let to_a = b.rule_ref("A", vec![], S1);
    b.rule("Start", vec![], to_a, S2);

    let a = b.expr(Expr::literal("a"), S3);
    let to_b = b.rule_ref("B", vec![], S4);
    let a_body = b.expr(Expr::Sequence(vec![a, to_b]), S5);
    b.rule("A", vec![], a_body, S6);

    let b1 = b.expr(Expr::literal("b"), S7);
    let to_a2 = b.rule_ref("A", vec![], S8);
    let alt1 = b.expr(Expr::Sequence(vec![b1, to_a2]), S9);
    let b2 = b.expr(Expr::literal("b"), S10);
    let b_body = b.expr(Expr::Choice(vec![alt1, b2]), S11);
    b.rule("B", vec![], b_body, S12);

    let g = b.finish().unwrap();

    assert_eq!(vec!["Start", "A", "B"], reporting(&g));
}

#[test]
fn graph_records_observable_references_with_their_expressions() {
    // Start = A A? A
    let mut b = GrammarBuilder::new();
    let first = b.rule_ref("A", vec![], S1);
    let masked = b.rule_ref("A", vec![], S2);
    let opt = b.expr(Expr::Optional(masked), S3);
    let last = b.rule_ref("A", vec![], S4);
    let seq = b.expr(Expr::Sequence(vec![first, opt, last]), S5);
    let start = b.rule("Start", vec![], seq, S6);
    let x = b.expr(Expr::literal("x"), S7);
    let a = b.rule("A", vec![], x, S8);
    let g = b.finish().unwrap();

    let graph = FailureGraph::new(&g);

    let mut refs = graph.references(start).collect::<Vec<_>>();
    refs.sort();

    assert_eq!(vec![(a, first), (a, last)], refs);
    assert_eq!(0, graph.references(a).count());

    let am = compute_always_match(&g);
    let sut = graph.propagate(&g, &am, VoidTrace);
    assert!(sut.rule(start));
    assert!(sut.rule(a));
}
