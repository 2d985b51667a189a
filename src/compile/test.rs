// Tests for grammar compilation
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
    codegen::ir::{Cond, Stmt},
    grammar::{GrammarBuilder, Param},
    span::dummy::*,
};

/// ```text
/// Start = "if" Tail
/// Tail(ref depth) = [a-z]* { tail }
/// Items = .
/// ```
///
/// `Items` is a stream rule.
fn grammar() -> (Grammar, [ExprId; 4]) {
    let mut b = GrammarBuilder::new();

    let lit = b.expr(Expr::literal("if"), S1);
    let tail_ref = b.rule_ref("Tail", vec![], S2);
    let seq = b.expr(Expr::Sequence(vec![lit, tail_ref]), S3);
    b.rule("Start", vec![], seq, S4);

    let class = b.expr(Expr::class([('a', 'z')]), S5);
    let star = b.expr(Expr::ZeroOrMore(class), S6);
    let act = b.expr(
        Expr::Action {
            inner: star,
            code: "tail".into(),
        },
        S7,
    );
    b.rule("Tail", vec![Param::reference("depth")], act, S8);

    let any = b.expr(Expr::Any, S9);
    b.rule("Items", vec![], any, S10);

    b.allow_start("Start").allow_stream("Items");

    (b.finish().unwrap(), [lit, class, any, seq])
}

#[test]
fn plans_primitive_expressions() {
    let (g, [lit, class, any, seq]) = grammar();
    let sut = compile(&g, &CompileOptions::default());

    assert_eq!(Some(&compile_literal("if", false, RESULT_REG)), sut.plan(lit));
    assert_eq!(Some(&MatchPlan::any(RESULT_REG)), sut.plan(any));
    assert_eq!(None, sut.plan(seq));

    let plan = sut.plan(class).unwrap();
    assert_eq!(vec![Stmt::LoadChar(RESULT_REG)], plan.block);
    assert!(matches!(plan.cond, Cond::InSet { .. }));
}

#[test]
fn optimize_code_size_uses_ranges() {
    let (g, [_, class, ..]) = grammar();
    let sut = compile(
        &g,
        &CompileOptions {
            optimize_code_size: true,
            ..Default::default()
        },
    );

    assert!(matches!(
        sut.plan(class).unwrap().cond,
        Cond::InRanges { .. }
    ));
}

#[test]
fn rule_units_carry_analysis() {
    let (g, _) = grammar();
    let sut = compile(&g, &CompileOptions::default());

    let start = sut.rule(g.lookup("Start").unwrap());
    assert_eq!("Start", start.name);
    assert!(start.is_start);
    assert!(!start.is_stream);
    assert!(!start.always_match);
    assert!(start.reports_failure);

    // Referenced without masking,
    //   even though it cannot itself fail.
    let tail = sut.rule(g.lookup("Tail").unwrap());
    assert!(tail.always_match);
    assert!(tail.reports_failure);
    assert!(!tail.is_start);

    let items = sut.rule(g.lookup("Items").unwrap());
    assert!(items.is_stream);
    assert!(items.reports_failure);
}

#[test]
fn stream_rules_get_stream_variant() {
    let (g, _) = grammar();
    let sut = compile(&g, &CompileOptions::default());

    let functions = |name| {
        sut.rule(g.lookup(name).unwrap())
            .variants
            .iter()
            .map(|v| v.function.as_str())
            .collect::<Vec<_>>()
    };

    assert_eq!(vec!["peg$parseStart", "peg$discardStart"], functions("Start"));
    assert_eq!(
        vec!["peg$parseItems", "peg$discardItems", "peg$streamItems"],
        functions("Items"),
    );
}

#[test]
fn cache_plans_only_when_enabled() {
    let (g, _) = grammar();
    let tail = g.lookup("Tail").unwrap();

    let sut = compile(&g, &CompileOptions::default());
    assert!(sut.rule(tail).variants.iter().all(|v| v.cache.is_none()));

    let sut = compile(
        &g,
        &CompileOptions {
            cache: true,
            ..Default::default()
        },
    );

    let discard = sut.rule(tail).variant(RuleVariant::Discard).unwrap();
    let plan = discard.cache.as_ref().unwrap();

    assert_eq!(4, plan.slot());
    assert_eq!(&["depth".to_string()], plan.ref_params());
    assert_eq!(None, sut.rule(tail).variant(RuleVariant::Stream));
}

#[test]
fn declarations_render_tables() {
    let (g, _) = grammar();

    let sut = compile(&g, &CompileOptions::default());
    assert_eq!(
        "var peg$c0 = peg$literalExpectation(\"if\", false);\n\
         var peg$c1 = peg$classExpectation([[\"a\", \"z\"]], false, false);\n\
         var peg$c2 = peg$anyExpectation();\n\
         function peg$a0(depth) {\ntail\n}",
        sut.declarations(&JsRenderer),
    );

    let sut = compile(
        &g,
        &CompileOptions {
            cache: true,
            ..Default::default()
        },
    );
    assert!(sut
        .declarations(&JsRenderer)
        .starts_with("var peg$resultsCache = {};\n"));
}
