// Tests for JavaScript rendering
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
    codegen::{
        class::{compile_class, ClassRange},
        ir::{Reg, Width},
        literal::compile_literal,
    },
    grammar::{CharClass, ExprId, GrammarBuilder, RuleId},
    span::dummy::*,
};

const R0: Reg = Reg(0);

#[test]
fn single_char_literal_compares_code_unit() {
    let plan = compile_literal("i", false, R0);

    assert_eq!(
        "input.charCodeAt(peg$currPos) === 105",
        JsRenderer.cond(&plan.cond),
    );
    assert_eq!(
        vec!["r0 = \"i\";", "peg$currPos++;"],
        plan.on_success
            .iter()
            .map(|s| JsRenderer.stmt(s))
            .collect::<Vec<_>>(),
    );
}

#[test]
fn multi_char_literal() {
    let plan = compile_literal("if", false, R0);

    assert_eq!(
        "r0 = input.substr(peg$currPos, 2);\n\
         if (r0 === \"if\") {\n\
         \x20 peg$currPos += 2;\n\
         } else {\n\
         \x20 r0 = peg$FAILED;\n\
         \x20 peg$fail(peg$c4);\n\
         }",
        JsRenderer.match_plan(&plan, Some(4)),
    );
}

#[test]
fn case_insensitive_literal() {
    let plan = compile_literal("IF", true, R0);

    assert_eq!("r0.toLowerCase() === \"if\"", JsRenderer.cond(&plan.cond));
}

#[test]
fn silent_match_plan_records_no_failure() {
    let plan = compile_literal("ab", false, R0);

    assert!(!JsRenderer.match_plan(&plan, None).contains("peg$fail"));
}

#[test]
fn class_membership_tests() {
    let abc = CharClass {
        parts: vec![ClassPart::Range('a', 'c')],
        ..Default::default()
    };

    assert_eq!(
        "r0 && \"abc\".indexOf(r0) !== -1",
        JsRenderer.cond(&compile_class(&abc, R0, false).cond),
    );

    let inverted = CharClass {
        inverted: true,
        ignore_case: true,
        ..abc
    };

    assert_eq!(
        "/^[^a-c]/i.test(r0)",
        JsRenderer.cond(&compile_class(&inverted, R0, true).cond),
    );
}

#[test]
fn astral_class_loads_whole_code_points() {
    let class = CharClass {
        parts: vec![ClassPart::Char('😀')],
        ..Default::default()
    };

    let plan = compile_class(&class, R0, false);
    assert_eq!(
        "r0 = peg$currPos < input.length \
            ? String.fromCodePoint(input.codePointAt(peg$currPos)) \
            : \"\";\n\
         if (r0 && \"\\uD83D\\uDE00\".indexOf(r0) !== -1) {\n\
         \x20 peg$currPos += r0.length;\n\
         } else {\n\
         \x20 r0 = peg$FAILED;\n\
         }",
        JsRenderer.match_plan(&plan, None),
    );

    // Surrogate pair escapes require unicode mode.
    let plan = compile_class(&class, R0, true);
    assert_eq!(
        "/^[\\uD83D\\uDE00]/u.test(r0)",
        JsRenderer.cond(&plan.cond),
    );
}

#[test]
fn combined_conditions_are_parenthesized() {
    let cond = Cond::Or(
        Box::new(Cond::InSet {
            reg: R0,
            set: "\"".into(),
            inverted: false,
        }),
        Box::new(Cond::InRanges {
            reg: R0,
            ranges: vec![ClassRange::new('\u{100}', '\u{1FF}')],
            inverted: false,
            ignore_case: false,
        }),
    );

    assert_eq!(
        "(r0 && \"\\\"\".indexOf(r0) !== -1)||(/^[Ā-ǿ]/.test(r0))",
        JsRenderer.cond(&cond),
    );
}

#[test]
fn any_takes_char() {
    let plan = MatchPlan::any(Reg(2));

    assert_eq!("peg$currPos < input.length", JsRenderer.cond(&plan.cond));
    assert_eq!(
        "r2 = input.charAt(peg$currPos++);",
        JsRenderer.stmt(&plan.on_success[0]),
    );
}

#[test]
fn advance_by_utf16_units() {
    assert_eq!(
        "peg$currPos += 2;",
        JsRenderer.stmt(&Stmt::Advance(Width { chars: 1, utf16: 2 })),
    );
}

#[test]
fn rule_declarations() {
    let params = [Param::value("flag"), Param::reference("depth")];

    assert_eq!(
        "function peg$parseExpr(param_flag, param_depth) {",
        JsRenderer.rule_decl("Expr", RuleVariant::Produce, &params),
    );
    assert_eq!(
        "function peg$discardExpr() {",
        JsRenderer.rule_decl("Expr", RuleVariant::Discard, &[]),
    );
    assert_eq!(
        "function* peg$streamExpr(param_flag, param_depth) {",
        JsRenderer.rule_decl("Expr", RuleVariant::Stream, &params),
    );
}

fn plan_with_refs(refs: Vec<Param>) -> CachePlan {
    let mut b = GrammarBuilder::new();
    let any = b.expr(crate::grammar::Expr::Any, S1);
    b.rule("Unused", vec![], any, S2);
    let any = b.expr(crate::grammar::Expr::Any, S3);
    let id = b.rule("R", refs, any, S4);
    let g = b.finish().unwrap();

    assert_eq!(RuleId::new(1), id);

    CachePlan::new(id, g.rule(id), RuleVariant::Discard)
}

#[test]
fn cache_blocks_without_reference_params() {
    let plan = plan_with_refs(vec![Param::value("x")]);

    assert_eq!(
        "var key = [4, peg$currPos].map(String).join(\":\"),\n\
         \x20   cached = peg$resultsCache[key];\n\
         if (cached) {\n\
         \x20 peg$currPos = cached.nextPos;\n\
         \x20 return cached.result;\n\
         }",
        JsRenderer.cache_start(&plan),
    );

    assert_eq!(
        "peg$resultsCache[key] = cached = {\n\
         \x20 nextPos: peg$currPos,\n\
         \x20 result: s0,\n\
         };",
        JsRenderer.cache_store(&plan, "s0"),
    );
}

#[test]
fn cache_blocks_record_reference_deltas() {
    let plan = plan_with_refs(vec![Param::reference("depth")]);

    assert_eq!(
        "var key = [4, peg$currPos, param_depth.value].map(String).join(\":\"),\n\
         \x20   cached = peg$resultsCache[key];\n\
         if (cached) {\n\
         \x20 peg$currPos = cached.nextPos;\n\
         \x20 if (cached.hasOwnProperty(\"$depth\")) param_depth.value = cached.$depth;\n\
         \x20 return cached.result;\n\
         }\n\
         var saved_depth = param_depth.value;",
        JsRenderer.cache_start(&plan),
    );

    assert!(JsRenderer.cache_store(&plan, "s0").ends_with(
        "};\nif (saved_depth !== param_depth.value) cached.$depth = param_depth.value;"
    ));

    assert_eq!("var peg$resultsCache = {};", JsRenderer.cache_init());
}

#[test]
fn expectation_declarations() {
    assert_eq!(
        "var peg$c0 = peg$literalExpectation(\"if\", false);",
        JsRenderer.expectation_decl(
            0,
            &Expectation::Literal {
                value: "if".into(),
                ignore_case: false,
            }
        ),
    );

    assert_eq!(
        "var peg$c1 = peg$classExpectation([[\"a\", \"z\"], \"_\"], true, false);",
        JsRenderer.expectation_decl(
            1,
            &Expectation::Class(CharClass {
                parts: vec![ClassPart::Range('a', 'z'), ClassPart::Char('_')],
                inverted: true,
                ignore_case: false,
            })
        ),
    );

    assert_eq!(
        "var peg$c2 = peg$anyExpectation();",
        JsRenderer.expectation_decl(2, &Expectation::Any),
    );

    assert_eq!(
        "var peg$c3 = peg$otherExpectation(\"number\");",
        JsRenderer.expectation_decl(3, &Expectation::Other("number".into())),
    );
}

#[test]
fn action_declaration() {
    let action = Action {
        expr: ExprId::new(3),
        rule: RuleId::new(0),
        code: " return a + b; ".into(),
        params: vec!["a".into(), "b".into()],
    };

    assert_eq!(
        "function peg$a7(a, b) {\n return a + b; \n}",
        JsRenderer.action_decl(7, &action),
    );
}
