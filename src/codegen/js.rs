// JavaScript rendering of codegen output
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

//! Render codegen output as JavaScript.
//!
//! This is the exemplar target.
//! Rendering is a pure function of the structured output of codegen
//!   ([`MatchPlan`], [`CachePlan`], and the supporting tables);
//!     no decisions about _what_ to match are made here.
//!
//! The generated code follows these conventions:
//!
//!   - The input string is `input` and the cursor is `peg$currPos`,
//!       counted in UTF-16 code units;
//!   - Failure is the sentinel `peg$FAILED`;
//!   - A rule parameter `x` is bound to `param_x`,
//!       and a by-reference parameter is a cell whose value is
//!       `param_x.value`;
//!   - Expectation `N` is declared as `peg$cN` and action `N` as the
//!       function `peg$aN`.
//!
//! Multi-line output is indented by two spaces per level and does not
//!   end in a newline.

use super::{
    cache::{CachePlan, RuleVariant},
    class::{escape_ranges, ClassRange},
    escape::{escape_literal, stringify},
    ir::{Cond, MatchPlan, Stmt},
    tables::{Action, Expectation},
};
use crate::grammar::{ClassPart, Param};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Renders codegen output as JavaScript source text.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsRenderer;

impl JsRenderer {
    pub fn cond(&self, cond: &Cond) -> String {
        match cond {
            Cond::Const(value) => value.to_string(),
            Cond::NotAtEnd => "peg$currPos < input.length".into(),
            Cond::CodeAt(unit) => {
                format!("input.charCodeAt(peg$currPos) === {unit}")
            }
            Cond::RegEq(reg, value) => {
                format!("{reg} === {}", stringify(value))
            }
            Cond::RegEqLower(reg, value) => {
                format!("{reg}.toLowerCase() === {}", stringify(value))
            }
            Cond::InSet { reg, set, inverted } => format!(
                "{reg} && \"{}\".indexOf({reg}) {} -1",
                escape_literal(set),
                if *inverted { "===" } else { "!==" },
            ),
            Cond::InRanges {
                reg,
                ranges,
                inverted,
                ignore_case,
            } => format!(
                "/^[{}{}]/{}{}.test({reg})",
                if *inverted { "^" } else { "" },
                escape_ranges(ranges),
                if *ignore_case { "i" } else { "" },
                // Surrogate pair escapes name a single code point only in
                //   unicode mode.
                if ranges.iter().any(ClassRange::is_astral) { "u" } else { "" },
            ),
            Cond::And(a, b) => {
                format!("({})&&({})", self.cond(a), self.cond(b))
            }
            Cond::Or(a, b) => {
                format!("({})||({})", self.cond(a), self.cond(b))
            }
        }
    }

    pub fn stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::LoadChar(reg) => {
                format!("{reg} = input.charAt(peg$currPos);")
            }
            Stmt::LoadCodePoint(reg) => format!(
                "{reg} = peg$currPos < input.length \
                    ? String.fromCodePoint(input.codePointAt(peg$currPos)) \
                    : \"\";"
            ),
            Stmt::LoadSubstr(reg, width) => {
                format!("{reg} = input.substr(peg$currPos, {});", width.utf16)
            }
            Stmt::TakeChar(reg) => {
                format!("{reg} = input.charAt(peg$currPos++);")
            }
            Stmt::Assign(reg, value) => {
                format!("{reg} = {};", stringify(value))
            }
            Stmt::Advance(width) if width.utf16 == 1 => "peg$currPos++;".into(),
            Stmt::Advance(width) => format!("peg$currPos += {};", width.utf16),
            Stmt::AdvancePast(reg) => format!("peg$currPos += {reg}.length;"),
        }
    }

    /// Render a complete matching block for `plan`.
    ///
    /// On failure the result register is set to `peg$FAILED`,
    ///   and,
    ///     if `expectation` is provided,
    ///     the failure is recorded against that expectation index.
    /// Rules that do not report failures should pass [`None`].
    pub fn match_plan(
        &self,
        plan: &MatchPlan,
        expectation: Option<usize>,
    ) -> String {
        let mut out = String::new();

        for stmt in &plan.block {
            out.push_str(&self.stmt(stmt));
            out.push('\n');
        }

        let _ = writeln!(out, "if ({}) {{", self.cond(&plan.cond));

        for stmt in &plan.on_success {
            let _ = writeln!(out, "{INDENT}{}", self.stmt(stmt));
        }

        out.push_str("} else {\n");
        let _ = writeln!(out, "{INDENT}{} = peg$FAILED;", plan.reg);

        if let Some(index) = expectation {
            let _ = writeln!(out, "{INDENT}peg$fail(peg$c{index});");
        }

        out.push('}');
        out
    }

    /// Name of the function implementing `variant` of the rule `name`.
    pub fn function_name(&self, name: &str, variant: RuleVariant) -> String {
        match variant {
            RuleVariant::Produce => format!("peg$parse{name}"),
            RuleVariant::Discard => format!("peg$discard{name}"),
            RuleVariant::Stream => format!("peg$stream{name}"),
        }
    }

    /// Opening line of the declaration of `variant` of the rule `name`.
    ///
    /// Stream variants are generator functions.
    pub fn rule_decl(
        &self,
        name: &str,
        variant: RuleVariant,
        params: &[Param],
    ) -> String {
        let keyword = match variant {
            RuleVariant::Stream => "function*",
            RuleVariant::Produce | RuleVariant::Discard => "function",
        };

        format!(
            "{keyword} {}({}) {{",
            self.function_name(name, variant),
            params
                .iter()
                .map(|p| format!("param_{}", p.name))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Declaration of the result cache,
    ///   emitted once per parse invocation.
    pub fn cache_init(&self) -> String {
        "var peg$resultsCache = {};".into()
    }

    /// Cache lookup emitted at the top of a memoized rule variant.
    ///
    /// On a hit,
    ///   the cursor and any by-reference parameters with recorded deltas
    ///   are restored and the cached result is returned.
    /// On a miss,
    ///   by-reference parameters are snapshotted for
    ///   [`Self::cache_store`].
    pub fn cache_start(&self, plan: &CachePlan) -> String {
        let mut out = String::new();

        let mut key = vec![plan.slot().to_string(), "peg$currPos".into()];
        key.extend(
            plan.ref_params().iter().map(|p| format!("param_{p}.value")),
        );

        let _ = writeln!(
            out,
            "var key = [{}].map(String).join(\":\"),",
            key.join(", "),
        );
        out.push_str("    cached = peg$resultsCache[key];\n");
        out.push_str("if (cached) {\n");
        let _ = writeln!(out, "{INDENT}peg$currPos = cached.nextPos;");

        for p in plan.ref_params() {
            let _ = writeln!(
                out,
                "{INDENT}if (cached.hasOwnProperty(\"${p}\")) \
                    param_{p}.value = cached.${p};",
            );
        }

        let _ = writeln!(out, "{INDENT}return cached.result;");
        out.push('}');

        for p in plan.ref_params() {
            let _ = write!(out, "\nvar saved_{p} = param_{p}.value;");
        }

        out
    }

    /// Cache store emitted after the body of a memoized rule variant,
    ///   where `result` holds the result of the body.
    ///
    /// Only by-reference parameters whose values changed since
    ///   [`Self::cache_start`] are recorded.
    pub fn cache_store(&self, plan: &CachePlan, result: &str) -> String {
        let mut out = String::new();

        out.push_str("peg$resultsCache[key] = cached = {\n");
        let _ = writeln!(out, "{INDENT}nextPos: peg$currPos,");
        let _ = writeln!(out, "{INDENT}result: {result},");
        out.push_str("};");

        for p in plan.ref_params() {
            let _ = write!(
                out,
                "\nif (saved_{p} !== param_{p}.value) \
                    cached.${p} = param_{p}.value;",
            );
        }

        out
    }

    /// Constructor call describing `exp` for failure reports.
    pub fn expectation(&self, exp: &Expectation) -> String {
        match exp {
            Expectation::Literal { value, ignore_case } => format!(
                "peg$literalExpectation({}, {ignore_case})",
                stringify(value),
            ),

            Expectation::Class(class) => {
                let parts = class
                    .parts
                    .iter()
                    .map(|part| match part {
                        ClassPart::Char(c) => stringify(&c.to_string()),
                        ClassPart::Range(start, end) => format!(
                            "[{}, {}]",
                            stringify(&start.to_string()),
                            stringify(&end.to_string()),
                        ),
                    })
                    .collect::<Vec<_>>();

                format!(
                    "peg$classExpectation([{}], {}, {})",
                    parts.join(", "),
                    class.inverted,
                    class.ignore_case,
                )
            }

            Expectation::Any => "peg$anyExpectation()".into(),
            Expectation::Other(name) => {
                format!("peg$otherExpectation({})", stringify(name))
            }
        }
    }

    pub fn expectation_decl(&self, index: usize, exp: &Expectation) -> String {
        format!("var peg$c{index} = {};", self.expectation(exp))
    }

    /// Declaration of action `index`,
    ///   taking the labeled values in scope as positional arguments.
    pub fn action_decl(&self, index: usize, action: &Action) -> String {
        format!(
            "function peg$a{index}({}) {{\n{}\n}}",
            action.params.join(", "),
            action.code,
        )
    }
}

#[cfg(test)]
mod test;
