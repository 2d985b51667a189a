// Grammar compilation driver
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

//! Compile an entire [`Grammar`].
//!
//! [`compile`] runs every analysis,
//!   collects the supporting tables,
//!   lowers each primitive expression into a [`MatchPlan`],
//!   and describes how each rule is to be generated as a [`RuleUnit`].
//! The result is target-independent;
//!   see [`Compilation::declarations`] for rendering its tables.

use crate::{
    analyze::{analyze, Analysis},
    codegen::{
        cache::{CachePlan, RuleVariant},
        class::compile_class,
        ir::{MatchPlan, Reg},
        js::JsRenderer,
        literal::compile_literal,
        tables::{ActionTable, ExpectationTable},
    },
    grammar::{Expr, ExprId, Grammar, RuleId},
    visit::{walk, Visit},
};
use fxhash::FxHashMap;

/// Register into which every primitive plan loads its result.
const RESULT_REG: Reg = Reg(0);

/// Options affecting the output of [`compile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileOptions {
    /// Prefer smaller generated code to faster character class tests.
    pub optimize_code_size: bool,

    /// Memoize rule results.
    pub cache: bool,
}

/// A single generated variant of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantUnit {
    pub variant: RuleVariant,

    /// Name of the generated function.
    pub function: String,

    /// Memoization of this variant,
    ///   if caching is enabled.
    pub cache: Option<CachePlan>,
}

/// How a rule is to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleUnit {
    pub id: RuleId,
    pub name: String,

    /// Both eager variants,
    ///   followed by the stream variant for stream entry rules.
    pub variants: Vec<VariantUnit>,

    pub always_match: bool,
    pub reports_failure: bool,

    /// Whether the rule may be used as an eager entry point.
    pub is_start: bool,

    /// Whether the rule may be used as a streaming entry point.
    pub is_stream: bool,
}

impl RuleUnit {
    pub fn variant(&self, variant: RuleVariant) -> Option<&VariantUnit> {
        self.variants.iter().find(|v| v.variant == variant)
    }
}

/// Output of [`compile`].
#[derive(Debug, Clone)]
pub struct Compilation {
    options: CompileOptions,
    analysis: Analysis,
    expectations: ExpectationTable,
    actions: ActionTable,
    plans: FxHashMap<ExprId, MatchPlan>,
    rules: Vec<RuleUnit>,
}

impl Compilation {
    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn expectations(&self) -> &ExpectationTable {
        &self.expectations
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Plan of a `literal`,
    ///   `class`,
    ///   or `any` expression.
    pub fn plan(&self, expr: ExprId) -> Option<&MatchPlan> {
        self.plans.get(&expr)
    }

    pub fn rule(&self, id: RuleId) -> &RuleUnit {
        &self.rules[id.index()]
    }

    pub fn rules(&self) -> &[RuleUnit] {
        &self.rules
    }

    /// Render the declarations shared by every generated rule:
    ///   the result cache
    ///     (if enabled),
    ///   expectations,
    ///   and actions,
    ///     one per line.
    pub fn declarations(&self, r: &JsRenderer) -> String {
        let mut decls = Vec::new();

        if self.options.cache {
            decls.push(r.cache_init());
        }

        decls.extend(
            self.expectations
                .iter()
                .map(|(index, exp)| r.expectation_decl(index, exp)),
        );

        decls.extend(
            self.actions
                .iter()
                .map(|(index, action)| r.action_decl(index, action)),
        );

        decls.join("\n")
    }
}

/// Lowers every primitive expression of a grammar.
struct PlanCollector {
    optimize_code_size: bool,
}

impl Visit for PlanCollector {
    type Ctx = FxHashMap<ExprId, MatchPlan>;
    type Output = ();

    fn visit(&mut self, g: &Grammar, id: ExprId, plans: &mut Self::Ctx) {
        let plan = match g.expr(id) {
            Expr::Literal { value, ignore_case } => {
                compile_literal(value, *ignore_case, RESULT_REG)
            }
            Expr::Class(class) => {
                compile_class(class, RESULT_REG, self.optimize_code_size)
            }
            Expr::Any => MatchPlan::any(RESULT_REG),
            _ => return walk(self, g, id, plans),
        };

        plans.insert(id, plan);
    }
}

/// Compile `g` according to `opts`.
///
/// See the [module-level documentation](self) for more information.
pub fn compile(g: &Grammar, opts: &CompileOptions) -> Compilation {
    let analysis = analyze(g);
    let expectations = ExpectationTable::new(g);
    let actions = ActionTable::new(g);

    let mut plans = FxHashMap::default();
    PlanCollector {
        optimize_code_size: opts.optimize_code_size,
    }
    .visit_grammar(g, &mut plans);

    let r = JsRenderer;

    let rules = g
        .rules()
        .map(|(id, rule)| {
            let is_stream = g.is_stream(id);

            let mut variants = vec![RuleVariant::Produce, RuleVariant::Discard];
            if is_stream {
                variants.push(RuleVariant::Stream);
            }

            RuleUnit {
                id,
                name: rule.name().to_string(),
                variants: variants
                    .into_iter()
                    .map(|variant| VariantUnit {
                        variant,
                        function: r.function_name(rule.name(), variant),
                        cache: opts
                            .cache
                            .then(|| CachePlan::new(id, rule, variant)),
                    })
                    .collect(),
                always_match: analysis.rule_always_matches(id),
                reports_failure: analysis.rule_reports_failure(id),
                is_start: g.is_start(id),
                is_stream,
            }
        })
        .collect();

    Compilation {
        options: *opts,
        analysis,
        expectations,
        actions,
        plans,
        rules,
    }
}

#[cfg(test)]
mod test;
