// Analysis tracing
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

//! Tracing for grammar analyses.
//!
//! This provides human-readable traces on standard error as analyses
//!   derive attributes of rules.
//! These traces are provided automatically when `cfg(test)`,
//!   which means that they are automatically included in the output of any
//!   test failure.
//!
//! Outside of tests,
//!   this can be enabled using the `analysis-trace-stderr` feature flag.
//!
//! _These traces are not meant to be machine-readable!_
//! Do not try to parse them since the format is subject to change without
//!   notice.

use crate::grammar::{Grammar, RuleId};
use crate::span::Span;

pub trait AnalysisTrace: Default {
    /// The always-match attribute of `rule` has been computed.
    ///
    /// There is no means to return an error and a failure to output the
    ///   trace should not interrupt processing.
    fn trace_always_match(&mut self, g: &Grammar, rule: RuleId, result: bool);

    /// The recursion bound was reached upon entering `rule`,
    ///   which is conservatively assumed not to always match.
    fn trace_cutoff(&mut self, g: &Grammar, rule: RuleId);

    /// `rule` is an entry point and so reports failures unconditionally.
    fn trace_seed(&mut self, g: &Grammar, rule: RuleId);

    /// `rule` has been marked as reporting failures because it is
    ///   referenced by the failure-reporting rule `from` at `span`.
    fn trace_reports_failure(
        &mut self,
        g: &Grammar,
        rule: RuleId,
        from: RuleId,
        span: Span,
    );
}

/// Perform no tracing.
///
/// This should be used by default for non-test builds.
#[derive(Debug, PartialEq, Default)]
pub struct VoidTrace;

impl AnalysisTrace for VoidTrace {
    fn trace_always_match(&mut self, _g: &Grammar, _rule: RuleId, _: bool) {
        // Do nothing at all.
    }

    fn trace_cutoff(&mut self, _g: &Grammar, _rule: RuleId) {
        // Do nothing at all.
    }

    fn trace_seed(&mut self, _g: &Grammar, _rule: RuleId) {
        // Do nothing at all.
    }

    fn trace_reports_failure(
        &mut self,
        _g: &Grammar,
        _rule: RuleId,
        _from: RuleId,
        _span: Span,
    ) {
        // Do nothing at all.
    }
}

/// Human-readable [`AnalysisTrace`].
///
/// See [module-level](super) documentation for more information.
#[derive(Debug, PartialEq, Default)]
pub struct HumanReadableTrace;

impl HumanReadableTrace {
    fn note_cfg() {
        #[allow(unused_variables)]
        let cfg = ""; // so that this compiles without matching cfg
        #[cfg(feature = "analysis-trace-stderr")]
        #[allow(unused_variables)]
        let cfg = "feature = \"analysis-trace-stderr\"";
        #[cfg(test)] // takes precedence if both are set
        let cfg = "test";
        eprint!(
            "= note: this trace was output as a debugging aid \
                because `cfg({cfg})`.\n\n",
        );
    }
}

impl AnalysisTrace for HumanReadableTrace {
    fn trace_always_match(&mut self, g: &Grammar, rule: RuleId, result: bool) {
        eprint!(
            "\
[AlwaysMatch::visit_rule] {name} ({rule})
| ==> always matches: {result}\n",
            name = g.rule(rule).name(),
        );
        Self::note_cfg();
    }

    fn trace_cutoff(&mut self, g: &Grammar, rule: RuleId) {
        eprint!(
            "\
[AlwaysMatch::visit_rule] {name} ({rule})
| ==> recursion bound reached; assuming it may fail\n",
            name = g.rule(rule).name(),
        );
        Self::note_cfg();
    }

    fn trace_seed(&mut self, g: &Grammar, rule: RuleId) {
        eprint!(
            "\
[ReportsFailure::seed] {name} ({rule})
| ==> entry point reports failures\n",
            name = g.rule(rule).name(),
        );
        Self::note_cfg();
    }

    fn trace_reports_failure(
        &mut self,
        g: &Grammar,
        rule: RuleId,
        from: RuleId,
        span: Span,
    ) {
        eprint!(
            "\
[ReportsFailure::propagate] {name} ({rule})
| ==> referenced by {from_name} ({from}) at {span}
|  |  now reports failures\n",
            name = g.rule(rule).name(),
            from_name = g.rule(from).name(),
        );
        Self::note_cfg();
    }
}

/// Trace used when none is requested explicitly.
#[cfg(any(test, feature = "analysis-trace-stderr"))]
pub type DefaultTrace = HumanReadableTrace;

/// Trace used when none is requested explicitly.
#[cfg(not(any(test, feature = "analysis-trace-stderr")))]
pub type DefaultTrace = VoidTrace;
