// Grammar analyses
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

//! Attributes derived from a [`Grammar`].
//!
//! Analyses never modify the grammar;
//!   each produces a side table indexed by [`RuleId`] and/or
//!   [`ExprId`](crate::grammar::ExprId).
//! The failure-reporting analysis consumes the results of the always-match
//!   analysis,
//!     so [`analyze`] runs them in that order.

pub mod always_match;
pub mod failure;
pub mod trace;

pub use always_match::{compute_always_match, AlwaysMatch};
pub use failure::{compute_reports_failure, FailureGraph, ReportsFailure};

use crate::grammar::{Grammar, RuleId};

/// Results of all analyses of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    always_match: AlwaysMatch,
    reports_failure: ReportsFailure,
}

impl Analysis {
    pub fn always_match(&self) -> &AlwaysMatch {
        &self.always_match
    }

    pub fn reports_failure(&self) -> &ReportsFailure {
        &self.reports_failure
    }

    /// Shorthand for [`AlwaysMatch::rule`].
    pub fn rule_always_matches(&self, rule: RuleId) -> bool {
        self.always_match.rule(rule)
    }

    /// Shorthand for [`ReportsFailure::rule`].
    pub fn rule_reports_failure(&self, rule: RuleId) -> bool {
        self.reports_failure.rule(rule)
    }
}

/// Run every analysis over `g`.
pub fn analyze(g: &Grammar) -> Analysis {
    let always_match = compute_always_match(g);
    let reports_failure = compute_reports_failure(g, &always_match);

    Analysis {
        always_match,
        reports_failure,
    }
}
