// Rule result memoization codegen
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

//! Memoization of rule results.
//!
//! Each variant of each rule is assigned a dense _slot_.
//! A cache entry is keyed by the slot,
//!   the cursor position at which the rule was invoked,
//!   and the current values of any of the rule's by-reference parameters.
//!
//! By-reference parameters may be mutated by the rule body.
//! Rather than storing every such value in every entry,
//!   an entry records a _delta_ only for those parameters whose value
//!   changed during the invocation;
//!     upon a hit,
//!       only those parameters are restored.
//! See [`crate::runtime::ParseContext::call_cached`].

use crate::{
    global::RULE_VARIANT_COUNT,
    grammar::{Rule, RuleId},
};
use std::fmt::Display;

/// The manner in which a rule is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleVariant {
    /// Eager invocation producing a result value.
    Produce,

    /// Eager invocation whose result value is not needed;
    ///   only success and cursor movement are observed.
    Discard,

    /// Lazy invocation producing a sequence of results.
    Stream,
}

impl RuleVariant {
    /// Dense index of this variant within a rule.
    pub fn index(self) -> u32 {
        match self {
            Self::Produce => 0,
            Self::Discard => 1,
            Self::Stream => 2,
        }
    }
}

impl Display for RuleVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Produce => write!(f, "eager produce"),
            Self::Discard => write!(f, "eager discard"),
            Self::Stream => write!(f, "stream"),
        }
    }
}

/// Dense cache slot of `variant` of `rule`.
pub fn cache_slot(rule: RuleId, variant: RuleVariant) -> u32 {
    rule.index() as u32 * RULE_VARIANT_COUNT + variant.index()
}

/// How to memoize one variant of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePlan {
    slot: u32,
    ref_params: Vec<String>,
}

impl CachePlan {
    pub fn new(id: RuleId, rule: &Rule, variant: RuleVariant) -> Self {
        Self {
            slot: cache_slot(id, variant),
            ref_params: rule.ref_params().map(|p| p.name.clone()).collect(),
        }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// By-reference parameters whose values contribute to the key and
    ///   which may be restored from a delta.
    pub fn ref_params(&self) -> &[String] {
        &self.ref_params
    }
}
