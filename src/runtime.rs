// Execution of compiled grammars
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

//! Direct execution of codegen output.
//!
//! A [`ParseContext`] is created for each top-level parse invocation and
//!   holds all state for that invocation:
//!
//!   - the input and the cursor,
//!       which is a byte offset into the input and always lies on a
//!       character boundary;
//!   - the rule result cache used by [`ParseContext::call_cached`]; and
//!   - the [`FailureTracker`] recording the furthest failure.
//!
//! None of this state outlives the context,
//!   and nothing is shared between contexts.
//!
//! The context is generic over the type of rule results `V` and the type
//!   of values held by by-reference rule parameters `R`.

mod failure;
mod stream;

pub use failure::{FailureTracker, ParseError};
pub use stream::Stream;

use crate::{
    codegen::{
        ir::{Cond, MatchPlan, Reg, Stmt, Width},
        tables::ExpectationTable,
    },
    global::MATCH_PLAN_MAX_REGS,
};
use arrayvec::ArrayVec;
use fxhash::FxHashMap;
use memchr::memmem;
use std::{cell::RefCell, fmt::Display, rc::Rc};

/// A by-reference rule parameter.
///
/// Clones share the same cell,
///   so a value set by a callee is visible to its caller.
#[derive(Debug, Default)]
pub struct Reference<R>(Rc<RefCell<R>>);

impl<R> Reference<R> {
    pub fn new(value: R) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: R) {
        *self.0.borrow_mut() = value;
    }
}

impl<R: Clone> Reference<R> {
    pub fn get(&self) -> R {
        self.0.borrow().clone()
    }
}

impl<R> Clone for Reference<R> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// Key of a rule result cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    slot: u32,
    pos: usize,

    /// Rendered value of each by-reference parameter at invocation.
    ///
    /// Values are kept apart so that no two argument lists share a key.
    refs: Vec<String>,
}

impl CacheKey {
    fn new<R: Clone + Display>(
        slot: u32,
        pos: usize,
        refs: &[&Reference<R>],
    ) -> Self {
        Self {
            slot,
            pos,
            refs: refs.iter().map(|r| r.get().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V, R> {
    next_pos: usize,
    result: Option<V>,

    /// By-reference parameters whose values changed during the
    ///   invocation,
    ///     by index into the parameter list.
    deltas: Vec<(usize, R)>,
}

/// Registers of a [`MatchPlan`] during execution.
///
/// Unset registers read as the empty string.
#[derive(Debug, Default)]
struct Registers<'a>(ArrayVec<&'a str, MATCH_PLAN_MAX_REGS>);

impl<'a> Registers<'a> {
    fn get(&self, reg: Reg) -> &'a str {
        self.0.get(reg.0 as usize).copied().unwrap_or("")
    }

    /// Set `reg`.
    ///
    /// Codegen never allocates more than [`MATCH_PLAN_MAX_REGS`]
    ///   registers;
    ///     a plan that does is a bug and not a failure to match.
    fn set(&mut self, reg: Reg, value: &'a str) -> Option<()> {
        let index = reg.0 as usize;

        debug_assert!(
            index < MATCH_PLAN_MAX_REGS,
            "plan register {reg} out of bounds",
        );

        while self.0.len() <= index {
            self.0.try_push("").ok()?;
        }

        self.0[index] = value;
        Some(())
    }
}

/// State of a single parse invocation.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug)]
pub struct ParseContext<'i, V, R = ()> {
    input: &'i str,
    pos: usize,
    cache: FxHashMap<CacheKey, CacheEntry<V, R>>,
    failure: FailureTracker,
}

impl<'i, V, R> ParseContext<'i, V, R> {
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            pos: 0,
            cache: FxHashMap::default(),
            failure: FailureTracker::default(),
        }
    }

    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Byte offset of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to `pos`,
    ///   which must have been previously observed via [`Self::pos`].
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Input remaining after the cursor.
    pub fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Record a failure to match the expectation `index` at the cursor.
    pub fn fail(&mut self, index: usize) {
        self.failure.fail(self.pos, index)
    }

    /// Failure of a rule that does not report failures.
    pub fn fail_silently(&mut self) {
        self.failure.fail_silently()
    }

    pub fn failure(&self) -> &FailureTracker {
        &self.failure
    }

    /// Byte length of the first `n` characters of `s`,
    ///   or the length of `s` if it is shorter.
    fn char_prefix_len(s: &str, n: usize) -> usize {
        s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
    }

    fn advance(&mut self, width: Width) {
        self.pos += Self::char_prefix_len(self.rest(), width.chars);
    }

    /// Execute `plan` at the cursor.
    ///
    /// On success the cursor is advanced and the consumed input is
    ///   returned.
    /// On failure the cursor is left untouched.
    pub fn exec(&mut self, plan: &MatchPlan) -> Option<&'i str> {
        let start = self.pos;

        match self.exec_plan(plan) {
            Some(()) => Some(&self.input[start..self.pos]),
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn exec_plan(&mut self, plan: &MatchPlan) -> Option<()> {
        let mut regs = Registers::default();

        for stmt in &plan.block {
            self.run(stmt, &mut regs)?;
        }

        if !self.test(&plan.cond, &regs) {
            return None;
        }

        for stmt in &plan.on_success {
            self.run(stmt, &mut regs)?;
        }

        Some(())
    }

    fn run<'a>(
        &mut self,
        stmt: &'a Stmt,
        regs: &mut Registers<'a>,
    ) -> Option<()>
    where
        'i: 'a,
    {
        let rest = self.rest();

        match stmt {
            Stmt::LoadChar(reg) | Stmt::LoadCodePoint(reg) => {
                regs.set(*reg, &rest[..Self::char_prefix_len(rest, 1)])
            }
            Stmt::LoadSubstr(reg, width) => {
                let len = Self::char_prefix_len(rest, width.chars);
                regs.set(*reg, &rest[..len])
            }
            Stmt::TakeChar(reg) => {
                let len = Self::char_prefix_len(rest, 1);
                self.pos += len;
                regs.set(*reg, &rest[..len])
            }
            Stmt::Assign(reg, value) => regs.set(*reg, value),
            Stmt::Advance(width) => {
                self.advance(*width);
                Some(())
            }
            Stmt::AdvancePast(reg) => {
                self.pos += regs.get(*reg).len();
                Some(())
            }
        }
    }

    fn test(&self, cond: &Cond, regs: &Registers) -> bool {
        match cond {
            Cond::Const(value) => *value,
            Cond::NotAtEnd => !self.at_end(),

            Cond::CodeAt(unit) => self
                .rest()
                .chars()
                .next()
                .and_then(|c| c.encode_utf16(&mut [0; 2]).first().copied())
                == Some(*unit),

            Cond::RegEq(reg, value) => regs.get(*reg) == value.as_str(),
            Cond::RegEqLower(reg, value) => {
                regs.get(*reg).to_lowercase() == *value
            }

            Cond::InSet { reg, set, inverted } => {
                let candidate = regs.get(*reg);

                !candidate.is_empty()
                    && memmem::find(set.as_bytes(), candidate.as_bytes())
                        .is_some()
                        != *inverted
            }

            Cond::InRanges {
                reg,
                ranges,
                inverted,
                ignore_case,
            } => match regs.get(*reg).chars().next() {
                None => false,
                Some(c) => {
                    let in_ranges =
                        |c: char| ranges.iter().any(|r| r.contains(c));

                    let found = in_ranges(c)
                        || (*ignore_case
                            && (single(c.to_lowercase()).is_some_and(in_ranges)
                                || single(c.to_uppercase())
                                    .is_some_and(in_ranges)));

                    found != *inverted
                }
            },

            Cond::And(a, b) => self.test(a, regs) && self.test(b, regs),
            Cond::Or(a, b) => self.test(a, regs) || self.test(b, regs),
        }
    }

    /// Convert this context into an iterator yielding each successive
    ///   result of `f`.
    ///
    /// See [`Stream`] for more information.
    pub fn stream<F>(self, f: F) -> Stream<'i, V, R, F>
    where
        F: FnMut(&mut Self) -> Option<V>,
    {
        Stream::new(self, f)
    }

    /// Conclude the parse with the `result` of the start rule.
    ///
    /// The parse succeeds only if the start rule matched and consumed all
    ///   input;
    ///     otherwise the furthest failure is reported,
    ///     with expectations described by `expectations`.
    pub fn finish(
        mut self,
        result: Option<V>,
        expectations: &ExpectationTable,
    ) -> Result<V, ParseError> {
        match result {
            Some(value) if self.at_end() => return Ok(value),
            Some(_) => self.failure.fail_end(self.pos),
            None => (),
        }

        Err(ParseError::new(self.input, &self.failure, expectations))
    }
}

impl<'i, V: Clone, R: Clone + PartialEq + Display> ParseContext<'i, V, R> {
    /// Invoke a memoized rule `body`.
    ///
    /// The result is keyed by `slot`,
    ///   the cursor,
    ///   and the current values of the by-reference parameters `refs`.
    /// On a hit,
    ///   the cursor is restored to where the original invocation left it,
    ///   each parameter in `refs` that the original invocation changed is
    ///     set to its final value,
    ///   and the cached result is returned without invoking `body`.
    /// On a miss,
    ///   `body` is invoked and its result stored,
    ///   along with the final value of each parameter in `refs` that it
    ///     changed.
    pub fn call_cached<F>(
        &mut self,
        slot: u32,
        refs: &[&Reference<R>],
        body: F,
    ) -> Option<V>
    where
        F: FnOnce(&mut Self) -> Option<V>,
    {
        let key = CacheKey::new(slot, self.pos, refs);

        if let Some(entry) = self.cache.get(&key) {
            self.pos = entry.next_pos;

            for (index, value) in &entry.deltas {
                if let Some(r) = refs.get(*index) {
                    r.set(value.clone());
                }
            }

            return entry.result.clone();
        }

        let saved = refs.iter().map(|r| r.get()).collect::<Vec<_>>();
        let result = body(self);

        let deltas = refs
            .iter()
            .zip(saved)
            .enumerate()
            .filter_map(|(index, (r, saved))| {
                let value = r.get();
                (value != saved).then_some((index, value))
            })
            .collect();

        self.cache.insert(
            key,
            CacheEntry {
                next_pos: self.pos,
                result: result.clone(),
                deltas,
            },
        );

        result
    }
}

fn single<I: Iterator<Item = char>>(mut chars: I) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
