// Character class reduction
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

//! Reduce character classes into membership tests.
//!
//! The parts of a class are first merged into a sorted list of disjoint,
//!   non-adjacent ranges (see [`merge_ranges`]).
//! Those ranges are then split between two kinds of test:
//!
//!   - A _set_ of individual characters,
//!       tested by substring membership; and
//!   - Bracket-expression _ranges_.
//!
//! When optimizing for speed,
//!   short ranges
//!     (and any range that still fits beneath
//!       [`CLASS_LITERAL_MAX_LEN`]
//!       together with what has already been unrolled)
//!   are unrolled into the set.
//! When optimizing for code size,
//!   nothing is unrolled and every range is tested as a bracket
//!   expression.
//!
//! A membership test against an empty candidate must never succeed,
//!   otherwise an inverted class would match forever at the end of the
//!   input without advancing.

use super::{
    escape::{escape_class_char, escape_literal},
    ir::{Cond, MatchPlan, Reg, Stmt, Width},
};
use crate::{
    global::{CLASS_LITERAL_MAX_LEN, CLASS_UNROLL_MIN_SPAN},
    grammar::{CharClass, ClassPart},
};
use std::fmt::Write;

/// An inclusive range of characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassRange {
    pub start: char,
    pub end: char,
}

impl ClassRange {
    pub fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    /// Distance between the endpoints in code points.
    ///
    /// A range of a single character has a span of zero.
    pub fn span(&self) -> u32 {
        (self.end as u32).saturating_sub(self.start as u32)
    }

    pub fn contains(&self, c: char) -> bool {
        self.start <= c && c <= self.end
    }

    /// Whether the range reaches beyond the Basic Multilingual Plane.
    pub fn is_astral(&self) -> bool {
        self.end > '\u{FFFF}'
    }
}

impl From<ClassPart> for ClassRange {
    fn from(part: ClassPart) -> Self {
        let (start, end) = part.endpoints();
        Self { start, end }
    }
}

/// Normalize,
///   sort,
///   and merge class parts.
///
/// Ranges that overlap or touch are merged,
///   so the result is sorted and every pair of consecutive ranges is
///   separated by at least one character.
/// Merging an already-merged list yields the same list.
pub fn merge_ranges<I>(parts: I) -> Vec<ClassRange>
where
    I: IntoIterator,
    I::Item: Into<ClassRange>,
{
    let mut ranges = parts.into_iter().map(Into::into).collect::<Vec<_>>();
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<ClassRange> = Vec::with_capacity(ranges.len());

    for range in ranges {
        match merged.last_mut() {
            Some(top) if range.start as u32 <= top.end as u32 + 1 => {
                top.end = top.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }

    merged
}

/// Reduction strategy for [`reduce_class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassOptions {
    /// Match irrespective of case.
    pub ignore_case: bool,

    /// Prefer smaller generated code to faster membership tests.
    pub optimize_code_size: bool,
}

/// A character class reduced into a set of characters and a list of
///   ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReducedClass {
    set: String,
    ranges: Vec<ClassRange>,
}

impl ReducedClass {
    /// Unescaped characters tested by membership,
    ///   in the order that they were unrolled.
    pub fn set(&self) -> &str {
        &self.set
    }

    /// Ranges tested by bracket expression.
    pub fn ranges(&self) -> &[ClassRange] {
        &self.ranges
    }

    /// Characters of [`Self::set`] escaped for a quoted string.
    pub fn literal(&self) -> String {
        escape_literal(&self.set)
    }

    /// Ranges escaped for the body of a bracket expression.
    pub fn ranges_escaped(&self) -> String {
        escape_ranges(&self.ranges)
    }

    /// Add `c` to the set unless it is already present.
    fn add(&mut self, c: char) {
        if !self.set.contains(c) {
            self.set.push(c);
        }
    }

    /// Add `c` to the set under the case options of the class.
    ///
    /// Case mappings that do not yield a single character are omitted.
    fn add_cased(&mut self, c: char, ignore_case: bool) {
        if !ignore_case {
            return self.add(c);
        }

        if let Some(upper) = single(c.to_uppercase()) {
            self.add(upper);
        }

        if let Some(lower) = single(c.to_lowercase()) {
            self.add(lower);
        }
    }
}

fn single<I: Iterator<Item = char>>(mut chars: I) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Reduce class `parts` according to `opts`.
///
/// See the [module-level documentation](self) for more information.
pub fn reduce_class<I>(parts: I, opts: ClassOptions) -> ReducedClass
where
    I: IntoIterator,
    I::Item: Into<ClassRange>,
{
    let merged = merge_ranges(parts);
    let mut reduced = ReducedClass::default();

    if opts.optimize_code_size {
        reduced.ranges = merged;
        return reduced;
    }

    for range in merged {
        let span = range.span() as usize;
        let unrolled = reduced.set.chars().count();

        if range.span() < CLASS_UNROLL_MIN_SPAN
            || unrolled + span < CLASS_LITERAL_MAX_LEN
        {
            for c in range.start..=range.end {
                reduced.add_cased(c, opts.ignore_case);
            }
        } else {
            reduced.ranges.push(range);
        }
    }

    reduced
}

/// Escape `ranges` for the body of a bracket expression.
///
/// Ranges of one or two characters are written without a dash.
pub fn escape_ranges(ranges: &[ClassRange]) -> String {
    let mut out = String::new();

    for range in ranges {
        let _ = match range.span() {
            0 => write!(out, "{}", escape_class_char(range.start)),
            1 => write!(
                out,
                "{}{}",
                escape_class_char(range.start),
                escape_class_char(range.end),
            ),
            _ => write!(
                out,
                "{}-{}",
                escape_class_char(range.start),
                escape_class_char(range.end),
            ),
        };
    }

    out
}

/// Compile `class` into a [`MatchPlan`] whose result is loaded into
///   `reg`.
///
/// A class with astral members loads and steps over whole code points,
///   since a single UTF-16 code unit would hold only half of a surrogate
///   pair.
pub fn compile_class(
    class: &CharClass,
    reg: Reg,
    optimize_code_size: bool,
) -> MatchPlan {
    let CharClass {
        parts,
        inverted,
        ignore_case,
    } = class;

    if parts.is_empty() {
        return if *inverted {
            MatchPlan::any(reg)
        } else {
            MatchPlan::never(reg)
        };
    }

    let reduced = reduce_class(
        parts.iter().copied(),
        ClassOptions {
            ignore_case: *ignore_case,
            optimize_code_size,
        },
    );

    let astral = parts.iter().any(|part| ClassRange::from(*part).is_astral());
    let ReducedClass { set, ranges } = reduced;

    let set_cond = (!set.is_empty()).then(|| Cond::InSet {
        reg,
        set,
        inverted: *inverted,
    });

    let range_cond = (!ranges.is_empty()).then(|| Cond::InRanges {
        reg,
        ranges,
        inverted: *inverted,
        ignore_case: *ignore_case,
    });

    let cond = match (set_cond, range_cond) {
        (Some(s), Some(r)) if *inverted => Cond::And(Box::new(s), Box::new(r)),
        (Some(s), Some(r)) => Cond::Or(Box::new(s), Box::new(r)),
        (Some(c), None) | (None, Some(c)) => c,

        // Non-empty parts always produce at least one range.
        (None, None) => Cond::Const(false),
    };

    if astral {
        MatchPlan {
            reg,
            block: vec![Stmt::LoadCodePoint(reg)],
            cond,
            on_success: vec![Stmt::AdvancePast(reg)],
        }
    } else {
        MatchPlan {
            reg,
            block: vec![Stmt::LoadChar(reg)],
            cond,
            on_success: vec![Stmt::Advance(Width::ONE)],
        }
    }
}
