// Furthest failure tracking
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

//! Furthest-failure tracking and parse errors.
//!
//! Only the failures at the furthest position reached are of interest
//!   when reporting an error;
//!     everything before it was recovered from by backtracking.
//! The tracker therefore keeps only that position and the set of
//!   expectation indices that failed there.

use crate::codegen::{escape::stringify, tables::ExpectationTable};
use fixedbitset::FixedBitSet;
use std::{error::Error, fmt::Display};

/// Furthest failure position and what was expected there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureTracker {
    pos: usize,
    expected: FixedBitSet,

    /// Whether the end of input was expected at [`Self::pos`].
    end: bool,
}

impl FailureTracker {
    /// Position of the furthest failure.
    pub fn furthest(&self) -> usize {
        self.pos
    }

    /// Indices of the expectations that failed at [`Self::furthest`].
    pub fn expected(&self) -> impl Iterator<Item = usize> + '_ {
        self.expected.ones()
    }

    pub fn expects_end(&self) -> bool {
        self.end
    }

    /// Prepare to record a failure at `pos`,
    ///   returning whether it is at the furthest position.
    fn advance_to(&mut self, pos: usize) -> bool {
        if pos > self.pos {
            self.pos = pos;
            self.expected.clear();
            self.end = false;
        }

        pos == self.pos
    }

    /// Record a failure of the expectation `index` at `pos`.
    ///
    /// A failure beyond the furthest position replaces the record;
    ///   a failure at the furthest position is merged into it;
    ///   and an earlier failure is ignored.
    pub fn fail(&mut self, pos: usize, index: usize) {
        if self.advance_to(pos) {
            self.expected.grow(index + 1);
            self.expected.insert(index);
        }
    }

    /// Record that the end of input was expected at `pos`.
    pub fn fail_end(&mut self, pos: usize) {
        if self.advance_to(pos) {
            self.end = true;
        }
    }

    /// Failure of a rule that does not report failures.
    ///
    /// This records nothing.
    pub fn fail_silently(&mut self) {}
}

/// Failure to parse an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset of the furthest failure.
    pub offset: usize,

    /// Descriptions of what was expected at [`Self::offset`],
    ///   sorted and without duplicates.
    pub expected: Vec<String>,

    /// Character found at [`Self::offset`],
    ///   or [`None`] at the end of input.
    pub found: Option<char>,
}

impl ParseError {
    pub(super) fn new(
        input: &str,
        failure: &FailureTracker,
        expectations: &ExpectationTable,
    ) -> Self {
        let offset = failure.furthest();

        let mut expected = failure
            .expected()
            .filter_map(|index| expectations.get(index))
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        if failure.expects_end() {
            expected.push("end of input".into());
        }

        expected.sort();
        expected.dedup();

        Self {
            offset,
            expected,
            found: input.get(offset..).and_then(|rest| rest.chars().next()),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected ")?;

        match self.expected.as_slice() {
            [] => write!(f, "nothing")?,
            [one] => write!(f, "{one}")?,
            [init @ .., last] => write!(f, "{} or {last}", init.join(", "))?,
        }

        match self.found {
            Some(c) => write!(f, " but {} found", stringify(&c.to_string()))?,
            None => write!(f, " but end of input found")?,
        }

        write!(f, " at offset {}", self.offset)
    }
}

impl Error for ParseError {}
