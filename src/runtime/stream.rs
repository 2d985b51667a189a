// Lazy streaming of rule results
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

//! Pull-based iteration over the results of a stream rule.

use super::ParseContext;
use std::iter::FusedIterator;

/// An iterator yielding each successive result of a rule.
///
/// Each call to [`Iterator::next`] resumes matching where the previous
///   result ended,
///     discovering results in the same left-to-right order as an eager
///     parse would.
/// Iteration ends when the rule fails,
///   when the input is exhausted,
///   or after a result that consumed no input
///     (which would otherwise repeat forever).
///
/// Dropping the iterator early requires no cleanup.
pub struct Stream<'i, V, R, F> {
    cx: ParseContext<'i, V, R>,
    f: F,
    done: bool,
}

impl<'i, V, R, F> Stream<'i, V, R, F>
where
    F: FnMut(&mut ParseContext<'i, V, R>) -> Option<V>,
{
    pub(super) fn new(cx: ParseContext<'i, V, R>, f: F) -> Self {
        Self { cx, f, done: false }
    }

    /// Recover the context,
    ///   for example to report the failure that ended the stream.
    pub fn into_context(self) -> ParseContext<'i, V, R> {
        self.cx
    }
}

impl<'i, V, R, F> Iterator for Stream<'i, V, R, F>
where
    F: FnMut(&mut ParseContext<'i, V, R>) -> Option<V>,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.done || self.cx.at_end() {
            self.done = true;
            return None;
        }

        let start = self.cx.pos();

        match (self.f)(&mut self.cx) {
            Some(value) => {
                self.done = self.cx.pos() == start;
                Some(value)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<'i, V, R, F> FusedIterator for Stream<'i, V, R, F> where
    F: FnMut(&mut ParseContext<'i, V, R>) -> Option<V>
{
}
