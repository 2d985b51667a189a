// Source spans
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

//! Mapping to source input byte intervals.
//!
//! A [`Span`] is a mapping to a byte interval within a grammar source,
//!   representing where some rule or expression originated.
//! This underpins the [diagnostic system](crate::diagnose),
//!   which uses spans to show the user the location of errors in their
//!   grammar,
//!     such as a reference to a rule that does not exist.
//!
//! A span contains a [`Context`] representing the source.
//! The grammar parser is responsible for assigning contexts;
//!   this system only needs them to be unique per source so that a
//!   [`SpanResolver`](crate::diagnose::SpanResolver) can later map them
//!   back to source text.
//!
//! ```
//! use pegc::span::{Context, Span};
//!
//! let ctx = Context::new(3);
//! let span = Span::new(2, 6, ctx);
//!
//! assert_eq!(2, span.offset());
//! assert_eq!(6, span.len());
//! assert_eq!(ctx, span.context());
//!
//! // Freely copyable
//! let cp = span;
//! assert_eq!(cp, span);
//! ```

use crate::global;
use std::fmt::Display;

/// Size of a [`Span`]'s `offset` field.
pub type SpanOffsetSize = global::SourceFileSize;

/// Size of a [`Span`]'s `len` field.
pub type SpanLenSize = global::FrontendTokenLength;

/// Description of a source location and byte interval for some object.
///
/// Spans are totally ordered first by [`Context`],
///   then by offset,
///   and finally by length.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Context onto which byte offsets are mapped,
    ///   such as a grammar file.
    ctx: Context,

    /// Starting 0-indexed byte position, inclusive.
    offset: SpanOffsetSize,

    /// Token length (ending byte offset - `offset`).
    len: SpanLenSize,
}

// Spans are attached to every rule and expression of a grammar and are
//   copied freely;
//     if this fails,
//     consider whether the added field is worth the cost.
assert_eq_size!(Span, u64);

impl Span {
    /// Create a new span from its constituent parts.
    pub const fn new(
        offset: SpanOffsetSize,
        len: SpanLenSize,
        ctx: Context,
    ) -> Self {
        Self { ctx, offset, len }
    }

    /// Byte offset of the beginning of the span relative to its context.
    pub fn offset(&self) -> SpanOffsetSize {
        self.offset
    }

    /// Length of the span in bytes.
    ///
    /// The interval of the span is `[offset, offset+len]`.
    pub fn len(&self) -> SpanLenSize {
        self.len
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset immediately following the span.
    pub fn end_offset(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// The context to which the span applies.
    pub fn context(&self) -> Context {
        self.ctx
    }

    /// Further offset a span.
    ///
    /// If the resulting offset exceeds [`SpanOffsetSize`],
    ///   the result will be [`None`].
    pub const fn offset_add(self, value: SpanOffsetSize) -> Option<Self> {
        match self.offset.checked_add(value) {
            Some(offset) => Some(Self { offset, ..self }),
            None => None,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} offset {}-{}]", self.ctx, self.offset, self.end_offset())
    }
}

/// A placeholder span indicating that a span is expected but is not yet
///   known.
pub const UNKNOWN_SPAN: Span = Span::new(0, 0, UNKNOWN_CONTEXT);

/// Context for byte offsets (e.g. a grammar source file).
///
/// Since this is used within [`Span`],
///   it must be kept as small as possible.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Context(u16);

impl Context {
    /// Create a new context from its numeric identifier.
    ///
    /// Context `0` is reserved for [`UNKNOWN_CONTEXT`].
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Produce a [`Span`] within the given context.
    #[inline]
    pub const fn span(self, offset: SpanOffsetSize, len: SpanLenSize) -> Span {
        Span::new(offset, len, self)
    }
}

/// A placeholder context indicating that the source is not known.
pub const UNKNOWN_CONTEXT: Context = Context(0);

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            UNKNOWN_CONTEXT => write!(f, "<unknown>"),
            Context(id) => write!(f, "<source #{id}>"),
        }
    }
}
