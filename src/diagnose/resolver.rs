// Diagnostic span resolver
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

//! Resolve [`Span`]s into line:column source locations.

use crate::span::{Context, Span};
use fxhash::FxHashMap;
use std::{
    error::Error,
    fmt::{self, Display},
    num::NonZeroU32,
};
use unicode_width::UnicodeWidthChar;

/// Resolves [`Span`]s into line:column source locations.
///
/// A [`Span`] contains a [`Context`] and raw byte offsets recorded by the
///   grammar parser.
/// Those offsets are only useful to a human once they have been mapped back
///   onto the source text,
///     which is only done when a diagnostic is actually rendered.
pub trait SpanResolver {
    /// Resolve the provided [`Span`] into line:column source locations.
    fn resolve(
        &mut self,
        span: Span,
    ) -> Result<ResolvedSpan, SpanResolverError>;
}

/// A [`Span`] resolved to its source location.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The original [`Span`] whose resolution was requested.
    span: Span,

    /// Human-readable name of the span's [`Context`].
    name: String,

    /// 1-indexed line number of the first line of the span.
    line_num: NonZeroU32,

    /// Column(s) of the span relative to the beginning of its first line.
    column: Column,

    /// Text of the first line of the span _excluding_ the newline.
    line_text: String,
}

impl ResolvedSpan {
    pub fn unresolved_span(&self) -> Span {
        self.span
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line_num(&self) -> NonZeroU32 {
        self.line_num
    }

    pub fn column(&self) -> Column {
        self.column
    }

    pub fn line_text(&self) -> &str {
        &self.line_text
    }
}

/// Source column offsets.
///
/// A "column" is a terminal cell.
/// Certain unicode characters occupy more than one cell,
///   while others occupy none,
///   so a column is what the user would perceive as a column in a fixed
///   width font rather than a byte offset.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Column {
    /// A range of 1-indexed columns, inclusive.
    Endpoints(NonZeroU32, NonZeroU32),

    /// Immediately before a column.
    ///
    /// This is caused by a zero-length [`Span`].
    Before(NonZeroU32),
}

impl Column {
    /// First column of the span.
    pub fn start(&self) -> NonZeroU32 {
        match self {
            Self::Endpoints(at, _) | Self::Before(at) => *at,
        }
    }

    /// Number of cells to mark beneath the source line.
    ///
    /// Zero-length spans are still marked with a single cell so that the
    ///   user has something to look at.
    pub fn width(&self) -> u32 {
        match self {
            Self::Endpoints(start, end) => {
                end.get().saturating_sub(start.get()) + 1
            }
            Self::Before(_) => 1,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Coerces to a single column number.
        Display::fmt(&self.start(), f)
    }
}

/// Resolve spans against grammar sources held in memory.
///
/// Since this system does not read grammar files itself
///   (that is the responsibility of the grammar parser),
///   the caller registers the source text of each [`Context`] that it
///   expects to appear in diagnostics.
#[derive(Debug, Default)]
pub struct SourceResolver {
    sources: FxHashMap<Context, (String, String)>,
}

impl SourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source `text` of `ctx`,
    ///   displayed to the user as `name`.
    pub fn add_source<N: Into<String>, T: Into<String>>(
        &mut self,
        ctx: Context,
        name: N,
        text: T,
    ) -> &mut Self {
        self.sources.insert(ctx, (name.into(), text.into()));
        self
    }
}

impl SpanResolver for SourceResolver {
    fn resolve(
        &mut self,
        span: Span,
    ) -> Result<ResolvedSpan, SpanResolverError> {
        let ctx = span.context();
        let (name, text) = self
            .sources
            .get(&ctx)
            .ok_or(SpanResolverError::UnknownContext(ctx))?;

        let offset = span.offset() as usize;
        let end = span.end_offset();

        if end > text.len()
            || !text.is_char_boundary(offset)
            || !text.is_char_boundary(end)
        {
            return Err(SpanResolverError::OutOfRange {
                span,
                source_len: text.len(),
            });
        }

        let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[offset..]
            .find('\n')
            .map_or(text.len(), |i| offset + i);

        let line_num = text[..offset].matches('\n').count() as u32 + 1;

        let width = |s: &str| -> u32 {
            s.chars().map(|c| c.width().unwrap_or(0) as u32).sum()
        };

        let col_start = width(&text[line_start..offset]) + 1;

        // Multi-line spans are marked only until the end of their first
        //   line.
        let col_end =
            col_start + width(&text[offset..end.min(line_end)]).max(1) - 1;

        let start = NonZeroU32::new(col_start).unwrap_or(NonZeroU32::MIN);
        let column = if span.is_empty() {
            Column::Before(start)
        } else {
            Column::Endpoints(start, NonZeroU32::new(col_end).unwrap_or(start))
        };

        Ok(ResolvedSpan {
            span,
            name: name.clone(),
            line_num: NonZeroU32::new(line_num)
                .unwrap_or(NonZeroU32::MIN),
            column,
            line_text: text[line_start..line_end].to_string(),
        })
    }
}

/// Error while resolving a [`Span`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SpanResolverError {
    /// No source has been registered for the span's [`Context`].
    UnknownContext(Context),

    /// The span does not fall within its source on character boundaries.
    OutOfRange { span: Span, source_len: usize },
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownContext(ctx) => {
                write!(f, "no source is available for {ctx}")
            }
            Self::OutOfRange { span, source_len } => write!(
                f,
                "span {span} is not within the {source_len} bytes of its \
                    source",
            ),
        }
    }
}

impl Error for SpanResolverError {}
