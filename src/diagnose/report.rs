// Diagnostic system rendering
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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines,
//     rather than using both.

use super::{
    resolver::{ResolvedSpan, SpanResolver, SpanResolverError},
    AnnotatedSpan, Diagnostic, Label, Level,
};
use crate::span::Span;
use std::fmt::{self, Display};

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    ///
    /// This method _does not return [`Result`]_ and should never fail.
    /// The report absorbs errors during span resolution and renders those
    ///   errors to the report itself,
    ///     ensuring both that the user is made aware of the problem
    ///     and that we're not inadvertently suppressing the actual
    ///       diagnostic messages that were requested.
    fn render<'d, D: Diagnostic>(&mut self, diagnostic: &'d D)
        -> Report<'d, D>;
}

/// Render diagnostic report in a highly visual way,
///   modeled after Rust's default error reporting.
///
/// Each annotated span is rendered alongside the line of grammar source
///   that it references,
///     with the span underlined.
pub struct VisualReporter<R: SpanResolver> {
    resolver: R,
}

impl<R: SpanResolver> VisualReporter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: SpanResolver> Reporter for VisualReporter<R> {
    fn render<'d, D: Diagnostic>(
        &mut self,
        diagnostic: &'d D,
    ) -> Report<'d, D> {
        let mspans = diagnostic
            .describe()
            .into_iter()
            .map(|AnnotatedSpan(span, level, olabel)| {
                let slabel = olabel.map(|label| SpanLabel(level, label));

                match self.resolver.resolve(span) {
                    Ok(rspan) => MaybeResolvedSpan::Resolved(rspan, slabel),
                    Err(e) => MaybeResolvedSpan::Unresolved(span, slabel, e),
                }
            })
            .collect::<Vec<_>>();

        let mut report = Report::empty(diagnostic);
        report.extend(mspans.into_iter().map(Into::into));
        report
    }
}

#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    msg: &'d D,
    secs: Vec<Section<'d>>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(msg: &'d D) -> Self {
        Self {
            msg,
            secs: Vec::new(),
            level: Level::default(),
        }
    }

    /// Most severe [`Level`] of any section of this report.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl<'d, D: Diagnostic> Extend<Section<'d>> for Report<'d, D> {
    fn extend<T: IntoIterator<Item = Section<'d>>>(&mut self, secs: T) {
        for sec in secs {
            self.level = self.level.min(sec.level);

            // Add the section if it cannot be squashed into the previous.
            let remain = sec.maybe_squash_into(self.secs.last_mut());
            self.secs.extend(remain);
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{level}: {msg}\n", level = self.level, msg = self.msg)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

/// A section of a [`Report`] describing a [`Span`].
///
/// Adjacent sections describing the same [`Span`] are squashed
///   (see [`Section::maybe_squash_into`]),
///   but not non-adjacent ones,
///     since reports ought to be able to produce narratives that may
///     revisit previous spans.
#[derive(Debug, PartialEq, Eq)]
struct Section<'d> {
    heading: SpanHeading,
    excerpt: Option<Excerpt>,
    labels: Vec<SpanLabel<'d>>,
    level: Level,
    span: Span,
}

impl<'d> Section<'d> {
    /// Squash self into the provided [`Section`] if they represent the same
    ///   [`Span`],
    ///     otherwise do nothing.
    ///
    /// If squashed,
    ///   [`None`] is returned.
    /// Otherwise [`Some`] is returned with `self`.
    fn maybe_squash_into(
        self,
        extend: Option<&mut Section<'d>>,
    ) -> Option<Self> {
        match extend {
            Some(extend_sec) if self.span == extend_sec.span => {
                extend_sec.level = extend_sec.level.min(self.level);
                extend_sec.labels.extend(self.labels);
                None
            }

            _ => Some(self),
        }
    }

    fn gutter_width(&self) -> usize {
        self.excerpt
            .as_ref()
            .map(|ex| ex.line_num.to_string().len())
            .unwrap_or(1)
    }
}

impl<'d> From<MaybeResolvedSpan<'d>> for Section<'d> {
    fn from(mspan: MaybeResolvedSpan<'d>) -> Self {
        let heading = SpanHeading::from(&mspan);
        let mut labels = mspan.system_labels();

        let (span, excerpt, olabel) = match mspan {
            MaybeResolvedSpan::Resolved(rspan, olabel) => {
                (rspan.unresolved_span(), Some(Excerpt::from(&rspan)), olabel)
            }
            MaybeResolvedSpan::Unresolved(span, olabel, _) => {
                (span, None, olabel)
            }
        };

        let level = olabel.as_ref().map(|l| l.0).unwrap_or_default();

        labels.extend(olabel);

        Section {
            heading,
            excerpt,
            labels,
            level,
            span,
        }
    }
}

impl<'d> Display for Section<'d> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(self.gutter_width());

        write!(f, "{pad}--> {heading}\n", heading = self.heading)?;

        if let Some(excerpt) = &self.excerpt {
            write!(f, "{pad} |\n")?;
            write!(f, "{num} | {text}\n", num = excerpt.line_num, text = excerpt.text)?;
            write!(
                f,
                "{pad} | {lead}{mark}\n",
                lead = " ".repeat(excerpt.col.saturating_sub(1) as usize),
                mark = "^".repeat(excerpt.width as usize),
            )?;
        }

        for label in self.labels.iter() {
            write!(f, "{pad} = {label}\n")?;
        }

        Ok(())
    }
}

/// A [`Span`] that may have been resolved.
///
/// The span will remain unresolved if an error occurred,
///   in which case the error will be provided.
/// It is important that the underlying diagnostic message never be masked
///   by an error of our own.
#[derive(Debug)]
enum MaybeResolvedSpan<'d> {
    Resolved(ResolvedSpan, Option<SpanLabel<'d>>),
    Unresolved(Span, Option<SpanLabel<'d>>, SpanResolverError),
}

impl<'d> MaybeResolvedSpan<'d> {
    fn system_labels(&self) -> Vec<SpanLabel<'static>> {
        match self {
            Self::Unresolved(_, _, e) => {
                vec![SpanLabel(
                    Level::Help,
                    format!(
                        "an error occurred while trying to look up \
                         information about this span: {e}"
                    )
                    .into(),
                )]
            }

            Self::Resolved(..) => vec![],
        }
    }
}

/// Location summary of a [`Section`].
#[derive(Debug, PartialEq, Eq)]
enum SpanHeading {
    Resolved {
        name: String,
        line: u32,
        col: u32,
    },

    // This is not ideal,
    //   but provides reasonable fallback information in a
    //   situation where the diagnostic system fails.
    Unresolved(Span),
}

impl<'s, 'd> From<&'s MaybeResolvedSpan<'d>> for SpanHeading {
    fn from(mspan: &'s MaybeResolvedSpan<'d>) -> Self {
        match mspan {
            MaybeResolvedSpan::Resolved(rspan, _) => Self::Resolved {
                name: rspan.name().to_string(),
                line: rspan.line_num().get(),
                col: rspan.column().start().get(),
            },
            MaybeResolvedSpan::Unresolved(span, _, _) => {
                Self::Unresolved(*span)
            }
        }
    }
}

impl Display for SpanHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { name, line, col } => {
                write!(f, "{name}:{line}:{col}")
            }
            Self::Unresolved(span) => write!(
                f,
                "{} offset {}--{}",
                span.context(),
                span.offset(),
                span.end_offset(),
            ),
        }
    }
}

/// The line of source referenced by a [`Section`].
#[derive(Debug, PartialEq, Eq)]
struct Excerpt {
    line_num: u32,
    text: String,
    col: u32,
    width: u32,
}

impl From<&ResolvedSpan> for Excerpt {
    fn from(rspan: &ResolvedSpan) -> Self {
        Self {
            line_num: rspan.line_num().get(),
            text: rspan.line_text().to_string(),
            col: rspan.column().start().get(),
            width: rspan.column().width(),
        }
    }
}

/// A label describing a span.
#[derive(Debug, PartialEq, Eq)]
struct SpanLabel<'d>(Level, Label<'d>);

impl<'d> Display for SpanLabel<'d> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "{level}: {label}")
    }
}
