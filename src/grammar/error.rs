// Grammar construction errors
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

//! Errors resulting from building a [`Grammar`](super::Grammar).

use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    span::Span,
};

/// An error building a grammar.
///
/// All of these errors are fatal to compilation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GrammarError {
    /// A rule reference names a rule that does not exist.
    ///
    /// The span is that of the referencing expression.
    UnresolvedRule { name: String, span: Span },

    /// Two rules were defined with the same name.
    DuplicateRule {
        name: String,
        first: Span,
        redefined: Span,
    },

    /// An allowed start or stream rule names a rule that does not exist.
    ///
    /// Entry rules are provided as configuration rather than as part of
    ///   the grammar source,
    ///     and so there is no span to report.
    UnknownEntryRule { name: String, kind: EntryKind },
}

/// The manner in which a rule may be used as an entry point.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EntryKind {
    /// Eager entry point producing a single result.
    Start,

    /// Lazy entry point producing a sequence of results.
    Stream,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stream => write!(f, "stream"),
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use GrammarError::*;

        match self {
            UnresolvedRule { name, .. } => {
                write!(f, "reference to undefined rule `{name}`")
            }
            DuplicateRule { name, .. } => {
                write!(f, "rule `{name}` is defined more than once")
            }
            UnknownEntryRule { name, kind } => {
                write!(f, "allowed {kind} rule `{name}` is not defined")
            }
        }
    }
}

impl Error for GrammarError {}

impl Diagnostic for GrammarError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use GrammarError::*;

        match self {
            UnresolvedRule { name, span } => span
                .error(format!("no rule named `{name}` is defined"))
                .with_help(
                    "a rule must be defined somewhere in the grammar \
                        before it can be referenced",
                )
                .into(),

            DuplicateRule {
                first, redefined, ..
            } => vec![
                first.note("first defined here"),
                redefined.error("rule redefined here"),
                redefined.help("rule names must be unique within a grammar"),
            ],

            UnknownEntryRule { .. } => vec![],
        }
    }
}
