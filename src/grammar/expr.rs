// Grammar expressions
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

//! Expression nodes of a grammar.
//!
//! Expressions do not own their children;
//!   they instead reference them by [`ExprId`] within the arena of the
//!   [`Grammar`](super::Grammar) that owns them.
//! This keeps the tree immutable in structure while allowing analyses to
//!   store derived attributes in side tables indexed by [`ExprId`].

use super::{ExprId, RuleId};
use std::{fmt::Display, slice};

/// A parsing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Match `value` exactly,
    ///   or irrespective of case if `ignore_case`.
    Literal { value: String, ignore_case: bool },

    /// Match a single character of a character class.
    Class(CharClass),

    /// Match any single character (`.`).
    Any,

    /// Match each element in order.
    Sequence(Vec<ExprId>),

    /// Match the first alternative that succeeds (ordered choice).
    Choice(Vec<ExprId>),

    /// Bind the result of `inner` to `label` for use by actions.
    Labeled { label: String, inner: ExprId },

    /// Pluck the result of `inner` as the result of the enclosing sequence.
    Picked(ExprId),

    /// Produce the text matched by `inner` rather than its result.
    Text(ExprId),

    /// Give `inner` a human-readable name for failure reports.
    Named { name: String, inner: ExprId },

    /// Transform the result of `inner` using a semantic action.
    Action { inner: ExprId, code: String },

    /// Positive lookahead (`&e`).
    SimpleAnd(ExprId),

    /// Negative lookahead (`!e`).
    SimpleNot(ExprId),

    /// Positive inline semantic predicate (`&{ code }`).
    SemanticAnd(String),

    /// Negative inline semantic predicate (`!{ code }`).
    SemanticNot(String),

    /// Positive predicate on the value of a rule parameter.
    ParameterAnd(String),

    /// Negative predicate on the value of a rule parameter.
    ParameterNot(String),

    /// Bind the value of rule parameter `param` to `label`.
    LabeledParam { label: String, param: String },

    /// Invoke another rule.
    RuleRef(RuleRef),

    /// `e?`
    Optional(ExprId),

    /// `e*`
    ZeroOrMore(ExprId),

    /// `e+`
    OneOrMore(ExprId),
}

impl Expr {
    /// A case-sensitive [`Expr::Literal`].
    pub fn literal<S: Into<String>>(value: S) -> Self {
        Self::Literal {
            value: value.into(),
            ignore_case: false,
        }
    }

    /// An [`Expr::Class`] that is neither inverted nor case-insensitive.
    pub fn class<P: Into<ClassPart>>(parts: impl IntoIterator<Item = P>) -> Self {
        Self::Class(CharClass {
            parts: parts.into_iter().map(Into::into).collect(),
            inverted: false,
            ignore_case: false,
        })
    }

    /// Kind of this expression.
    pub fn ty(&self) -> ExprTy {
        use Expr::*;

        match self {
            Literal { .. } => ExprTy::Literal,
            Class(_) => ExprTy::Class,
            Any => ExprTy::Any,
            Sequence(_) => ExprTy::Sequence,
            Choice(_) => ExprTy::Choice,
            Labeled { .. } => ExprTy::Labeled,
            Picked(_) => ExprTy::Picked,
            Text(_) => ExprTy::Text,
            Named { .. } => ExprTy::Named,
            Action { .. } => ExprTy::Action,
            SimpleAnd(_) => ExprTy::SimpleAnd,
            SimpleNot(_) => ExprTy::SimpleNot,
            SemanticAnd(_) => ExprTy::SemanticAnd,
            SemanticNot(_) => ExprTy::SemanticNot,
            ParameterAnd(_) => ExprTy::ParameterAnd,
            ParameterNot(_) => ExprTy::ParameterNot,
            LabeledParam { .. } => ExprTy::LabeledParam,
            RuleRef(_) => ExprTy::RuleRef,
            Optional(_) => ExprTy::Optional,
            ZeroOrMore(_) => ExprTy::ZeroOrMore,
            OneOrMore(_) => ExprTy::OneOrMore,
        }
    }

    /// Child expressions in source order.
    ///
    /// Wrapper expressions have exactly one child;
    ///   sequences and choices have any number;
    ///   everything else
    ///     (including [`Expr::RuleRef`],
    ///       whose target is not a child)
    ///     has none.
    pub fn children(&self) -> &[ExprId] {
        use Expr::*;

        match self {
            Sequence(elements) => elements,
            Choice(alternatives) => alternatives,

            Labeled { inner, .. }
            | Named { inner, .. }
            | Action { inner, .. }
            | Picked(inner)
            | Text(inner)
            | SimpleAnd(inner)
            | SimpleNot(inner)
            | Optional(inner)
            | ZeroOrMore(inner)
            | OneOrMore(inner) => slice::from_ref(inner),

            Literal { .. }
            | Class(_)
            | Any
            | SemanticAnd(_)
            | SemanticNot(_)
            | ParameterAnd(_)
            | ParameterNot(_)
            | LabeledParam { .. }
            | RuleRef(_) => &[],
        }
    }
}

/// Kind of an [`Expr`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprTy {
    Literal,
    Class,
    Any,
    Sequence,
    Choice,
    Labeled,
    Picked,
    Text,
    Named,
    Action,
    SimpleAnd,
    SimpleNot,
    SemanticAnd,
    SemanticNot,
    ParameterAnd,
    ParameterNot,
    LabeledParam,
    RuleRef,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Display for ExprTy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ExprTy::*;

        let name = match self {
            Literal => "literal",
            Class => "class",
            Any => "any",
            Sequence => "sequence",
            Choice => "choice",
            Labeled => "labeled",
            Picked => "picked",
            Text => "text",
            Named => "named",
            Action => "action",
            SimpleAnd => "simple_and",
            SimpleNot => "simple_not",
            SemanticAnd => "semantic_and",
            SemanticNot => "semantic_not",
            ParameterAnd => "parameter_and",
            ParameterNot => "parameter_not",
            LabeledParam => "labeled_param",
            RuleRef => "rule_ref",
            Optional => "optional",
            ZeroOrMore => "zero_or_more",
            OneOrMore => "one_or_more",
        };

        write!(f, "{name}")
    }
}

/// A character class (`[a-z_]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CharClass {
    /// Parts of the class in source order.
    pub parts: Vec<ClassPart>,

    /// Whether the class matches characters _not_ described by its parts
    ///   (`[^...]`).
    pub inverted: bool,

    /// Whether the class matches irrespective of case.
    pub ignore_case: bool,
}

/// A single part of a [`CharClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassPart {
    /// A single character.
    Char(char),

    /// An inclusive range of characters.
    Range(char, char),
}

impl ClassPart {
    /// Inclusive endpoints of this part.
    ///
    /// A single character is a zero-width range.
    pub fn endpoints(&self) -> (char, char) {
        match *self {
            Self::Char(c) => (c, c),
            Self::Range(start, end) => (start, end),
        }
    }
}

impl From<char> for ClassPart {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<(char, char)> for ClassPart {
    fn from((start, end): (char, char)) -> Self {
        Self::Range(start, end)
    }
}

/// Invocation of a rule by name.
///
/// The target of the reference is resolved when the grammar is built;
///   a [`RuleRef`] therefore cannot be constructed outside of a
///   [`GrammarBuilder`](super::GrammarBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    name: String,
    args: Vec<RuleArg>,
    target: RuleId,
}

impl RuleRef {
    pub(super) fn new(name: String, args: Vec<RuleArg>) -> Self {
        Self {
            name,
            args,
            // Replaced during resolution.
            target: RuleId::new(0),
        }
    }

    pub(super) fn resolve(&mut self, target: RuleId) {
        self.target = target;
    }

    /// Name of the referenced rule as it appears in the grammar.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments bound to parameters of the referenced rule.
    pub fn args(&self) -> &[RuleArg] {
        &self.args
    }

    /// The referenced rule.
    pub fn target(&self) -> RuleId {
        self.target
    }
}

/// Argument to a rule parameter at a [`RuleRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArg {
    /// Parameter of the target rule being bound.
    pub param: String,

    pub value: ArgValue,
}

/// Value of a [`RuleArg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),

    /// Pass along a reference parameter of the calling rule.
    Ref(String),
}
