// Matching intermediate representation
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

//! Structured representation of matching logic.
//!
//! Codegen describes _what_ to compute as data;
//!   a renderer
//!     (such as [`JsRenderer`](super::js::JsRenderer))
//!   decides how to express it in a target language,
//!   and the [`runtime`](crate::runtime) executes it directly.
//!
//! A primitive expression compiles into a [`MatchPlan`]:
//!
//!   1. the statements of [`MatchPlan::block`] are run to load the
//!        candidate input into a register;
//!   2. [`MatchPlan::cond`] is tested; and
//!   3. if it holds,
//!        the statements of [`MatchPlan::on_success`] are run to produce
//!        the result and advance the cursor.
//!
//! If the condition does not hold,
//!   the cursor is left untouched.

use super::class::ClassRange;
use std::fmt::Display;

/// A temporary variable holding a candidate or result string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(pub u16);

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Length of a span of input,
///   measured both in characters and in UTF-16 code units.
///
/// The runtime steps over characters,
///   while targets with UTF-16 strings count code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Width {
    pub chars: usize,
    pub utf16: usize,
}

impl Width {
    /// A single character outside of the astral planes.
    pub const ONE: Self = Self { chars: 1, utf16: 1 };

    pub fn of(s: &str) -> Self {
        Self {
            chars: s.chars().count(),
            utf16: s.encode_utf16().count(),
        }
    }
}

/// Condition deciding whether a [`MatchPlan`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cond {
    Const(bool),

    /// Input remains at the cursor.
    NotAtEnd,

    /// The UTF-16 code unit at the cursor equals the given value.
    CodeAt(u16),

    /// Register equals the string exactly.
    RegEq(Reg, String),

    /// Register equals the string after lower-casing the register.
    ///
    /// The string must already be lower-case.
    RegEqLower(Reg, String),

    /// Register is non-empty and is
    ///   (or, if `inverted`, is not)
    ///   one of the characters of `set`.
    InSet {
        reg: Reg,
        set: String,
        inverted: bool,
    },

    /// Register begins with a character that falls
    ///   (or, if `inverted`, does not fall)
    ///   within one of `ranges`.
    InRanges {
        reg: Reg,
        ranges: Vec<ClassRange>,
        inverted: bool,
        ignore_case: bool,
    },

    And(Box<Cond>, Box<Cond>),
    Or(Box<Cond>, Box<Cond>),
}

/// A statement of a [`MatchPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Load the character at the cursor,
    ///   or the empty string at the end of input.
    LoadChar(Reg),

    /// Load the whole code point at the cursor,
    ///   or the empty string at the end of input.
    ///
    /// Unlike [`Stmt::LoadChar`],
    ///   targets with UTF-16 strings load both halves of a surrogate
    ///   pair.
    LoadCodePoint(Reg),

    /// Load up to the given width of input at the cursor.
    LoadSubstr(Reg, Width),

    /// Load the character at the cursor and advance past it.
    TakeChar(Reg),

    /// Load a constant.
    Assign(Reg, String),

    /// Advance the cursor.
    Advance(Width),

    /// Advance the cursor past the contents of a register.
    AdvancePast(Reg),
}

/// Compiled matching logic for a primitive expression.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPlan {
    /// Register holding the result of a successful match.
    pub reg: Reg,

    pub block: Vec<Stmt>,
    pub cond: Cond,
    pub on_success: Vec<Stmt>,
}

impl MatchPlan {
    /// A plan that never matches.
    pub fn never(reg: Reg) -> Self {
        Self {
            reg,
            block: vec![],
            cond: Cond::Const(false),
            on_success: vec![],
        }
    }

    /// A plan that matches any single character.
    pub fn any(reg: Reg) -> Self {
        Self {
            reg,
            block: vec![],
            cond: Cond::NotAtEnd,
            on_success: vec![Stmt::TakeChar(reg)],
        }
    }
}
