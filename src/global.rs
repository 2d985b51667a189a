// Global constants across the entirety of PEGC
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

//! System-wide static configuration.
//!
//! This module provides a system-wide configuration.
//! Subsystems should reference these values rather than defining their own
//!   and risk incompatibilities or maintenance issues as requirements
//!   change.
//!
//! By convention,
//!   import this entire module rather than individual members and reference
//!   them as `global::foo` to emphasize their nature and risk.

/// A size capable of representing every rule of a grammar.
pub type RuleIdSize = u32;

/// A size capable of representing every expression node of a grammar.
///
/// This must be ≥ [`RuleIdSize`],
///   since every rule has at least one expression as its body.
pub type ExprIdSize = u32;

/// Size of a byte offset into a grammar source file.
pub type SourceFileSize = u32;

/// Maximum length in bytes of any single grammar construct that is to be
///   located by a [`Span`](crate::span::Span).
pub type FrontendTokenLength = u16;

/// Depth at which always-match analysis stops following deferred
///   expressions and rule references.
///
/// Once the depth along the current path reaches this bound,
///   the expression is conservatively assumed to be able to fail.
/// This guarantees termination on self- and mutually-referential rules at
///   the cost of precision for rules that could only be proven to always
///   match at greater depths.
pub const ALWAYS_MATCH_RECURSION_LIMIT: u8 = 6;

/// Number of characters that a character class may accumulate into its
///   literal character list before ranges are no longer unrolled.
///
/// Ranges spanning fewer than [`CLASS_UNROLL_MIN_SPAN`] code points are
///   unrolled regardless.
pub const CLASS_LITERAL_MAX_LEN: usize = 50;

/// Ranges whose `end - start` is below this value are always unrolled into
///   individual characters when not optimizing for code size.
pub const CLASS_UNROLL_MIN_SPAN: u32 = 3;

/// Number of generated variants of each rule
///   (see [`RuleVariant`](crate::codegen::cache::RuleVariant)).
///
/// This is the stride of the dense cache slot index.
pub const RULE_VARIANT_COUNT: u32 = 3;

/// Maximum number of registers a single match plan may use.
pub const MATCH_PLAN_MAX_REGS: usize = 4;
