// PEG compiler core (PEGC)
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

//! Analysis and code generation core of a parsing expression grammar
//!   (PEG) compiler.
//!
//! The input is an already-parsed grammar,
//!   constructed through [`grammar::GrammarBuilder`].
//! From it this crate derives:
//!
//!   1. Which rules and expressions are guaranteed to succeed
//!        ([`analyze::always_match`]);
//!   2. Which rules must record match failures for diagnostics
//!        ([`analyze::failure`]); and
//!   3. Matching plans for literals, character classes, and memoized rule
//!        calls ([`codegen`]),
//!        which are rendered to target source text by a renderer
//!          ([`codegen::js`])
//!        or executed directly by the [`runtime`].
//!
//! [`compile::compile`] ties these together for an entire grammar.

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

pub mod global;

#[macro_use]
extern crate static_assertions;

pub mod analyze;
pub mod codegen;
pub mod compile;
pub mod diagnose;
pub mod grammar;
pub mod runtime;
pub mod span;
pub mod visit;
