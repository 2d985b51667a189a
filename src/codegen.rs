// Code generation
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

//! Compile primitive grammar constructs into executable matching logic.
//!
//! Codegen is split in two:
//!
//!   1. Lowering into structured data
//!        ([`ir`]),
//!        which is target-independent and may be executed directly by the
//!        [`runtime`](crate::runtime); and
//!   2. Rendering that data into source text for a particular target
//!        ([`js`]).
//!
//! The lowerings are:
//!
//!   - [`literal`],
//!       comparing a string at the cursor;
//!   - [`class`],
//!       merging and reducing character classes into membership tests;
//!   - [`cache`],
//!       the memoization protocol for rule results; and
//!   - [`tables`],
//!       the indexed expectations and actions referenced by generated
//!       code.

pub mod cache;
pub mod class;
pub mod escape;
pub mod ir;
pub mod js;
pub mod literal;
pub mod tables;

pub use cache::{cache_slot, CachePlan, RuleVariant};
pub use class::{compile_class, merge_ranges, reduce_class, ClassOptions};
pub use ir::{Cond, MatchPlan, Reg, Stmt, Width};
pub use js::JsRenderer;
pub use literal::compile_literal;
pub use tables::{Action, ActionTable, Expectation, ExpectationTable};
