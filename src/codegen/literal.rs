// Literal matching codegen
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

//! Compile literals into [`MatchPlan`]s.
//!
//! A case-sensitive literal of a single UTF-16 code unit is compared
//!   directly against the code unit at the cursor,
//!     without materializing a candidate string.
//! Every other literal loads a candidate of the literal's exact width and
//!   compares it,
//!     lower-casing the candidate if the literal ignores case.

use super::ir::{Cond, MatchPlan, Reg, Stmt, Width};

/// Compile the literal `value` into a [`MatchPlan`] whose result is
///   loaded into `reg`.
pub fn compile_literal(value: &str, ignore_case: bool, reg: Reg) -> MatchPlan {
    let width = Width::of(value);

    let mut units = value.encode_utf16();

    if let (Some(unit), None, false) = (units.next(), units.next(), ignore_case)
    {
        return MatchPlan {
            reg,
            block: vec![],
            cond: Cond::CodeAt(unit),
            on_success: vec![
                Stmt::Assign(reg, value.to_string()),
                Stmt::Advance(width),
            ],
        };
    }

    let load = if width.utf16 == 1 {
        Stmt::LoadChar(reg)
    } else {
        Stmt::LoadSubstr(reg, width)
    };

    let cond = if ignore_case {
        Cond::RegEqLower(reg, value.to_lowercase())
    } else {
        Cond::RegEq(reg, value.to_string())
    };

    MatchPlan {
        reg,
        block: vec![load],
        cond,
        on_success: vec![Stmt::Advance(width)],
    }
}
