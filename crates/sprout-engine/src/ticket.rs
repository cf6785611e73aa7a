// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket number generation.
//!
//! Numbers look like `INF-101500-0201`: a department prefix followed by the
//! local wall-clock time (`HHMMSS`) and date (`DDMM`). They are not unique by
//! construction. Two tickets for the same department in the same second share
//! a number, and the ticket store's idempotent insert merges them.

use chrono::{Local, NaiveDateTime};
use sprout_catalog::{DepartmentCode, Selection};

/// Prefix used for tickets raised under the Other department.
pub const OTHER_PREFIX: &str = "OTR";

/// Three-letter ticket prefix for a department letter.
pub fn department_prefix(code: DepartmentCode) -> &'static str {
    match code {
        DepartmentCode::C => "CLD",
        DepartmentCode::I => "INF",
        DepartmentCode::N => "NET",
        DepartmentCode::S => "SFT",
        DepartmentCode::P => "PRT",
        DepartmentCode::W => "WRT",
    }
}

/// Ticket prefix for a selection.
pub fn prefix(selection: &Selection) -> &'static str {
    match selection {
        Selection::Issue(issue) => issue.department.map_or(OTHER_PREFIX, department_prefix),
        Selection::Other => OTHER_PREFIX,
    }
}

/// Generates a ticket number from the current local time.
pub fn generate(selection: &Selection) -> String {
    generate_at(selection, Local::now().naive_local())
}

/// Generates a ticket number for the given local wall-clock time.
pub fn generate_at(selection: &Selection, local: NaiveDateTime) -> String {
    format!("{}-{}", prefix(selection), local.format("%H%M%S-%d%m"))
}
