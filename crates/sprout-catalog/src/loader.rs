// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and validation of catalog TOML.
//!
//! Every problem found is collected before failing, so a broken catalog file
//! reports all of its mistakes at once.

use std::collections::HashSet;
use std::path::Path;

use sprout_core::SproutError;
use tracing::debug;

use crate::model::{CatalogFile, Department, DepartmentCode, Issue, RawDepartment};
use crate::Catalog;

/// Catalog compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../catalog.toml");

/// Menu numbers every catalog must define. The last one is Other.
pub const REQUIRED_NUMBERS: [&str; 7] = ["01", "02", "03", "04", "05", "06", "07"];

/// Number of the uncoded Other department.
pub const OTHER_NUMBER: &str = "07";

/// Largest issue number allowed under a department.
pub const MAX_ISSUE_NUMBER: u8 = 10;

/// Parses and validates catalog TOML.
pub fn parse_catalog(content: &str) -> Result<Catalog, SproutError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| SproutError::Catalog(format!("invalid TOML: {e}")))?;

    let mut errors = Vec::new();
    let mut departments = Vec::with_capacity(file.department.len());
    for raw in file.department {
        match convert_department(raw) {
            Ok(dept) => departments.push(dept),
            Err(mut errs) => errors.append(&mut errs),
        }
    }
    errors.extend(check_departments(&departments));

    if !errors.is_empty() {
        return Err(SproutError::Catalog(errors.join("; ")));
    }

    departments.sort_by(|a, b| a.number.cmp(&b.number));
    debug!(departments = departments.len(), "catalog loaded");
    Ok(Catalog { departments })
}

/// Reads a catalog file from disk and validates it.
pub fn load_catalog(path: &Path) -> Result<Catalog, SproutError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SproutError::Catalog(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_catalog(&content)
}

fn convert_department(raw: RawDepartment) -> Result<Department, Vec<String>> {
    let mut errors = Vec::new();
    let number = raw.number.trim().to_string();

    let code = match raw.code.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => {
            let mut chars = text.chars();
            match (chars.next().and_then(DepartmentCode::from_letter), chars.next()) {
                (Some(code), None) => Some(code),
                _ => {
                    errors.push(format!(
                        "department {number}: code `{text}` is not one of C, I, N, S, P, W"
                    ));
                    None
                }
            }
        }
    };

    if raw.name.trim().is_empty() {
        errors.push(format!("department {number}: name must not be empty"));
    }
    if raw.issues.is_empty() {
        errors.push(format!("department {number}: has no issues"));
    }

    let mut seen = HashSet::new();
    let mut issues = Vec::with_capacity(raw.issues.len());
    for issue in raw.issues {
        if !(1..=MAX_ISSUE_NUMBER).contains(&issue.number) {
            errors.push(format!(
                "department {number}: issue number {} is outside 1..={MAX_ISSUE_NUMBER}",
                issue.number
            ));
        }
        if !seen.insert(issue.number) {
            errors.push(format!(
                "department {number}: issue number {} appears twice",
                issue.number
            ));
        }
        if issue.description.trim().is_empty() {
            errors.push(format!(
                "department {number}: issue {} has an empty description",
                issue.number
            ));
        }
        issues.push(Issue {
            department: code,
            number: issue.number,
            description: issue.description.trim().to_string(),
        });
    }

    if errors.is_empty() {
        Ok(Department {
            number,
            code,
            name: raw.name.trim().to_string(),
            issues,
        })
    } else {
        Err(errors)
    }
}

fn check_departments(departments: &[Department]) -> Vec<String> {
    let mut errors = Vec::new();

    let mut numbers = HashSet::new();
    for dept in departments {
        if !REQUIRED_NUMBERS.contains(&dept.number.as_str()) {
            errors.push(format!(
                "department number `{}` is not in 01..07",
                dept.number
            ));
        }
        if !numbers.insert(dept.number.as_str()) {
            errors.push(format!("department {} is defined twice", dept.number));
        }
    }
    for required in REQUIRED_NUMBERS {
        if !numbers.contains(required) {
            errors.push(format!("department {required} is missing"));
        }
    }

    let mut letters = HashSet::new();
    for dept in departments {
        match (dept.number == OTHER_NUMBER, dept.code) {
            (true, Some(code)) => errors.push(format!(
                "department {OTHER_NUMBER} must not have a letter code, found `{code}`"
            )),
            (true, None) if dept.issues.len() != 1 => errors.push(format!(
                "department {OTHER_NUMBER} must have exactly one issue text, found {}",
                dept.issues.len()
            )),
            (false, None) => {
                errors.push(format!("department {} needs a letter code", dept.number))
            }
            (false, Some(code)) if !letters.insert(code) => {
                errors.push(format!("letter code `{code}` is used by two departments"))
            }
            _ => {}
        }
    }

    errors
}
