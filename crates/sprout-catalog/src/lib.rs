// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Department and issue catalog for the Sprout support assistant.
//!
//! The catalog is loaded once at startup, from the copy compiled into the
//! binary or from a TOML file named in `catalog.path`, and is read-only
//! afterwards. A malformed catalog is a startup error.

pub mod loader;
pub mod model;

use std::path::Path;

use sprout_core::SproutError;

pub use loader::{load_catalog, parse_catalog, BUILTIN_CATALOG};
pub use model::{Department, DepartmentCode, Issue, Selection};

/// Validated department/issue catalog, ordered by department number.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) departments: Vec<Department>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, SproutError> {
        parse_catalog(BUILTIN_CATALOG)
    }

    /// Loads `path` when given, otherwise the built-in catalog.
    pub fn load(path: Option<&Path>) -> Result<Self, SproutError> {
        match path {
            Some(path) => load_catalog(path),
            None => Self::builtin(),
        }
    }

    /// All departments, `01` first.
    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.iter()
    }

    /// Looks up a department by its two-digit menu number.
    pub fn resolve_department_by_number(&self, number: &str) -> Option<&Department> {
        let number = number.trim();
        self.departments.iter().find(|d| d.number == number)
    }

    /// Looks up a coded department by letter, case-insensitively.
    pub fn resolve_department_by_code(&self, letter: char) -> Option<&Department> {
        let code = DepartmentCode::from_letter(letter)?;
        self.departments.iter().find(|d| d.code == Some(code))
    }

    pub fn find_issue(&self, letter: char, number: u8) -> Option<&Issue> {
        self.resolve_department_by_code(letter)?
            .issues
            .iter()
            .find(|issue| issue.number == number)
    }

    /// Issues of `department` in source order.
    pub fn issues_of<'a>(&self, department: &'a Department) -> &'a [Issue] {
        &department.issues
    }

    /// The canned text of the Other department.
    pub fn other_description(&self) -> &str {
        self.departments
            .iter()
            .find(|d| d.is_other())
            .and_then(|d| d.issues.first())
            .map(|issue| issue.description.as_str())
            .unwrap_or_default()
    }

    /// Name of the Other department, used in menus.
    pub fn other_name(&self) -> &str {
        self.departments
            .iter()
            .find(|d| d.is_other())
            .map(|d| d.name.as_str())
            .unwrap_or("Other")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("builtin catalog")
    }

    #[test]
    fn builtin_departments_match_menu() {
        let catalog = catalog();
        let names: Vec<(&str, Option<char>)> = catalog
            .departments()
            .map(|d| (d.name.as_str(), d.code.map(DepartmentCode::letter)))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Cloud Services", Some('C')),
                ("Infrastructure", Some('I')),
                ("Network", Some('N')),
                ("Software", Some('S')),
                ("Printers & Peripherals", Some('P')),
                ("Warranty & Repairs", Some('W')),
                ("Other", None),
            ]
        );
    }

    #[test]
    fn coded_departments_list_only_their_own_issues_in_range() {
        let catalog = catalog();
        for number in ["01", "02", "03", "04", "05", "06"] {
            let dept = catalog.resolve_department_by_number(number).unwrap();
            let issues = catalog.issues_of(dept);
            assert!(!issues.is_empty());
            for issue in issues {
                assert_eq!(issue.department, dept.code);
                assert!((1..=10).contains(&issue.number));
            }
            // Every (letter, n) that resolves belongs to this listing, and vice versa.
            let letter = dept.code.unwrap().letter();
            let resolvable: Vec<u8> = (0..=12)
                .filter(|n| catalog.find_issue(letter, *n).is_some())
                .collect();
            let listed: Vec<u8> = issues.iter().map(|i| i.number).collect();
            let mut listed_sorted = listed.clone();
            listed_sorted.sort_unstable();
            assert_eq!(resolvable, listed_sorted);
        }
    }

    #[test]
    fn issues_keep_source_order_with_gaps() {
        let catalog = catalog();
        let printers = catalog.resolve_department_by_number("05").unwrap();
        let numbers: Vec<u8> = catalog.issues_of(printers).iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 5, 6]);
        assert!(catalog.find_issue('p', 4).is_none());
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let catalog = catalog();
        let upper = catalog.find_issue('I', 3).unwrap();
        let lower = catalog.find_issue('i', 3).unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.code().as_deref(), Some("I3"));
        assert_eq!(
            catalog.resolve_department_by_code('n').unwrap().name,
            "Network"
        );
        assert!(catalog.resolve_department_by_code('x').is_none());
    }

    #[test]
    fn unknown_numbers_resolve_to_none() {
        let catalog = catalog();
        assert!(catalog.resolve_department_by_number("00").is_none());
        assert!(catalog.resolve_department_by_number("08").is_none());
        assert!(catalog.resolve_department_by_number("2").is_none());
    }

    #[test]
    fn other_department_has_single_text() {
        let catalog = catalog();
        let other = catalog.resolve_department_by_number("07").unwrap();
        assert!(other.is_other());
        assert_eq!(other.issues.len(), 1);
        assert!(catalog.other_description().contains("support agent"));
        assert_eq!(catalog.other_name(), "Other");
    }

    #[test]
    fn load_without_path_uses_builtin() {
        let catalog = Catalog::load(None).unwrap();
        assert_eq!(catalog.departments().count(), 7);
    }
}
