// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog data types: departments, issues and their letter codes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Letter code of a coded department (every department except Other).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum DepartmentCode {
    C,
    I,
    N,
    S,
    P,
    W,
}

impl DepartmentCode {
    /// Parses a single letter, case-insensitively.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(Self::C),
            'I' => Some(Self::I),
            'N' => Some(Self::N),
            'S' => Some(Self::S),
            'P' => Some(Self::P),
            'W' => Some(Self::W),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::C => 'C',
            Self::I => 'I',
            Self::N => 'N',
            Self::S => 'S',
            Self::P => 'P',
            Self::W => 'W',
        }
    }
}

/// A pre-written problem description under a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Letter of the owning department. `None` only for the Other department's text.
    pub department: Option<DepartmentCode>,
    /// Issue number in `1..=10`.
    pub number: u8,
    pub description: String,
}

impl Issue {
    /// Display code such as `I3`. The Other text has no code.
    pub fn code(&self) -> Option<String> {
        self.department
            .map(|letter| format!("{}{}", letter.letter(), self.number))
    }

    /// `I3 - Disk space is running out on a server`
    pub fn label(&self) -> String {
        match self.code() {
            Some(code) => format!("{code} - {}", self.description),
            None => self.description.clone(),
        }
    }
}

/// A top-level category of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    /// Two-digit menu number, `"01"` to `"07"`.
    pub number: String,
    /// Letter code; `None` for Other.
    pub code: Option<DepartmentCode>,
    pub name: String,
    /// Issues in source order. Numbers need not be contiguous.
    pub issues: Vec<Issue>,
}

impl Department {
    pub fn is_other(&self) -> bool {
        self.code.is_none()
    }
}

/// A confirmed-or-pending selection: either a concrete issue or the Other department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Issue(Issue),
    Other,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogFile {
    #[serde(default)]
    pub department: Vec<RawDepartment>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDepartment {
    pub number: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawIssue {
    pub number: u8,
    pub description: String,
}
