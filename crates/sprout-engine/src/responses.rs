// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword tables and canned reply texts.
//!
//! All matching functions expect text that is already trimmed and lowercased.

use std::sync::LazyLock;

use regex::Regex;
use sprout_catalog::{Catalog, Department, Issue};
use sprout_core::Ticket;

/// Exact greetings and their replies. `{menu}` is replaced by the menu command.
const GREETING_TABLE: &[(&str, &str)] = &[
    ("hi", "Hi there! Type {menu} to open the support menu."),
    ("hello", "Hello! Type {menu} to open the support menu."),
    ("hey", "Hey! Type {menu} to open the support menu."),
    ("hi there", "Hi there! Type {menu} to open the support menu."),
    ("hello there", "Hello there! Type {menu} to open the support menu."),
    ("good morning", "Good morning! Type {menu} to open the support menu."),
    ("good afternoon", "Good afternoon! Type {menu} to open the support menu."),
    ("good evening", "Good evening! Type {menu} to open the support menu."),
    ("greetings", "Greetings! Type {menu} to open the support menu."),
];

static GREETING_STARTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(hi|hello|hey|greetings|good\s+(morning|afternoon|evening))\b")
        .expect("greeting pattern is valid")
});

static SUPPORT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(support|help|issue|problem|ticket|assist|assistance|trouble)\b")
        .expect("support keyword pattern is valid")
});

/// Farewell keywords, each with the reply it triggers.
static FAREWELLS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"^(thanks|thank\s+you|thx|cheers)\b").expect("farewell pattern is valid"),
            "You're welcome! Type {menu} any time you need support.",
        ),
        (
            Regex::new(r"^(bye|goodbye|good\s+bye|see\s+you|see\s+ya)\b")
                .expect("farewell pattern is valid"),
            "Goodbye! Type {menu} any time you need support.",
        ),
    ]
});

const SUPPORT_GREETING: &str = "Hello! I'm the support assistant. I can log a ticket for you in a few steps.\n\
Type {menu} to see the departments.";

const NUDGE: &str = "Hello! Type {menu} to see how I can help.";

const CONFIRM_PROMPT: &str = "Reply *yes* to create a ticket, or {menu} to start over.";

const HELP: &str = "Sorry, I didn't understand that.\n\
Usage:\n\
{menu}  show the departments\n\
{menu} 01..07  list the issues of a department\n\
{menu} I3  select an issue\n\
yes  confirm the selected issue";

fn with_menu(template: &str, menu: &str) -> String {
    template.replace("{menu}", menu)
}

pub fn starts_with_greeting(t: &str) -> bool {
    GREETING_STARTER.is_match(t)
}

pub fn is_exact_greeting(t: &str) -> bool {
    GREETING_TABLE.iter().any(|(key, _)| *key == t)
}

pub fn contains_support_keyword(t: &str) -> bool {
    SUPPORT_KEYWORD.is_match(t)
}

pub fn is_farewell(t: &str) -> bool {
    FAREWELLS.iter().any(|(pattern, _)| pattern.is_match(t))
}

/// Reply for an exact greeting, if `t` is one.
pub fn greeting_response(t: &str, menu: &str) -> Option<String> {
    GREETING_TABLE
        .iter()
        .find(|(key, _)| *key == t)
        .map(|(_, reply)| with_menu(reply, menu))
}

pub fn farewell_response(t: &str, menu: &str) -> Option<String> {
    FAREWELLS
        .iter()
        .find(|(pattern, _)| pattern.is_match(t))
        .map(|(_, reply)| with_menu(reply, menu))
}

pub fn support_greeting(menu: &str) -> String {
    with_menu(SUPPORT_GREETING, menu)
}

pub fn nudge(menu: &str) -> String {
    with_menu(NUDGE, menu)
}

pub fn help(menu: &str) -> String {
    with_menu(HELP, menu)
}

/// The department list shown for a bare menu command.
pub fn root_menu(catalog: &Catalog, menu: &str) -> String {
    let mut out = String::from("Welcome to support. Choose a department:\n");
    for dept in catalog.departments() {
        out.push_str(&format!("{} - {}\n", dept.number, dept.name));
    }
    out.push_str(&format!(
        "\nReply with {menu} <number>, for example {menu} 02."
    ));
    out
}

/// Issues of one coded department.
pub fn department_listing(catalog: &Catalog, department: &Department, menu: &str) -> String {
    let issues: Vec<String> = catalog
        .issues_of(department)
        .iter()
        .map(Issue::label)
        .collect();
    let example = catalog
        .issues_of(department)
        .first()
        .and_then(Issue::code)
        .unwrap_or_default();
    format!(
        "{} issues:\n{}\n\nReply with {menu} <code> to select one, for example {menu} {example}.",
        department.name,
        issues.join("\n")
    )
}

/// Name and description of the Other department plus the confirmation prompt.
pub fn other_prompt(catalog: &Catalog, menu: &str) -> String {
    format!(
        "{}: {}\n\n{}",
        catalog.other_name(),
        catalog.other_description(),
        with_menu(CONFIRM_PROMPT, menu)
    )
}

pub fn selected_issue(issue: &Issue, menu: &str) -> String {
    format!(
        "Selected issue: {}\n\n{}",
        issue.label(),
        with_menu(CONFIRM_PROMPT, menu)
    )
}

pub fn ticket_confirmation(ticket: &Ticket) -> String {
    format!(
        "Your ticket has been created.\nTicket number: {}\nIssue: {}\nStatus: {}",
        ticket.ticket_number, ticket.issue, ticket.status
    )
}
