// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command interpreter: the conversation state machine.
//!
//! [`interpret`] is a pure function of the sender's session, the inbound text,
//! the catalog and the clock. It returns the next session, at most one reply
//! and, when a selection is confirmed, the ticket to persist. Persisting and
//! sending are left to the caller.
//!
//! Input is matched against [`RULES`], an ordered list of predicate/action
//! pairs over the trimmed, lowercased text. The first rule whose predicate
//! holds decides the turn.

use std::sync::LazyLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;
use sprout_catalog::{Catalog, Selection};
use sprout_config::model::AssistantConfig;
use sprout_core::{InboundMessage, Ticket, TicketStatus};
use strum::{Display, IntoStaticStr};
use tracing::warn;

use crate::responses;
use crate::session::Session;
use crate::ticket;

/// Issue text stored on tickets raised under the Other department.
pub const OTHER_ISSUE_TEXT: &str = "None Specified";

static DEPARTMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[1-7]$").expect("department pattern is valid"));

static ISSUE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([cinspw])(\d+)$").expect("issue pattern is valid"));

/// Interpreter settings derived from `[assistant]`.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Menu command as configured, used in reply texts.
    display: String,
    /// Lowercased menu command, used for matching.
    token: String,
}

impl InterpreterConfig {
    pub fn new(menu_command: &str) -> Self {
        let display = menu_command.trim().to_string();
        let token = display.to_lowercase();
        Self { display, token }
    }

    pub fn menu_command(&self) -> &str {
        &self.display
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::from(&AssistantConfig::default())
    }
}

impl From<&AssistantConfig> for InterpreterConfig {
    fn from(config: &AssistantConfig) -> Self {
        Self::new(&config.menu_command)
    }
}

/// Which rule decided a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RuleKind {
    GreetingWithSupport,
    Greeting,
    SupportKeyword,
    Confirm,
    Farewell,
    Ignored,
    Menu,
}

/// Outcome of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub session: Session,
    pub reply: Option<String>,
    pub ticket: Option<Ticket>,
    pub rule: RuleKind,
}

/// Everything a rule can look at.
struct Input<'a> {
    text: &'a str,
    sender: &'a str,
    session: &'a Session,
    catalog: &'a Catalog,
    config: &'a InterpreterConfig,
    now: DateTime<Local>,
}

impl Input<'_> {
    fn menu(&self) -> &str {
        self.config.menu_command()
    }

    fn starts_with_menu(&self) -> bool {
        self.text.starts_with(&self.config.token)
    }

    fn reply(&self, rule: RuleKind, session: Session, reply: Option<String>) -> Turn {
        Turn {
            session,
            reply,
            ticket: None,
            rule,
        }
    }

    fn keep_session(&self, rule: RuleKind, reply: Option<String>) -> Turn {
        self.reply(rule, self.session.clone(), reply)
    }
}

struct Rule {
    kind: RuleKind,
    matches: fn(&Input<'_>) -> bool,
    apply: fn(&Input<'_>) -> Turn,
}

/// Rules in priority order. The last one always matches.
const RULES: &[Rule] = &[
    Rule {
        kind: RuleKind::GreetingWithSupport,
        matches: |i| {
            (responses::is_exact_greeting(i.text) || responses::starts_with_greeting(i.text))
                && responses::contains_support_keyword(i.text)
        },
        apply: |i| {
            i.reply(
                RuleKind::GreetingWithSupport,
                Session::Idle,
                Some(responses::support_greeting(i.menu())),
            )
        },
    },
    Rule {
        kind: RuleKind::Greeting,
        matches: |i| responses::starts_with_greeting(i.text),
        apply: |i| {
            let reply = responses::greeting_response(i.text, i.menu())
                .unwrap_or_else(|| responses::nudge(i.menu()));
            i.reply(RuleKind::Greeting, Session::Idle, Some(reply))
        },
    },
    Rule {
        kind: RuleKind::SupportKeyword,
        matches: |i| responses::contains_support_keyword(i.text) && !i.starts_with_menu(),
        apply: |i| {
            i.keep_session(
                RuleKind::SupportKeyword,
                Some(responses::support_greeting(i.menu())),
            )
        },
    },
    Rule {
        kind: RuleKind::Confirm,
        matches: |i| i.text == "yes" && i.session.pending().is_some(),
        apply: confirm,
    },
    Rule {
        kind: RuleKind::Farewell,
        matches: |i| responses::is_farewell(i.text),
        apply: |i| {
            i.keep_session(
                RuleKind::Farewell,
                responses::farewell_response(i.text, i.menu()),
            )
        },
    },
    Rule {
        kind: RuleKind::Ignored,
        matches: |i| !i.starts_with_menu(),
        apply: |i| i.keep_session(RuleKind::Ignored, None),
    },
    Rule {
        kind: RuleKind::Menu,
        matches: |_| true,
        apply: menu_command,
    },
];

/// Decides the next session, reply and ticket for one inbound message.
pub fn interpret(
    session: &Session,
    message: &InboundMessage,
    catalog: &Catalog,
    config: &InterpreterConfig,
    now: DateTime<Local>,
) -> Turn {
    let normalized = message.content.trim().to_lowercase();
    let input = Input {
        text: &normalized,
        sender: &message.sender_id,
        session,
        catalog,
        config,
        now,
    };

    match RULES.iter().find(|rule| (rule.matches)(&input)) {
        Some(rule) => {
            let turn = (rule.apply)(&input);
            debug_assert_eq!(turn.rule, rule.kind);
            turn
        }
        None => input.keep_session(RuleKind::Ignored, None),
    }
}

fn confirm(i: &Input<'_>) -> Turn {
    let Some(selection) = i.session.pending() else {
        return i.keep_session(RuleKind::Confirm, None);
    };

    let ticket_number = ticket::generate_at(selection, i.now.naive_local());
    let issue = match selection {
        Selection::Issue(issue) => issue.label(),
        Selection::Other => OTHER_ISSUE_TEXT.to_string(),
    };
    let ticket = Ticket {
        ticket_number,
        issue,
        status: TicketStatus::Open,
        created_at: i.now.with_timezone(&Utc),
        customer_phone: i.sender.to_string(),
    };

    Turn {
        session: Session::Idle,
        reply: Some(responses::ticket_confirmation(&ticket)),
        ticket: Some(ticket),
        rule: RuleKind::Confirm,
    }
}

fn menu_command(i: &Input<'_>) -> Turn {
    let remainder = i.text[i.config.token.len()..].trim();
    let menu = i.menu();

    if remainder.is_empty() {
        return i.reply(
            RuleKind::Menu,
            Session::Idle,
            Some(responses::root_menu(i.catalog, menu)),
        );
    }

    if DEPARTMENT_NUMBER.is_match(remainder) {
        return match i.catalog.resolve_department_by_number(remainder) {
            Some(dept) if dept.is_other() => i.reply(
                RuleKind::Menu,
                Session::AwaitingConfirmation(Selection::Other),
                Some(responses::other_prompt(i.catalog, menu)),
            ),
            Some(dept) => i.reply(
                RuleKind::Menu,
                Session::Idle,
                Some(responses::department_listing(i.catalog, dept, menu)),
            ),
            None => {
                warn!(department = remainder, "department missing from catalog");
                help(i)
            }
        };
    }

    if let Some(caps) = ISSUE_CODE.captures(remainder) {
        let letter = caps[1].chars().next().unwrap_or_default();
        let number = caps[2].parse::<u8>().ok().filter(|n| (1..=10).contains(n));
        let Some(number) = number else {
            return help(i);
        };
        return match i.catalog.find_issue(letter, number) {
            Some(issue) => i.reply(
                RuleKind::Menu,
                Session::AwaitingConfirmation(Selection::Issue(issue.clone())),
                Some(responses::selected_issue(issue, menu)),
            ),
            None => {
                warn!(issue = remainder, "issue code missing from catalog");
                help(i)
            }
        };
    }

    help(i)
}

fn help(i: &Input<'_>) -> Turn {
    i.reply(
        RuleKind::Menu,
        Session::Idle,
        Some(responses::help(i.menu())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use sprout_catalog::DepartmentCode;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 2, 10, 15, 0).unwrap()
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage {
            id: "1".into(),
            sender_id: "+15550001".into(),
            content: text.into(),
            timestamp: Utc::now(),
        }
    }

    fn run(session: &Session, text: &str) -> Turn {
        interpret(
            session,
            &msg(text),
            &catalog(),
            &InterpreterConfig::default(),
            now(),
        )
    }

    fn pending_i3() -> Session {
        let issue = catalog().find_issue('I', 3).unwrap().clone();
        Session::AwaitingConfirmation(Selection::Issue(issue))
    }

    #[test]
    fn bare_menu_command_shows_root_menu() {
        let turn = run(&pending_i3(), "  #SPROUT ");
        assert_eq!(turn.rule, RuleKind::Menu);
        assert_eq!(turn.session, Session::Idle);
        assert!(turn.reply.unwrap().contains("01 - Cloud Services"));
    }

    #[test]
    fn department_number_lists_issues() {
        let turn = run(&Session::Idle, "#sprout 02");
        let reply = turn.reply.unwrap();
        assert!(reply.starts_with("Infrastructure issues:"));
        assert!(reply.contains("I3 - "));
        assert_eq!(turn.session, Session::Idle);
    }

    #[test]
    fn department_07_awaits_confirmation_of_other() {
        let turn = run(&Session::Idle, "#sprout 07");
        assert_eq!(turn.session, Session::AwaitingConfirmation(Selection::Other));
        let reply = turn.reply.unwrap();
        assert!(reply.contains(catalog().other_description()));
        assert!(reply.contains("Reply *yes*"));
    }

    #[test]
    fn issue_code_selects_issue_case_insensitively() {
        for text in ["#sprout i3", "#Sprout   I3", "#sprouti3"] {
            let turn = run(&Session::Idle, text);
            assert_eq!(turn.session, pending_i3(), "input {text:?}");
            assert!(turn.reply.unwrap().starts_with("Selected issue: I3 - "));
        }
    }

    #[test]
    fn unknown_issue_falls_back_to_help() {
        let turn = run(&Session::Idle, "#sprout p4");
        assert_eq!(turn.session, Session::Idle);
        assert!(turn.reply.unwrap().starts_with("Sorry, I didn't understand"));
    }

    #[test]
    fn malformed_remainders_get_help() {
        for text in ["#sprout 08", "#sprout 00", "#sprout 2", "#sprout x1", "#sprout menu", "#sprout c"] {
            let turn = run(&pending_i3(), text);
            assert_eq!(turn.rule, RuleKind::Menu, "input {text:?}");
            assert_eq!(turn.session, Session::Idle, "input {text:?}");
            assert!(turn.reply.unwrap().starts_with("Sorry"), "input {text:?}");
        }
    }

    #[test]
    fn yes_confirms_pending_issue() {
        let turn = run(&pending_i3(), " YES ");
        assert_eq!(turn.rule, RuleKind::Confirm);
        assert_eq!(turn.session, Session::Idle);
        let ticket = turn.ticket.unwrap();
        assert_eq!(ticket.ticket_number, "INF-101500-0201");
        assert!(ticket.issue.starts_with("I3 - "));
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.customer_phone, "+15550001");
        assert_eq!(ticket.created_at, now().with_timezone(&Utc));
        let reply = turn.reply.unwrap();
        assert!(reply.contains("INF-101500-0201"));
        assert!(reply.contains("Status: Open"));
    }

    #[test]
    fn yes_for_other_uses_placeholder_issue() {
        let turn = run(&Session::AwaitingConfirmation(Selection::Other), "yes");
        let ticket = turn.ticket.unwrap();
        assert!(ticket.ticket_number.starts_with("OTR-"));
        assert_eq!(ticket.issue, OTHER_ISSUE_TEXT);
    }

    #[test]
    fn second_yes_creates_nothing() {
        let first = run(&pending_i3(), "yes");
        assert!(first.ticket.is_some());
        let second = run(&first.session, "yes");
        assert_eq!(second.rule, RuleKind::Ignored);
        assert!(second.ticket.is_none());
        assert!(second.reply.is_none());
    }

    #[test]
    fn greeting_with_support_keyword_wins_and_resets() {
        let turn = run(&pending_i3(), "Hi, I need help with my laptop");
        assert_eq!(turn.rule, RuleKind::GreetingWithSupport);
        assert_eq!(turn.session, Session::Idle);
        assert!(turn.reply.unwrap().contains("#sprout"));
    }

    #[test]
    fn plain_greetings() {
        let exact = run(&pending_i3(), "Good Morning");
        assert_eq!(exact.rule, RuleKind::Greeting);
        assert_eq!(exact.session, Session::Idle);
        assert!(exact.reply.unwrap().starts_with("Good morning!"));

        let nudge = run(&Session::Idle, "hello everyone");
        assert_eq!(nudge.reply.unwrap(), responses::nudge("#sprout"));
    }

    #[test]
    fn support_keyword_keeps_session() {
        let turn = run(&pending_i3(), "my printer has a problem");
        assert_eq!(turn.rule, RuleKind::SupportKeyword);
        assert_eq!(turn.session, pending_i3());
        assert!(turn.reply.is_some());

        // A keyword behind the menu command is parsed as a command instead.
        let turn = run(&Session::Idle, "#sprout help");
        assert_eq!(turn.rule, RuleKind::Menu);
    }

    #[test]
    fn farewell_keeps_session() {
        let turn = run(&pending_i3(), "thanks!");
        assert_eq!(turn.rule, RuleKind::Farewell);
        assert_eq!(turn.session, pending_i3());
        assert!(turn.reply.unwrap().starts_with("You're welcome"));
    }

    #[test]
    fn free_text_is_ignored() {
        for text in ["what time is it", "yes", "", "   "] {
            let turn = run(&Session::Idle, text);
            assert_eq!(turn.rule, RuleKind::Ignored, "input {text:?}");
            assert!(turn.reply.is_none());
            assert_eq!(turn.session, Session::Idle);
        }
        let turn = run(&pending_i3(), "what time is it");
        assert_eq!(turn.session, pending_i3());
    }

    #[test]
    fn configured_menu_command_is_honoured() {
        let config = InterpreterConfig::new("#Desk");
        let turn = interpret(&Session::Idle, &msg("#desk 01"), &catalog(), &config, now());
        assert!(turn.reply.unwrap().contains("#Desk C1"));
        let turn = interpret(&Session::Idle, &msg("#sprout 01"), &catalog(), &config, now());
        assert_eq!(turn.rule, RuleKind::Ignored);
    }

    #[test]
    fn rule_table_ends_with_catch_all() {
        assert_eq!(RULES.last().map(|r| r.kind), Some(RuleKind::Menu));
        assert_eq!(RuleKind::GreetingWithSupport.to_string(), "greeting_with_support");
    }

    #[test]
    fn departments_one_to_six_list_exactly_their_issues() {
        let catalog = catalog();
        for (number, code) in [
            ("01", DepartmentCode::C),
            ("02", DepartmentCode::I),
            ("03", DepartmentCode::N),
            ("04", DepartmentCode::S),
            ("05", DepartmentCode::P),
            ("06", DepartmentCode::W),
        ] {
            let reply = run(&Session::Idle, &format!("#sprout {number}")).reply.unwrap();
            for n in 1..=10u8 {
                let label = format!("\n{}{} - ", code.letter(), n);
                assert_eq!(
                    reply.contains(&label),
                    catalog.find_issue(code.letter(), n).is_some(),
                    "department {number}, issue {n}"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn out_of_range_issue_numbers_get_help(
            letter in prop::sample::select(vec!['c', 'i', 'n', 's', 'p', 'w']),
            n in prop_oneof![Just(0u32), 11u32..100_000],
        ) {
            let turn = run(&Session::Idle, &format!("#sprout {letter}{n}"));
            prop_assert_eq!(turn.session, Session::Idle);
            prop_assert!(turn.reply.unwrap().starts_with("Sorry"));
        }
    }
}
