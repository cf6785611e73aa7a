// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-sender conversation state.
//!
//! A session is either idle or waiting for the sender to confirm a selected
//! issue with "yes". Sessions are plain values: the interpreter receives the
//! current one and returns the next, and the registry stores it.

use std::collections::HashMap;

use sprout_catalog::Selection;

/// States of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// No pending selection.
    #[default]
    Idle,
    /// A selection is waiting for "yes".
    AwaitingConfirmation(Selection),
}

impl Session {
    pub fn pending(&self) -> Option<&Selection> {
        match self {
            Session::Idle => None,
            Session::AwaitingConfirmation(selection) => Some(selection),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Idle => write!(f, "idle"),
            Session::AwaitingConfirmation(Selection::Other) => {
                write!(f, "awaiting-confirmation(other)")
            }
            Session::AwaitingConfirmation(Selection::Issue(issue)) => write!(
                f,
                "awaiting-confirmation({})",
                issue.code().unwrap_or_default()
            ),
        }
    }
}

/// Sessions keyed by sender id, created lazily.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sender's session, creating an idle one on first contact.
    pub fn session_for(&mut self, sender: &str) -> &Session {
        self.sessions.entry(sender.to_string()).or_default()
    }

    /// The sender's session without creating one.
    pub fn get(&self, sender: &str) -> Option<&Session> {
        self.sessions.get(sender)
    }

    pub fn store(&mut self, sender: &str, session: Session) {
        self.sessions.insert(sender.to_string(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
