// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental, chronological view over the incoming and outgoing logs.
//!
//! The two logs are appended independently, so the timestamp is the only
//! order across them. A [`Watermark`] remembers the newest timestamp already
//! returned; the next poll returns only strictly newer messages.

use sprout_core::{Message, MessageLog, Watermark};
use tracing::trace;

/// Merges both streams, keeping records strictly newer than `watermark`,
/// sorted by timestamp ascending. Equal timestamps keep incoming first.
pub fn messages_since(log: &MessageLog, watermark: Watermark) -> Vec<Message> {
    let mut messages: Vec<Message> = log
        .incoming
        .iter()
        .filter(|r| watermark.admits(&r.timestamp))
        .cloned()
        .map(Message::from)
        .chain(
            log.outgoing
                .iter()
                .filter(|r| watermark.admits(&r.timestamp))
                .cloned()
                .map(Message::from),
        )
        .collect();
    messages.sort_by_key(|m| m.timestamp);
    messages
}

/// Timestamp of the last message, or `watermark` unchanged when there are none.
pub fn advance(messages: &[Message], watermark: Watermark) -> Watermark {
    messages
        .last()
        .map_or(watermark, |m| Watermark(m.timestamp))
}

/// A watermark plus the merge-and-advance step.
#[derive(Debug, Clone, Default)]
pub struct SyncCursor {
    watermark: Watermark,
}

impl SyncCursor {
    pub fn new(start: Watermark) -> Self {
        Self { watermark: start }
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    /// Returns the messages of `log` newer than the watermark and moves the
    /// watermark past them.
    pub fn poll(&mut self, log: &MessageLog) -> Vec<Message> {
        let messages = messages_since(log, self.watermark);
        self.watermark = advance(&messages, self.watermark);
        trace!(
            count = messages.len(),
            watermark = %self.watermark,
            "sync cursor polled"
        );
        messages
    }
}
