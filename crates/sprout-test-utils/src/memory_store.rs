// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory message log and ticket store.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::Mutex;

use sprout_core::{
    Direction, IncomingRecord, Message, MessageLog, MessageStore, OutgoingRecord, SproutError,
    Ticket, TicketStore, Watermark,
};

#[derive(Default)]
struct Inner {
    incoming: Vec<IncomingRecord>,
    outgoing: Vec<OutgoingRecord>,
    tickets: Vec<Ticket>,
    next_incoming_id: u64,
    next_outgoing_id: u64,
}

/// Vec-backed store with the same contract as the SQLite one.
///
/// Ids start at 1 per direction and are never reused, even after `clear`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an incoming message with an explicit timestamp.
    pub async fn append_incoming_at(
        &self,
        counterpart: &str,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Message {
        let mut inner = self.inner.lock().await;
        inner.next_incoming_id += 1;
        let record = IncomingRecord {
            id: inner.next_incoming_id.to_string(),
            from: counterpart.to_string(),
            content: content.to_string(),
            timestamp: timestamp.trunc_subsecs(6),
        };
        inner.incoming.push(record.clone());
        Message::from(record)
    }

    /// Appends an outgoing message with an explicit timestamp.
    pub async fn append_outgoing_at(
        &self,
        counterpart: &str,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Message {
        let mut inner = self.inner.lock().await;
        inner.next_outgoing_id += 1;
        let record = OutgoingRecord {
            id: inner.next_outgoing_id.to_string(),
            to: counterpart.to_string(),
            content: content.to_string(),
            timestamp: timestamp.trunc_subsecs(6),
        };
        inner.outgoing.push(record.clone());
        Message::from(record)
    }

    /// Every message of one direction, in append order.
    pub async fn messages(&self, direction: Direction) -> Vec<Message> {
        let inner = self.inner.lock().await;
        match direction {
            Direction::Incoming => inner.incoming.iter().cloned().map(Message::from).collect(),
            Direction::Outgoing => inner.outgoing.iter().cloned().map(Message::from).collect(),
        }
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append_incoming(
        &self,
        counterpart: &str,
        content: &str,
    ) -> Result<Message, SproutError> {
        Ok(self.append_incoming_at(counterpart, content, Utc::now()).await)
    }

    async fn append_outgoing(
        &self,
        counterpart: &str,
        content: &str,
    ) -> Result<Message, SproutError> {
        Ok(self.append_outgoing_at(counterpart, content, Utc::now()).await)
    }

    async fn all_since(&self, since: Watermark) -> Result<MessageLog, SproutError> {
        let inner = self.inner.lock().await;
        Ok(MessageLog {
            incoming: inner
                .incoming
                .iter()
                .filter(|r| since.admits(&r.timestamp))
                .cloned()
                .collect(),
            outgoing: inner
                .outgoing
                .iter()
                .filter(|r| since.admits(&r.timestamp))
                .cloned()
                .collect(),
        })
    }

    async fn clear(&self) -> Result<(), SproutError> {
        let mut inner = self.inner.lock().await;
        inner.incoming.clear();
        inner.outgoing.clear();
        Ok(())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Ticket>, SproutError> {
        Ok(self.inner.lock().await.tickets.clone())
    }

    async fn append_if_absent(&self, ticket: &Ticket) -> Result<bool, SproutError> {
        let mut inner = self.inner.lock().await;
        if inner
            .tickets
            .iter()
            .any(|t| t.ticket_number == ticket.ticket_number)
        {
            return Ok(false);
        }
        inner.tickets.push(ticket.clone());
        Ok(true)
    }

    async fn clear(&self) -> Result<(), SproutError> {
        self.inner.lock().await.tickets.clear();
        Ok(())
    }
}
