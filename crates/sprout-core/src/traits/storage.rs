// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for the message log and the ticket store.

use async_trait::async_trait;

use crate::error::SproutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Message, MessageLog, Ticket, Watermark};

/// Lifecycle of a persistence backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), SproutError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SproutError>;
}

/// Append-only log of inbound and outbound messages.
///
/// Identifiers are assigned monotonically within each direction. Timestamps
/// are the only order across directions.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message received from `counterpart`.
    async fn append_incoming(&self, counterpart: &str, content: &str)
    -> Result<Message, SproutError>;

    /// Appends a message sent to `counterpart`.
    async fn append_outgoing(&self, counterpart: &str, content: &str)
    -> Result<Message, SproutError>;

    /// Returns both streams restricted to records newer than `since`.
    async fn all_since(&self, since: Watermark) -> Result<MessageLog, SproutError>;

    /// Removes every message from both logs.
    async fn clear(&self) -> Result<(), SproutError>;
}

/// Store of created tickets, keyed by ticket number.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Lists every stored ticket in creation order.
    async fn list_all(&self) -> Result<Vec<Ticket>, SproutError>;

    /// Inserts `ticket` unless one with the same number exists.
    ///
    /// Returns `true` if the ticket was inserted, `false` if an existing
    /// ticket already carried that number. Both outcomes are success.
    async fn append_if_absent(&self, ticket: &Ticket) -> Result<bool, SproutError>;

    /// Removes every ticket.
    async fn clear(&self) -> Result<(), SproutError>;
}
