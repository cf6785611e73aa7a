// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sprout support assistant.
//!
//! This crate provides the error type, the shared data model (messages,
//! tickets, watermarks) and the collaborator traits that the session engine
//! talks to: the outbound channel, the message store and the ticket store.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SproutError;
pub use types::{
    AdapterType, Direction, HealthStatus, InboundMessage, IncomingRecord, Message, MessageId,
    MessageLog, OutboundMessage, OutgoingRecord, Ticket, TicketStatus, Watermark,
};

pub use traits::{ChannelAdapter, MessageStore, PluginAdapter, StorageAdapter, TicketStore};
