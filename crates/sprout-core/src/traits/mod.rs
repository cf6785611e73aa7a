// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The session engine never talks to a transport or a database directly; it
//! goes through these traits. All of them use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use storage::{MessageStore, StorageAdapter, TicketStore};
