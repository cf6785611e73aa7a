// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound transport trait (WhatsApp, console, test doubles).

use async_trait::async_trait;

use crate::error::SproutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageId, OutboundMessage};

/// Adapter for delivering replies to a conversation counterpart.
///
/// Inbound delivery is not part of this trait: the webhook receiver and the
/// poll runner both read from the [`MessageStore`](crate::MessageStore).
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Sends a message through the channel.
    ///
    /// A failure is returned to the caller as-is; the interpreter's state
    /// transition has already happened by then.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SproutError>;
}
