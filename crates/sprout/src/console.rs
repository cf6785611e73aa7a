// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console channel: prints outbound replies to stdout.
//!
//! Stands in for the messaging transport when running locally.

use async_trait::async_trait;
use colored::Colorize;
use sprout_core::{
    AdapterType, ChannelAdapter, HealthStatus, MessageId, OutboundMessage, PluginAdapter,
    SproutError,
};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

/// Recipient header followed by the reply, each line indented.
pub fn render(msg: &OutboundMessage) -> String {
    let mut out = format!("{} {}", "->".cyan(), msg.recipient.bold());
    for line in msg.content.lines() {
        out.push('\n');
        if !line.is_empty() {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    out
}

#[async_trait]
impl PluginAdapter for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SproutError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SproutError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SproutError> {
        let id = format!("console-{}", uuid::Uuid::new_v4());
        debug!(message_id = id.as_str(), recipient = msg.recipient.as_str(), "printing reply");
        println!("{}\n", render(&msg));
        Ok(MessageId(id))
    }
}
