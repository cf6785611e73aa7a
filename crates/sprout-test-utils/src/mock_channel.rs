// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter`, capturing every outbound
//! message for assertion. It can be switched into a failing mode to exercise
//! transport errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use sprout_core::{
    AdapterType, ChannelAdapter, HealthStatus, MessageId, OutboundMessage, PluginAdapter,
    SproutError,
};

/// A mock messaging channel for testing.
pub struct MockChannel {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing: AtomicBool,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel that accepts every message.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Make subsequent `send()` calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// The most recent outbound message, if any.
    pub async fn last_sent(&self) -> Option<OutboundMessage> {
        self.sent.lock().await.last().cloned()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Wait until at least `count` messages have been sent.
    pub async fn wait_for_sent(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.sent.lock().await.len() >= count {
                return;
            }
            notified.await;
        }
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SproutError> {
        if self.failing.load(Ordering::SeqCst) {
            Ok(HealthStatus::Unhealthy("mock channel set to fail".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), SproutError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SproutError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SproutError::Channel {
                message: format!("mock send to {} failed", msg.recipient),
                source: None,
            });
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        self.notify.notify_waiters();
        Ok(MessageId(id))
    }
}
