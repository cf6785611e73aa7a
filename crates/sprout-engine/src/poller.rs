// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pull path: periodically reads new activity from the message store and
//! dispatches every new incoming message.
//!
//! Ticks never overlap. When a poll takes longer than the interval, the next
//! one is scheduled after it completes.

use std::sync::Arc;
use std::time::Duration;

use sprout_core::{Direction, InboundMessage, MessageStore, SproutError, Watermark};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::assistant::{Dispatch, SupportAssistant};
use crate::sync::SyncCursor;

/// Counts from one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Messages of either direction newer than the previous watermark.
    pub fetched: usize,
    /// Incoming messages that produced a reply or were ignored by the interpreter.
    pub dispatched: usize,
    /// Incoming messages dropped by deduplication.
    pub suppressed: usize,
    /// Incoming messages whose dispatch returned an error.
    pub failed: usize,
}

pub struct Poller {
    assistant: Arc<Mutex<SupportAssistant>>,
    messages: Arc<dyn MessageStore>,
    cursor: SyncCursor,
}

impl Poller {
    /// Creates a poller that only considers messages newer than `start`.
    pub fn new(
        assistant: Arc<Mutex<SupportAssistant>>,
        messages: Arc<dyn MessageStore>,
        start: Watermark,
    ) -> Self {
        Self {
            assistant,
            messages,
            cursor: SyncCursor::new(start),
        }
    }

    pub fn watermark(&self) -> Watermark {
        self.cursor.watermark()
    }

    /// Reads everything newer than the watermark, advances it, and dispatches
    /// incoming messages in timestamp order.
    ///
    /// A failed dispatch is logged and counted; the remaining messages are
    /// still processed. Only a failed read is returned as an error.
    pub async fn poll_once(&mut self) -> Result<PollReport, SproutError> {
        let log = self.messages.all_since(self.cursor.watermark()).await?;
        let batch = self.cursor.poll(&log);

        let mut report = PollReport {
            fetched: batch.len(),
            ..PollReport::default()
        };
        if batch.is_empty() {
            return Ok(report);
        }

        let mut assistant = self.assistant.lock().await;
        for message in batch
            .into_iter()
            .filter(|m| m.direction == Direction::Incoming)
        {
            let id = message.id.clone();
            let inbound = InboundMessage {
                id: message.id,
                sender_id: message.counterpart,
                content: message.content,
                timestamp: message.timestamp,
            };
            match assistant.handle_inbound(inbound).await {
                Ok(Dispatch::Duplicate | Dispatch::Repeated) => report.suppressed += 1,
                Ok(_) => report.dispatched += 1,
                Err(e) => {
                    error!(message_id = id.as_str(), error = %e, "failed to dispatch message");
                    report.failed += 1;
                }
            }
        }

        debug!(
            fetched = report.fetched,
            dispatched = report.dispatched,
            suppressed = report.suppressed,
            failed = report.failed,
            watermark = %self.cursor.watermark(),
            "poll complete"
        );
        Ok(report)
    }

    /// Polls every `interval` until `cancel` fires.
    pub async fn run(&mut self, interval: Duration, cancel: CancellationToken) {
        info!(interval_secs = interval.as_secs(), "poll runner started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!(error = %e, "poll failed, retrying on next tick");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping poll runner");
                    break;
                }
            }
        }
    }
}
