// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete assistant with a mock channel and
//! either an in-memory store or a temp SQLite database. `send_message()`
//! drives the full pipeline the way the push path does.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use sprout_catalog::Catalog;
use sprout_config::model::{DedupConfig, SproutConfig, StorageConfig};
use sprout_core::{
    InboundMessage, MessageStore, SproutError, StorageAdapter, Ticket, TicketStore, Watermark,
};
use sprout_engine::{Dispatch, Poller, Session, SupportAssistant};
use sprout_storage::SqliteStorage;

use crate::memory_store::MemoryStore;
use crate::mock_channel::MockChannel;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    menu_command: Option<String>,
    catalog_toml: Option<String>,
    dedup: DedupConfig,
    sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            menu_command: None,
            catalog_toml: None,
            dedup: DedupConfig::default(),
            sqlite: false,
        }
    }

    /// Use a different menu command than the default `#sprout`.
    pub fn with_menu_command(mut self, command: &str) -> Self {
        self.menu_command = Some(command.to_string());
        self
    }

    /// Use a catalog parsed from TOML instead of the built-in one.
    pub fn with_catalog_toml(mut self, toml: &str) -> Self {
        self.catalog_toml = Some(toml.to_string());
        self
    }

    /// Override deduplication limits.
    pub fn with_dedup(mut self, dedup: DedupConfig) -> Self {
        self.dedup = dedup;
        self
    }

    /// Back the stores with a temp SQLite database instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SproutError> {
        let catalog = match &self.catalog_toml {
            Some(toml) => sprout_catalog::parse_catalog(toml)?,
            None => Catalog::builtin()?,
        };

        let mut config = SproutConfig::default();
        if let Some(command) = self.menu_command {
            config.assistant.menu_command = command;
        }
        config.dedup = self.dedup;

        let (messages, tickets, memory, temp_dir): (
            Arc<dyn MessageStore>,
            Arc<dyn TicketStore>,
            Option<Arc<MemoryStore>>,
            Option<tempfile::TempDir>,
        ) = if self.sqlite {
            let temp_dir =
                tempfile::TempDir::new().map_err(|e| SproutError::Storage { source: e.into() })?;
            let storage_config = StorageConfig {
                database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
                wal_mode: true,
            };
            let storage = SqliteStorage::new(storage_config);
            storage.initialize().await?;
            let storage = Arc::new(storage);
            let messages: Arc<dyn MessageStore> = storage.clone();
            let tickets: Arc<dyn TicketStore> = storage;
            (messages, tickets, None, Some(temp_dir))
        } else {
            let store = Arc::new(MemoryStore::new());
            let messages: Arc<dyn MessageStore> = store.clone();
            let tickets: Arc<dyn TicketStore> = store.clone();
            (messages, tickets, Some(store), None)
        };

        let channel = Arc::new(MockChannel::new());
        let assistant = SupportAssistant::from_config(
            &config,
            Arc::new(catalog),
            messages.clone(),
            tickets.clone(),
            channel.clone(),
        );

        Ok(TestHarness {
            assistant: Arc::new(Mutex::new(assistant)),
            channel,
            messages,
            tickets,
            memory,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired assistant with inspectable collaborators.
pub struct TestHarness {
    pub assistant: Arc<Mutex<SupportAssistant>>,
    pub channel: Arc<MockChannel>,
    pub messages: Arc<dyn MessageStore>,
    pub tickets: Arc<dyn TicketStore>,
    memory: Option<Arc<MemoryStore>>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// In-memory harness with defaults.
    pub async fn new() -> Result<Self, SproutError> {
        Self::builder().build().await
    }

    /// Stores `text` from `sender` and dispatches it (push path).
    pub async fn send_message(&self, sender: &str, text: &str) -> Result<Dispatch, SproutError> {
        self.assistant.lock().await.accept(sender, text).await
    }

    /// Stores `text` with an explicit timestamp and dispatches it.
    ///
    /// Only available on the in-memory store, where timestamps can be chosen.
    pub async fn send_message_at(
        &self,
        sender: &str,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Dispatch, SproutError> {
        let store = self.memory.as_ref().ok_or_else(|| {
            SproutError::Internal("send_message_at needs the in-memory store".into())
        })?;
        let stored = store.append_incoming_at(sender, text, timestamp).await;
        self.deliver(InboundMessage {
            id: stored.id,
            sender_id: stored.counterpart,
            content: stored.content,
            timestamp: stored.timestamp,
        })
        .await
    }

    /// Dispatches an already stored message, as a redelivery would.
    pub async fn deliver(&self, msg: InboundMessage) -> Result<Dispatch, SproutError> {
        self.assistant.lock().await.handle_inbound(msg).await
    }

    /// A poll runner over this harness's store and assistant.
    pub fn poller(&self, start: Watermark) -> Poller {
        Poller::new(self.assistant.clone(), self.messages.clone(), start)
    }

    /// The in-memory store, when the harness uses one.
    pub fn memory_store(&self) -> Option<&Arc<MemoryStore>> {
        self.memory.as_ref()
    }

    pub async fn stored_tickets(&self) -> Vec<Ticket> {
        self.tickets.list_all().await.unwrap_or_default()
    }

    pub async fn session(&self, sender: &str) -> Option<Session> {
        self.assistant.lock().await.session(sender).cloned()
    }
}
