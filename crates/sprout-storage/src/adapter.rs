// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::debug;

use sprout_config::model::StorageConfig;
use sprout_core::{
    AdapterType, Direction, HealthStatus, Message, MessageLog, MessageStore, PluginAdapter,
    SproutError, StorageAdapter, Ticket, TicketStore, Watermark,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed message log and ticket store.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// operation fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SproutError> {
        self.db.get().ok_or_else(|| SproutError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SproutError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SproutError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SproutError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SproutError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SproutError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl MessageStore for SqliteStorage {
    async fn append_incoming(
        &self,
        counterpart: &str,
        content: &str,
    ) -> Result<Message, SproutError> {
        queries::messages::append(self.db()?, Direction::Incoming, counterpart, content, Utc::now())
            .await
    }

    async fn append_outgoing(
        &self,
        counterpart: &str,
        content: &str,
    ) -> Result<Message, SproutError> {
        queries::messages::append(self.db()?, Direction::Outgoing, counterpart, content, Utc::now())
            .await
    }

    async fn all_since(&self, since: Watermark) -> Result<MessageLog, SproutError> {
        queries::messages::all_since(self.db()?, since).await
    }

    async fn clear(&self) -> Result<(), SproutError> {
        queries::messages::clear(self.db()?).await
    }
}

#[async_trait]
impl TicketStore for SqliteStorage {
    async fn list_all(&self) -> Result<Vec<Ticket>, SproutError> {
        queries::tickets::list_all(self.db()?).await
    }

    async fn append_if_absent(&self, ticket: &Ticket) -> Result<bool, SproutError> {
        queries::tickets::append_if_absent(self.db()?, ticket).await
    }

    async fn clear(&self) -> Result<(), SproutError> {
        queries::tickets::clear(self.db()?).await
    }
}
