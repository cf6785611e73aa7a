// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests across two storage handles on one database file: one
//! appends incoming messages the way `sprout receive` does, the other runs
//! the poll runner the way `sprout serve` does.

use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Utc};
use sprout_catalog::Catalog;
use sprout_config::model::{SproutConfig, StorageConfig};
use sprout_core::{MessageStore, StorageAdapter, TicketStore, Watermark};
use sprout_engine::{Poller, SupportAssistant, SyncCursor};
use sprout_storage::SqliteStorage;
use sprout_test_utils::MockChannel;
use tokio::sync::Mutex;

const ALICE: &str = "+15550001";

async fn open(path: &Path) -> Arc<SqliteStorage> {
    let storage = SqliteStorage::new(StorageConfig {
        database_path: path.to_string_lossy().into_owned(),
        wal_mode: true,
    });
    storage.initialize().await.unwrap();
    Arc::new(storage)
}

struct Server {
    storage: Arc<SqliteStorage>,
    channel: Arc<MockChannel>,
    poller: Poller,
}

async fn server(path: &Path, start: Watermark) -> Server {
    let storage = open(path).await;
    let channel = Arc::new(MockChannel::new());
    let assistant = SupportAssistant::from_config(
        &SproutConfig::default(),
        Arc::new(Catalog::builtin().unwrap()),
        storage.clone(),
        storage.clone(),
        channel.clone(),
    );
    let poller = Poller::new(Arc::new(Mutex::new(assistant)), storage.clone(), start);
    Server {
        storage,
        channel,
        poller,
    }
}

#[tokio::test]
async fn received_messages_are_answered_by_the_poll_runner() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sprout.db");

    let receiver = open(&db).await;
    let mut srv = server(&db, Watermark(Utc::now() - Duration::seconds(1))).await;

    // Each step is a separate poll, as it would be with a real interval.
    for text in ["#sprout", "#sprout 03", "#sprout n2", "yes"] {
        receiver.append_incoming(ALICE, text).await.unwrap();
        let report = srv.poller.poll_once().await.unwrap();
        assert_eq!(report.dispatched, 1, "{text} should be dispatched");
        assert_eq!(report.failed, 0);
    }

    let sent = srv.channel.sent_messages().await;
    assert_eq!(sent.len(), 4);
    assert!(sent[0].content.contains("03 - Network"));
    assert!(sent[1].content.starts_with("Network issues:"));
    assert!(sent[2].content.starts_with("Selected issue: N2 - "));
    assert!(sent[3].content.contains("Ticket number: NET-"));

    let tickets = receiver.list_all().await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert!(tickets[0].ticket_number.starts_with("NET-"));
    assert_eq!(tickets[0].customer_phone, ALICE);

    // The replies were logged and show up in a history view.
    let log = receiver.all_since(Watermark::origin()).await.unwrap();
    let mut cursor = SyncCursor::default();
    let history = cursor.poll(&log);
    assert_eq!(history.len(), 8);
    assert_eq!(history[0].content, "#sprout");
    assert!(cursor.poll(&log).is_empty());

    srv.storage.close().await.unwrap();
    receiver.close().await.unwrap();
}

#[tokio::test]
async fn restart_does_not_answer_old_messages() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sprout.db");

    let receiver = open(&db).await;
    receiver.append_incoming(ALICE, "#sprout").await.unwrap();

    let mut srv = server(&db, Watermark(Utc::now())).await;
    let report = srv.poller.poll_once().await.unwrap();
    assert_eq!(report.fetched, 0);
    assert_eq!(srv.channel.sent_count().await, 0);
}

#[tokio::test]
async fn clear_empties_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sprout.db");
    let mut srv = server(&db, Watermark::origin()).await;

    srv.storage.append_incoming(ALICE, "#sprout 07").await.unwrap();
    srv.poller.poll_once().await.unwrap();
    srv.storage.append_incoming(ALICE, "yes").await.unwrap();
    srv.poller.poll_once().await.unwrap();
    assert_eq!(srv.storage.list_all().await.unwrap().len(), 1);

    MessageStore::clear(srv.storage.as_ref()).await.unwrap();
    TicketStore::clear(srv.storage.as_ref()).await.unwrap();

    assert!(srv.storage.list_all().await.unwrap().is_empty());
    assert!(
        srv.storage
            .all_since(Watermark::origin())
            .await
            .unwrap()
            .is_empty()
    );
}

#[test]
fn config_file_points_at_catalog_and_database() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.toml");
    std::fs::write(&catalog_path, sprout_catalog::BUILTIN_CATALOG).unwrap();

    let config_path = dir.path().join("sprout.toml");
    std::fs::write(
        &config_path,
        format!(
            "[catalog]\npath = {:?}\n\n[storage]\ndatabase_path = {:?}\n",
            catalog_path.to_string_lossy(),
            dir.path().join("x.db").to_string_lossy()
        ),
    )
    .unwrap();

    let config = sprout_config::load_and_validate_path(&config_path).unwrap();
    let catalog = Catalog::load(config.catalog.path.as_deref().map(Path::new)).unwrap();
    assert_eq!(catalog.departments().count(), 7);
    assert!(config.storage.database_path.ends_with("x.db"));
}
