// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprout serve` command implementation.
//!
//! Opens SQLite storage and runs the poll runner over the incoming log until
//! SIGINT or SIGTERM. Replies go to the console channel. Messages already in
//! the log at startup are not answered again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sprout_catalog::Catalog;
use sprout_config::model::SproutConfig;
use sprout_core::{SproutError, StorageAdapter, Watermark};
use sprout_engine::{shutdown, Poller, SupportAssistant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::console::ConsoleChannel;

pub async fn run_serve(config: SproutConfig, catalog: Catalog) -> Result<(), SproutError> {
    info!(agent = config.agent.name.as_str(), "starting sprout serve");

    let storage = crate::open_storage(&config).await?;
    let channel = Arc::new(ConsoleChannel::new());

    let assistant = SupportAssistant::from_config(
        &config,
        Arc::new(catalog),
        storage.clone(),
        storage.clone(),
        channel,
    );
    let assistant = Arc::new(Mutex::new(assistant));

    let start = Watermark(Utc::now());
    let mut poller = Poller::new(assistant, storage.clone(), start);
    info!(
        database = config.storage.database_path.as_str(),
        watermark = %start,
        "polling incoming messages"
    );

    log_allocator_stats("startup");

    let cancel = shutdown::install_signal_handler();
    poller
        .run(Duration::from_secs(config.sync.poll_interval_secs), cancel)
        .await;

    storage.close().await?;
    log_allocator_stats("shutdown");
    info!("sprout serve stopped");
    Ok(())
}

/// Allocated and resident heap bytes as reported by jemalloc.
#[cfg(not(target_env = "msvc"))]
fn allocator_stats() -> Option<(usize, usize)> {
    // Stats are cached until the epoch advances.
    tikv_jemalloc_ctl::epoch::advance().ok()?;
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().ok()?;
    let resident = tikv_jemalloc_ctl::stats::resident::read().ok()?;
    Some((allocated, resident))
}

#[cfg(target_env = "msvc")]
fn allocator_stats() -> Option<(usize, usize)> {
    None
}

fn log_allocator_stats(stage: &str) {
    match allocator_stats() {
        Some((allocated, resident)) => info!(
            stage,
            heap_allocated_bytes = allocated,
            heap_resident_bytes = resident,
            "allocator stats"
        ),
        None => debug!(stage, "allocator stats unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn allocator_stats_report_live_heap() {
        let buf = std::hint::black_box(vec![1u8; 1 << 20]);
        let (allocated, resident) = allocator_stats().expect("jemalloc stats");
        assert!(allocated >= buf.len());
        assert!(resident > 0);
    }
}
