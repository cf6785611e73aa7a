// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands over the stores and the catalog:
//! `receive`, `tickets`, `history`, `clear` and `catalog`.

use chrono::{DateTime, Utc};
use colored::Colorize;
use sprout_catalog::Catalog;
use sprout_config::model::SproutConfig;
use sprout_core::{
    Direction, Message, MessageStore, SproutError, StorageAdapter, Ticket, TicketStore, Watermark,
};
use sprout_engine::SyncCursor;
use tracing::info;

/// Appends one message to the incoming log, as the webhook receiver would.
pub async fn run_receive(config: &SproutConfig, from: &str, text: &str) -> Result<(), SproutError> {
    let storage = crate::open_storage(config).await?;
    let stored = storage.append_incoming(from, text).await?;
    info!(message_id = stored.id.as_str(), sender_id = from, "message received");
    println!("stored message {} from {}", stored.id, stored.counterpart);
    storage.close().await
}

pub async fn run_tickets(config: &SproutConfig, json: bool) -> Result<(), SproutError> {
    let storage = crate::open_storage(config).await?;
    let tickets = storage.list_all().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
    } else {
        println!("{}", format_tickets(&tickets));
    }
    storage.close().await
}

/// Prints both logs merged in timestamp order, then the watermark to pass
/// as `--since` next time.
pub async fn run_history(
    config: &SproutConfig,
    since: Option<DateTime<Utc>>,
) -> Result<(), SproutError> {
    let storage = crate::open_storage(config).await?;
    let start = since.map_or_else(Watermark::origin, Watermark);
    let log = storage.all_since(start).await?;

    let mut cursor = SyncCursor::new(start);
    let messages = cursor.poll(&log);
    println!("{}", format_history(&messages));
    if !messages.is_empty() {
        println!(
            "\n{}",
            format!("watermark: {}", cursor.watermark()).dimmed()
        );
    }
    storage.close().await
}

pub async fn run_clear(config: &SproutConfig) -> Result<(), SproutError> {
    let storage = crate::open_storage(config).await?;
    MessageStore::clear(storage.as_ref()).await?;
    TicketStore::clear(storage.as_ref()).await?;
    info!(database = config.storage.database_path.as_str(), "stores cleared");
    println!("cleared all messages and tickets");
    storage.close().await
}

pub fn run_catalog(catalog: &Catalog) {
    println!("{}", format_catalog(catalog));
}

fn format_tickets(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "no tickets".to_string();
    }
    let mut out = format!(
        "{:<16}  {:<6}  {:<16}  {:<19}  {}",
        "TICKET", "STATUS", "CUSTOMER", "CREATED (UTC)", "ISSUE"
    );
    for t in tickets {
        out.push_str(&format!(
            "\n{:<16}  {:<6}  {:<16}  {:<19}  {}",
            t.ticket_number,
            t.status.to_string(),
            t.customer_phone,
            t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            t.issue
        ));
    }
    out
}

fn format_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "no messages".to_string();
    }
    let entries: Vec<String> = messages
        .iter()
        .map(|m| {
            let arrow = match m.direction {
                Direction::Incoming => "<-".green(),
                Direction::Outgoing => "->".cyan(),
            };
            let mut entry = format!(
                "{} {arrow} {}",
                m.timestamp.format("%Y-%m-%d %H:%M:%S"),
                m.counterpart
            );
            for line in m.content.lines() {
                entry.push('\n');
                if !line.is_empty() {
                    entry.push_str("    ");
                    entry.push_str(line);
                }
            }
            entry
        })
        .collect();
    entries.join("\n")
}

fn format_catalog(catalog: &Catalog) -> String {
    let mut out = Vec::new();
    for dept in catalog.departments() {
        match dept.code {
            Some(code) => out.push(format!("{} {} ({})", dept.number, dept.name, code)),
            None => out.push(format!("{} {}", dept.number, dept.name)),
        }
        for issue in catalog.issues_of(dept) {
            out.push(format!("  {}", issue.label()));
        }
    }
    out.join("\n")
}
