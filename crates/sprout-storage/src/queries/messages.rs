// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incoming and outgoing message logs.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::params;
use sprout_core::types::format_timestamp;
use sprout_core::{
    Direction, IncomingRecord, Message, MessageLog, OutgoingRecord, SproutError, Watermark,
};

use crate::database::{map_tr_err, Database};
use crate::queries::timestamp_column;

/// Table and counterpart column for each direction.
fn table(direction: Direction) -> (&'static str, &'static str) {
    match direction {
        Direction::Incoming => ("incoming_messages", "sender"),
        Direction::Outgoing => ("outgoing_messages", "recipient"),
    }
}

/// Appends a message and returns it with its assigned id.
pub async fn append(
    db: &Database,
    direction: Direction,
    counterpart: &str,
    content: &str,
    timestamp: DateTime<Utc>,
) -> Result<Message, SproutError> {
    // Stored text has microsecond precision; return exactly what was stored.
    let timestamp = timestamp.trunc_subsecs(6);
    let (table, column) = table(direction);
    let sql = format!("INSERT INTO {table} ({column}, content, timestamp) VALUES (?1, ?2, ?3)");
    let counterpart = counterpart.to_string();
    let content = content.to_string();
    let stamp = format_timestamp(&timestamp);

    let (id, counterpart, content) = db
        .connection()
        .call(move |conn| -> Result<(i64, String, String), rusqlite::Error> {
            conn.execute(&sql, params![counterpart, content, stamp])?;
            Ok((conn.last_insert_rowid(), counterpart, content))
        })
        .await
        .map_err(map_tr_err)?;

    Ok(Message {
        id: id.to_string(),
        direction,
        counterpart,
        content,
        timestamp,
    })
}

/// Both logs restricted to records strictly newer than `since`, each in id order.
pub async fn all_since(db: &Database, since: Watermark) -> Result<MessageLog, SproutError> {
    let since = format_timestamp(&since.0);
    db.connection()
        .call(move |conn| -> Result<MessageLog, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, sender, content, timestamp FROM incoming_messages
                 WHERE timestamp > ?1 ORDER BY id ASC",
            )?;
            let incoming = stmt
                .query_map(params![since], |row| {
                    Ok(IncomingRecord {
                        id: row.get::<_, i64>(0)?.to_string(),
                        from: row.get(1)?,
                        content: row.get(2)?,
                        timestamp: timestamp_column(row, 3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut stmt = conn.prepare(
                "SELECT id, recipient, content, timestamp FROM outgoing_messages
                 WHERE timestamp > ?1 ORDER BY id ASC",
            )?;
            let outgoing = stmt
                .query_map(params![since], |row| {
                    Ok(OutgoingRecord {
                        id: row.get::<_, i64>(0)?.to_string(),
                        to: row.get(1)?,
                        content: row.get(2)?,
                        timestamp: timestamp_column(row, 3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(MessageLog { incoming, outgoing })
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes every message from both logs.
pub async fn clear(db: &Database) -> Result<(), SproutError> {
    db.connection()
        .call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "DELETE FROM incoming_messages;
                 DELETE FROM outgoing_messages;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
