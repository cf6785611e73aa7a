// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket persistence with idempotent insert by ticket number.

use std::str::FromStr;

use rusqlite::params;
use rusqlite::types::Type;
use sprout_core::types::format_timestamp;
use sprout_core::{SproutError, Ticket, TicketStatus};

use crate::database::{map_tr_err, Database};
use crate::queries::timestamp_column;

/// Inserts `ticket` unless its number is already stored. Returns whether a row was written.
pub async fn append_if_absent(db: &Database, ticket: &Ticket) -> Result<bool, SproutError> {
    let number = ticket.ticket_number.clone();
    let issue = ticket.issue.clone();
    let status = ticket.status.to_string();
    let created_at = format_timestamp(&ticket.created_at);
    let phone = ticket.customer_phone.clone();

    let inserted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO tickets (ticket_number, issue, status, created_at, customer_phone)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![number, issue, status, created_at, phone],
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(inserted > 0)
}

/// Every ticket in insertion order.
pub async fn list_all(db: &Database) -> Result<Vec<Ticket>, SproutError> {
    db.connection()
        .call(|conn| -> Result<Vec<Ticket>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT ticket_number, issue, status, created_at, customer_phone
                 FROM tickets ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let status: String = row.get(2)?;
                let status = TicketStatus::from_str(&status).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
                })?;
                Ok(Ticket {
                    ticket_number: row.get(0)?,
                    issue: row.get(1)?,
                    status,
                    created_at: timestamp_column(row, 3)?,
                    customer_phone: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn clear(db: &Database) -> Result<(), SproutError> {
    db.connection()
        .call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM tickets", [])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_ticket(number: &str, issue: &str) -> Ticket {
        Ticket {
            ticket_number: number.to_string(),
            issue: issue.to_string(),
            status: TicketStatus::Open,
            created_at: Utc.timestamp_opt(1_767_225_600, 0).unwrap(),
            customer_phone: "+15550001".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_number_is_ignored_without_mutation() {
        let (db, _dir) = setup_db().await;
        let first = make_ticket("INF-101500-0201", "I3 - Disk space");
        assert!(append_if_absent(&db, &first).await.unwrap());

        let clash = make_ticket("INF-101500-0201", "I1 - Server is unreachable");
        assert!(!append_if_absent(&db, &clash).await.unwrap());

        let tickets = list_all(&db).await.unwrap();
        assert_eq!(tickets, vec![first]);
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let (db, _dir) = setup_db().await;
        for number in ["NET-090000-0101", "CLD-080000-0101", "OTR-100000-0101"] {
            append_if_absent(&db, &make_ticket(number, "x")).await.unwrap();
        }
        let numbers: Vec<String> = list_all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.ticket_number)
            .collect();
        assert_eq!(numbers, ["NET-090000-0101", "CLD-080000-0101", "OTR-100000-0101"]);
    }

    #[tokio::test]
    async fn clear_removes_all_tickets() {
        let (db, _dir) = setup_db().await;
        append_if_absent(&db, &make_ticket("SFT-000000-0101", "x")).await.unwrap();
        clear(&db).await.unwrap();
        assert!(list_all(&db).await.unwrap().is_empty());
    }
}
