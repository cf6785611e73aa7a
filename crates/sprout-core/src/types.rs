// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the engine, the stores and the channel adapters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier returned by a channel for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind a [`PluginAdapter`](crate::PluginAdapter).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Which log a message was appended to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Formats a timestamp the way every store persists it.
///
/// Fixed width with microsecond precision, so lexicographic order on the
/// stored text equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses an ISO-8601 / RFC 3339 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// A message from either log, with a uniform `counterpart` field.
///
/// For incoming messages the counterpart is the sender, for outgoing
/// messages it is the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub direction: Direction,
    pub counterpart: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Persisted shape of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingRecord {
    pub id: String,
    pub from: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Persisted shape of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingRecord {
    pub id: String,
    pub to: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<IncomingRecord> for Message {
    fn from(record: IncomingRecord) -> Self {
        Self {
            id: record.id,
            direction: Direction::Incoming,
            counterpart: record.from,
            content: record.content,
            timestamp: record.timestamp,
        }
    }
}

impl From<OutgoingRecord> for Message {
    fn from(record: OutgoingRecord) -> Self {
        Self {
            id: record.id,
            direction: Direction::Outgoing,
            counterpart: record.to,
            content: record.content,
            timestamp: record.timestamp,
        }
    }
}

/// Both message streams as returned by [`MessageStore::all_since`](crate::MessageStore::all_since).
///
/// Each stream is in append order. Merging them is the sync cursor's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    pub incoming: Vec<IncomingRecord>,
    pub outgoing: Vec<OutgoingRecord>,
}

impl MessageLog {
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty()
    }
}

/// Timestamp cursor used to fetch only activity newer than the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Watermark(pub DateTime<Utc>);

impl Watermark {
    /// The watermark before any message: the Unix epoch.
    pub fn origin() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Returns `true` if `ts` is strictly newer than this watermark.
    pub fn admits(&self, ts: &DateTime<Utc>) -> bool {
        *ts > self.0
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::origin()
    }
}

impl std::fmt::Display for Watermark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_timestamp(&self.0))
    }
}

/// Ticket lifecycle status. Only creation is modelled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum TicketStatus {
    Open,
}

/// A support ticket created from a confirmed selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// `PREFIX-HHMMSS-DDMM`; unique across the ticket store.
    pub ticket_number: String,
    /// Issue code and description, or "None Specified" for the Other department.
    pub issue: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub customer_phone: String,
}

/// An inbound message handed to the dispatch pipeline.
///
/// `id` must be the identifier assigned by the message store, so that the
/// webhook path and the poll path see the same id for the same message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<IncomingRecord> for InboundMessage {
    fn from(record: IncomingRecord) -> Self {
        Self {
            id: record.id,
            sender_id: record.from,
            content: record.content,
            timestamp: record.timestamp,
        }
    }
}

/// An outbound message to be delivered by a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_767_225_600 + secs, 0).unwrap()
    }

    #[test]
    fn ticket_serializes_with_camel_case_keys() {
        let ticket = Ticket {
            ticket_number: "INF-101500-0201".into(),
            issue: "I3 - Server is down".into(),
            status: TicketStatus::Open,
            created_at: ts(0),
            customer_phone: "+15550001".into(),
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["ticketNumber"], "INF-101500-0201");
        assert_eq!(json["status"], "Open");
        assert_eq!(json["customerPhone"], "+15550001");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn records_keep_direction_specific_counterpart_fields() {
        let incoming = IncomingRecord {
            id: "1".into(),
            from: "+1555".into(),
            content: "hi".into(),
            timestamp: ts(1),
        };
        let json = serde_json::to_value(&incoming).unwrap();
        assert_eq!(json["from"], "+1555");

        let msg = Message::from(incoming);
        assert_eq!(msg.direction, Direction::Incoming);
        assert_eq!(msg.counterpart, "+1555");

        let outgoing = OutgoingRecord {
            id: "1".into(),
            to: "+1666".into(),
            content: "hello".into(),
            timestamp: ts(2),
        };
        let msg = Message::from(outgoing);
        assert_eq!(msg.direction, Direction::Outgoing);
        assert_eq!(msg.counterpart, "+1666");
    }

    #[test]
    fn formatted_timestamps_sort_chronologically() {
        let early = Utc.timestamp_opt(1_767_225_600, 5_000).unwrap();
        let late = Utc.timestamp_opt(1_767_225_600, 40_000).unwrap();
        assert!(format_timestamp(&early) < format_timestamp(&late));
        assert_eq!(parse_timestamp(&format_timestamp(&late)).unwrap(), late);
    }

    #[test]
    fn watermark_admits_only_strictly_newer() {
        let mark = Watermark(ts(3));
        assert!(!mark.admits(&ts(3)));
        assert!(!mark.admits(&ts(2)));
        assert!(mark.admits(&ts(4)));
        assert!(Watermark::origin().admits(&ts(0)));
    }

    #[test]
    fn direction_displays_lowercase() {
        assert_eq!(Direction::Incoming.to_string(), "incoming");
        assert_eq!("outgoing".parse::<Direction>().unwrap(), Direction::Outgoing);
    }
}
