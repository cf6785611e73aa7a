// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session engine for the Sprout support assistant.
//!
//! - [`interpreter`] turns a sender's text and session into a reply, the next
//!   session and possibly a ticket.
//! - [`dedup`] suppresses redelivered ids and rapid repeats of the same text.
//! - [`ticket`] derives ticket numbers from the selection and the clock.
//! - [`sync`] merges the incoming and outgoing logs behind a watermark.
//! - [`assistant`] wires these together with the stores and the channel, and
//!   [`poller`] feeds it from the message store on a fixed interval.

pub mod assistant;
pub mod dedup;
pub mod interpreter;
pub mod poller;
pub mod responses;
pub mod session;
pub mod shutdown;
pub mod sync;
pub mod ticket;

pub use assistant::{Dispatch, SupportAssistant};
pub use dedup::Deduplicator;
pub use interpreter::{interpret, InterpreterConfig, RuleKind, Turn};
pub use poller::{PollReport, Poller};
pub use session::{Session, SessionRegistry};
pub use sync::SyncCursor;
