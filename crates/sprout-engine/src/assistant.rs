// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch pipeline.
//!
//! [`SupportAssistant::handle_inbound`] runs one stored inbound message through
//! deduplication, the interpreter, ticket persistence and reply delivery.
//!
//! Delivery is at-least-once from the transport's point of view but at most
//! one visible side effect per message id: the id is recorded before anything
//! else happens. If sending the reply fails the session transition and any
//! ticket insert have already happened and the error is returned.

use std::sync::Arc;

use chrono::Local;
use sprout_catalog::Catalog;
use sprout_config::model::SproutConfig;
use sprout_core::{
    ChannelAdapter, InboundMessage, MessageId, MessageStore, OutboundMessage, SproutError, Ticket,
    TicketStore,
};
use tracing::{debug, info};

use crate::dedup::{content_key, Deduplicator};
use crate::interpreter::{interpret, InterpreterConfig, RuleKind};
use crate::session::{Session, SessionRegistry};

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The id was handled before; nothing was done.
    Duplicate,
    /// Same sender and content inside the dedup window; nothing was done.
    Repeated,
    /// Interpreted, but no reply is due.
    Ignored { rule: RuleKind },
    /// A reply was sent and logged.
    Replied {
        rule: RuleKind,
        reply: String,
        message_id: MessageId,
        ticket: Option<Ticket>,
    },
}

/// Owns the per-sender state and the collaborators of the pipeline.
pub struct SupportAssistant {
    catalog: Arc<Catalog>,
    config: InterpreterConfig,
    sessions: SessionRegistry,
    dedup: Deduplicator,
    messages: Arc<dyn MessageStore>,
    tickets: Arc<dyn TicketStore>,
    channel: Arc<dyn ChannelAdapter>,
}

impl SupportAssistant {
    pub fn new(
        catalog: Arc<Catalog>,
        config: InterpreterConfig,
        dedup: Deduplicator,
        messages: Arc<dyn MessageStore>,
        tickets: Arc<dyn TicketStore>,
        channel: Arc<dyn ChannelAdapter>,
    ) -> Self {
        info!(
            menu_command = config.menu_command(),
            channel = channel.name(),
            "support assistant initialized"
        );
        Self {
            catalog,
            config,
            sessions: SessionRegistry::new(),
            dedup,
            messages,
            tickets,
            channel,
        }
    }

    /// Builds an assistant from the loaded configuration.
    pub fn from_config(
        config: &SproutConfig,
        catalog: Arc<Catalog>,
        messages: Arc<dyn MessageStore>,
        tickets: Arc<dyn TicketStore>,
        channel: Arc<dyn ChannelAdapter>,
    ) -> Self {
        Self::new(
            catalog,
            InterpreterConfig::from(&config.assistant),
            Deduplicator::from_config(&config.dedup),
            messages,
            tickets,
            channel,
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current session of `sender`, if the sender has written before.
    pub fn session(&self, sender: &str) -> Option<&Session> {
        self.sessions.get(sender)
    }

    /// Appends a freshly received message to the incoming log and dispatches it.
    ///
    /// This is the push path. The poll runner will later read the same record
    /// and see its id as a duplicate.
    pub async fn accept(&mut self, sender: &str, content: &str) -> Result<Dispatch, SproutError> {
        let stored = self.messages.append_incoming(sender, content).await?;
        let inbound = InboundMessage {
            id: stored.id,
            sender_id: stored.counterpart,
            content: stored.content,
            timestamp: stored.timestamp,
        };
        self.handle_inbound(inbound).await
    }

    /// Runs one stored inbound message through the pipeline.
    pub async fn handle_inbound(&mut self, msg: InboundMessage) -> Result<Dispatch, SproutError> {
        if !self.dedup.should_process_by_id(&msg.id) {
            debug!(message_id = msg.id.as_str(), "duplicate message id, skipping");
            return Ok(Dispatch::Duplicate);
        }

        let key = content_key(&msg.sender_id, &msg.content);
        if !self.dedup.should_process_by_content(&key, msg.timestamp) {
            debug!(
                message_id = msg.id.as_str(),
                sender_id = msg.sender_id.as_str(),
                "repeated content inside dedup window, skipping"
            );
            return Ok(Dispatch::Repeated);
        }

        let session = self.sessions.session_for(&msg.sender_id).clone();
        let turn = interpret(&session, &msg, &self.catalog, &self.config, Local::now());
        let rule: &'static str = turn.rule.into();
        debug!(
            sender_id = msg.sender_id.as_str(),
            rule,
            from = %session,
            to = %turn.session,
            "message interpreted"
        );
        self.sessions.store(&msg.sender_id, turn.session);

        if let Some(ticket) = &turn.ticket {
            if self.tickets.append_if_absent(ticket).await? {
                info!(
                    ticket_number = ticket.ticket_number.as_str(),
                    customer = ticket.customer_phone.as_str(),
                    "ticket created"
                );
            } else {
                debug!(
                    ticket_number = ticket.ticket_number.as_str(),
                    "ticket number already stored, treating as created"
                );
            }
        }

        let Some(reply) = turn.reply else {
            return Ok(Dispatch::Ignored { rule: turn.rule });
        };

        let message_id = self
            .channel
            .send(OutboundMessage {
                recipient: msg.sender_id.clone(),
                content: reply.clone(),
            })
            .await?;
        self.messages.append_outgoing(&msg.sender_id, &reply).await?;

        Ok(Dispatch::Replied {
            rule: turn.rule,
            reply,
            message_id,
            ticket: turn.ticket,
        })
    }
}
