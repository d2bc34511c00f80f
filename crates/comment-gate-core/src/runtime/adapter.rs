// comment-gate-core/src/runtime/adapter.rs
// ============================================================================
// Module: Comment Gate Host Adapter
// Description: Host event names, subscription, and dispatch.
// Purpose: Translate host events into engine flows and replies.
// Dependencies: crate::{interfaces, runtime::engine}, serde
// ============================================================================

//! ## Overview
//! Comment and status changes run the advisory flow. `ticket.save` runs the
//! gate and must resolve to an allow signal or a rejection carrying the
//! message; the host blocks the save if and only if the handler rejects.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::EventRegistrar;
use crate::interfaces::HostClient;
use crate::runtime::engine::CommentPolicyEngine;
use crate::runtime::engine::GateDecision;

// ============================================================================
// SECTION: Host Events
// ============================================================================

/// Host events the engine handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEvent {
    /// Outgoing comment visibility changed.
    #[serde(rename = "comment.type.changed")]
    CommentTypeChanged,
    /// Outgoing comment text changed.
    #[serde(rename = "comment.text.changed")]
    CommentTextChanged,
    /// Ticket status changed.
    #[serde(rename = "ticket.status.changed")]
    TicketStatusChanged,
    /// Ticket save attempted.
    #[serde(rename = "ticket.save")]
    TicketSave,
}

/// Every event the engine subscribes to.
pub const SUBSCRIBED_EVENTS: [HostEvent; 4] = [
    HostEvent::CommentTypeChanged,
    HostEvent::CommentTextChanged,
    HostEvent::TicketStatusChanged,
    HostEvent::TicketSave,
];

impl HostEvent {
    /// Returns the host event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CommentTypeChanged => "comment.type.changed",
            Self::CommentTextChanged => "comment.text.changed",
            Self::TicketStatusChanged => "ticket.status.changed",
            Self::TicketSave => "ticket.save",
        }
    }

    /// Parses a host event name; unhandled names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        SUBSCRIBED_EVENTS.into_iter().find(|event| event.name() == name)
    }

    /// Returns true for events that gate a save.
    #[must_use]
    pub const fn is_gate(self) -> bool {
        matches!(self, Self::TicketSave)
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subscribes the engine to every handled host event.
pub fn register(registrar: &mut impl EventRegistrar) {
    for event in SUBSCRIBED_EVENTS {
        registrar.subscribe(event.name());
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Handler reply returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", content = "message", rename_all = "snake_case")]
pub enum EventReply {
    /// Advisory event handled.
    Acknowledged,
    /// Save may proceed.
    Allow,
    /// Save must be blocked with this message.
    Reject(String),
}

impl<H> CommentPolicyEngine<H>
where
    H: HostClient,
{
    /// Handles a host event.
    pub async fn dispatch(&self, event: HostEvent) -> EventReply {
        if event.is_gate() {
            return match self.check_save().await {
                GateDecision::Allow => EventReply::Allow,
                GateDecision::Deny {
                    message, ..
                } => EventReply::Reject(message),
            };
        }
        let _ = self.advise().await;
        EventReply::Acknowledged
    }

    /// Handles a host event by name; unknown names are ignored.
    pub async fn dispatch_named(&self, name: &str) -> Option<EventReply> {
        let event = HostEvent::from_name(name)?;
        Some(self.dispatch(event).await)
    }

    /// Save handler following the host's reject-to-block convention.
    ///
    /// # Errors
    ///
    /// Returns the denial message when the save must be blocked.
    pub async fn save_handler(&self) -> Result<bool, String> {
        self.check_save().await.into_host_result()
    }
}
