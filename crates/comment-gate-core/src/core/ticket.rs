// comment-gate-core/src/core/ticket.rs
// ============================================================================
// Module: Comment Gate Ticket Model
// Description: Ticket status, comment visibility, and evaluation snapshots.
// Purpose: Give host ticket fields typed, host-independent representations.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`TicketSnapshot`] is read fresh from the host for every evaluation and
//! is never cached. Host values arrive as loosely typed JSON keyed by field
//! name; unusable values degrade to empty text or [`CommentType::Unset`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Host Field Names
// ============================================================================

/// Host field holding the ticket lifecycle status.
pub const STATUS_FIELD: &str = "ticket.status";
/// Host field holding the outgoing comment visibility.
pub const COMMENT_TYPE_FIELD: &str = "ticket.comment.type";
/// Host field holding the outgoing comment body.
pub const COMMENT_TEXT_FIELD: &str = "ticket.comment.text";
/// Fields read for every evaluation, in request order.
pub const SNAPSHOT_FIELDS: [&str; 3] = [STATUS_FIELD, COMMENT_TYPE_FIELD, COMMENT_TEXT_FIELD];

/// Terminal status value after which the policy no longer applies.
pub const SOLVED_STATUS: &str = "solved";
/// Zero-width no-break space, stripped along with whitespace.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

// ============================================================================
// SECTION: Comment Visibility
// ============================================================================

/// Visibility of the outgoing comment as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    /// Public reply visible to the requester.
    PublicReply,
    /// Internal note visible to agents only.
    InternalNote,
    /// No recognized visibility.
    #[default]
    Unset,
}

impl CommentType {
    /// Host wire value for public replies.
    pub const PUBLIC_WIRE: &'static str = "publicReply";
    /// Host wire value for internal notes.
    pub const INTERNAL_WIRE: &'static str = "internalNote";

    /// Parses a host wire value; unknown values read as [`CommentType::Unset`].
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            Self::PUBLIC_WIRE => Self::PublicReply,
            Self::INTERNAL_WIRE => Self::InternalNote,
            _ => Self::Unset,
        }
    }

    /// Returns the host wire value, if any.
    #[must_use]
    pub const fn as_wire(self) -> Option<&'static str> {
        match self {
            Self::PublicReply => Some(Self::PUBLIC_WIRE),
            Self::InternalNote => Some(Self::INTERNAL_WIRE),
            Self::Unset => None,
        }
    }
}

/// Comment visibility demanded by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredType {
    /// A public reply is required.
    Public,
    /// An internal note is required.
    Internal,
    /// Any visibility is accepted.
    #[default]
    None,
}

impl RequiredType {
    /// Returns true when a comment of the given type satisfies this requirement.
    #[must_use]
    pub const fn matches(self, comment_type: CommentType) -> bool {
        match self {
            Self::Public => matches!(comment_type, CommentType::PublicReply),
            Self::Internal => matches!(comment_type, CommentType::InternalNote),
            Self::None => true,
        }
    }

    /// Returns the comment type that satisfies this requirement, if constrained.
    #[must_use]
    pub const fn comment_type(self) -> Option<CommentType> {
        match self {
            Self::Public => Some(CommentType::PublicReply),
            Self::Internal => Some(CommentType::InternalNote),
            Self::None => None,
        }
    }

    /// Returns the label used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "Public reply",
            Self::Internal => "Private note",
            Self::None => "comment",
        }
    }
}

impl fmt::Display for RequiredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Ticket Status
// ============================================================================

/// Opaque ticket lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketStatus(String);

impl TicketStatus {
    /// Creates a new ticket status.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// Returns the status as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the terminal solved status.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.0 == SOLVED_STATUS
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Ticket Snapshot
// ============================================================================

/// Point-in-time view of the ticket fields the policy inspects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketSnapshot {
    /// Ticket lifecycle status.
    pub status: TicketStatus,
    /// Outgoing comment visibility.
    pub comment_type: CommentType,
    /// Raw outgoing comment text (untrimmed).
    pub comment_text: String,
}

impl TicketSnapshot {
    /// Creates a snapshot from typed parts.
    #[must_use]
    pub fn new(
        status: impl Into<String>,
        comment_type: CommentType,
        comment_text: impl Into<String>,
    ) -> Self {
        Self {
            status: TicketStatus::new(status),
            comment_type,
            comment_text: comment_text.into(),
        }
    }

    /// Builds a snapshot from host field values keyed by field name.
    #[must_use]
    pub fn from_fields(fields: &BTreeMap<String, Value>) -> Self {
        Self {
            status: TicketStatus::new(string_field(fields, STATUS_FIELD)),
            comment_type: CommentType::from_wire(string_field(fields, COMMENT_TYPE_FIELD)),
            comment_text: string_field(fields, COMMENT_TEXT_FIELD).to_string(),
        }
    }

    /// Renders the snapshot back into host field values.
    #[must_use]
    pub fn to_fields(&self) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        fields.insert(STATUS_FIELD.to_string(), Value::String(self.status.as_str().to_string()));
        fields.insert(
            COMMENT_TYPE_FIELD.to_string(),
            self.comment_type.as_wire().map_or(Value::Null, |wire| Value::String(wire.to_string())),
        );
        fields.insert(COMMENT_TEXT_FIELD.to_string(), Value::String(self.comment_text.clone()));
        fields
    }

    /// Returns the comment text with surrounding whitespace removed.
    ///
    /// The byte order mark counts as whitespace, matching the host editor.
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.comment_text.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
    }
}

/// Returns a string field value, or empty text when absent or not a string.
fn string_field<'a>(fields: &'a BTreeMap<String, Value>, name: &str) -> &'a str {
    fields.get(name).and_then(Value::as_str).unwrap_or_default()
}
