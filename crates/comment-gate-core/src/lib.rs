// comment-gate-core/src/lib.rs
// ============================================================================
// Module: Comment Gate Core Library
// Description: Public API surface for the Comment Gate core.
// Purpose: Expose policy types, host interfaces, and runtime flows.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Comment Gate enforces a comment policy on ticket updates: a comment must
//! be present, long enough, and of the required visibility before a ticket
//! leaves the open state. The core derives a rule from settings, evaluates it
//! against fresh ticket state, issues advisory hints, and gates saves. It
//! integrates with a ticketing host only through [`HostClient`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use audit::FileAuditSink;
pub use audit::InMemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PolicyAuditEvent;
pub use audit::PolicyAuditKind;
pub use audit::PolicyAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::EventRegistrar;
pub use interfaces::HostClient;
pub use interfaces::HostError;
pub use interfaces::Notice;
pub use interfaces::NoticeLevel;
pub use runtime::CommentPolicyEngine;
pub use runtime::EventReply;
pub use runtime::GateDecision;
pub use runtime::HostEvent;
pub use runtime::InMemoryHostClient;
pub use runtime::evaluate;
