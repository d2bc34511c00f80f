// comment-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Comment Gate Runtime
// Description: Evaluation, enforcement flows, and host adapters.
// Purpose: Execute the comment policy against live host state.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement rule evaluation, the advisory and save gate
//! flows, host event dispatch, and an in-memory host. All host surfaces must
//! call into the same engine so hints and save decisions agree.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod adapter;
pub mod engine;
pub mod evaluator;
pub mod host;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::EventReply;
pub use adapter::HostEvent;
pub use adapter::SUBSCRIBED_EVENTS;
pub use adapter::register;
pub use engine::CommentPolicyEngine;
pub use engine::GateDecision;
pub use engine::HINT_DURATION_MS;
pub use engine::hint_notice;
pub use evaluator::evaluate;
pub use host::InMemoryHostClient;
