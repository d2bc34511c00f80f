// comment-gate-core/src/core/mod.rs
// ============================================================================
// Module: Comment Gate Core Types
// Description: Settings, rules, ticket snapshots, and verdicts.
// Purpose: Provide stable, serializable types for comment policy evaluation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types are pure data plus the side-effect-free settings resolver and
//! rule derivation. Nothing here talks to the host.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod rule;
pub mod settings;
pub mod ticket;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use rule::CommentRule;
pub use rule::derive_rule;
pub use settings::PolicyMode;
pub use settings::PolicySettings;
pub use settings::parse_min_length;
pub use settings::resolve_settings;
pub use ticket::COMMENT_TEXT_FIELD;
pub use ticket::COMMENT_TYPE_FIELD;
pub use ticket::CommentType;
pub use ticket::RequiredType;
pub use ticket::SNAPSHOT_FIELDS;
pub use ticket::STATUS_FIELD;
pub use ticket::TicketSnapshot;
pub use ticket::TicketStatus;
pub use verdict::Verdict;
pub use verdict::Violation;
pub use verdict::ViolationReason;
