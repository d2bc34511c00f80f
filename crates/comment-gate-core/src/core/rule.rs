// comment-gate-core/src/core/rule.rs
// ============================================================================
// Module: Comment Gate Rule Engine
// Description: Derivation of validation rules from policy settings.
// Purpose: Map settings to a declarative rule with no side effects.
// Dependencies: crate::core::{settings, ticket}, serde
// ============================================================================

//! ## Overview
//! [`derive_rule`] is a pure function of [`PolicySettings`]. It is called on
//! every evaluation, so it performs no allocation and reads nothing else.
//! Unrecognized modes map to the same rule as `require_any`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::settings::PolicyMode;
use crate::core::settings::PolicySettings;
use crate::core::ticket::RequiredType;

// ============================================================================
// SECTION: Rule
// ============================================================================

/// Declarative comment rule derived from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CommentRule {
    /// Whether a non-empty comment is required.
    pub require_text: bool,
    /// Required comment visibility.
    pub required_type: RequiredType,
    /// Minimum trimmed comment length; zero disables the check.
    pub min_length: u64,
}

/// Derives the validation rule for the given settings.
#[must_use]
pub fn derive_rule(settings: &PolicySettings) -> CommentRule {
    let required_type = match settings.mode {
        PolicyMode::ForcePublic => RequiredType::Public,
        PolicyMode::ForcePrivate => RequiredType::Internal,
        PolicyMode::RequireAny | PolicyMode::Unrecognized(_) => RequiredType::None,
    };
    CommentRule {
        require_text: true,
        required_type,
        min_length: settings.min_length,
    }
}
