// comment-gate-core/src/core/verdict.rs
// ============================================================================
// Module: Comment Gate Verdicts
// Description: Evaluation outcomes and their user-facing messages.
// Purpose: Share one violation vocabulary between hints and save denials.
// Dependencies: crate::core::ticket, serde
// ============================================================================

//! ## Overview
//! A [`Verdict`] is produced and consumed within a single evaluation. Each
//! [`Violation`] renders two messages: a hint shown while editing and a
//! denial returned when a save is blocked. Both describe the same reason so
//! the hint a user sees matches why a save would fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ticket::RequiredType;

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Reason tag for a policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    /// No comment text was entered.
    MissingComment,
    /// Comment text is shorter than the minimum.
    TooShort,
    /// Comment visibility does not match the requirement.
    WrongType,
}

impl ViolationReason {
    /// Returns the stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingComment => "missing_comment",
            Self::TooShort => "too_short",
            Self::WrongType => "wrong_type",
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy violation with its message parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Violation {
    /// No comment text was entered.
    MissingComment,
    /// Comment text is shorter than the minimum.
    TooShort {
        /// Required minimum length in characters.
        min_length: u64,
    },
    /// Comment visibility does not match the requirement.
    WrongType {
        /// Visibility the rule requires.
        required: RequiredType,
    },
}

impl Violation {
    /// Returns the reason tag.
    #[must_use]
    pub const fn reason(&self) -> ViolationReason {
        match self {
            Self::MissingComment => ViolationReason::MissingComment,
            Self::TooShort {
                ..
            } => ViolationReason::TooShort,
            Self::WrongType {
                ..
            } => ViolationReason::WrongType,
        }
    }

    /// Returns the advisory message shown while the ticket is being edited.
    #[must_use]
    pub fn hint_message(&self) -> String {
        match self {
            Self::MissingComment => {
                "A comment is required before saving this non-Solved ticket.".to_string()
            }
            Self::TooShort {
                min_length,
            } => format!("Comment must be at least {min_length} characters."),
            Self::WrongType {
                required,
            } => format!("This ticket requires a {required}."),
        }
    }

    /// Returns the message that blocks a save.
    #[must_use]
    pub fn denial_message(&self) -> String {
        match self {
            Self::MissingComment => {
                "Please add a comment before saving this non-Solved ticket.".to_string()
            }
            Self::TooShort {
                min_length,
            } => format!("Please enter at least {min_length} characters before saving."),
            Self::WrongType {
                required,
            } => format!("This ticket requires a {required} before saving."),
        }
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of evaluating a rule against a ticket snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// The snapshot satisfies the rule.
    Pass,
    /// The snapshot violates the rule.
    Violation {
        /// The single highest-precedence violation.
        violation: Violation,
    },
}

impl Verdict {
    /// Wraps a violation.
    #[must_use]
    pub const fn violated(violation: Violation) -> Self {
        Self::Violation {
            violation,
        }
    }

    /// Returns true when the verdict is a pass.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the violation, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<Violation> {
        match self {
            Self::Pass => None,
            Self::Violation {
                violation,
            } => Some(*violation),
        }
    }
}
