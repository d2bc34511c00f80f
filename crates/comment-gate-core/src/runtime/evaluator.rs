// comment-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Comment Gate Evaluator
// Description: Applies a comment rule to a ticket snapshot.
// Purpose: Produce a single verdict with fixed check precedence.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Checks run in a fixed order: presence, then length, then visibility. The
//! first failing check wins, so the advisory and gating paths always report
//! the same reason. Solved tickets pass unconditionally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CommentRule;
use crate::core::TicketSnapshot;
use crate::core::Verdict;
use crate::core::Violation;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates a rule against a snapshot.
#[must_use]
pub fn evaluate(rule: &CommentRule, snapshot: &TicketSnapshot) -> Verdict {
    if snapshot.status.is_solved() {
        return Verdict::Pass;
    }
    let text = snapshot.trimmed_text();
    if rule.require_text && text.is_empty() {
        return Verdict::violated(Violation::MissingComment);
    }
    if rule.min_length > 0 && !text.is_empty() && text_length(text) < rule.min_length {
        return Verdict::violated(Violation::TooShort {
            min_length: rule.min_length,
        });
    }
    if !rule.required_type.matches(snapshot.comment_type) {
        return Verdict::violated(Violation::WrongType {
            required: rule.required_type,
        });
    }
    Verdict::Pass
}

/// Counts comment length in UTF-16 code units, as the host editor reports it.
fn text_length(text: &str) -> u64 {
    u64::try_from(text.encode_utf16().count()).unwrap_or(u64::MAX)
}
