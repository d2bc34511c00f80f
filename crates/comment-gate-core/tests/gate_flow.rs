// comment-gate-core/tests/gate_flow.rs
// ============================================================================
// Module: Save Gate Tests
// Description: Tests for the save gate state machine and autofix.
// ============================================================================
//! ## Overview
//! Drives the engine against an in-memory host to validate allow/deny
//! decisions, the single autofix attempt, and audit records.

use std::sync::Arc;

use comment_gate_core::COMMENT_TYPE_FIELD;
use comment_gate_core::CommentPolicyEngine;
use comment_gate_core::CommentType;
use comment_gate_core::GateDecision;
use comment_gate_core::InMemoryAuditSink;
use comment_gate_core::InMemoryHostClient;
use comment_gate_core::PolicyAuditKind;
use comment_gate_core::PolicyMode;
use comment_gate_core::PolicySettings;
use comment_gate_core::TicketSnapshot;
use comment_gate_core::ViolationReason;
use comment_gate_core::audit::DecisionLabel;
use comment_gate_core::audit::HostOperation;
use comment_gate_core::audit::PolicyFlow;
use comment_gate_core::runtime::engine::STATE_UNAVAILABLE_MESSAGE;
use serde_json::json;

fn engine(
    snapshot: &TicketSnapshot,
    mode: PolicyMode,
    autofix_type: bool,
    min_length: u64,
) -> (CommentPolicyEngine<InMemoryHostClient>, Arc<InMemoryAuditSink>) {
    let audit = Arc::new(InMemoryAuditSink::new());
    let settings = PolicySettings {
        mode,
        autofix_type,
        min_length,
    };
    let engine = CommentPolicyEngine::with_settings(InMemoryHostClient::new(snapshot), settings)
        .with_audit(audit.clone());
    (engine, audit)
}

// ============================================================================
// SECTION: Terminal Decisions
// ============================================================================

#[tokio::test]
async fn solved_ticket_is_allowed_without_comment() {
    let snapshot = TicketSnapshot::new("solved", CommentType::Unset, "");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePublic, false, 20);
    assert_eq!(engine.check_save().await, GateDecision::Allow);
}

#[tokio::test]
async fn passing_ticket_is_allowed() {
    let snapshot = TicketSnapshot::new("open", CommentType::PublicReply, "Replied to customer");
    let (engine, audit) = engine(&snapshot, PolicyMode::ForcePublic, false, 0);
    assert_eq!(engine.check_save().await, GateDecision::Allow);
    assert_eq!(
        audit.events(),
        vec![PolicyAuditKind::SaveDecision {
            decision: DecisionLabel::Allow,
            reason: None,
            autofix_attempted: false,
            autofix_applied: false,
        }]
    );
}

#[tokio::test]
async fn missing_comment_is_denied_even_with_autofix() {
    let snapshot = TicketSnapshot::new("pending", CommentType::InternalNote, "  ");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePublic, true, 0);
    let decision = engine.check_save().await;
    assert_eq!(
        decision,
        GateDecision::Deny {
            reason: Some(ViolationReason::MissingComment),
            message: "Please add a comment before saving this non-Solved ticket.".to_string(),
        }
    );
    assert!(engine.host().writes().is_empty());
}

#[tokio::test]
async fn short_comment_is_denied_with_length() {
    let snapshot = TicketSnapshot::new("open", CommentType::PublicReply, "ok");
    let (engine, _) = engine(&snapshot, PolicyMode::RequireAny, true, 10);
    let decision = engine.check_save().await;
    assert_eq!(
        decision.into_host_result(),
        Err("Please enter at least 10 characters before saving.".to_string())
    );
}

// ============================================================================
// SECTION: Autofix
// ============================================================================

#[tokio::test]
async fn wrong_type_without_autofix_is_denied() {
    let snapshot = TicketSnapshot::new("open", CommentType::InternalNote, "valid comment");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePublic, false, 0);
    assert_eq!(
        engine.check_save().await,
        GateDecision::Deny {
            reason: Some(ViolationReason::WrongType),
            message: "This ticket requires a Public reply before saving.".to_string(),
        }
    );
    assert!(engine.host().writes().is_empty());
}

#[tokio::test]
async fn autofix_success_allows_and_updates_type() {
    let snapshot = TicketSnapshot::new("open", CommentType::InternalNote, "valid comment");
    let (engine, audit) = engine(&snapshot, PolicyMode::ForcePublic, true, 0);
    assert_eq!(engine.check_save().await, GateDecision::Allow);
    assert_eq!(
        engine.host().writes(),
        vec![(COMMENT_TYPE_FIELD.to_string(), json!("publicReply"))]
    );
    assert_eq!(engine.host().snapshot().comment_type, CommentType::PublicReply);
    assert_eq!(
        audit.events(),
        vec![PolicyAuditKind::SaveDecision {
            decision: DecisionLabel::Allow,
            reason: None,
            autofix_attempted: true,
            autofix_applied: true,
        }]
    );
}

#[tokio::test]
async fn autofix_to_internal_note() {
    let snapshot = TicketSnapshot::new("open", CommentType::PublicReply, "escalating to tier 2");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePrivate, true, 0);
    assert!(engine.check_save().await.is_allow());
    assert_eq!(engine.host().snapshot().comment_type, CommentType::InternalNote);
}

#[tokio::test]
async fn autofix_failure_denies_with_wrong_type() {
    let snapshot = TicketSnapshot::new("open", CommentType::InternalNote, "valid comment");
    let (engine, audit) = engine(&snapshot, PolicyMode::ForcePublic, true, 0);
    engine.host().fail_writes(true);
    assert_eq!(
        engine.save_handler().await,
        Err("This ticket requires a Public reply before saving.".to_string())
    );
    assert_eq!(engine.host().snapshot().comment_type, CommentType::InternalNote);
    let events = audit.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        PolicyAuditKind::HostFailure {
            operation: HostOperation::SetField,
            flow: PolicyFlow::Gate,
            ..
        }
    ));
    assert_eq!(
        events[1],
        PolicyAuditKind::SaveDecision {
            decision: DecisionLabel::Deny,
            reason: Some(ViolationReason::WrongType),
            autofix_attempted: true,
            autofix_applied: false,
        }
    );
}

#[tokio::test]
async fn autofix_is_attempted_once_per_save() {
    let snapshot = TicketSnapshot::new("open", CommentType::Unset, "valid comment");
    let (engine, audit) = engine(&snapshot, PolicyMode::ForcePublic, true, 0);
    engine.host().fail_writes(true);
    let _ = engine.check_save().await;
    let failures = audit
        .events()
        .into_iter()
        .filter(|event| matches!(event, PolicyAuditKind::HostFailure { .. }))
        .count();
    assert_eq!(failures, 1);
}

// ============================================================================
// SECTION: Host Failures
// ============================================================================

#[tokio::test]
async fn unreadable_ticket_blocks_save() {
    let snapshot = TicketSnapshot::new("open", CommentType::PublicReply, "valid comment");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePublic, false, 0);
    engine.host().fail_reads(true);
    assert_eq!(
        engine.check_save().await,
        GateDecision::Deny {
            reason: None,
            message: STATE_UNAVAILABLE_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn gate_reads_fresh_state_per_attempt() {
    let snapshot = TicketSnapshot::new("open", CommentType::PublicReply, "");
    let (engine, _) = engine(&snapshot, PolicyMode::ForcePublic, false, 0);
    assert!(!engine.check_save().await.is_allow());
    engine.host().set("ticket.comment.text", json!("Now with a reply"));
    assert!(engine.check_save().await.is_allow());
}
