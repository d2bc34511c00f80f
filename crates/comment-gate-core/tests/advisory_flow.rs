// comment-gate-core/tests/advisory_flow.rs
// ============================================================================
// Module: Advisory Flow Tests
// Description: Tests for hint notices and settings initialization.
// ============================================================================
//! ## Overview
//! Validates that violations produce one sticky notice, passes stay silent,
//! host failures are absorbed, and settings are resolved once.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use comment_gate_core::CommentPolicyEngine;
use comment_gate_core::CommentType;
use comment_gate_core::HostClient;
use comment_gate_core::HostError;
use comment_gate_core::InMemoryAuditSink;
use comment_gate_core::InMemoryHostClient;
use comment_gate_core::Notice;
use comment_gate_core::NoticeLevel;
use comment_gate_core::PolicyAuditKind;
use comment_gate_core::PolicyMode;
use comment_gate_core::PolicySettings;
use comment_gate_core::TicketSnapshot;
use comment_gate_core::ViolationReason;
use comment_gate_core::audit::HostOperation;
use comment_gate_core::audit::PolicyFlow;
use comment_gate_core::audit::SettingsSource;
use serde_json::Value;
use serde_json::json;

fn alert(message: &str) -> Notice {
    Notice {
        message: message.to_string(),
        level: NoticeLevel::Alert,
        duration_ms: 8_000,
        sticky: true,
    }
}

/// Host that yields once before answering configuration requests.
struct YieldingHost {
    /// Backing in-memory host.
    inner: InMemoryHostClient,
}

#[async_trait]
impl HostClient for YieldingHost {
    async fn get_fields(&self, names: &[&str]) -> Result<BTreeMap<String, Value>, HostError> {
        self.inner.get_fields(names).await
    }

    async fn set_field(&self, name: &str, value: Value) -> Result<(), HostError> {
        self.inner.set_field(name, value).await
    }

    fn notify(&self, notice: &Notice) {
        self.inner.notify(notice);
    }

    async fn get_configuration(&self) -> Result<Option<Value>, HostError> {
        tokio::task::yield_now().await;
        self.inner.get_configuration().await
    }
}

// ============================================================================
// SECTION: Hints
// ============================================================================

#[tokio::test]
async fn missing_comment_issues_sticky_hint() {
    let host = InMemoryHostClient::new(&TicketSnapshot::new("open", CommentType::PublicReply, ""));
    let engine = CommentPolicyEngine::new(host);
    let notice = engine.advise().await;
    let expected = alert("A comment is required before saving this non-Solved ticket.");
    assert_eq!(notice.as_ref(), Some(&expected));
    assert_eq!(engine.host().notices(), vec![expected]);
}

#[tokio::test]
async fn hint_matches_gate_reason() {
    let host =
        InMemoryHostClient::new(&TicketSnapshot::new("open", CommentType::InternalNote, "hello"));
    let settings = PolicySettings {
        mode: PolicyMode::ForcePublic,
        autofix_type: false,
        min_length: 0,
    };
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = CommentPolicyEngine::with_settings(host, settings).with_audit(audit.clone());
    let notice = engine.advise().await;
    assert_eq!(notice, Some(alert("This ticket requires a Public reply.")));
    assert_eq!(
        audit.events(),
        vec![PolicyAuditKind::HintIssued {
            reason: ViolationReason::WrongType,
            message: "This ticket requires a Public reply.".to_string(),
        }]
    );
}

#[tokio::test]
async fn too_short_hint_names_length() {
    let host = InMemoryHostClient::new(&TicketSnapshot::new("open", CommentType::InternalNote, "x"));
    let settings = PolicySettings {
        mode: PolicyMode::ForcePrivate,
        autofix_type: true,
        min_length: 15,
    };
    let engine = CommentPolicyEngine::with_settings(host, settings);
    assert_eq!(engine.advise().await, Some(alert("Comment must be at least 15 characters.")));
}

#[tokio::test]
async fn passing_ticket_issues_nothing() {
    let host = InMemoryHostClient::new(&TicketSnapshot::new(
        "open",
        CommentType::PublicReply,
        "All set on our side.",
    ));
    let engine = CommentPolicyEngine::new(host);
    assert_eq!(engine.advise().await, None);
    assert!(engine.host().notices().is_empty());
}

#[tokio::test]
async fn solved_ticket_issues_nothing() {
    let host = InMemoryHostClient::new(&TicketSnapshot::new("solved", CommentType::Unset, ""));
    let engine = CommentPolicyEngine::new(host);
    assert_eq!(engine.advise().await, None);
}

#[tokio::test]
async fn advisory_never_mutates_ticket() {
    let host =
        InMemoryHostClient::new(&TicketSnapshot::new("open", CommentType::InternalNote, "hello"));
    let settings = PolicySettings {
        mode: PolicyMode::ForcePublic,
        autofix_type: true,
        min_length: 0,
    };
    let engine = CommentPolicyEngine::with_settings(host, settings);
    let _ = engine.advise().await;
    assert!(engine.host().writes().is_empty());
}

#[tokio::test]
async fn read_failure_is_swallowed() {
    let host = InMemoryHostClient::new(&TicketSnapshot::new("open", CommentType::Unset, ""));
    host.fail_reads(true);
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = CommentPolicyEngine::new(host).with_audit(audit.clone());
    assert_eq!(engine.advise().await, None);
    assert!(engine.host().notices().is_empty());
    assert!(matches!(
        audit.events().as_slice(),
        [PolicyAuditKind::HostFailure {
            operation: HostOperation::GetFields,
            flow: PolicyFlow::Advisory,
            ..
        }]
    ));
}

// ============================================================================
// SECTION: Settings Initialization
// ============================================================================

#[tokio::test]
async fn initialize_resolves_host_configuration() {
    let host = InMemoryHostClient::new(&TicketSnapshot::default())
        .with_configuration(json!({ "mode": "require_any", "minLength": "7" }));
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = CommentPolicyEngine::new(host).with_audit(audit.clone());
    assert_eq!(engine.settings(), &PolicySettings::DEFAULTS);
    let settings = engine.initialize().await.clone();
    assert_eq!(settings.mode, PolicyMode::RequireAny);
    assert_eq!(settings.min_length, 7);
    assert_eq!(engine.settings(), &settings);
    assert_eq!(
        audit.events(),
        vec![PolicyAuditKind::SettingsResolved {
            mode: "require_any".to_string(),
            autofix_type: false,
            min_length: 7,
            source: SettingsSource::Host,
        }]
    );
}

#[tokio::test]
async fn initialize_failure_keeps_defaults() {
    let host = InMemoryHostClient::new(&TicketSnapshot::default())
        .with_configuration(json!({ "mode": "require_any" }));
    host.fail_configuration(true);
    let engine = CommentPolicyEngine::new(host);
    assert_eq!(engine.initialize().await, &PolicySettings::DEFAULTS);
}

#[tokio::test]
async fn initialize_without_configuration_keeps_defaults() {
    let engine = CommentPolicyEngine::new(InMemoryHostClient::new(&TicketSnapshot::default()));
    assert_eq!(engine.initialize().await, &PolicySettings::DEFAULTS);
}

#[tokio::test]
async fn settings_are_write_once() {
    let host = InMemoryHostClient::new(&TicketSnapshot::default())
        .with_configuration(json!({ "mode": "force_private" }));
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = CommentPolicyEngine::new(host).with_audit(audit.clone());
    let _ = engine.initialize().await;
    engine.host().fail_configuration(true);
    assert_eq!(engine.initialize().await.mode, PolicyMode::ForcePrivate);
    assert_eq!(audit.events().len(), 1);
}

#[tokio::test]
async fn concurrent_initialize_records_settings_once() {
    let inner = InMemoryHostClient::new(&TicketSnapshot::default())
        .with_configuration(json!({ "mode": "force_private", "minLength": 4 }));
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = CommentPolicyEngine::new(YieldingHost {
        inner,
    })
    .with_audit(audit.clone());
    let (first, second) = tokio::join!(engine.initialize(), engine.initialize());
    assert_eq!(first, second);
    assert_eq!(first.mode, PolicyMode::ForcePrivate);
    assert_eq!(
        audit.events(),
        vec![PolicyAuditKind::SettingsResolved {
            mode: "force_private".to_string(),
            autofix_type: false,
            min_length: 4,
            source: SettingsSource::Host,
        }]
    );
}

#[tokio::test]
async fn preset_settings_skip_host_configuration() {
    let host = InMemoryHostClient::new(&TicketSnapshot::default())
        .with_configuration(json!({ "mode": "force_private" }));
    let settings = PolicySettings {
        mode: PolicyMode::RequireAny,
        autofix_type: false,
        min_length: 3,
    };
    let engine = CommentPolicyEngine::with_settings(host, settings.clone());
    assert_eq!(engine.initialize().await, &settings);
}
