// comment-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Comment Gate Enforcement Engine
// Description: Advisory hints and the save gate for ticket comment policy.
// Purpose: Drive evaluation against live host state and decide save attempts.
// Dependencies: crate::{audit, core, interfaces, runtime::evaluator}
// ============================================================================

//! ## Overview
//! [`CommentPolicyEngine`] is the single execution path for both flows.
//! The advisory flow is best effort: host failures are recorded and
//! swallowed, and a violation produces one sticky notice. The gate flow
//! resolves every save attempt to [`GateDecision::Allow`] or
//! [`GateDecision::Deny`], correcting a wrong comment type at most once when
//! autofix is enabled.
//!
//! Settings are write-once. Until [`CommentPolicyEngine::initialize`] stores
//! the host configuration, evaluations use [`PolicySettings::DEFAULTS`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::audit::DecisionLabel;
use crate::audit::HostOperation;
use crate::audit::NoopAuditSink;
use crate::audit::PolicyAuditEvent;
use crate::audit::PolicyAuditKind;
use crate::audit::PolicyAuditSink;
use crate::audit::PolicyFlow;
use crate::audit::SettingsSource;
use crate::core::COMMENT_TYPE_FIELD;
use crate::core::CommentRule;
use crate::core::PolicySettings;
use crate::core::SNAPSHOT_FIELDS;
use crate::core::TicketSnapshot;
use crate::core::Verdict;
use crate::core::Violation;
use crate::core::ViolationReason;
use crate::core::derive_rule;
use crate::core::resolve_settings;
use crate::interfaces::HostClient;
use crate::interfaces::HostError;
use crate::interfaces::Notice;
use crate::interfaces::NoticeLevel;
use crate::runtime::evaluator::evaluate;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Display duration for advisory hints.
pub const HINT_DURATION_MS: u64 = 8_000;
/// Denial returned when ticket state cannot be read during a save.
pub const STATE_UNAVAILABLE_MESSAGE: &str =
    "Unable to check the comment policy for this ticket. Please try saving again.";

// ============================================================================
// SECTION: Gate Decision
// ============================================================================

/// Outcome of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// The save may proceed.
    Allow,
    /// The save is blocked and the message is shown to the agent.
    Deny {
        /// Violation reason, or `None` when ticket state was unreadable.
        reason: Option<ViolationReason>,
        /// Message surfaced by the host.
        message: String,
    },
}

impl GateDecision {
    /// Builds a denial for a policy violation.
    #[must_use]
    pub fn deny(violation: &Violation) -> Self {
        Self::Deny {
            reason: Some(violation.reason()),
            message: violation.denial_message(),
        }
    }

    /// Returns true when the save may proceed.
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts into the host's reject-to-block convention.
    ///
    /// # Errors
    ///
    /// Returns the denial message when the save must be blocked.
    pub fn into_host_result(self) -> Result<bool, String> {
        match self {
            Self::Allow => Ok(true),
            Self::Deny {
                message, ..
            } => Err(message),
        }
    }
}

/// Comment type correction performed during a save attempt.
#[derive(Debug, Clone, Copy, Default)]
struct AutofixOutcome {
    /// Whether a correction was attempted.
    attempted: bool,
    /// Whether the host accepted the correction.
    applied: bool,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Comment policy enforcement engine bound to a host client.
pub struct CommentPolicyEngine<H> {
    /// Host client implementation.
    host: H,
    /// Write-once session settings.
    settings: OnceLock<PolicySettings>,
    /// Audit sink for policy events.
    audit: Arc<dyn PolicyAuditSink>,
}

impl<H> CommentPolicyEngine<H>
where
    H: HostClient,
{
    /// Creates an engine that resolves settings from the host on initialize.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            settings: OnceLock::new(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Creates an engine with settings already resolved.
    #[must_use]
    pub fn with_settings(host: H, settings: PolicySettings) -> Self {
        let engine = Self::new(host);
        let _ = engine.settings.set(settings);
        engine
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn PolicyAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the host client.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Returns the settings in force.
    #[must_use]
    pub fn settings(&self) -> &PolicySettings {
        self.settings.get().unwrap_or(&DEFAULT_SETTINGS)
    }

    /// Returns the rule derived from the settings in force.
    #[must_use]
    pub fn rule(&self) -> CommentRule {
        derive_rule(self.settings())
    }

    /// Fetches host configuration once and fixes the session settings.
    ///
    /// Fetch failures leave the defaults in force. Later calls return the
    /// stored settings without contacting the host. When calls race, only the
    /// one that stores its settings records them.
    pub async fn initialize(&self) -> &PolicySettings {
        if let Some(settings) = self.settings.get() {
            return settings;
        }
        let (resolved, source) = match self.host.get_configuration().await {
            Ok(Some(raw)) => (resolve_settings(Some(&raw)), SettingsSource::Host),
            Ok(None) => (PolicySettings::DEFAULTS, SettingsSource::Default),
            Err(err) => {
                self.record_host_failure(HostOperation::GetConfiguration, PolicyFlow::Startup, &err);
                (PolicySettings::DEFAULTS, SettingsSource::Default)
            }
        };
        if self.settings.set(resolved).is_ok() {
            let settings = self.settings();
            self.record(PolicyAuditKind::SettingsResolved {
                mode: settings.mode.to_string(),
                autofix_type: settings.autofix_type,
                min_length: settings.min_length,
                source,
            });
        }
        self.settings()
    }

    /// Evaluates the current ticket and issues a hint on violation.
    ///
    /// Returns the notice that was issued, if any. Never fails.
    pub async fn advise(&self) -> Option<Notice> {
        let snapshot = self.fetch_snapshot(PolicyFlow::Advisory).await?;
        let violation = evaluate(&self.rule(), &snapshot).violation()?;
        let notice = hint_notice(&violation);
        self.host.notify(&notice);
        self.record(PolicyAuditKind::HintIssued {
            reason: violation.reason(),
            message: notice.message.clone(),
        });
        Some(notice)
    }

    /// Decides a save attempt.
    pub async fn check_save(&self) -> GateDecision {
        let Some(snapshot) = self.fetch_snapshot(PolicyFlow::Gate).await else {
            let decision = GateDecision::Deny {
                reason: None,
                message: STATE_UNAVAILABLE_MESSAGE.to_string(),
            };
            self.record_decision(&decision, AutofixOutcome::default());
            return decision;
        };
        let (decision, autofix) = self.decide(&snapshot).await;
        self.record_decision(&decision, autofix);
        decision
    }

    /// Runs the gate state machine against a fetched snapshot.
    async fn decide(&self, snapshot: &TicketSnapshot) -> (GateDecision, AutofixOutcome) {
        let mut autofix = AutofixOutcome::default();
        if snapshot.status.is_solved() {
            return (GateDecision::Allow, autofix);
        }
        let violation = match evaluate(&self.rule(), snapshot) {
            Verdict::Pass => return (GateDecision::Allow, autofix),
            Verdict::Violation {
                violation,
            } => violation,
        };
        let Violation::WrongType {
            required,
        } = violation
        else {
            return (GateDecision::deny(&violation), autofix);
        };
        let mut current = snapshot.comment_type;
        if self.settings().autofix_type
            && let Some(target) = required.comment_type()
            && let Some(wire) = target.as_wire()
        {
            autofix.attempted = true;
            match self.host.set_field(COMMENT_TYPE_FIELD, Value::String(wire.to_string())).await {
                Ok(()) => {
                    autofix.applied = true;
                    current = target;
                }
                Err(err) => {
                    self.record_host_failure(HostOperation::SetField, PolicyFlow::Gate, &err);
                }
            }
        }
        if required.matches(current) {
            (GateDecision::Allow, autofix)
        } else {
            (GateDecision::deny(&violation), autofix)
        }
    }

    /// Reads a fresh snapshot, absorbing host failures.
    async fn fetch_snapshot(&self, flow: PolicyFlow) -> Option<TicketSnapshot> {
        match self.host.get_fields(&SNAPSHOT_FIELDS).await {
            Ok(fields) => Some(TicketSnapshot::from_fields(&fields)),
            Err(err) => {
                self.record_host_failure(HostOperation::GetFields, flow, &err);
                None
            }
        }
    }

    /// Records a save decision.
    fn record_decision(&self, decision: &GateDecision, autofix: AutofixOutcome) {
        let (label, reason) = match decision {
            GateDecision::Allow => (DecisionLabel::Allow, None),
            GateDecision::Deny {
                reason, ..
            } => (DecisionLabel::Deny, *reason),
        };
        self.record(PolicyAuditKind::SaveDecision {
            decision: label,
            reason,
            autofix_attempted: autofix.attempted,
            autofix_applied: autofix.applied,
        });
    }

    /// Records an absorbed host failure.
    fn record_host_failure(&self, operation: HostOperation, flow: PolicyFlow, err: &HostError) {
        self.record(PolicyAuditKind::HostFailure {
            operation,
            flow,
            error: err.to_string(),
        });
    }

    /// Emits an audit event.
    fn record(&self, kind: PolicyAuditKind) {
        self.audit.record(&PolicyAuditEvent::new(kind));
    }
}

/// Settings returned before initialization.
static DEFAULT_SETTINGS: PolicySettings = PolicySettings::DEFAULTS;

/// Builds the sticky advisory notice for a violation.
#[must_use]
pub fn hint_notice(violation: &Violation) -> Notice {
    Notice {
        message: violation.hint_message(),
        level: NoticeLevel::Alert,
        duration_ms: HINT_DURATION_MS,
        sticky: true,
    }
}
