// comment-gate-core/src/audit.rs
// ============================================================================
// Module: Comment Gate Audit Logging
// Description: Structured audit events for policy evaluation.
// Purpose: Emit JSON-line audit records without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events record settings resolution, issued hints, save decisions,
//! and swallowed host failures. Sinks must never fail the caller; write
//! errors are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ViolationReason;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Where resolved settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSource {
    /// Host-supplied configuration.
    Host,
    /// Built-in defaults.
    Default,
}

/// Save gate decision label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    /// Save allowed.
    Allow,
    /// Save blocked.
    Deny,
}

/// Host operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostOperation {
    /// Ticket field read.
    GetFields,
    /// Ticket field write.
    SetField,
    /// Configuration fetch.
    GetConfiguration,
}

/// Flow in which a host failure was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyFlow {
    /// Settings initialization.
    Startup,
    /// Advisory hint evaluation.
    Advisory,
    /// Save gate evaluation.
    Gate,
}

/// Audit event detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PolicyAuditKind {
    /// Settings were resolved for the session.
    SettingsResolved {
        /// Mode label.
        mode: String,
        /// Autofix flag.
        autofix_type: bool,
        /// Minimum length.
        min_length: u64,
        /// Settings origin.
        source: SettingsSource,
    },
    /// An advisory hint was issued.
    HintIssued {
        /// Violation reason.
        reason: ViolationReason,
        /// Hint text.
        message: String,
    },
    /// A save attempt was decided.
    SaveDecision {
        /// Allow or deny.
        decision: DecisionLabel,
        /// Violation reason when denied.
        reason: Option<ViolationReason>,
        /// Whether a comment type correction was attempted.
        autofix_attempted: bool,
        /// Whether the correction was applied.
        autofix_applied: bool,
    },
    /// A host call failed and was absorbed.
    HostFailure {
        /// Failed operation.
        operation: HostOperation,
        /// Flow that absorbed the failure.
        flow: PolicyFlow,
        /// Error text.
        error: String,
    },
}

/// Timestamped audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyAuditEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event detail.
    #[serde(flatten)]
    pub kind: PolicyAuditKind,
}

impl PolicyAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: PolicyAuditKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for policy events.
pub trait PolicyAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &PolicyAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl PolicyAuditSink for StderrAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl PolicyAuditSink for FileAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl PolicyAuditSink for NoopAuditSink {
    fn record(&self, _event: &PolicyAuditEvent) {}
}

/// Audit sink that retains events in memory for tests and inspection.
#[derive(Default)]
pub struct InMemoryAuditSink {
    /// Recorded events.
    events: Mutex<Vec<PolicyAuditKind>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded event details in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<PolicyAuditKind> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl PolicyAuditSink for InMemoryAuditSink {
    fn record(&self, event: &PolicyAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.kind.clone());
        }
    }
}
