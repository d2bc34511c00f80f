// comment-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Comment Gate Interfaces
// Description: Host-agnostic contracts for ticket access, notices, and events.
// Purpose: Define the narrow boundary between the policy engine and its host.
// Dependencies: async-trait, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The policy engine never owns ticket state. It reads fields, writes the
//! comment type, issues notices, and fetches configuration through
//! [`HostClient`]. Every host call may fail; callers decide how to degrade.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Host Errors
// ============================================================================

/// Host call errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Reading ticket fields failed.
    #[error("host read failed: {0}")]
    Read(String),
    /// Writing a ticket field failed.
    #[error("host write failed: {0}")]
    Write(String),
    /// Fetching configuration failed.
    #[error("host configuration unavailable: {0}")]
    Configuration(String),
}

// ============================================================================
// SECTION: Notices
// ============================================================================

/// Severity level of a host notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Warning that needs the agent's attention.
    Alert,
}

/// Display request for a host notification banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message text.
    pub message: String,
    /// Severity level.
    pub level: NoticeLevel,
    /// Display duration in milliseconds.
    pub duration_ms: u64,
    /// Whether the notice stays until dismissed.
    pub sticky: bool,
}

// ============================================================================
// SECTION: Host Client
// ============================================================================

/// Host ticketing application client.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Reads the named ticket fields.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Read`] when the host cannot provide the fields.
    async fn get_fields(&self, names: &[&str]) -> Result<BTreeMap<String, Value>, HostError>;

    /// Writes a single ticket field.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Write`] when the host rejects the write.
    async fn set_field(&self, name: &str, value: Value) -> Result<(), HostError>;

    /// Requests display of a notice. Delivery is not confirmed.
    fn notify(&self, notice: &Notice);

    /// Fetches the raw app configuration, if any has been set.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Configuration`] when configuration cannot be fetched.
    async fn get_configuration(&self) -> Result<Option<Value>, HostError>;
}

// ============================================================================
// SECTION: Event Registration
// ============================================================================

/// Host-side event subscription registry.
pub trait EventRegistrar {
    /// Subscribes the policy engine to the named host event.
    fn subscribe(&mut self, event_name: &'static str);
}
