// comment-gate-core/src/runtime/host.rs
// ============================================================================
// Module: Comment Gate In-Memory Host
// Description: Simple in-memory host client for tests and offline runs.
// Purpose: Provide a deterministic host implementation without external deps.
// Dependencies: crate::{core, interfaces}, async-trait, serde_json
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`HostClient`] backed
//! by a field map. Reads, writes, and configuration fetches can be made to
//! fail on demand. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::TicketSnapshot;
use crate::interfaces::HostClient;
use crate::interfaces::HostError;
use crate::interfaces::Notice;

// ============================================================================
// SECTION: In-Memory Host
// ============================================================================

/// In-memory host client for tests and offline evaluation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHostClient {
    /// Ticket fields keyed by host field name.
    fields: Arc<Mutex<BTreeMap<String, Value>>>,
    /// Raw app configuration.
    configuration: Option<Value>,
    /// Notices issued so far.
    notices: Arc<Mutex<Vec<Notice>>>,
    /// Field writes accepted so far.
    writes: Arc<Mutex<Vec<(String, Value)>>>,
    /// Fail field reads when set.
    fail_reads: Arc<AtomicBool>,
    /// Fail field writes when set.
    fail_writes: Arc<AtomicBool>,
    /// Fail configuration fetches when set.
    fail_configuration: Arc<AtomicBool>,
}

impl InMemoryHostClient {
    /// Creates a host holding the given ticket snapshot.
    #[must_use]
    pub fn new(snapshot: &TicketSnapshot) -> Self {
        Self::from_fields(snapshot.to_fields())
    }

    /// Creates a host holding raw field values.
    #[must_use]
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self {
            fields: Arc::new(Mutex::new(fields)),
            ..Self::default()
        }
    }

    /// Sets the raw configuration returned to the engine.
    #[must_use]
    pub fn with_configuration(mut self, configuration: Value) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Makes field reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes field writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes configuration fetches fail.
    pub fn fail_configuration(&self, fail: bool) {
        self.fail_configuration.store(fail, Ordering::SeqCst);
    }

    /// Replaces a field value as if edited by the agent.
    pub fn set(&self, name: &str, value: Value) {
        if let Ok(mut fields) = self.fields.lock() {
            fields.insert(name.to_string(), value);
        }
    }

    /// Returns the current ticket snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TicketSnapshot {
        self.fields
            .lock()
            .map(|fields| TicketSnapshot::from_fields(&fields))
            .unwrap_or_default()
    }

    /// Returns notices issued so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|notices| notices.clone()).unwrap_or_default()
    }

    /// Returns accepted field writes in order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().map(|writes| writes.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HostClient for InMemoryHostClient {
    async fn get_fields(&self, names: &[&str]) -> Result<BTreeMap<String, Value>, HostError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HostError::Read("ticket fields unavailable".to_string()));
        }
        let fields = self.fields.lock().map_err(|_| HostError::Read("poisoned".to_string()))?;
        Ok(names
            .iter()
            .filter_map(|name| fields.get(*name).map(|value| ((*name).to_string(), value.clone())))
            .collect())
    }

    async fn set_field(&self, name: &str, value: Value) -> Result<(), HostError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(HostError::Write(format!("{name} is read-only")));
        }
        let mut fields = self.fields.lock().map_err(|_| HostError::Write("poisoned".to_string()))?;
        fields.insert(name.to_string(), value.clone());
        drop(fields);
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((name.to_string(), value));
        }
        Ok(())
    }

    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }

    async fn get_configuration(&self) -> Result<Option<Value>, HostError> {
        if self.fail_configuration.load(Ordering::SeqCst) {
            return Err(HostError::Configuration("metadata request failed".to_string()));
        }
        Ok(self.configuration.clone())
    }
}
