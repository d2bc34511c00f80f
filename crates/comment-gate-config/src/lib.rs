// comment-gate-config/src/lib.rs
// ============================================================================
// Module: Comment Gate Config Library
// Description: Deployment config model, loading, and example generation.
// Purpose: Single source of truth for comment-gate.toml semantics.
// Dependencies: comment-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `comment-gate-config` loads the deployment configuration used by offline
//! tooling. Policy settings in the `[settings]` table are forwarded verbatim
//! to the core resolver so the file and the host accept the same values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
