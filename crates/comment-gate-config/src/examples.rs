// comment-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Comment Gate configuration. Output is deterministic
//! and must parse and validate.

/// Returns a canonical example `comment-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[settings]
mode = "force_public"
autofixType = true
minLength = "10"

[audit]
enabled = true
# path = "comment-gate-audit.jsonl"
"#,
    )
}
