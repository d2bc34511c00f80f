// comment-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for comment-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use comment_gate_config::CommentGateConfig;
use comment_gate_config::ConfigError;

/// Parses and validates a TOML string into a `CommentGateConfig`.
pub fn config_from_toml(toml_str: &str) -> Result<CommentGateConfig, ConfigError> {
    CommentGateConfig::from_toml_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<CommentGateConfig, ConfigError> {
    config_from_toml("")
}

/// Asserts that a result failed with an error containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
