// comment-gate-core/src/core/settings.rs
// ============================================================================
// Module: Comment Gate Settings
// Description: Typed policy settings and the lenient raw-settings resolver.
// Purpose: Normalize host-supplied configuration into safe, typed defaults.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Host configuration is loosely typed: the mode is free-form text and the
//! minimum length may arrive as a number or as text. [`resolve_settings`]
//! merges whatever is present and well typed over [`PolicySettings::default`]
//! and never fails; malformed values silently keep their defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Raw settings key for the policy mode.
pub const MODE_KEY: &str = "mode";
/// Raw settings key for the autofix flag.
pub const AUTOFIX_KEY: &str = "autofixType";
/// Raw settings key for the minimum comment length.
pub const MIN_LENGTH_KEY: &str = "minLength";

// ============================================================================
// SECTION: Policy Mode
// ============================================================================

/// Comment policy mode selected by the host administrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Any comment is required, of either visibility.
    RequireAny,
    /// A public reply is required.
    #[default]
    ForcePublic,
    /// An internal note is required.
    ForcePrivate,
    /// Unknown mode text, retained verbatim for auditing.
    Unrecognized(String),
}

impl PolicyMode {
    /// Parses a mode name; surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "require_any" => Self::RequireAny,
            "force_public" => Self::ForcePublic,
            "force_private" => Self::ForcePrivate,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the canonical mode label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequireAny => "require_any",
            Self::ForcePublic => "force_public",
            Self::ForcePrivate => "force_private",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Policy Settings
// ============================================================================

/// Typed comment policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Selected policy mode.
    pub mode: PolicyMode,
    /// Whether a wrong comment type may be corrected on save.
    pub autofix_type: bool,
    /// Minimum trimmed comment length; zero disables the check.
    pub min_length: u64,
}

impl PolicySettings {
    /// Settings in force before host configuration is available.
    pub const DEFAULTS: Self = Self {
        mode: PolicyMode::ForcePublic,
        autofix_type: false,
        min_length: 0,
    };
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self::DEFAULTS
    }
}

/// Resolves raw host settings into [`PolicySettings`].
///
/// Absent or non-object input yields the defaults. Each field is overridden
/// only when present with a usable type.
#[must_use]
pub fn resolve_settings(raw: Option<&Value>) -> PolicySettings {
    let mut settings = PolicySettings::default();
    let Some(Value::Object(fields)) = raw else {
        return settings;
    };
    apply_fields(&mut settings, fields);
    settings
}

/// Applies recognized raw fields over the current settings.
fn apply_fields(settings: &mut PolicySettings, fields: &Map<String, Value>) {
    if let Some(Value::String(mode)) = fields.get(MODE_KEY) {
        settings.mode = PolicyMode::parse(mode);
    }
    if let Some(Value::Bool(autofix)) = fields.get(AUTOFIX_KEY) {
        settings.autofix_type = *autofix;
    }
    match fields.get(MIN_LENGTH_KEY) {
        Some(Value::Number(number)) => {
            settings.min_length = number_to_min_length(number);
        }
        Some(Value::String(text)) => {
            settings.min_length = parse_min_length(text);
        }
        _ => {}
    }
}

// ============================================================================
// SECTION: Minimum Length Parsing
// ============================================================================

/// Parses a textual minimum length.
///
/// Leading whitespace is skipped, an optional sign is accepted, and the
/// leading run of decimal digits is used. Text without leading digits and
/// negative values resolve to zero; overflow saturates.
#[must_use]
pub fn parse_min_length(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut value: u64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(u64::from(byte - b'0'));
    }
    if negative { 0 } else { value }
}

/// Converts a numeric minimum length, rounding fractions up.
fn number_to_min_length(number: &serde_json::Number) -> u64 {
    if let Some(value) = number.as_u64() {
        return value;
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value > 0.0 => float_to_u64(value.ceil()),
        _ => 0,
    }
}

/// Saturating conversion of a non-negative integral float.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Value is checked non-negative and clamped before the cast."
)]
fn float_to_u64(value: f64) -> u64 {
    if value >= u64::MAX as f64 { u64::MAX } else { value as u64 }
}
