//! # Rule Records

use serde::{Deserialize, Serialize};

/// Rule severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Returns the lowercase string form used on the wire and on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

/// A stored rule definition
///
/// The `pattern` field is opaque to this service; nothing here parses or
/// executes it. `id` is the storage key and is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub tags: Vec<String>,
    pub pattern: String,
    #[serde(default)]
    pub remediation: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Partial update payload for a rule
///
/// Only fields present in the payload overwrite the stored record; the
/// rest are retained verbatim. A supplied `id` is never applied (the
/// storage key is the source of truth) and only triggers a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl RuleUpdate {
    /// Merges the present fields over `rule`, leaving absent fields as-is.
    ///
    /// The `id` field is deliberately not applied here; the store forces
    /// the storage key back onto the merged record.
    pub fn apply(&self, rule: &mut Rule) {
        if let Some(language) = &self.language {
            rule.language = language.clone();
        }
        if let Some(name) = &self.name {
            rule.name = name.clone();
        }
        if let Some(description) = &self.description {
            rule.description = description.clone();
        }
        if let Some(severity) = self.severity {
            rule.severity = severity;
        }
        if let Some(tags) = &self.tags {
            rule.tags = tags.clone();
        }
        if let Some(pattern) = &self.pattern {
            rule.pattern = pattern.clone();
        }
        if let Some(remediation) = &self.remediation {
            rule.remediation = remediation.clone();
        }
        if let Some(enabled) = self.enabled {
            rule.enabled = enabled;
        }
    }

    /// True if no field (other than `id`) would change anything
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.tags.is_none()
            && self.pattern.is_none()
            && self.remediation.is_none()
            && self.enabled.is_none()
    }
}
