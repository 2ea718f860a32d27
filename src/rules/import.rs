//! # Bulk Import
//!
//! Batch ingestion of candidate rules with per-entry independence:
//! every candidate is validated and written on its own, and a failing
//! entry never aborts the batch. There is no cross-entry atomicity; a
//! failure partway through leaves prior entries committed.

use serde::{Deserialize, Serialize};

use crate::observability::Logger;

use super::errors::RuleStoreResult;
use super::model::{Rule, Severity};
use super::store::{validate_rule_id, RuleStore};

/// A candidate rule as submitted to bulk import.
///
/// All fields are optional at the serialization boundary so that a
/// candidate missing required fields becomes a per-entry error instead
/// of failing the whole batch payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub remediation: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl RuleDraft {
    /// Names of required fields the draft is missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.as_deref().map_or(true, str::is_empty) {
            missing.push("id");
        }
        if self.name.as_deref().map_or(true, str::is_empty) {
            missing.push("name");
        }
        if self.language.as_deref().map_or(true, str::is_empty) {
            missing.push("language");
        }
        if self.pattern.as_deref().map_or(true, str::is_empty) {
            missing.push("pattern");
        }
        if self.severity.is_none() {
            missing.push("severity");
        }
        missing
    }

    /// Promote the draft to a full rule, or report its missing fields.
    pub fn into_rule(self) -> Result<Rule, String> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(format!(
                "missing required fields ({})",
                missing.join(", ")
            ));
        }
        let severity = self
            .severity
            .ok_or_else(|| "missing required fields (severity)".to_string())?;
        Ok(Rule {
            id: self.id.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            severity,
            tags: self.tags.unwrap_or_default(),
            pattern: self.pattern.unwrap_or_default(),
            remediation: self.remediation.unwrap_or_default(),
            enabled: self.enabled.unwrap_or_default(),
        })
    }
}

/// Outcome of a bulk import: how many entries were written, plus the
/// ordered per-entry error messages for everything that was not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(rename = "importedCount")]
    pub imported: usize,
    pub errors: Vec<String>,
}

impl RuleStore {
    /// Import a batch of candidate rules.
    ///
    /// Each entry is handled independently: missing required fields, a
    /// malformed id, or (without `overwrite_existing`) an occupied id
    /// produce a per-entry error and the batch continues. With
    /// `overwrite_existing`, an occupied id is overwritten and counted
    /// as imported.
    ///
    /// Only a failed directory bootstrap aborts the whole operation.
    pub fn bulk_import(
        &self,
        drafts: Vec<RuleDraft>,
        overwrite_existing: bool,
    ) -> RuleStoreResult<ImportReport> {
        // Bootstrap is the one batch-wide precondition; everything after
        // it is per-entry.
        self.ensure_rules_dir()?;

        let mut report = ImportReport::default();
        for (index, draft) in drafts.into_iter().enumerate() {
            match self.import_entry(draft, overwrite_existing) {
                Ok(()) => report.imported += 1,
                Err(message) => {
                    self.metrics().increment_import_entries_rejected();
                    report.errors.push(format!("entry {}: {}", index, message));
                }
            }
        }

        Logger::info(
            "RULES_IMPORTED",
            &[
                ("imported", &report.imported.to_string()),
                ("rejected", &report.errors.len().to_string()),
            ],
        );
        Ok(report)
    }

    fn import_entry(&self, draft: RuleDraft, overwrite_existing: bool) -> Result<(), String> {
        let rule = draft.into_rule()?;
        validate_rule_id(&rule.id).map_err(|e| e.to_string())?;

        if self.record_exists(&rule.id) && !overwrite_existing {
            return Err(format!("rule id '{}' already exists, skipped", rule.id));
        }

        let path = self.rules_dir().join(format!("{}.json", rule.id));
        self.write_record(&path, &rule).map_err(|e| e.to_string())?;
        self.metrics().increment_rules_imported();
        Ok(())
    }
}
