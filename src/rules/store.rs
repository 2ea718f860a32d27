//! # Rule Store
//!
//! Identifier-addressed durable storage: one pretty-printed JSON file per
//! rule in a flat directory, safe to hand-edit.
//!
//! Write-side problems (bad id, duplicate id, unreachable directory) are
//! surfaced as [`RuleStoreError`]. Read-side problems (unparseable file,
//! record id not matching its filename) are never surfaced to the caller;
//! the record is skipped with a WARN log and a metrics bump so operators
//! can detect silent data loss.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::observability::{Logger, MetricsRegistry};

use super::errors::{RuleStoreError, RuleStoreResult};
use super::model::{Rule, RuleUpdate};

/// Identifier format shared by every operation that takes a rule id.
///
/// This is the store's sole defense against path escapes: anything outside
/// the set (separators, whitespace, `..` sequences are covered by the
/// character class itself) is rejected before a path is ever derived.
fn rule_id_regex() -> &'static Regex {
    static RULE_ID: OnceLock<Regex> = OnceLock::new();
    RULE_ID.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("rule id regex is valid"))
}

/// Validates a candidate rule id against `^[a-zA-Z0-9_.-]+$`.
pub fn validate_rule_id(id: &str) -> RuleStoreResult<()> {
    if rule_id_regex().is_match(id) {
        Ok(())
    } else {
        Err(RuleStoreError::InvalidIdentifier(id.to_string()))
    }
}

/// Durable rule storage, one JSON record per identifier
///
/// The store provides no cross-operation locking: two concurrent creates
/// for the same id may both pass the existence check and one write wins.
/// Serializing writes per identifier (or an exclusive-create open) is the
/// hardening path if that race ever matters; see `create`.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules_dir: PathBuf,
    metrics: Arc<MetricsRegistry>,
}

impl RuleStore {
    /// Open a store over the given directory, creating it if missing.
    ///
    /// Bootstrap runs here once and again defensively before every
    /// operation that touches storage.
    pub fn open(rules_dir: impl Into<PathBuf>) -> RuleStoreResult<Self> {
        Self::open_with_metrics(rules_dir, Arc::new(MetricsRegistry::new()))
    }

    /// Open a store sharing an externally owned metrics registry.
    pub fn open_with_metrics(
        rules_dir: impl Into<PathBuf>,
        metrics: Arc<MetricsRegistry>,
    ) -> RuleStoreResult<Self> {
        let store = Self {
            rules_dir: rules_dir.into(),
            metrics,
        };
        store.ensure_rules_dir()?;
        Ok(store)
    }

    /// The backing directory
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// The metrics registry this store reports to
    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    /// Idempotently create the backing directory and missing ancestors.
    pub(super) fn ensure_rules_dir(&self) -> RuleStoreResult<()> {
        fs::create_dir_all(&self.rules_dir).map_err(|e| {
            RuleStoreError::StorageUnavailable(format!(
                "failed to create rules directory '{}': {}",
                self.rules_dir.display(),
                e
            ))
        })
    }

    /// Storage location for a rule id. Only called with a validated id.
    fn rule_path(&self, id: &str) -> PathBuf {
        self.rules_dir.join(format!("{}.json", id))
    }

    /// List every valid record in the backing directory, sorted by id.
    ///
    /// Unparseable records and records whose declared id does not match
    /// their filename are skipped with a warning. A directory that cannot
    /// be enumerated at all yields an empty list rather than an error.
    pub fn list(&self) -> Vec<Rule> {
        self.metrics.increment_lists_served();

        // Best-effort bootstrap; a failure falls through to the empty
        // result below instead of aborting the read.
        let _ = self.ensure_rules_dir();

        let entries = match fs::read_dir(&self.rules_dir) {
            Ok(entries) => entries,
            Err(e) => {
                Logger::warn(
                    "RULES_DIR_UNREADABLE",
                    &[
                        ("path", &self.rules_dir.display().to_string()),
                        ("error", &e.to_string()),
                    ],
                );
                return Vec::new();
            }
        };

        let mut rules = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(rule) = self.read_record(&path, stem) {
                rules.push(rule);
            }
        }

        rules.sort_by(|a, b| a.id.cmp(&b.id));
        rules
    }

    /// Look up one rule by id.
    ///
    /// Absent, unparseable, and mismatched records all read as `None`;
    /// only a malformed id is an error, since that signals a caller bug
    /// rather than missing data.
    pub fn get(&self, id: &str) -> RuleStoreResult<Option<Rule>> {
        validate_rule_id(id)?;
        self.ensure_rules_dir()?;
        self.metrics.increment_gets_served();
        Ok(self.read_record(&self.rule_path(id), id))
    }

    /// Create a new rule record.
    ///
    /// `id` is the identifier the caller is addressing; the payload's own
    /// id must match it. Fails with `AlreadyExists` if a record is present.
    ///
    /// The existence check and the write are not atomic: two racing
    /// creates for the same id may both pass the check and the later
    /// write wins. Accepted for this backing store; an exclusive-create
    /// open (`OpenOptions::create_new`) is the fix if it ever matters.
    pub fn create(&self, id: &str, rule: Rule) -> RuleStoreResult<Rule> {
        validate_rule_id(id)?;
        if rule.id != id {
            return Err(RuleStoreError::IdMismatch {
                addressed: id.to_string(),
                payload: rule.id,
            });
        }
        self.ensure_rules_dir()?;

        let path = self.rule_path(id);
        if path.exists() {
            return Err(RuleStoreError::AlreadyExists(id.to_string()));
        }

        self.write_record(&path, &rule)?;
        self.metrics.increment_rules_created();
        Logger::info("RULE_CREATED", &[("rule_id", id)]);
        Ok(rule)
    }

    /// Apply a partial update to an existing rule.
    ///
    /// Returns `Ok(None)` if no record exists for `id`. Fields absent from
    /// the payload are retained verbatim. The record's id is forced back
    /// to `id` after the merge; an attempt to change it via the payload is
    /// ignored with a warning.
    pub fn update(&self, id: &str, update: &RuleUpdate) -> RuleStoreResult<Option<Rule>> {
        validate_rule_id(id)?;
        self.ensure_rules_dir()?;

        let Some(mut rule) = self.read_record(&self.rule_path(id), id) else {
            return Ok(None);
        };

        if let Some(requested) = &update.id {
            if requested != id {
                Logger::warn(
                    "RULE_ID_CHANGE_IGNORED",
                    &[("rule_id", id), ("requested_id", requested)],
                );
            }
        }

        update.apply(&mut rule);
        rule.id = id.to_string();

        self.write_record(&self.rule_path(id), &rule)?;
        self.metrics.increment_rules_updated();
        Ok(Some(rule))
    }

    /// Delete a rule record.
    ///
    /// Returns `Ok(false)` if no record existed; the caller decides
    /// whether that is a not-found condition. Other removal failures
    /// propagate.
    pub fn delete(&self, id: &str) -> RuleStoreResult<bool> {
        validate_rule_id(id)?;
        self.ensure_rules_dir()?;

        match fs::remove_file(self.rule_path(id)) {
            Ok(()) => {
                self.metrics.increment_rules_deleted();
                Logger::info("RULE_DELETED", &[("rule_id", id)]);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RuleStoreError::Io(format!(
                "failed to delete rule '{}': {}",
                id, e
            ))),
        }
    }

    /// Flip a rule's enabled flag, returning the updated record.
    ///
    /// Returns `Ok(None)` if no record exists for `id`.
    pub fn toggle(&self, id: &str) -> RuleStoreResult<Option<Rule>> {
        validate_rule_id(id)?;
        self.ensure_rules_dir()?;

        // The write location is derived from the requested id, never from
        // the record's own field, so a drifted record cannot redirect it.
        let path = self.rule_path(id);
        let Some(mut rule) = self.read_record(&path, id) else {
            return Ok(None);
        };

        rule.enabled = !rule.enabled;
        self.write_record(&path, &rule)?;
        self.metrics.increment_rules_toggled();
        Logger::info(
            "RULE_TOGGLED",
            &[("rule_id", id), ("enabled", if rule.enabled { "true" } else { "false" })],
        );
        Ok(Some(rule))
    }

    /// Read and self-consistency-check one record; `None` on any failure.
    fn read_record(&self, path: &Path, expected_id: &str) -> Option<Rule> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                self.skip_record(path, &format!("read failed: {}", e));
                return None;
            }
        };

        let rule: Rule = match serde_json::from_str(&content) {
            Ok(rule) => rule,
            Err(e) => {
                self.skip_record(path, &format!("invalid JSON: {}", e));
                return None;
            }
        };

        // A record claiming a different id than its storage key is treated
        // as corruption; never return a record under the wrong key.
        if rule.id != expected_id {
            self.skip_record(
                path,
                &format!("record id '{}' does not match filename", rule.id),
            );
            return None;
        }

        Some(rule)
    }

    fn skip_record(&self, path: &Path, reason: &str) {
        self.metrics.increment_records_skipped();
        Logger::warn(
            "RULE_RECORD_SKIPPED",
            &[("path", &path.display().to_string()), ("reason", reason)],
        );
    }

    /// Persist one record as pretty-printed JSON.
    pub(super) fn write_record(&self, path: &Path, rule: &Rule) -> RuleStoreResult<()> {
        let content = serde_json::to_string_pretty(rule)
            .map_err(|e| RuleStoreError::Io(format!("failed to serialize rule: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            RuleStoreError::Io(format!(
                "failed to write rule file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// True if a record exists at the id's storage location.
    pub(super) fn record_exists(&self, id: &str) -> bool {
        self.rule_path(id).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::model::Severity;
    use tempfile::TempDir;

    fn sample_rule(id: &str) -> Rule {
        Rule {
            id: id.to_string(),
            language: "java".to_string(),
            name: "SQL Injection".to_string(),
            description: String::new(),
            severity: Severity::High,
            tags: vec!["sqli".to_string()],
            pattern: "Statement.execute(".to_string(),
            remediation: String::new(),
            enabled: true,
        }
    }

    #[test]
    fn test_valid_ids_accepted() {
        for id in ["java_001", "a", "A.B-c_9", "0", "..."] {
            assert!(validate_rule_id(id).is_ok(), "id '{}' should be valid", id);
        }
    }

    #[test]
    fn test_invalid_ids_rejected() {
        for id in ["", "a b", "id/with/slash", "../etc", "a\\b", "naïve", "a\n"] {
            let err = validate_rule_id(id).unwrap_err();
            assert!(
                matches!(err, RuleStoreError::InvalidIdentifier(_)),
                "id '{:?}' should be invalid",
                id
            );
        }
    }

    #[test]
    fn test_open_creates_missing_ancestors() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("rules");
        let store = RuleStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_record_written_as_pretty_json() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        store.create("java_001", sample_rule("java_001")).unwrap();

        let content = std::fs::read_to_string(temp.path().join("java_001.json")).unwrap();
        // Hand-editable on disk: multi-line, field per line
        assert!(content.contains('\n'));
        let parsed: Rule = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.id, "java_001");
    }

    #[test]
    fn test_create_rejects_payload_id_mismatch() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        let err = store.create("java_001", sample_rule("java_002")).unwrap_err();
        assert!(matches!(err, RuleStoreError::IdMismatch { .. }));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_list_skips_non_json_entries() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        store.create("java_001", sample_rule("java_001")).unwrap();
        std::fs::write(temp.path().join("README.md"), "notes").unwrap();

        let rules = store.list();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "java_001");
    }
}
