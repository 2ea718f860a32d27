//! # Rule Persistence
//!
//! Durable, identifier-addressed storage for audit rule definitions.
//!
//! One JSON file per rule, stored flat under the configured rules
//! directory. The store is the sole writer of rule state; the HTTP and
//! CLI layers are thin adapters over the operations exposed here.

pub mod errors;
pub mod import;
pub mod model;
pub mod store;

pub use errors::{RuleStoreError, RuleStoreResult};
pub use import::{ImportReport, RuleDraft};
pub use model::{Rule, RuleUpdate, Severity};
pub use store::RuleStore;
