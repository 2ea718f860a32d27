//! Observability for the rule store
//!
//! The store's read side deliberately swallows corrupt or mismatched
//! records instead of failing the operation. This module is the channel
//! that makes those skips visible to operators:
//!
//! - Structured one-line JSON logs with explicit severity
//! - Monotonic atomic counters, reset only on process start
//!
//! Observability is read-only and never changes store behavior.

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
