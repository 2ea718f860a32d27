//! # HTTP Server Module
//!
//! Thin axum adapter over the rule store. Handlers translate store
//! outcomes to HTTP statuses (absent → 404, duplicate id → 409, bad id
//! or missing field → 400, storage failure → 500) and own no rule
//! semantics of their own.
//!
//! # Endpoints
//!
//! - `/` - Liveness check
//! - `/api/rules/*` - Rule CRUD, toggle, bulk import
//! - `/api/metrics` - Store counters

pub mod config;
pub mod rules_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
