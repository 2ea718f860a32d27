//! rulebase - durable rule storage for the code audit system
//!
//! The core is [`rules::RuleStore`]: one JSON file per rule in a flat
//! directory, addressed by a validated identifier, exposing CRUD plus
//! enable/disable toggle and bulk import. The CLI and HTTP server are
//! thin adapters over it.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod rules;
