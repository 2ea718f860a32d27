//! Rules HTTP Routes
//!
//! CRUD, toggle, and bulk import endpoints over the rule store.
//! The store returns `Option` for absent records and typed errors for
//! everything else; these handlers only translate those outcomes into
//! statuses and JSON bodies.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::observability::MetricsSnapshot;
use crate::rules::{ImportReport, Rule, RuleDraft, RuleStore, RuleStoreError, RuleUpdate};

// ==================
// Shared State
// ==================

/// State shared across rule handlers
pub struct RulesState {
    pub store: RuleStore,
}

impl RulesState {
    pub fn new(store: RuleStore) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub rules: Vec<RuleDraft>,
    #[serde(default, rename = "overwriteExisting")]
    pub overwrite_existing: bool,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn store_error(err: RuleStoreError) -> HandlerError {
    let code = err.status_code();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse {
            error: err.to_string(),
            code,
        }),
    )
}

fn not_found(id: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Rule with id '{}' not found", id),
            code: 404,
        }),
    )
}

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
            code: 400,
        }),
    )
}

// ==================
// Rules Routes
// ==================

/// Create the rules router
pub fn rules_routes(state: Arc<RulesState>) -> Router {
    Router::new()
        .route("/rules", get(list_rules_handler).post(create_rule_handler))
        .route("/rules/import", post(import_rules_handler))
        .route(
            "/rules/:id",
            get(get_rule_handler)
                .put(update_rule_handler)
                .delete(delete_rule_handler),
        )
        .route("/rules/:id/toggle", patch(toggle_rule_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_rules_handler(State(state): State<Arc<RulesState>>) -> Json<Vec<Rule>> {
    Json(state.store.list())
}

async fn get_rule_handler(
    State(state): State<Arc<RulesState>>,
    Path(id): Path<String>,
) -> Result<Json<Rule>, HandlerError> {
    match state.store.get(&id).map_err(store_error)? {
        Some(rule) => Ok(Json(rule)),
        None => Err(not_found(&id)),
    }
}

async fn create_rule_handler(
    State(state): State<Arc<RulesState>>,
    Json(draft): Json<RuleDraft>,
) -> Result<(StatusCode, Json<Rule>), HandlerError> {
    // Presence validation is the adapter's job; the store only enforces
    // the identifier format and uniqueness.
    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(bad_request(format!(
            "Missing required rule fields ({})",
            missing.join(", ")
        )));
    }

    let rule = draft.into_rule().map_err(|message| bad_request(message))?;
    let id = rule.id.clone();
    let created = state.store.create(&id, rule).map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_rule_handler(
    State(state): State<Arc<RulesState>>,
    Path(id): Path<String>,
    Json(update): Json<RuleUpdate>,
) -> Result<Json<Rule>, HandlerError> {
    // Reject an explicit id change at the boundary; the store would only
    // warn and ignore it, but a conflicting request is a caller bug.
    if let Some(body_id) = &update.id {
        if body_id != &id {
            return Err(bad_request(format!(
                "Rule id in body ('{}') cannot differ from id in path ('{}')",
                body_id, id
            )));
        }
    }

    match state.store.update(&id, &update).map_err(store_error)? {
        Some(rule) => Ok(Json(rule)),
        None => Err(not_found(&id)),
    }
}

async fn delete_rule_handler(
    State(state): State<Arc<RulesState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    if state.store.delete(&id).map_err(store_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

async fn toggle_rule_handler(
    State(state): State<Arc<RulesState>>,
    Path(id): Path<String>,
) -> Result<Json<Rule>, HandlerError> {
    match state.store.toggle(&id).map_err(store_error)? {
        Some(rule) => Ok(Json(rule)),
        None => Err(not_found(&id)),
    }
}

async fn import_rules_handler(
    State(state): State<Arc<RulesState>>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportReport>, HandlerError> {
    // Per-entry failures are data in the report, not HTTP errors; only a
    // failed bootstrap turns into a 500 here.
    let report = state
        .store
        .bulk_import(request.rules, request.overwrite_existing)
        .map_err(store_error)?;
    Ok(Json(report))
}

async fn metrics_handler(State(state): State<Arc<RulesState>>) -> Json<MetricsSnapshot> {
    Json(state.store.metrics().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_router_builds() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        let _router = rules_routes(Arc::new(RulesState::new(store)));
    }

    #[test]
    fn test_store_error_maps_conflict_to_409() {
        let (status, Json(body)) = store_error(RuleStoreError::AlreadyExists("java_001".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, 409);
        assert!(body.error.contains("java_001"));
    }

    #[test]
    fn test_store_error_maps_bad_id_to_400() {
        let (status, _) = store_error(RuleStoreError::InvalidIdentifier("a b".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_import_request_defaults_overwrite_to_false() {
        let request: ImportRequest = serde_json::from_str(r#"{"rules": []}"#).unwrap();
        assert!(!request.overwrite_existing);
    }
}
