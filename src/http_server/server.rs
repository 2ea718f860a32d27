//! # HTTP Server
//!
//! Axum server wiring the rules router, liveness route, and CORS.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::Logger;
use crate::rules::RuleStore;

use super::config::HttpServerConfig;
use super::rules_routes::{rules_routes, RulesState};

/// HTTP server for the rule service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store
    pub fn new(config: HttpServerConfig, store: RuleStore) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, store: RuleStore) -> Router {
        let state = Arc::new(RulesState::new(store));

        // No configured origins means permissive CORS for development
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/", get(liveness_handler))
            .nest("/api", rules_routes(state))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        Logger::info("HTTP_SERVER_STARTED", &[("addr", &addr.to_string())]);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

async fn liveness_handler() -> &'static str {
    "rulebase is running"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_server_creation() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        let server = HttpServer::new(HttpServerConfig::default(), store);
        assert_eq!(server.socket_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_server_with_configured_origins() {
        let temp = TempDir::new().unwrap();
        let store = RuleStore::open(temp.path()).unwrap();
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let server = HttpServer::new(config, store);
        let _router = server.router();
    }
}
