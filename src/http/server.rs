//! HTTP server assembly.
//!
//! Builds the axum router around the catch-all dispatcher, wires the
//! middleware stack, and owns the shared state handed to every request.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{any, get};
use axum::Router;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::dispatcher::dispatch;
use super::request::{propagate_request_id_layer, set_request_id_layer};
use crate::config::AppConfig;
use crate::docs;
use crate::proxy::ProxyRule;
use crate::routing::RouteTable;

/// Upstream client. The connector speaks both http and https so rules may
/// target either scheme.
pub type ForwardClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Shared state for all request handlers. Cheap to clone; everything heavy
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub rules: Arc<Vec<ProxyRule>>,
    pub proxy_enabled: bool,
    pub client: ForwardClient,
    pub docs: Arc<serde_json::Value>,
    pub max_body_bytes: usize,
}

/// The assembled gateway server.
pub struct HttpServer {
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// Assemble the server from validated configuration, a built route
    /// table, and the runtime proxy rules. The API description is assembled
    /// here, once, and served from cache.
    pub fn new(config: AppConfig, table: RouteTable, rules: Vec<ProxyRule>) -> Self {
        let docs = docs::assemble(&table, &config);
        let client = Client::builder(TokioExecutor::new()).build(HttpsConnector::new());

        let state = AppState {
            table: Arc::new(table),
            rules: Arc::new(rules),
            proxy_enabled: config.proxy.enabled,
            client,
            docs: Arc::new(docs),
            max_body_bytes: config.server.max_body_bytes,
        };

        Self { config, state }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the router: the docs endpoint (when enabled), then the
    /// catch-all dispatcher for everything else.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new();

        if self.config.docs.enabled {
            router = router.route(&self.config.docs.path, get(docs_handler));
        }

        router
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(self.state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> std::io::Result<()> {
        let router = self.build_router();
        tracing::info!(
            routes = self.state.table.len(),
            proxy_rules = self.state.rules.len(),
            proxy_enabled = self.state.proxy_enabled,
            "gateway listening"
        );
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn docs_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.docs.as_ref().clone())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
