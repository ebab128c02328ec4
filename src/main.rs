//! Gateway binary: loads configuration, registers the built-in routes, and
//! serves until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use api_gateway::config::{load_config, AppConfig};
use api_gateway::observability::init_metrics;
use api_gateway::proxy::rules_from_config;
use api_gateway::routing::{RequestContext, Route, RouteTable};
use api_gateway::schema::{Field, Schema};
use api_gateway::HttpServer;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "api-gateway", about = "HTTP API gateway with schema-validated routes and a rule-based reverse proxy")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

async fn health(_ctx: RequestContext) -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

fn builtin_routes() -> Vec<Route> {
    vec![Route::new(Method::GET, "/health", health)
        .summary("Gateway liveness probe")
        .tag("system")
        .response(
            200,
            "The gateway is up",
            Schema::object(vec![Field::required("status", Schema::string())]),
        )]
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("failed to load {}: {error}", path.display());
                process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "api_gateway={},tower_http=info",
                config.observability.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(address) => init_metrics(address),
            Err(error) => tracing::error!(%error, "invalid metrics address"),
        }
    }

    let table = match RouteTable::build(builtin_routes()) {
        Ok(table) => table,
        Err(error) => {
            eprintln!("invalid route set: {error}");
            process::exit(1);
        }
    };

    let rules = match rules_from_config(&config.proxy.rules) {
        Ok(rules) => rules,
        Err(error) => {
            eprintln!("invalid proxy rules: {error}");
            process::exit(1);
        }
    };

    let bind = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(error) => {
            eprintln!("failed to bind {bind}: {error}");
            process::exit(1);
        }
    };

    let server = HttpServer::new(config, table, rules);
    if let Err(error) = server.run(listener).await {
        eprintln!("server error: {error}");
        process::exit(1);
    }
}
