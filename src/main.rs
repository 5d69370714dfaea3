//! route-dispatch demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!   Client Request   │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ─────────────────┼─▶│  axum   │──▶│ engine   │──▶│   routing    │   │
//!                    │  │ layers  │   │ dispatch │   │ trie + table │   │
//!                    │  └─────────┘   └────┬─────┘   └──────────────┘   │
//!                    │                     │                            │
//!                    │                     ▼                            │
//!                    │          ┌──────────────────────┐                │
//!                    │          │ groups → middlewares │                │
//!                    │          │ ++ route handler     │                │
//!                    │          │ Context::next()      │                │
//!                    │          └──────────┬───────────┘                │
//!   Client Response  │                     │                            │
//!   ◀────────────────┼─────────────────────┘                            │
//!                    │   config · observability · lifecycle             │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::StatusCode;
use clap::Parser;
use serde::Serialize;
use tokio::net::TcpListener;

use route_dispatch::config::{load_config, validate_config, ConfigError, ServerConfig};
use route_dispatch::lifecycle::{signals, Shutdown};
use route_dispatch::observability::{init_logging, init_metrics};
use route_dispatch::{middleware, Engine, HttpServer, RouteError};

#[derive(Parser)]
#[command(name = "route-dispatch")]
#[command(about = "Trie-routed HTTP dispatch server with group middleware", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[derive(Serialize)]
struct Greeting {
    name: String,
    path: String,
}

/// Demo routes plus the configured static mounts.
fn build_engine(config: &ServerConfig) -> Result<Engine, RouteError> {
    let mut engine = Engine::new();
    let root = engine.root();
    engine.scope(root).use_handlers([middleware::logger()])?;

    engine
        .get("/", |ctx| {
            ctx.html(StatusCode::OK, "<h1>Hello route-dispatch</h1>");
        })?
        .get("/b", |ctx| ctx.string(StatusCode::OK, "11111!"))?
        .post("/a", |ctx| ctx.string(StatusCode::OK, "222222!"))?
        .get("/p/:lang/:type", |ctx| {
            let body = format!("Lang: {}, Type: {}", ctx.param("lang"), ctx.param("type"));
            ctx.string(StatusCode::OK, body);
        })?;

    let v1 = engine.group("/v1")?;
    engine
        .scope(v1)
        .use_middleware(|ctx| {
            ctx.next();
            if ctx.status().is_server_error() {
                tracing::warn!(path = %ctx.path(), status = %ctx.status(), "v1 request failed");
            }
        })?
        .get("/hello/:name", |ctx| {
            let greeting = Greeting {
                name: ctx.param("name").to_string(),
                path: ctx.path().to_string(),
            };
            ctx.json(StatusCode::OK, &greeting);
        })?;

    for mount in &config.static_files {
        engine.static_dir(&mount.prefix, &mount.root)?;
    }

    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability)?;
    tracing::info!("route-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        static_mounts = config.static_files.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let engine = build_engine(&config)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(engine, config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_greeting_is_json() {
        let engine = build_engine(&ServerConfig::default()).unwrap();
        let outcome = engine.dispatch(Request::get("/v1/hello/Ada%20L").body(()).unwrap());
        let ctx = outcome.context().unwrap();

        assert_eq!(ctx.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(ctx.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "name": "Ada L", "path": "/v1/hello/Ada L" })
        );
    }

    #[test]
    fn test_demo_routes() {
        let engine = build_engine(&ServerConfig::default()).unwrap();
        let outcome = engine.dispatch(Request::get("/p/go/doc").body(()).unwrap());
        assert_eq!(outcome.context().unwrap().body(), b"Lang: go, Type: doc");

        assert!(engine.dispatch(Request::get("/a").body(()).unwrap()).is_not_found());
    }
}
