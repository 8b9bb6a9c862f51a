//! Macro Planner dashboard server
//!
//! Serves the planner's task and journal operations as a JSON API over
//! one remote-store session loaded at startup.
//!
//! # Configuration
//!
//! Environment variables:
//! - `MACROPLAN_PORT`: Port to listen on (default: 8787)
//! - `MACROPLAN_CONFIG`: Path to config file (default: ~/.config/macroplan/config.yaml)
//! - `MACROPLAN_API_TOKEN` / `MACROPLAN_BASE_ID`: store credentials,
//!   unless the config file provides them
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (never touches the store)
//! - `GET|POST /tasks`, `PUT|DELETE /tasks/{index}`
//! - `GET|POST /journal`, `PUT|DELETE /journal/{index}`
//! - `GET /summary`: task counts by priority
//! - `POST /refresh`: re-read both tables from the store

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use macroplan::config::Config;
use macroplan::server::{router, AppState};
use macroplan::session::Session;
use macroplan::store::RestTableStore;

/// Server settings taken from the environment.
struct ServerConfig {
    port: u16,
    config_path: Option<PathBuf>,
}

impl ServerConfig {
    fn from_env() -> Self {
        let port = std::env::var("MACROPLAN_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8787);

        let config_path = std::env::var("MACROPLAN_CONFIG").map(PathBuf::from).ok();

        Self { port, config_path }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macroplan=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server_config = ServerConfig::from_env();

    // Load planner configuration; missing credentials are fatal before
    // the server binds.
    let config = match Config::load(server_config.config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let creds = match config.credentials() {
        Ok(creds) => creds,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Load both tables into the session before accepting requests.
    let store = RestTableStore::new(creds.api_url, creds.base_id, creds.api_token);
    let session = match Session::start(
        store,
        config.tasks_table.value.clone(),
        config.journal_table.value.clone(),
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to load planner state: {}", e);
            std::process::exit(1);
        }
    };

    let app = router(AppState::new(session));

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    tracing::info!("Starting dashboard server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
