//! Relay service binary.
//!
//! Standalone HTTP service bridging Jira queries, GitHub/Jira webhooks,
//! and the ticket automation endpoint.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jira_relay::automation::AutomationClient;
use jira_relay::config::Config;
use jira_relay::jira_client::JiraClient;
use jira_relay::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("jira_relay=info".parse()?))
        .init();

    info!("Starting Jira relay service...");

    // Load configuration
    let config = Config::default();
    info!(
        base_url = %config.jira_base_url,
        project_key = %config.project_key,
        "Loaded configuration"
    );

    // Build outbound clients once; handlers share them via state
    let jira = JiraClient::new(
        &config.jira_base_url,
        &config.jira_email,
        &config.jira_api_token,
        &config.project_key,
    )?;
    let automation = AutomationClient::new(&config.automation_url)?;

    // Build application state
    let state = AppState {
        config: config.clone(),
        jira,
        automation,
    };

    // Build router
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Jira relay listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
