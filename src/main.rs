use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod dashboard;
mod error;
mod loader;
mod reports;
mod session;
mod sports;

use config::Config;
use dashboard::AppState;
use loader::Pages;
use reports::{ReportClient, ReportSource};
use session::{spawn_refresh_loop, SessionData};
use sports::Sport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let default_sport = config.default_sport()?;

    let client = ReportClient::new(&config.reports_base_url, config.request_timeout())?;
    info!("Reading reports from {}", config.reports_base_url);
    let source: Arc<dyn ReportSource> = Arc::new(client);

    // Home-page aggregate: swept once now, then on the refresh interval
    let session = Arc::new(SessionData::new(Sport::ALL.to_vec()));
    spawn_refresh_loop(session.clone(), source.clone(), config.session_refresh());
    match config.session_refresh() {
        Some(every) => info!("Session refresh every {:?}", every),
        None => info!("Session refresh disabled; sweeping once"),
    }

    let dashboard_state = AppState {
        source,
        session,
        pages: Arc::new(Pages::new(config.page_max_age())),
        default_sport,
    };
    let app = dashboard::router(dashboard_state);
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server (blocks until shutdown)
    axum::serve(listener, app).await?;

    Ok(())
}
