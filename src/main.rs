use anyhow::{Context, Result};
use coviddash::{config::DashboardConfig, dashboard::Dashboard, fetch, server};
use std::{env, net::SocketAddr, sync::Arc};
use tokio::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = DashboardConfig::load().context("loading configuration")?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    // ─── 3) load the three sources and build the table ───────────────
    let client = fetch::build_client().context("building HTTP client")?;
    let t0 = Instant::now();
    let dashboard = Dashboard::load(&client, &config)
        .await
        .context("loading case data")?;
    info!(
        records = dashboard.table().records().len(),
        regions = dashboard.table().regions().len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "data loaded"
    );

    // ─── 4) serve ────────────────────────────────────────────────────
    server::serve(Arc::new(dashboard), addr)
        .await
        .context("starting HTTP server")?;
    Ok(())
}
