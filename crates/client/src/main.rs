//! Hive combat client binary.
//!
//! Composition root: loads configuration from the environment, installs
//! logging, and plays one automatic session to completion. Ctrl-C stops the
//! session between turns.
//!
//! # Examples
//!
//! ```bash
//! HIVE_PLAYER_HP=150 HIVE_HOSTILE_MISS=0.3 cargo run -p hive-client
//! RUST_LOG=hive_runtime=debug HIVE_SEED=42 cargo run -p hive-client
//! ```

mod config;

use anyhow::Result;
use tokio::sync::{broadcast, watch};

use config::ClientConfig;
use hive_core::Category;
use hive_runtime::Session;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(runtime = ?config.runtime, "starting hive client");

    let mut session = Session::builder().config(config.runtime).build().await?;

    let mut reports = session.subscribe_reports();
    let report_task = tokio::spawn(async move {
        loop {
            match reports.recv().await {
                Ok(report) => tracing::info!(
                    damage = report.damage,
                    severity = %report.severity,
                    health = format_args!("{:.1}%", report.health_percent),
                    alive = report.alive_hostiles,
                    "sting"
                ),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "report subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            let _ = stop_tx.send(true);
        }
    });

    let outcome = session.run_auto(stop_rx).await?;

    let status = session.status();
    tracing::info!(
        %outcome,
        turns = status.turn,
        player_health = status.player_health,
        player_max_health = status.player_max_health,
        leaders = status.alive(Category::Leader),
        lieutenants = status.alive(Category::Lieutenant),
        grunts = status.alive(Category::Grunt),
        "game over"
    );

    session.shutdown().await?;
    report_task.await?;

    Ok(())
}
