mod cli;
mod paths;
mod tabs;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use autovolume_aggregator::{
    AggregatorConfig, AggregatorHandle, InProcessTabHost, JsonFileSettingsStore, SettingsStore,
    TabHost, start_aggregator,
};
use autovolume_core::{AggregatorRequest, TabId, TabInfo};
use autovolume_engine::EngineConfig;

use cli::Cli;
use paths::resolve_settings_path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings_path = resolve_settings_path(&cli)?;
    info!(path = %settings_path.display(), "using settings file");
    let store = Arc::new(JsonFileSettingsStore::new(settings_path));
    let settings = store.load().await.context("load settings")?;

    let engine_config = EngineConfig {
        event_triggers: !cli.polling_only,
        ..EngineConfig::default()
    };
    let host = InProcessTabHost::new();
    let drift = Duration::from_millis(cli.drift_ms.max(50));
    let mut open_tabs = Vec::new();
    for id in 1..=cli.tabs {
        open_tabs.push(tabs::open_tab(&host, id, settings, engine_config.clone(), drift).await?);
    }
    // Content scripts never run on browser-internal pages.
    host.open_tab(
        TabInfo::new(TabId(cli.tabs + 1), "chrome://settings", "Settings"),
        None,
    );

    let tab_host: Arc<dyn TabHost> = host.clone();
    let settings_store: Arc<dyn SettingsStore> = store;
    let aggregator = start_aggregator(tab_host, settings_store, AggregatorConfig::default())
        .await
        .context("start aggregator")?;
    apply_band_overrides(&aggregator, &cli).await?;

    let outcome = tokio::select! {
        result = report_loop(&aggregator) => result,
        _ = stop_signal(cli.duration_secs) => Ok(()),
    };

    info!("shutting down");
    aggregator.shutdown().await.context("stop aggregator")?;
    for tab in open_tabs {
        tab.close(&host).await;
    }
    outcome
}

async fn stop_signal(duration_secs: Option<u64>) {
    match duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {},
                _ = tokio::signal::ctrl_c() => {},
            }
        },
        None => {
            let _ = tokio::signal::ctrl_c().await;
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .with_target(false)
        .try_init()
        .ok();
}

async fn apply_band_overrides(aggregator: &AggregatorHandle, cli: &Cli) -> Result<()> {
    if let Some(value) = cli.min_volume {
        aggregator
            .request(AggregatorRequest::UpdateMinVolume { value })
            .await
            .context("update min volume")?;
    }
    if let Some(value) = cli.max_volume {
        aggregator
            .request(AggregatorRequest::UpdateMaxVolume { value })
            .await
            .context("update max volume")?;
    }
    Ok(())
}

/// Logs the tab directory once a second, the way the popup would show it.
async fn report_loop(aggregator: &AggregatorHandle) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        let tabs = aggregator.tab_volumes().await.context("read tab directory")?;
        let summary = tabs
            .iter()
            .map(|tab| format!("{}={}%", tab.tab_id, tab.volume_percent))
            .collect::<Vec<_>>()
            .join(" ");
        info!(tabs = tabs.len(), "{summary}");
    }
}
