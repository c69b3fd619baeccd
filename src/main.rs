//! Market ticker refresher
//!
//! # Architecture
//! - **core**: Payload types and pure formatting (badge, price, change, row)
//! - **rest**: Ticker endpoint client
//! - **view**: Render targets (in-memory page, HTML fragment file)
//! - **engine**: Refresh cycle and scheduler
//! - **infrastructure**: Config, logging, metrics

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;

use uz_ticker::infrastructure::config::Config;
use uz_ticker::infrastructure::logging::init_logging;
use uz_ticker::rest::HttpTickerSource;
use uz_ticker::view::{HtmlFileView, ReadyState};
use uz_ticker::{RefreshOutcome, RefreshSettings, Scheduler, TickerRefresher};

/// Poll the markets ticker endpoint and render the marquee fragment
#[derive(Debug, Parser)]
#[command(name = "uz-ticker", version, about)]
struct Args {
    /// Config file (defaults to CONFIG_PATH, then config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override ticker.base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Override output.path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run a single refresh cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(base_url) = args.base_url {
        config.ticker.base_url = base_url;
    }
    if let Some(output) = args.output {
        config.output.path = output;
    }

    let _guards = init_logging(&config.logging.dir, &config.logging.level)
        .context("Failed to initialize logging")?;

    let source = HttpTickerSource::from_config(&config.ticker)?;
    tracing::info!("Ticker endpoint: {}", source.url());

    let view = HtmlFileView::new(&config.output.path)
        .with_lang(config.output.lang.clone())
        .with_loading_attr(config.output.loading_attr.clone());
    let mut refresher = TickerRefresher::new(source, view, RefreshSettings::from(&config.ticker));

    if args.once {
        let outcome = refresher.refresh().await;
        tracing::info!(
            "Single refresh: {:?}, fragment at {}",
            outcome,
            config.output.path.display()
        );
        if outcome == RefreshOutcome::Failed {
            anyhow::bail!("Ticker refresh failed");
        }
        return Ok(());
    }

    let scheduler = Scheduler::new(refresher, config.ticker.interval());
    let (_ready_tx, ready_rx) = watch::channel(ReadyState::Complete);
    let (stop_tx, stop_rx) = watch::channel(false);

    let shutdown = async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Ctrl-C received, stopping"),
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
        let _ = stop_tx.send(true);
    };

    let (refresher, ()) = tokio::join!(scheduler.run(ready_rx, stop_rx), shutdown);
    let snapshot = refresher.metrics().snapshot();
    tracing::info!(
        "Uptime {}s, {} cycles, failure ratio {:.2}",
        snapshot.uptime_seconds,
        snapshot.cycles,
        snapshot.failure_ratio()
    );

    Ok(())
}
