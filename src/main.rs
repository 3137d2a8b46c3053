//! PULSE — Autonomous Crypto Market Analysis Agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the provider and notifier from config + env, and runs the
//! fetch→analyze→report loop with graceful shutdown.

use anyhow::Result;
use std::time::Duration;
use tracing::{error, info, warn};

use pulse::analyzer::{Analyzer, AnalyzerConfig};
use pulse::config::AppConfig;
use pulse::data::coinmarketcap::CoinMarketCapClient;
use pulse::engine;
use pulse::report::telegram::TelegramNotifier;
use pulse::types::CycleReport;

const BANNER: &str = r#"
 ____  _   _ _     ____  _____
|  _ \| | | | |   / ___|| ____|
| |_) | | | | |   \___ \|  _|
|  __/| |_| | |___ ___) | |___
|_|    \___/|_____|____/|_____|

  Crypto Market Analysis Agent
  v0.1.0 — Autonomous Agent
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        scan_interval_secs = cfg.agent.scan_interval_secs,
        top_n = cfg.agent.top_n,
        "PULSE starting up"
    );

    // -- Initialise components -------------------------------------------

    if !cfg.coinmarketcap.enabled {
        anyhow::bail!("CoinMarketCap provider is disabled — nothing to analyze");
    }
    let cmc_key = AppConfig::resolve_env(&cfg.coinmarketcap.api_key_env)?;
    let provider = CoinMarketCapClient::new(cmc_key)?;

    let analyzer = Analyzer::new(AnalyzerConfig::from(&cfg.analyzer));

    let notifier = if cfg.telegram.enabled {
        let token_env = cfg
            .telegram
            .bot_token_env
            .as_deref()
            .unwrap_or("TELEGRAM_BOT_TOKEN");
        let chat_env = cfg
            .telegram
            .chat_id_env
            .as_deref()
            .unwrap_or("TELEGRAM_CHAT_ID");
        match (std::env::var(token_env), std::env::var(chat_env)) {
            (Ok(token), Ok(chat_id)) => Some(TelegramNotifier::new(token, chat_id)?),
            _ => {
                warn!(
                    token_env,
                    chat_env, "Telegram enabled but credentials missing — running unposted"
                );
                None
            }
        }
    } else {
        info!("Telegram posting disabled — briefings stay local");
        None
    };

    let history_path = if cfg.storage.enabled {
        Some(
            cfg.storage
                .history_file
                .clone()
                .unwrap_or_else(|| "pulse_history.json".to_string()),
        )
    } else {
        None
    };

    // -- Main loop -------------------------------------------------------

    let scan_interval = Duration::from_secs(cfg.agent.scan_interval_secs);
    let mut interval = tokio::time::interval(scan_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.agent.scan_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let mut cycle_number: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                cycle_number += 1;
                match engine::run_cycle(
                    &provider,
                    &analyzer,
                    notifier.as_ref(),
                    history_path.as_deref(),
                    cycle_number,
                    cfg.coinmarketcap.fetch_limit,
                    cfg.agent.top_n,
                ).await {
                    Ok(report) => log_cycle_report(&report),
                    Err(e) => error!(error = %e, "Cycle failed — continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(cycles = cycle_number, "PULSE shut down cleanly.");
    Ok(())
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        gainers_in = report.gainers_in,
        losers_in = report.losers_in,
        selected = report.gainers_selected + report.losers_selected,
        invalid = report.invalid_dropped,
        filtered = report.filtered_out,
        briefing_chars = report.briefing_len,
        posted = report.posted,
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pulse=info"));

    let json_logging = std::env::var("PULSE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
