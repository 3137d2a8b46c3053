//! Cycle orchestration.
//!
//! One cycle: fetch both mover batches concurrently, run the pure
//! analyzer, render the briefing, post it (if configured), persist the
//! selections, and return a summary report.
//!
//! Failure policy: a failed fetch degrades that side to an empty batch
//! with a warning; if both sides are empty the fallback briefing is
//! posted. Delivery and storage failures are likewise logged and
//! absorbed — a dead Telegram bot must not stop analysis.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::analyzer::Analyzer;
use crate::data::MarketDataProvider;
use crate::report::{self, telegram::TelegramNotifier};
use crate::storage::{self, AnalysisRecord};
use crate::types::CycleReport;

/// Run one full fetch → analyze → report → persist cycle.
///
/// `history_path`: `None` skips persistence entirely.
pub async fn run_cycle(
    provider: &dyn MarketDataProvider,
    analyzer: &Analyzer,
    notifier: Option<&TelegramNotifier>,
    history_path: Option<&str>,
    cycle_number: u64,
    fetch_limit: usize,
    top_n: usize,
) -> Result<CycleReport> {
    info!(cycle = cycle_number, provider = provider.name(), "Starting cycle");

    // 1. Fetch both sides concurrently. A failed side degrades to an
    //    empty batch so one bad endpoint never blanks the whole cycle.
    let (gainers, losers) = tokio::join!(
        provider.fetch_gainers(fetch_limit),
        provider.fetch_losers(fetch_limit),
    );
    let gainers = gainers.unwrap_or_else(|e| {
        warn!(error = %e, side = "gainers", "Fetch failed, treating side as empty");
        Vec::new()
    });
    let losers = losers.unwrap_or_else(|e| {
        warn!(error = %e, side = "losers", "Fetch failed, treating side as empty");
        Vec::new()
    });
    info!(gainers = gainers.len(), losers = losers.len(), "Mover batches fetched");

    // 2. Analyze.
    let outcome = analyzer.analyze(&gainers, &losers, top_n);

    // 3. Render.
    let now = Utc::now();
    let briefing = if outcome.best_gainers.is_empty() && outcome.best_losers.is_empty() {
        report::render_fallback(now)
    } else {
        report::render_briefing(&outcome.best_gainers, &outcome.best_losers, now)
    };

    // 4. Deliver.
    let mut posted = false;
    if let Some(notifier) = notifier {
        match notifier.send(&briefing).await {
            Ok(()) => posted = true,
            Err(e) => warn!(error = %e, "Failed to post briefing, continuing"),
        }
    }

    // 5. Persist selections.
    if let Some(path) = history_path {
        let records: Vec<AnalysisRecord> = outcome
            .best_gainers
            .iter()
            .chain(outcome.best_losers.iter())
            .map(|analysis| AnalysisRecord {
                timestamp: now,
                cycle: cycle_number,
                analysis: analysis.clone(),
            })
            .collect();
        if !records.is_empty() {
            if let Err(e) = storage::append_history(&records, Some(path)) {
                warn!(error = %e, "Failed to append history, continuing");
            }
        }
    }

    let report = CycleReport {
        cycle_number,
        timestamp: now,
        gainers_in: gainers.len(),
        losers_in: losers.len(),
        gainers_selected: outcome.best_gainers.len(),
        losers_selected: outcome.best_losers.len(),
        invalid_dropped: outcome.invalid_dropped,
        filtered_out: outcome.filtered_out,
        briefing_len: briefing.chars().count(),
        posted,
    };

    info!(%report, "Cycle complete");
    Ok(report)
}
